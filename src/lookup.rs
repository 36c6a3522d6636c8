//! Geolocation service client.
//!
//! The service exposes one endpoint per address family. Each takes the address
//! as the `ip` query parameter and answers with a JSON document whose `ret`
//! field is `1` on success.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::grouping::UNKNOWN;

pub const DEFAULT_IPV4_URL: &str = "http://ipip-service.internal/ipv4";
pub const DEFAULT_IPV6_URL: &str = "http://ipip-service.internal/ipv6";

const RET_SUCCESS: i64 = 1;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LookupResult {
    pub ip: String,
    pub country: String,
    pub province: String,
    pub city: String,
    pub isp: String,
    pub ret: i64,
    pub reason: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl LookupResult {
    pub fn failure(ip: &str, reason: impl Into<String>) -> Self {
        Self {
            ip: ip.to_string(),
            ret: 0,
            reason: Some(reason.into()),
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.ret == RET_SUCCESS
    }

    /// The `(province, isp)` bucket this result belongs in.
    pub fn placement(&self) -> (&str, &str) {
        if self.is_success() {
            (&self.province, &self.isp)
        } else {
            (UNKNOWN, UNKNOWN)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    /// Any colon means IPv6. No further validation is done.
    pub fn of(addr: &str) -> Self {
        if addr.contains(':') {
            AddressFamily::V6
        } else {
            AddressFamily::V4
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub ipv4: String,
    pub ipv6: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            ipv4: DEFAULT_IPV4_URL.to_string(),
            ipv6: DEFAULT_IPV6_URL.to_string(),
        }
    }
}

impl Endpoints {
    pub fn base_for(&self, family: AddressFamily) -> &str {
        match family {
            AddressFamily::V4 => &self.ipv4,
            AddressFamily::V6 => &self.ipv6,
        }
    }

    /// Sets the `ip` query parameter on the family's endpoint. An `ip` pair
    /// already on the base URL (such as a trailing `?ip=`) is replaced.
    pub fn url_for(&self, addr: &str) -> Result<Url> {
        let base = self.base_for(AddressFamily::of(addr));
        let mut url =
            Url::parse(base).with_context(|| format!("Invalid service endpoint: {}", base))?;

        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != "ip")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(&kept)
            .append_pair("ip", addr);
        Ok(url)
    }

    pub fn validate(&self) -> Result<()> {
        for base in [&self.ipv4, &self.ipv6] {
            Url::parse(base).with_context(|| format!("Invalid service endpoint: {}", base))?;
        }
        Ok(())
    }
}

/// Resolves one address. Failures come back as an unsuccessful
/// [`LookupResult`] rather than an error.
#[async_trait]
pub trait GeoLookup: Send + Sync {
    async fn lookup(&self, addr: &str) -> LookupResult;
}

pub struct HttpGeoLookup {
    client: Client,
    endpoints: Endpoints,
}

impl HttpGeoLookup {
    pub fn new(endpoints: Endpoints, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { client, endpoints })
    }

    async fn fetch(&self, addr: &str) -> Result<LookupResult> {
        let url = self.endpoints.url_for(addr)?;
        debug!(action = "request", component = "lookup", ip = addr, url = %url, "Querying geolocation service");

        let body = self.client.get(url).send().await?.bytes().await?;
        let result = serde_json::from_slice(&body)?;
        Ok(result)
    }
}

#[async_trait]
impl GeoLookup for HttpGeoLookup {
    async fn lookup(&self, addr: &str) -> LookupResult {
        match self.fetch(addr).await {
            Ok(result) => result,
            Err(e) => LookupResult::failure(addr, format!("{:#}", e)),
        }
    }
}
