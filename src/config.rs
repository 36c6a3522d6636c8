use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::lookup::{Endpoints, DEFAULT_IPV4_URL, DEFAULT_IPV6_URL};
use crate::output::OutputFormat;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub classify: ClassifyConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub ipv4_url: String,
    pub ipv6_url: String,
    /// Per-request timeout. Unset keeps the HTTP client default.
    pub timeout_secs: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            ipv4_url: DEFAULT_IPV4_URL.to_string(),
            ipv6_url: DEFAULT_IPV6_URL.to_string(),
            timeout_secs: None,
        }
    }
}

impl ServiceConfig {
    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            ipv4: self.ipv4_url.clone(),
            ipv6: self.ipv6_url.clone(),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Maximum concurrent lookups. Unset means no bound.
    pub max_in_flight: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub path: Option<PathBuf>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Invalid config file {:?}", path))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Loads `path` if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Command-line flags take precedence over the file.
    pub fn apply_args(&mut self, args: &crate::args::Args) {
        if let Some(url) = &args.ipv4_url {
            self.service.ipv4_url = url.clone();
        }
        if let Some(url) = &args.ipv6_url {
            self.service.ipv6_url = url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.service.timeout_secs = Some(timeout);
        }
        if let Some(limit) = args.limit {
            self.classify.max_in_flight = Some(limit);
        }
        if let Some(format) = args.format {
            self.output.format = format;
        }
        if let Some(path) = &args.output {
            self.output.path = Some(path.clone());
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.service.endpoints().validate()?;
        if self.service.timeout_secs == Some(0) {
            anyhow::bail!("service.timeout_secs must be greater than 0");
        }
        if self.classify.max_in_flight == Some(0) {
            anyhow::bail!("classify.max_in_flight must be greater than 0");
        }
        Ok(())
    }
}
