use serde::Serialize;
use std::collections::BTreeMap;

use crate::stats::ClassificationStats;

/// Sentinel used for both province and ISP when a lookup does not succeed.
pub const UNKNOWN: &str = "unknown";

/// Province -> ISP -> addresses.
///
/// Keys iterate in sorted order. Addresses within a bucket keep the order in
/// which they were inserted.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Grouping {
    provinces: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

/// One (province, ISP) bucket in the flat output shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedIps {
    pub province: String,
    pub isp: String,
    pub ips: Vec<String>,
}

impl Grouping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, province: &str, isp: &str, ip: impl Into<String>) {
        self.provinces
            .entry(province.to_string())
            .or_default()
            .entry(isp.to_string())
            .or_default()
            .push(ip.into());
    }

    pub fn get(&self, province: &str, isp: &str) -> Option<&[String]> {
        self.provinces
            .get(province)
            .and_then(|isps| isps.get(isp))
            .map(Vec::as_slice)
    }

    /// Iterates every bucket as `(province, isp, addresses)`.
    pub fn buckets(&self) -> impl Iterator<Item = (&str, &str, &[String])> {
        self.provinces.iter().flat_map(|(province, isps)| {
            isps.iter()
                .map(move |(isp, ips)| (province.as_str(), isp.as_str(), ips.as_slice()))
        })
    }

    /// Number of addresses across all buckets.
    pub fn total(&self) -> usize {
        self.buckets().map(|(_, _, ips)| ips.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.provinces.is_empty()
    }

    pub fn to_records(&self) -> Vec<ClassifiedIps> {
        self.buckets()
            .map(|(province, isp, ips)| ClassifiedIps {
                province: province.to_string(),
                isp: isp.to_string(),
                ips: ips.to_vec(),
            })
            .collect()
    }

    pub fn stats(&self) -> ClassificationStats {
        let mut stats = ClassificationStats {
            provinces: self.provinces.len(),
            ..Default::default()
        };

        for (province, isp, ips) in self.buckets() {
            stats.buckets += 1;
            stats.total += ips.len();
            if province == UNKNOWN && isp == UNKNOWN {
                stats.unknown += ips.len();
            }
        }

        stats
    }
}
