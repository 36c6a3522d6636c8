use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Column holding the address in spreadsheet exports.
const SHEET_IP_COLUMN: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Sheet(PathBuf),
    Args(Vec<String>),
}

impl InputSource {
    pub fn collect(&self) -> Result<Vec<String>> {
        let start_time = Instant::now();

        let (source, ips) = match self {
            InputSource::File(path) => ("file", read_ips_from_file(path)?),
            InputSource::Sheet(path) => ("sheet", read_ips_from_sheet(path)?),
            InputSource::Args(ips) => ("args", ips.clone()),
        };

        info!(
            action = "complete",
            component = "input",
            source,
            ip_count = ips.len(),
            duration_ms = start_time.elapsed().as_millis(),
            "Collected input addresses"
        );
        Ok(ips)
    }
}

/// One address per line. Blank lines are skipped.
pub fn read_ips_from_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {:?}", path))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Reads the second column of a CSV export, skipping the header row.
pub fn read_ips_from_sheet(path: &Path) -> Result<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV spreadsheet {:?}", path))?;

    reader
        .headers()
        .with_context(|| format!("Failed to read CSV header row of {:?}", path))?;

    let mut ips = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        // 1-based, counting the header
        let row_num = row_idx + 2;
        let record =
            record.with_context(|| format!("Failed to read CSV row {} of {:?}", row_num, path))?;

        if let Some(ip) = record.get(SHEET_IP_COLUMN).filter(|cell| !cell.is_empty()) {
            ips.push(ip.to_string());
        }
    }

    Ok(ips)
}
