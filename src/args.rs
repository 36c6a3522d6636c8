use clap::Parser;
use std::path::PathBuf;

use crate::input::InputSource;
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "ipclassify",
    about = "Group IP addresses by province and ISP using a geolocation service",
    version,
    long_about = None
)]
pub struct Args {
    /// Input file with one IP address per line
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Spreadsheet saved as CSV (not .xlsx), with a header row and addresses in the second column
    #[arg(short, long, conflicts_with = "file")]
    pub sheet: Option<PathBuf>,

    /// IP addresses to classify (ignored when --file or --sheet is given)
    #[arg(value_name = "IPS")]
    pub ips: Vec<String>,

    /// Write JSON to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output shape
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Geolocation endpoint for IPv4 addresses; the address is sent as the `ip` query parameter
    #[arg(long)]
    pub ipv4_url: Option<String>,

    /// Geolocation endpoint for IPv6 addresses; the address is sent as the `ip` query parameter
    #[arg(long)]
    pub ipv6_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Maximum number of lookups in flight
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Number of worker threads
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn input_source(&self) -> InputSource {
        if let Some(path) = &self.file {
            InputSource::File(path.clone())
        } else if let Some(path) = &self.sheet {
            InputSource::Sheet(path.clone())
        } else {
            InputSource::Args(self.ips.clone())
        }
    }

    pub fn worker_threads(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            let cpu_count = num_cpus::get();
            std::cmp::min(cpu_count, 8)
        })
    }
}
