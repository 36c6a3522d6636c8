use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::grouping::Grouping;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Object keyed by province, then ISP
    #[default]
    Nested,
    /// Array of {province, isp, ips} records
    Flat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    Stdout,
    File(PathBuf),
}

impl Sink {
    pub fn from_path(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Sink::File(path.to_path_buf()),
            None => Sink::Stdout,
        }
    }
}

pub fn render(grouping: &Grouping, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Nested => serde_json::to_string_pretty(grouping),
        OutputFormat::Flat => serde_json::to_string_pretty(&grouping.to_records()),
    };
    rendered.context("Failed to generate JSON output")
}

pub fn write_output(rendered: &str, sink: &Sink) -> Result<()> {
    match sink {
        Sink::Stdout => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", rendered).context("Failed to write to stdout")?;
            handle.flush().context("Failed to flush stdout")?;
        }
        Sink::File(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {:?}", path))?;
            let mut writer = BufWriter::new(file);
            writeln!(writer, "{}", rendered)
                .and_then(|_| writer.flush())
                .with_context(|| format!("Failed to write output file {:?}", path))?;
            info!(action = "write", component = "output", file_path = ?path, bytes = rendered.len(), "Wrote classification");
        }
    }
    Ok(())
}
