use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::classify::classify;
use crate::config::Config;
use crate::dedup::unique;
use crate::grouping::Grouping;
use crate::input::InputSource;
use crate::lookup::{GeoLookup, HttpGeoLookup};
use crate::output::{self, Sink};
use crate::Args;

/// Collects, deduplicates and classifies the addresses from `source`.
pub async fn classify_source(
    source: &InputSource,
    lookup: Arc<dyn GeoLookup>,
    limit: Option<usize>,
) -> Result<Grouping> {
    let raw = source.collect()?;
    let raw_count = raw.len();
    let ips = unique(raw);
    info!(
        action = "dedup",
        component = "pipeline",
        raw_count,
        unique_count = ips.len(),
        "Deduplicated input"
    );

    Ok(classify(&ips, lookup, limit).await)
}

/// Runs a whole classification against an already resolved config.
pub async fn run_with(
    config: &Config,
    source: &InputSource,
    lookup: Arc<dyn GeoLookup>,
) -> Result<()> {
    let grouping = classify_source(source, lookup, config.classify.max_in_flight).await?;
    let rendered = output::render(&grouping, config.output.format)?;
    output::write_output(&rendered, &Sink::from_path(config.output.path.as_deref()))
}

pub async fn run(args: &Args) -> Result<()> {
    let total_start_time = Instant::now();
    info!(action = "start", component = "pipeline", "Starting IP classification");

    let mut config = Config::load_or_default(args.config.as_deref())?;
    config.apply_args(args);
    config.validate()?;
    debug!(action = "configure", component = "pipeline", config = ?config, "Resolved configuration");

    let lookup = HttpGeoLookup::new(config.service.endpoints(), config.service.timeout())?;
    run_with(&config, &args.input_source(), Arc::new(lookup)).await?;

    info!(
        action = "complete",
        component = "pipeline",
        duration_ms = total_start_time.elapsed().as_millis(),
        "Classification run completed"
    );
    Ok(())
}
