use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::grouping::{Grouping, UNKNOWN};
use crate::lookup::GeoLookup;

/// Looks up every address concurrently and groups them by province and ISP.
///
/// Returns only once every lookup has finished. Each address ends up in
/// exactly one bucket; failed lookups land under `unknown`/`unknown`.
/// `limit` caps the number of lookups in flight, `None` dispatches them all
/// at once. Callers deduplicate `ips` first; a repeated entry is looked up and
/// recorded once per occurrence.
pub async fn classify(
    ips: &[String],
    lookup: Arc<dyn GeoLookup>,
    limit: Option<usize>,
) -> Grouping {
    let start_time = Instant::now();
    info!(
        action = "start",
        component = "classify",
        ip_count = ips.len(),
        limit = ?limit,
        "Starting classification"
    );

    let grouping = Arc::new(Mutex::new(Grouping::new()));
    let permits = limit.map(|n| Arc::new(Semaphore::new(n.clamp(1, Semaphore::MAX_PERMITS))));
    let mut tasks = JoinSet::new();

    for (index, ip) in ips.iter().enumerate() {
        let ip = ip.clone();
        let lookup = Arc::clone(&lookup);
        let grouping = Arc::clone(&grouping);
        let permits = permits.clone();

        tasks.spawn(async move {
            let _permit = match permits {
                Some(permits) => permits.acquire_owned().await.ok(),
                None => None,
            };

            let result = lookup.lookup(&ip).await;
            if !result.is_success() {
                warn!(
                    action = "lookup",
                    component = "classify",
                    ip = %ip,
                    ret = result.ret,
                    reason = result.reason.as_deref().unwrap_or(""),
                    "Lookup failed, classifying as unknown"
                );
            }

            let (province, isp) = result.placement();
            grouping.lock().insert(province, isp, ip);
            index
        });
    }

    let mut merged = vec![false; ips.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(index) => merged[index] = true,
            Err(e) => error!(action = "join", component = "classify", error = %e, "Lookup task failed"),
        }
    }

    // Every task has been joined, so this is the last reference.
    let mut grouping = Arc::try_unwrap(grouping)
        .map(Mutex::into_inner)
        .unwrap_or_else(|shared| shared.lock().clone());

    // A task that panicked never merged its address.
    for (ip, _) in ips.iter().zip(&merged).filter(|(_, done)| !**done) {
        grouping.insert(UNKNOWN, UNKNOWN, ip.as_str());
    }

    let stats = grouping.stats();
    info!(
        action = "complete",
        component = "classify",
        total = stats.total,
        resolved = stats.resolved(),
        unknown = stats.unknown,
        provinces = stats.provinces,
        buckets = stats.buckets,
        duration_ms = start_time.elapsed().as_millis(),
        "Classification completed"
    );

    grouping
}
