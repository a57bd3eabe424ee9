use std::time::Duration;
use tracing::{info, warn};

use playlink_api::AppState;

/// Background task that prunes expired link codes.
///
/// Lookups already ignore codes past their TTL; this keeps the pending_links
/// table from growing without bound.
pub async fn run_cleanup_loop(state: AppState, interval_secs: u64, ttl_secs: i64) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        interval.tick().await;

        let db = state.clone();
        let result =
            tokio::task::spawn_blocking(move || db.db.delete_expired_pending_links(ttl_secs))
                .await;

        match result {
            Ok(Ok(count)) => {
                if count > 0 {
                    info!("Cleanup: pruned {} expired link codes", count);
                }
            }
            Ok(Err(e)) => warn!("Cleanup error: {}", e),
            Err(e) => warn!("Cleanup join error: {}", e),
        }
    }
}
