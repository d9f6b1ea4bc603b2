use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::verification::VerificationService;
use crate::shared::shutdown::ShutdownSignal;

/// Periodically delete expired verification codes until shutdown.
pub fn start_verification_cleanup_task(
    verification: Arc<VerificationService>,
    shutdown: ShutdownSignal,
    interval_secs: u64,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval = interval_secs, "Verification cleanup task started");

        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match verification.purge_expired().await {
                        Ok(0) => debug!("No expired verifications"),
                        Ok(removed) => info!(removed, "Purged expired verifications"),
                        Err(e) => warn!(error = %e, "Verification cleanup failed"),
                    }
                }
                _ = shutdown.wait() => {
                    break;
                }
            }
        }

        info!("Verification cleanup task stopped");
    })
}
