//! Adapter common utility functions

use std::sync::Arc;

use async_channel::{Sender, TrySendError};
use contracts::{DropPolicy, ImuSample};
use tracing::trace;

use crate::config::IngestionMetrics;

/// Send a sample, handling the backpressure policy
#[inline]
pub fn send_sample(
    tx: &Sender<ImuSample>,
    sample: ImuSample,
    metrics: &Arc<IngestionMetrics>,
    feed_id: &str,
    drop_policy: DropPolicy,
) {
    match drop_policy {
        DropPolicy::DropNewest => match tx.try_send(sample) {
            Ok(_) => {
                trace!(feed_id = %feed_id, "sample sent");
            }
            Err(TrySendError::Full(_)) => {
                metrics.record_dropped();
                trace!(feed_id = %feed_id, "sample dropped (newest)");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::warn!(feed_id = %feed_id, "channel closed");
            }
        },
        DropPolicy::DropOldest => match tx.force_send(sample) {
            Ok(None) => {
                trace!(feed_id = %feed_id, "sample sent");
            }
            Ok(Some(_displaced)) => {
                metrics.record_dropped();
                trace!(feed_id = %feed_id, "sample dropped (oldest)");
            }
            Err(_) => {
                tracing::warn!(feed_id = %feed_id, "channel closed");
            }
        },
    }
    metrics.update_queue_len(tx.len());
}
