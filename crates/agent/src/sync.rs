//! Background-sync trigger point.
//!
//! Offline writes (inventory movements and the like) will be queued by the
//! application and flushed to the synchronization backend from here. The
//! queue itself lives outside this agent, behind [`QueueFlush`].

use async_trait::async_trait;
use coldchain_core::Error;

/// Flushes the application's offline write queue.
#[async_trait]
pub trait QueueFlush: Send + Sync {
    async fn flush(&self) -> Result<(), Error>;
}

/// Default flush: nothing is queued yet, so nothing is sent.
pub struct NoopQueueFlush;

#[async_trait]
impl QueueFlush for NoopQueueFlush {
    async fn flush(&self) -> Result<(), Error> {
        tracing::info!("background sync fired; no offline write queue is configured");
        Ok(())
    }
}

/// Handle a sync event. Returns whether `tag` matched and the queue was flushed.
pub async fn on_sync(queue: &dyn QueueFlush, expected: &str, tag: &str) -> Result<bool, Error> {
    if tag != expected {
        tracing::debug!(tag, "ignoring sync event with unknown tag");
        return Ok(false);
    }
    tracing::info!(tag, "background sync");
    queue.flush().await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingFlush(AtomicUsize);

    #[async_trait]
    impl QueueFlush for CountingFlush {
        async fn flush(&self) -> Result<(), Error> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_matching_tag_flushes() {
        let queue = CountingFlush::default();
        assert!(on_sync(&queue, "sync-movements", "sync-movements").await.unwrap());
        assert_eq!(queue.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_other_tag_ignored() {
        let queue = CountingFlush::default();
        assert!(!on_sync(&queue, "sync-movements", "sync-photos").await.unwrap());
        assert_eq!(queue.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_noop_flush_succeeds() {
        assert!(on_sync(&NoopQueueFlush, "sync-movements", "sync-movements").await.unwrap());
    }
}
