//! Keep-alive registration for event work.
//!
//! A handler may hand back its result before every side effect has finished
//! (the network-first store write is the main case). Such work is registered
//! on the event with [`ExtendableEvent::wait_until`], and the bridge does not
//! acknowledge the event to the host until [`ExtendableEvent::settled`]
//! returns.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use tokio::task::JoinHandle;

pub struct ExtendableEvent {
    name: &'static str,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl ExtendableEvent {
    pub fn new(name: &'static str) -> Self {
        Self { name, pending: Mutex::new(Vec::new()) }
    }

    /// Start `work` now and keep the event alive until it finishes.
    pub fn wait_until<F>(&self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(work);
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).push(handle);
    }

    /// Wait for all registered work to finish.
    pub async fn settled(self) {
        let handles = self.pending.into_inner().unwrap_or_else(PoisonError::into_inner);
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!(event = self.name, error = %e, "pending work did not complete");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_settled_waits_for_work() {
        let done = Arc::new(AtomicUsize::new(0));
        let event = ExtendableEvent::new("fetch");

        for _ in 0..3 {
            let done = done.clone();
            event.wait_until(async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                done.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(done.load(Ordering::SeqCst), 0);

        event.settled().await;
        assert_eq!(done.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_settled_survives_panicking_work() {
        let event = ExtendableEvent::new("fetch");
        let fail = true;
        event.wait_until(async move {
            if fail {
                panic!("store write blew up");
            }
        });
        event.settled().await;
    }
}
