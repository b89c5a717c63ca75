//! Periodic flush task.
//!
//! Runs the collector's flush pass on a fixed interval: recompute every
//! tenant's aggregates, persist them as last-known-good snapshots, and trim
//! buffers to the retention horizon. Stop is cooperative; cancellation is
//! checked between tenants so shutdown is bounded by one tenant's worth of
//! work plus one store write.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::collector::Collector;

/// Handle to a running flush task.
pub(crate) struct FlushTask {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl FlushTask {
    /// Spawn the periodic task. The first flush runs immediately, then on
    /// every interval tick.
    pub(crate) fn spawn(collector: Arc<Collector>, interval: Duration) -> Self {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            let pass_rx = stop_rx.clone();

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        collector.flush_pass(Some(&pass_rx)).await;
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }

                if *stop_rx.borrow() {
                    break;
                }
            }

            debug!("flush task exited");
        });

        Self { stop_tx, handle }
    }

    /// Signal the task and wait for it to wind down. An in-flight pass
    /// finishes its current tenant, observes the signal, and exits.
    pub(crate) async fn stop(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.handle.await;
    }
}
