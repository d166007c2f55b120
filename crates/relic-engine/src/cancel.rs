//! One-shot, run-scoped cancellation signal.
//!
//! Cancellation is cooperative: the signal is observed at safe points and by
//! every waiting future (enqueue, retry backoff, cooldown). There is no
//! preemption of in-flight filesystem calls, so worst-case cancel latency is
//! the duration of the current syscall.

use std::sync::Arc;

use tokio::sync::watch;

/// Shared one-shot cancel signal fanned out to walkers and the processor.
#[derive(Clone)]
pub(crate) struct CancelSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelSignal {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Fire the signal. Idempotent; later calls are no-ops.
    pub(crate) fn fire(&self) {
        self.tx.send_replace(true);
    }

    /// Non-blocking check used at per-entry safe points.
    pub(crate) fn is_fired(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolve once the signal fires.
    pub(crate) async fn fired(&self) {
        let mut rx = self.tx.subscribe();
        let _ = rx.wait_for(|fired| *fired).await;
    }
}
