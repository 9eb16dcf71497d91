//! Abort support for in-flight requests.
//!
//! An `AbortHandle` owns a `watch` channel; every `AbortSignal` is a receiver
//! on it. Aborting flips the value once and wakes all waiting calls.

use tokio::sync::watch;

#[derive(Debug)]
pub struct AbortHandle {
    tx: watch::Sender<bool>,
}

#[derive(Debug, Clone)]
pub struct AbortSignal {
    rx: watch::Receiver<bool>,
}

impl AbortHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Abort every call holding a signal from this handle. Idempotent.
    pub fn abort(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_aborted(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for AbortHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl AbortSignal {
    pub fn is_aborted(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the handle aborts. Never resolves if the handle is
    /// dropped without aborting.
    pub async fn aborted(&mut self) {
        let fired = self.rx.wait_for(|aborted| *aborted).await.is_ok();
        if !fired {
            std::future::pending::<()>().await;
        }
    }
}
