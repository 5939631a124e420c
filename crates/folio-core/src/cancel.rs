//! Cooperative cancellation for long-running scans.
//!
//! A [`CancelHandle`] is held by whoever may abort the work (a rebuild
//! endpoint, a CLI signal handler); the paired [`CancelSignal`] is passed
//! into the scan and checked between units of work. State changes are
//! broadcast through a `tokio::sync::watch` channel, so any number of
//! signals can observe one handle.
//!
//! ```rust
//! use folio_core::CancelSignal;
//!
//! let (handle, signal) = CancelSignal::pair();
//! assert!(!signal.is_cancelled());
//!
//! handle.cancel();
//! assert!(signal.is_cancelled());
//! ```

use tokio::sync::watch;

/// Owner side of a cancellation pair.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Create another signal observing this handle.
    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            rx: self.tx.subscribe(),
        }
    }
}

/// Observer side of a cancellation pair. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    /// Create a connected handle/signal pair.
    pub fn pair() -> (CancelHandle, CancelSignal) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { tx }, CancelSignal { rx })
    }

    /// A signal that is never cancelled.
    pub fn never() -> Self {
        let (_handle, signal) = Self::pair();
        signal
    }

    /// Returns `true` once the paired handle has cancelled.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_is_not_cancelled() {
        assert!(!CancelSignal::never().is_cancelled());
    }

    #[test]
    fn test_cancel_is_observed_by_all_signals() {
        let (handle, signal) = CancelSignal::pair();
        let second = handle.signal();
        let cloned = signal.clone();

        handle.cancel();
        handle.cancel();

        assert!(signal.is_cancelled());
        assert!(second.is_cancelled());
        assert!(cloned.is_cancelled());
    }
}
