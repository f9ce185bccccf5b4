//! Concurrency gate
//!
//! With serialization enabled, every call holds the gate from the moment its
//! id is assigned until its response body has been read, so at most one
//! request is in flight per client. tokio's mutex is fair, so calls are
//! admitted in the order they arrived.

use tokio::sync::{Mutex, MutexGuard};

/// Single-holder gate around the compose-send-receive sequence
#[derive(Debug, Default)]
pub struct CallGate {
    lock: Mutex<()>,
}

/// Proof of holding the gate; dropping it lets the next call through
#[derive(Debug)]
pub struct GatePass<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl CallGate {
    /// Create an open gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other call holds the gate
    pub async fn enter(&self) -> GatePass<'_> {
        GatePass {
            _guard: self.lock.lock().await,
        }
    }

    /// Whether a call currently holds the gate
    pub fn is_busy(&self) -> bool {
        self.lock.try_lock().is_err()
    }
}
