use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Process-wide "index is built" flag.
///
/// Cloned into the ingestion worker and every service; starts closed, opens
/// once and never closes again.
#[derive(Debug, Clone, Default)]
pub struct ReadinessGate {
    ready: Arc<AtomicBool>,
}

impl ReadinessGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Open the gate. Returns `false` if it was already open.
    pub fn mark_ready(&self) -> bool {
        !self.ready.swap(true, Ordering::SeqCst)
    }
}
