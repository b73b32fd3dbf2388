//! Per-connection session state.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::transport::{ConnectionHandle, FrameReader};

/// Largest sequence `Liveness` can hold; one value is reserved for "none".
pub const MAX_SEQUENCE: u64 = u64::MAX - 1;

/// State shared between the event loop (writer) and the heartbeat driver
/// (reader).
///
/// The sequence is stored as `seq + 1` so that `0` means "nothing seen yet"
/// and a single atomic carries both facts. Updates use `fetch_max`, so the
/// value never moves backwards.
#[derive(Debug)]
pub struct Liveness {
    sequence: AtomicU64,
    acked: AtomicBool,
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

impl Liveness {
    pub fn new() -> Self {
        Self {
            sequence: AtomicU64::new(0),
            acked: AtomicBool::new(true),
        }
    }

    /// Record a dispatch sequence number. Values above `MAX_SEQUENCE` are
    /// clamped to it.
    pub fn observe(&self, seq: u64) {
        let stored = seq.min(MAX_SEQUENCE) + 1;
        self.sequence.fetch_max(stored, Ordering::AcqRel);
    }

    pub fn last_sequence(&self) -> Option<u64> {
        match self.sequence.load(Ordering::Acquire) {
            0 => None,
            n => Some(n - 1),
        }
    }

    pub fn ack(&self) {
        self.acked.store(true, Ordering::Release);
    }

    /// Consume the ack flag; `false` means the last heartbeat went unanswered.
    pub fn take_ack(&self) -> bool {
        self.acked.swap(false, Ordering::AcqRel)
    }

    /// Forget everything; called once per newly negotiated session.
    pub fn reset(&self) {
        self.sequence.store(0, Ordering::Release);
        self.acked.store(true, Ordering::Release);
    }
}

/// A negotiated gateway session, ready for its heartbeat and event loop.
pub struct Session {
    pub handle: Arc<ConnectionHandle>,
    pub reader: Box<dyn FrameReader>,
    pub heartbeat_interval: Duration,
    pub liveness: Arc<Liveness>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let l = Liveness::new();
        assert_eq!(l.last_sequence(), None);
        for s in [1, 2, 5, 3, 5, 8] {
            l.observe(s);
        }
        assert_eq!(l.last_sequence(), Some(8));
    }

    #[test]
    fn zero_is_a_real_sequence() {
        let l = Liveness::new();
        l.observe(0);
        assert_eq!(l.last_sequence(), Some(0));
    }

    #[test]
    fn sequence_clamps_at_the_top_of_the_range() {
        let l = Liveness::new();
        l.observe(u64::MAX);
        assert_eq!(l.last_sequence(), Some(MAX_SEQUENCE));
        l.observe(MAX_SEQUENCE);
        l.observe(3);
        assert_eq!(l.last_sequence(), Some(MAX_SEQUENCE));
    }

    #[test]
    fn reset_clears_sequence_and_restores_ack() {
        let l = Liveness::new();
        l.observe(12);
        assert!(l.take_ack());
        assert!(!l.take_ack());
        l.reset();
        assert_eq!(l.last_sequence(), None);
        assert!(l.take_ack());
    }
}
