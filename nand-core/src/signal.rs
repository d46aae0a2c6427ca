//! External Signals
//!
//! A [`Signal`] is a boolean owned by the caller that can be bound directly to
//! a gate input. The circuit keeps a clone of the handle and only ever reads
//! it; the caller flips it between evaluation batches.
//!
//! # Sharing
//!
//! Clones share the same underlying value, so the circuit observes every
//! `set` made through any clone. Identity is tracked by a unique ID, which is
//! what [`Signal::ptr_eq`] and equality compare.

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Counter for generating unique signal IDs.
static SIGNAL_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_signal_id() -> u64 {
    SIGNAL_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// A shared, externally controlled boolean input.
///
/// # Example
///
/// ```
/// use nand_core::Signal;
///
/// let enable = Signal::new(false);
/// let bound = enable.clone();
///
/// enable.set(true);
/// assert!(bound.get());
/// ```
#[derive(Clone)]
pub struct Signal {
    /// Unique identifier for this signal.
    id: u64,

    /// The current value.
    value: Arc<AtomicBool>,
}

impl Signal {
    /// Create a new signal with the given initial value.
    pub fn new(value: bool) -> Self {
        Self {
            id: next_signal_id(),
            value: Arc::new(AtomicBool::new(value)),
        }
    }

    /// Get the signal's unique ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Get the current value.
    pub fn get(&self) -> bool {
        self.value.load(Ordering::Acquire)
    }

    /// Set a new value. Takes effect on the next evaluation batch.
    pub fn set(&self, value: bool) {
        self.value.store(value, Ordering::Release);
    }

    /// Flip the value and return the new one.
    pub fn toggle(&self) -> bool {
        !self.value.fetch_xor(true, Ordering::AcqRel)
    }

    /// Whether both handles refer to the same signal.
    pub fn ptr_eq(&self, other: &Signal) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }

    /// Number of live handles to this signal, including this one.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.value)
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::new(false)
    }
}

impl PartialEq for Signal {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Signal {}

impl Debug for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.id)
            .field("value", &self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_get_and_set() {
        let signal = Signal::new(false);
        assert!(!signal.get());

        signal.set(true);
        assert!(signal.get());
    }

    #[test]
    fn signal_toggle() {
        let signal = Signal::new(false);
        assert!(signal.toggle());
        assert!(!signal.toggle());
        assert!(!signal.get());
    }

    #[test]
    fn signal_clone_shares_state() {
        let signal1 = Signal::new(false);
        let signal2 = signal1.clone();

        signal1.set(true);
        assert!(signal2.get());
        assert!(signal1.ptr_eq(&signal2));
        assert_eq!(signal1.handle_count(), 2);
    }

    #[test]
    fn distinct_signals_are_not_equal() {
        let s1 = Signal::new(true);
        let s2 = Signal::new(true);

        assert_ne!(s1.id(), s2.id());
        assert_ne!(s1, s2);
    }
}
