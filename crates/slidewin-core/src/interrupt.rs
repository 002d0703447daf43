//! Cooperative cancellation, polled by driver loops every
//! [`CHECK_PERIOD`] output positions rather than inside the segment tree.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Iteration period at which driver loops poll [`Interrupt::is_interrupted`].
pub const CHECK_PERIOD: usize = 1024;

/// A cooperative cancellation source a driver loop can poll.
pub trait Interrupt {
    /// Returns `true` once the caller should abort.
    fn is_interrupted(&self) -> bool;
}

/// An [`Interrupt`] that never fires; the default for callers with no
/// cancellation source of their own.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverInterrupt;

impl Interrupt for NeverInterrupt {
    #[inline]
    fn is_interrupted(&self) -> bool {
        false
    }
}

impl Interrupt for &NeverInterrupt {
    #[inline]
    fn is_interrupted(&self) -> bool {
        false
    }
}

/// An atomic-bool-backed [`Interrupt`], settable from another thread or a
/// signal handler (the CLI wires Ctrl-C into one of these).
#[derive(Clone, Debug, Default)]
pub struct AtomicInterrupt(Arc<AtomicBool>);

impl AtomicInterrupt {
    /// Construct a fresh, unset interrupt flag.
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// A clone of the underlying flag, for handing to a signal handler.
    #[must_use]
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.0)
    }

    /// Set the flag, as a signal handler would.
    pub fn set(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

impl Interrupt for AtomicInterrupt {
    #[inline]
    fn is_interrupted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Returns `true` every [`CHECK_PERIOD`] iterations starting at `0`, the
/// cadence driver loops poll cancellation at.
#[inline]
#[must_use]
pub fn is_check_point(i: usize) -> bool {
    i % CHECK_PERIOD == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_interrupt_never_fires() {
        assert!(!NeverInterrupt.is_interrupted());
    }

    #[test]
    fn atomic_interrupt_round_trips() {
        let flag = AtomicInterrupt::new();
        assert!(!flag.is_interrupted());
        flag.set();
        assert!(flag.is_interrupted());
    }

    #[test]
    fn check_points_are_periodic() {
        assert!(is_check_point(0));
        assert!(is_check_point(1024));
        assert!(!is_check_point(1));
        assert!(!is_check_point(1023));
    }
}
