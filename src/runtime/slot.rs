//! Per-scope storage cell for one scoped binding.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use tracing::trace;

/// Observable state of a [`ScopeSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Empty,
    Populating,
    Populated,
}

/// Lazily populated, at-most-once cell for a scoped instance.
///
/// Reads take a shared lock only. On a miss the population guard is taken
/// and the slot re-checked, so concurrent first requests run the activation
/// exactly once and all observe the same value. If the activation panics the
/// guard is released and the slot stays empty; the next request retries.
///
/// Slots guard distinct bindings, and activation only ever waits on the slots
/// of its dependencies, so an acyclic graph cannot deadlock.
///
/// # Examples
///
/// ```
/// use direct_di::runtime::{ScopeSlot, SlotState};
/// use std::sync::Arc;
///
/// let slot: ScopeSlot<Arc<String>> = ScopeSlot::new();
/// assert_eq!(slot.state(), SlotState::Empty);
///
/// let first = slot.get_or_activate(|| Arc::new("db".to_string()));
/// let second = slot.get_or_activate(|| Arc::new("other".to_string()));
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(slot.state(), SlotState::Populated);
///
/// assert!(slot.take().is_some());
/// assert_eq!(slot.state(), SlotState::Empty);
/// ```
pub struct ScopeSlot<T> {
    value: RwLock<Option<T>>,
    guard: Mutex<()>,
}

impl<T> ScopeSlot<T> {
    pub const fn new() -> Self {
        Self {
            value: parking_lot::const_rwlock(None),
            guard: parking_lot::const_mutex(()),
        }
    }

    /// Returns the cached value, activating it first if the slot is empty.
    pub fn get_or_activate<F>(&self, activate: F) -> T
    where
        T: Clone,
        F: FnOnce() -> T,
    {
        self.populate(None, activate)
    }

    /// Like [`get_or_activate`](Self::get_or_activate), but once `released`
    /// has tripped the activation result is returned without being cached.
    ///
    /// The flag is read under the population guard, and release clears the
    /// slot under the same guard after tripping it, so nothing is cached into
    /// a slot that release has already cleared.
    pub fn get_or_activate_until<F>(&self, released: &ReleaseFlag, activate: F) -> T
    where
        T: Clone,
        F: FnOnce() -> T,
    {
        self.populate(Some(released), activate)
    }

    fn populate<F>(&self, released: Option<&ReleaseFlag>, activate: F) -> T
    where
        T: Clone,
        F: FnOnce() -> T,
    {
        // Fast path: shared read
        if let Some(value) = self.value.read().as_ref() {
            return value.clone();
        }

        let _populating = self.guard.lock();
        if let Some(value) = self.value.read().as_ref() {
            return value.clone();
        }

        if released.is_some_and(ReleaseFlag::is_tripped) {
            trace!(slot = std::any::type_name::<T>(), "scope released, activating uncached");
            return activate();
        }

        trace!(slot = std::any::type_name::<T>(), "activating scoped instance");
        let value = activate();
        *self.value.write() = Some(value.clone());
        value
    }

    pub fn state(&self) -> SlotState {
        if self.value.read().is_some() {
            SlotState::Populated
        } else if self.guard.is_locked() {
            SlotState::Populating
        } else {
            SlotState::Empty
        }
    }

    /// Clears the slot, returning what it held.
    ///
    /// Waits for an in-flight activation of this slot to finish first.
    pub fn take(&self) -> Option<T> {
        let _populating = self.guard.lock();
        self.value.write().take()
    }
}

impl<T> Default for ScopeSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for ScopeSlot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeSlot")
            .field("state", &self.state())
            .finish()
    }
}

/// One-shot flag recording that a scope has been released.
#[derive(Debug, Default)]
pub struct ReleaseFlag(AtomicBool);

impl ReleaseFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Sets the flag; `true` only for the first call.
    pub fn trip(&self) -> bool {
        let first = !self.0.swap(true, Ordering::AcqRel);
        if first {
            trace!("scope released");
        }
        first
    }

    pub fn is_tripped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_trips_once() {
        let flag = ReleaseFlag::new();
        assert!(!flag.is_tripped());
        assert!(flag.trip());
        assert!(!flag.trip());
        assert!(flag.is_tripped());
    }

    #[test]
    fn tripped_flag_bypasses_the_slot() {
        let slot: ScopeSlot<u32> = ScopeSlot::new();
        let released = ReleaseFlag::new();
        assert_eq!(slot.get_or_activate_until(&released, || 1), 1);
        assert_eq!(slot.get_or_activate_until(&released, || 2), 1);

        released.trip();
        assert_eq!(slot.take(), Some(1));
        assert_eq!(slot.get_or_activate_until(&released, || 3), 3);
        assert_eq!(slot.get_or_activate_until(&released, || 4), 4);
        assert_eq!(slot.state(), SlotState::Empty);
    }

    #[test]
    fn take_on_empty_slot_is_none() {
        let slot: ScopeSlot<u32> = ScopeSlot::default();
        assert_eq!(slot.take(), None);
        assert_eq!(slot.get_or_activate(|| 7), 7);
        assert_eq!(slot.take(), Some(7));
    }
}
