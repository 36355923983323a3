//! Settle-once value cell
//!
//! A `ResettableFuture` starts `Pending` and settles at most once. Any number
//! of tasks may await it before settlement; all of them observe the same
//! value. The cell itself is never unsettled: an owner that needs to "reset"
//! replaces the whole instance, and callers that cloned the old handle keep
//! observing the old value.
//!
//! # Invariants
//!
//! - `Pending -> Settled` happens at most once per instance
//! - A settled value is never replaced in place

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Notify;

/// Observable settlement status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleStatus {
    /// No value yet
    Pending,
    /// Value stored
    Settled,
}

enum SlotState<T> {
    Pending,
    Settled(T),
}

struct Inner<T> {
    state: Mutex<SlotState<T>>,
    // Parked waiters of the pending state.
    waiters: Notify,
}

/// Settle-once asynchronous value cell.
///
/// Cloning yields another handle to the same cell.
pub struct ResettableFuture<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for ResettableFuture<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone> Default for ResettableFuture<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> ResettableFuture<T> {
    /// Create a pending cell
    pub fn new() -> Self {
        Self::with_state(SlotState::Pending)
    }

    /// Create a cell that is already settled with `value`
    pub fn settled(value: T) -> Self {
        Self::with_state(SlotState::Settled(value))
    }

    fn with_state(state: SlotState<T>) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                waiters: Notify::new(),
            }),
        }
    }

    /// Settle the cell with `value` and wake every waiter.
    ///
    /// Returns `false` and drops `value` if the cell was already settled.
    pub fn resolve(&self, value: T) -> bool {
        {
            let mut state = self.inner.state.lock();
            if matches!(*state, SlotState::Settled(_)) {
                return false;
            }
            *state = SlotState::Settled(value);
        }
        self.inner.waiters.notify_waiters();
        true
    }

    /// Current settlement status
    pub fn status(&self) -> SettleStatus {
        match *self.inner.state.lock() {
            SlotState::Pending => SettleStatus::Pending,
            SlotState::Settled(_) => SettleStatus::Settled,
        }
    }

    /// Whether a value has been stored
    pub fn is_settled(&self) -> bool {
        self.status() == SettleStatus::Settled
    }

    /// Synchronous read of the stored value, if any
    pub fn settled_value(&self) -> Option<T> {
        match &*self.inner.state.lock() {
            SlotState::Pending => None,
            SlotState::Settled(value) => Some(value.clone()),
        }
    }

    /// Wait until the cell settles and return the stored value
    pub async fn await_value(&self) -> T {
        loop {
            // Register before checking so a concurrent resolve cannot slip between.
            let notified = self.inner.waiters.notified();
            if let Some(value) = self.settled_value() {
                return value;
            }
            notified.await;
        }
    }

    /// Whether two handles point at the same cell
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> fmt::Debug for ResettableFuture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match *self.inner.state.lock() {
            SlotState::Pending => SettleStatus::Pending,
            SlotState::Settled(_) => SettleStatus::Settled,
        };
        f.debug_struct("ResettableFuture")
            .field("status", &status)
            .finish()
    }
}
