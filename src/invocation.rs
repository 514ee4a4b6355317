//! Single-owner state cell shared by the orchestrators.
//!
//! One invocation runs at a time. Each trigger claims the slot and gets an
//! [`Invocation`] handle carrying a monotonically increasing token; a state
//! write is accepted only while that token is still current. Dropping the
//! handle before it finishes (cancelled or timed-out future) releases the
//! slot back to idle, so the next trigger always runs.
//!
//! The lock is a `std::sync::Mutex`: it is never held across an await, and
//! `Drop` has to take it synchronously.

use std::sync::{Mutex, MutexGuard, PoisonError};

struct Inner<S> {
    invocation: u64,
    busy: bool,
    state: S,
}

pub(crate) struct InvocationSlot<S> {
    inner: Mutex<Inner<S>>,
    idle: S,
}

impl<S: Clone> InvocationSlot<S> {
    pub(crate) fn new(idle: S) -> Self {
        Self {
            inner: Mutex::new(Inner {
                invocation: 0,
                busy: false,
                state: idle.clone(),
            }),
            idle,
        }
    }

    // Every critical section leaves `Inner` consistent, so a poisoned lock
    // is still safe to use.
    fn lock(&self) -> MutexGuard<'_, Inner<S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn state(&self) -> S {
        self.lock().state.clone()
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.lock().busy
    }

    /// Back to idle. Any outstanding invocation becomes stale.
    pub(crate) fn reset(&self) {
        let mut inner = self.lock();
        inner.invocation += 1;
        inner.busy = false;
        inner.state = self.idle.clone();
    }

    /// Claims the slot and publishes `initial`, or returns `None` while
    /// another invocation is running.
    pub(crate) fn begin(&self, initial: S) -> Option<Invocation<'_, S>> {
        let mut inner = self.lock();
        if inner.busy {
            return None;
        }
        inner.busy = true;
        inner.invocation += 1;
        inner.state = initial;
        Some(Invocation {
            slot: self,
            id: inner.invocation,
        })
    }
}

/// Handle of the running invocation.
pub(crate) struct Invocation<'a, S: Clone> {
    slot: &'a InvocationSlot<S>,
    id: u64,
}

impl<S: Clone> Invocation<'_, S> {
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    /// Publishes an intermediate state. `false` once superseded.
    pub(crate) fn advance(&self, state: S) -> bool {
        let mut inner = self.slot.lock();
        if inner.invocation != self.id {
            return false;
        }
        inner.state = state;
        true
    }

    /// Publishes the terminal state and frees the slot. `None` once
    /// superseded, in which case the slot is left to the newer owner.
    pub(crate) fn finish(self, state: S) -> Option<S> {
        let mut inner = self.slot.lock();
        if inner.invocation != self.id {
            return None;
        }
        inner.busy = false;
        inner.state = state.clone();
        Some(state)
    }
}

impl<S: Clone> Drop for Invocation<'_, S> {
    fn drop(&mut self) {
        let mut inner = self.slot.lock();
        if inner.busy && inner.invocation == self.id {
            tracing::warn!(
                "Invocation #{} dropped before completion, releasing slot",
                self.id
            );
            inner.busy = false;
            inner.state = self.slot.idle.clone();
        }
    }
}
