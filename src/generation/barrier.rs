//! Two-group countdown barrier.
//!
//! One counter per group, each decremented once by every generation task of
//! that group. [`GenerationBarrier::join`] returns only when both reach zero.
//!
//! ## Visibility
//!
//! Counters live behind a `parking_lot::Mutex`. A task writes its slot
//! before calling [`arrive`](GenerationBarrier::arrive), and the joining
//! thread re-acquires the same mutex before returning, so every write made
//! by a task happens-before `join` returns.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::generation::Group;

/// Blocks the caller until every entity of both groups has been generated.
#[derive(Debug)]
pub struct GenerationBarrier {
    remaining: Mutex<[usize; 2]>,
    done: Condvar,
}

impl GenerationBarrier {
    /// Barrier expecting `group_size` arrivals from each group
    ///
    /// # Example
    ///
    /// ```
    /// use stable_match::generation::{GenerationBarrier, Group};
    ///
    /// let barrier = GenerationBarrier::new(1);
    /// barrier.arrive(Group::Proposers);
    /// barrier.arrive(Group::Receivers);
    /// barrier.join(); // returns immediately
    /// ```
    pub fn new(group_size: usize) -> Self {
        Self {
            remaining: Mutex::new([group_size; 2]),
            done: Condvar::new(),
        }
    }

    /// Signal that one entity of `group` is fully written.
    ///
    /// Extra arrivals past zero are ignored.
    pub fn arrive(&self, group: Group) {
        let mut remaining = self.remaining.lock();
        let counter = &mut remaining[group.index()];
        *counter = counter.saturating_sub(1);
        if remaining.iter().all(|&n| n == 0) {
            self.done.notify_all();
        }
    }

    /// Entities of `group` still outstanding
    pub fn remaining(&self, group: Group) -> usize {
        self.remaining.lock()[group.index()]
    }

    /// True once both counters are zero
    pub fn is_complete(&self) -> bool {
        self.remaining.lock().iter().all(|&n| n == 0)
    }

    /// Block until both groups are complete. No timeout.
    pub fn join(&self) {
        let mut remaining = self.remaining.lock();
        while remaining.iter().any(|&n| n > 0) {
            self.done.wait(&mut remaining);
        }
    }

    /// Block until both groups are complete or `timeout` elapses.
    ///
    /// Returns `true` if the barrier completed.
    pub fn join_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut remaining = self.remaining.lock();
        while remaining.iter().any(|&n| n > 0) {
            if self.done.wait_until(&mut remaining, deadline).timed_out() {
                return remaining.iter().all(|&n| n == 0);
            }
        }
        true
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
