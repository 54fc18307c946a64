//! Progress reporting for the generation phase.
//!
//! Purely informational. Generation is correct whether or not anyone
//! listens.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, info};

/// Which side of the market an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Proposers,
    Receivers,
}

impl Group {
    /// Both groups, in generation order
    pub const ALL: [Group; 2] = [Group::Proposers, Group::Receivers];

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Group::Proposers => 0,
            Group::Receivers => 1,
        }
    }

    /// Lowercase name used in logs and errors
    pub fn as_str(self) -> &'static str {
        match self {
            Group::Proposers => "proposers",
            Group::Receivers => "receivers",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives one increment per completed entity.
///
/// Called concurrently from generation workers.
pub trait GenerationProgress: Sync {
    fn entity_generated(&self, group: Group, index: usize);
}

/// No progress reporting
impl GenerationProgress for () {
    #[inline]
    fn entity_generated(&self, _group: Group, _index: usize) {}
}

/// Reports per-group progress through `tracing`.
#[derive(Debug)]
pub struct LogProgress {
    total: usize,
    done: [AtomicUsize; 2],
}

impl LogProgress {
    pub fn new(group_size: usize) -> Self {
        Self {
            total: group_size,
            done: [AtomicUsize::new(0), AtomicUsize::new(0)],
        }
    }

    /// Entities completed so far in `group`
    pub fn completed(&self, group: Group) -> usize {
        self.done[group.index()].load(Ordering::Relaxed)
    }
}

impl GenerationProgress for LogProgress {
    fn entity_generated(&self, group: Group, index: usize) {
        let done = self.done[group.index()].fetch_add(1, Ordering::Relaxed) + 1;
        debug!(%group, index, done, total = self.total, "Entity generated");
        if done == self.total {
            info!(%group, total = self.total, "Group generated");
        }
    }
}
