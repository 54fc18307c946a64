//! Preference snapshot handed to the presentation layer after generation.

use serde::{Deserialize, Serialize};

use crate::types::{Person, Proposer, Receiver};

/// Both groups' ids and rankings, without any matching state.
///
/// ```json
/// { "proposers": [{ "id": 0, "preferences": [1, 0] }], "receivers": [...] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreferenceSnapshot {
    pub proposers: Vec<Person>,
    pub receivers: Vec<Person>,
}

impl PreferenceSnapshot {
    /// Copy the rankings out of both groups
    pub fn capture(proposers: &[Proposer], receivers: &[Receiver]) -> Self {
        Self {
            proposers: proposers.iter().map(|p| p.person().clone()).collect(),
            receivers: receivers.iter().map(|r| r.person().clone()).collect(),
        }
    }

    /// Rebuild fresh, unmatched entities from the snapshot
    pub fn restore(&self) -> (Vec<Proposer>, Vec<Receiver>) {
        let proposers = self
            .proposers
            .iter()
            .map(|p| Proposer::new(p.id, p.preferences.clone()))
            .collect();
        let receivers = self
            .receivers
            .iter()
            .map(|r| Receiver::new(r.id, r.preferences.clone()))
            .collect();
        (proposers, receivers)
    }

    /// Shared group size, or `None` if the two sides differ
    pub fn group_size(&self) -> Option<usize> {
        (self.proposers.len() == self.receivers.len()).then_some(self.proposers.len())
    }
}
