//! Transition log for the matching engine
//!
//! Append-only, ordered record of every accepted proposal. Only the engine
//! appends; collaborators read it after the run (or replay it step by step
//! for display). Nothing is ever removed or reordered.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::fingerprint;
use crate::error::Result;
use crate::types::TransitionStep;

/// Ordered audit trail of a matching run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionLog {
    steps: Vec<TransitionStep>,
}

impl TransitionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size for an expected number of steps
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            steps: Vec::with_capacity(capacity),
        }
    }

    /// Append a step at the end
    pub(crate) fn append(&mut self, step: TransitionStep) {
        self.steps.push(step);
        debug!(
            sequence = self.steps.len(),
            receiver = step.receiver_id,
            accepted = step.accepted_proposer_id,
            displaced = ?step.displaced_proposer_id,
            "Transition recorded"
        );
    }

    /// Total number of steps
    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step at position `index` (0 = first acceptance)
    pub fn get(&self, index: usize) -> Option<&TransitionStep> {
        self.steps.get(index)
    }

    /// Steps from position `from` onwards, for incremental readers
    pub fn since(&self, from: usize) -> &[TransitionStep] {
        self.steps.get(from..).unwrap_or(&[])
    }

    /// Steps in the order they happened. Replayable.
    pub fn iter(&self) -> std::slice::Iter<'_, TransitionStep> {
        self.steps.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[TransitionStep] {
        &self.steps
    }

    /// Number of steps that displaced an existing partner
    pub fn displacements(&self) -> usize {
        self.steps.iter().filter(|s| s.is_displacement()).count()
    }

    /// SHA-256 over the SSZ encoding of every step, in order.
    ///
    /// Equal logs have equal fingerprints, so two runs can be compared
    /// without shipping the whole log.
    pub fn fingerprint(&self) -> Result<[u8; 32]> {
        Ok(fingerprint::fingerprint(&self.steps)?)
    }

    /// Fingerprint as a hex string
    pub fn fingerprint_hex(&self) -> Result<String> {
        self.fingerprint().map(hex::encode)
    }
}

impl<'a> IntoIterator for &'a TransitionLog {
    type Item = &'a TransitionStep;
    type IntoIter = std::slice::Iter<'a, TransitionStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl IntoIterator for TransitionLog {
    type Item = TransitionStep;
    type IntoIter = std::vec::IntoIter<TransitionStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}
