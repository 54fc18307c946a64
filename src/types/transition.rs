//! Transition step: one accepted proposal.
//!
//! The ordered sequence of steps is the full audit trail of a run.
//! Rejections change only a proposer's cursor and are not recorded.
//!
//! ## Wire Format
//!
//! ```json
//! { "receiverId": 0, "acceptedProposerId": 2, "displacedProposerId": null }
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{ProposerId, ReceiverId};

/// An accepted proposal, with the partner it displaced (if any).
///
/// ## Example
///
/// ```
/// use stable_match::types::TransitionStep;
///
/// let step = TransitionStep::new(0, 2, Some(1));
/// assert!(step.is_displacement());
/// assert_eq!(step.displaced_proposer_id, Some(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionStep {
    /// Receiver that accepted
    pub receiver_id: ReceiverId,

    /// Proposer that was accepted
    pub accepted_proposer_id: ProposerId,

    /// Former partner sent back to the unmatched pool
    pub displaced_proposer_id: Option<ProposerId>,
}

impl TransitionStep {
    pub fn new(
        receiver_id: ReceiverId,
        accepted_proposer_id: ProposerId,
        displaced_proposer_id: Option<ProposerId>,
    ) -> Self {
        Self {
            receiver_id,
            accepted_proposer_id,
            displaced_proposer_id,
        }
    }

    /// True if the receiver dropped a previous partner
    #[inline]
    pub fn is_displacement(&self) -> bool {
        self.displaced_proposer_id.is_some()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
