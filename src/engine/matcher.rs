//! Deferred-acceptance matching engine.
//!
//! ## Traversal Order
//!
//! Unmatched proposers wait in a FIFO queue, initially `0..n` in id order.
//! Each step takes the proposer at the front and proposes to the receiver
//! at its cursor:
//!
//! - **Free receiver**: accepts. The proposer leaves the queue.
//! - **Receiver prefers the proposer** (strictly lower rank): accepts. The
//!   proposer leaves the queue and the displaced partner is pushed to the
//!   back with its cursor unchanged.
//! - **Receiver prefers its partner**: rejects. The proposer's cursor moves
//!   forward and it stays at the front, so it proposes again next step.
//!
//! The order does not affect stability, but it fixes the exact contents of
//! the transition log. Given the same preferences, two runs produce the same
//! pairing and the same log.
//!
//! ## Termination
//!
//! Every rejection advances a cursor and every cursor is bounded by `n`, so
//! the loop ends after O(n²) proposals. A proposer reaching the end of its
//! list unmatched is only possible with corrupted preferences and fails the
//! run instead of looping.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::{info, trace};

use crate::engine::TransitionLog;
use crate::error::{ConfigurationError, InternalConsistencyError, Result};
use crate::generation::{Group, Groups};
use crate::types::{Pairing, Proposer, ProposerId, Receiver, ReceiverId, TransitionStep};

// ============================================================================
// Proposal / MatchOutcome
// ============================================================================

/// Result of a single proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proposal {
    /// Receiver accepted; recorded in the transition log
    Accepted(TransitionStep),

    /// Receiver kept its current partner; the proposer's cursor advanced
    Rejected {
        proposer: ProposerId,
        receiver: ReceiverId,
    },
}

/// Everything a finished run hands to the presentation layer.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// Receiver -> proposer mapping, one entry per receiver
    pub pairing: Pairing,

    /// Every accepted proposal, in order
    pub log: TransitionLog,

    /// Final proposer state (cursors at their resting positions)
    pub proposers: Vec<Proposer>,

    /// Final receiver state (every partner set)
    pub receivers: Vec<Receiver>,

    /// Proposals made, accepted and rejected
    pub proposals: usize,

    /// Wall time from the first proposal to termination
    pub elapsed: Duration,
}

// ============================================================================
// MatchingEngine
// ============================================================================

/// Proposer-proposes deferred acceptance over id-indexed groups.
///
/// The engine owns both groups and the unmatched queue for the whole run;
/// nothing outside observes a half-applied step.
///
/// ## Example
///
/// ```
/// use stable_match::engine::MatchingEngine;
/// use stable_match::types::{Proposer, Receiver};
///
/// let proposers = vec![Proposer::new(0, vec![1, 0]), Proposer::new(1, vec![0, 1])];
/// let receivers = vec![Receiver::new(0, vec![1, 0]), Receiver::new(1, vec![0, 1])];
///
/// let outcome = MatchingEngine::new(proposers, receivers).unwrap().run().unwrap();
///
/// assert_eq!(outcome.pairing.proposer_for(0), Some(1));
/// assert_eq!(outcome.pairing.proposer_for(1), Some(0));
/// assert_eq!(outcome.log.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MatchingEngine {
    proposers: Vec<Proposer>,
    receivers: Vec<Receiver>,

    /// Unmatched proposers; the front is the next to propose
    unmatched: VecDeque<ProposerId>,

    log: TransitionLog,

    /// Total proposals made so far
    proposals: usize,

    /// Set by the first step
    started: Option<Instant>,
}

impl MatchingEngine {
    /// Prepare a run over fresh groups.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::EmptyGroup`] if both groups are empty
    /// - [`ConfigurationError::GroupSizeMismatch`] if their lengths differ
    /// - [`InternalConsistencyError::MisplacedEntity`] if an entity's id is
    ///   not its index
    pub fn new(proposers: Vec<Proposer>, receivers: Vec<Receiver>) -> Result<Self> {
        if proposers.len() != receivers.len() {
            return Err(ConfigurationError::GroupSizeMismatch {
                proposers: proposers.len(),
                receivers: receivers.len(),
            }
            .into());
        }
        if proposers.is_empty() {
            return Err(ConfigurationError::EmptyGroup.into());
        }

        let misplaced = |group, index, id| InternalConsistencyError::MisplacedEntity { group, index, id };
        for (index, proposer) in proposers.iter().enumerate() {
            if proposer.id() != index {
                return Err(misplaced(Group::Proposers, index, proposer.id()).into());
            }
        }
        for (index, receiver) in receivers.iter().enumerate() {
            if receiver.id() != index {
                return Err(misplaced(Group::Receivers, index, receiver.id()).into());
            }
        }

        let group_size = proposers.len();
        Ok(Self {
            unmatched: (0..group_size).collect(),
            log: TransitionLog::with_capacity(group_size),
            proposers,
            receivers,
            proposals: 0,
            started: None,
        })
    }

    /// Prepare a run over freshly generated groups
    pub fn from_groups(groups: Groups) -> Result<Self> {
        let (proposers, receivers) = groups.into_parts();
        Self::new(proposers, receivers)
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    #[inline]
    pub fn group_size(&self) -> usize {
        self.proposers.len()
    }

    #[inline]
    pub fn proposers(&self) -> &[Proposer] {
        &self.proposers
    }

    #[inline]
    pub fn receivers(&self) -> &[Receiver] {
        &self.receivers
    }

    /// Transitions recorded so far
    #[inline]
    pub fn log(&self) -> &TransitionLog {
        &self.log
    }

    /// Proposals made so far
    #[inline]
    pub fn proposals(&self) -> usize {
        self.proposals
    }

    /// Unmatched proposers in the order they will propose
    pub fn unmatched(&self) -> impl Iterator<Item = ProposerId> + '_ {
        self.unmatched.iter().copied()
    }

    /// True once every proposer is matched
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.unmatched.is_empty()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Make one proposal. Returns `None` once the queue is empty.
    ///
    /// # Errors
    ///
    /// [`InternalConsistencyError`] if the front proposer has exhausted its
    /// list or names a receiver that cannot rank it. The engine is left as it
    /// was before the call.
    pub fn step(&mut self) -> Result<Option<Proposal>> {
        let Some(&proposer_id) = self.unmatched.front() else {
            return Ok(None);
        };
        self.started.get_or_insert_with(Instant::now);

        let proposer = &self.proposers[proposer_id];
        let receiver_id = proposer.next_target().ok_or(InternalConsistencyError::ProposerExhausted {
            proposer: proposer_id,
            proposals: proposer.cursor(),
        })?;
        let receiver = self
            .receivers
            .get_mut(receiver_id)
            .ok_or(InternalConsistencyError::UnknownReceiver {
                proposer: proposer_id,
                receiver: receiver_id,
            })?;

        let rank = |proposer| {
            receiver.rank_of(proposer).ok_or(InternalConsistencyError::UnrankedProposer {
                receiver: receiver_id,
                proposer,
            })
        };
        let candidate_rank = rank(proposer_id)?;
        let accepted = match receiver.partner() {
            None => true,
            Some(incumbent) => candidate_rank < rank(incumbent)?,
        };

        self.proposals += 1;

        if !accepted {
            self.proposers[proposer_id].advance();
            trace!(proposer = proposer_id, receiver = receiver_id, "Proposal rejected");
            return Ok(Some(Proposal::Rejected {
                proposer: proposer_id,
                receiver: receiver_id,
            }));
        }

        let displaced = receiver.set_partner(proposer_id);
        self.unmatched.pop_front();
        if let Some(displaced) = displaced {
            self.unmatched.push_back(displaced);
        }

        let step = TransitionStep::new(receiver_id, proposer_id, displaced);
        self.log.append(step);
        Ok(Some(Proposal::Accepted(step)))
    }

    /// Lazy, single-pass view of accepted steps as the engine advances.
    ///
    /// Rejections are consumed silently. Yields at most one error, then ends.
    pub fn transitions(&mut self) -> Transitions<'_> {
        Transitions {
            engine: self,
            failed: false,
        }
    }

    /// Run to completion and return the final state.
    pub fn run(mut self) -> Result<MatchOutcome> {
        while self.step()?.is_some() {}
        self.finish()
    }

    /// Consume a finished engine.
    ///
    /// Runs any remaining steps first, so calling this mid-run is the same as
    /// calling [`run`](Self::run).
    ///
    /// # Errors
    ///
    /// [`InternalConsistencyError::UnmatchedReceiver`] if a receiver ended
    /// without a partner.
    pub fn finish(mut self) -> Result<MatchOutcome> {
        while self.step()?.is_some() {}

        let partners = self
            .receivers
            .iter()
            .map(|receiver| {
                receiver
                    .partner()
                    .ok_or(InternalConsistencyError::UnmatchedReceiver { receiver: receiver.id() })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let elapsed = self.started.map(|s| s.elapsed()).unwrap_or_default();
        info!(
            group_size = self.group_size(),
            proposals = self.proposals,
            transitions = self.log.len(),
            displacements = self.log.displacements(),
            elapsed = ?elapsed,
            "Stable matching completed"
        );

        Ok(MatchOutcome {
            pairing: Pairing::from_partners(partners),
            log: self.log,
            proposers: self.proposers,
            receivers: self.receivers,
            proposals: self.proposals,
            elapsed,
        })
    }
}

/// Run deferred acceptance over `proposers` and `receivers`.
///
/// Returns the pairing and the transition log.
pub fn stable_match(proposers: Vec<Proposer>, receivers: Vec<Receiver>) -> Result<(Pairing, TransitionLog)> {
    let outcome = MatchingEngine::new(proposers, receivers)?.run()?;
    Ok((outcome.pairing, outcome.log))
}

// ============================================================================
// Transitions
// ============================================================================

/// Iterator returned by [`MatchingEngine::transitions`].
#[derive(Debug)]
pub struct Transitions<'a> {
    engine: &'a mut MatchingEngine,
    failed: bool,
}

impl Iterator for Transitions<'_> {
    type Item = Result<TransitionStep>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            match self.engine.step() {
                Ok(Some(Proposal::Accepted(step))) => return Some(Ok(step)),
                Ok(Some(Proposal::Rejected { .. })) => continue,
                Ok(None) => return None,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
