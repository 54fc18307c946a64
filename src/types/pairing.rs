//! Final receiver -> proposer pairing and stability analysis.
//!
//! A pairing is stable when it has no *blocking pair*: a proposer `p` and a
//! receiver `r`, not matched to each other, who both rank each other above
//! their assigned partners.

use serde::{Deserialize, Serialize};

use crate::types::{Proposer, ProposerId, Receiver, ReceiverId};

/// One matched couple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pair {
    pub receiver_id: ReceiverId,
    pub proposer_id: ProposerId,
}

/// A pair that would rather be together than with their partners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockingPair {
    pub proposer_id: ProposerId,
    pub receiver_id: ReceiverId,
}

/// Receiver -> proposer mapping covering every receiver exactly once.
///
/// Pairs are ordered by receiver id. Serializes as a plain array of
/// `{ receiverId, proposerId }`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Pair>", into = "Vec<Pair>")]
pub struct Pairing {
    pairs: Vec<Pair>,

    /// `by_proposer[proposer_id]` = receiver id
    by_proposer: Vec<Option<ReceiverId>>,
}

impl Pairing {
    /// Build from `partners[receiver_id] = proposer_id`
    ///
    /// # Example
    ///
    /// ```
    /// use stable_match::types::Pairing;
    ///
    /// let pairing = Pairing::from_partners(vec![1, 0]);
    /// assert_eq!(pairing.proposer_for(0), Some(1));
    /// assert_eq!(pairing.receiver_for(1), Some(0));
    /// ```
    pub fn from_partners(partners: Vec<ProposerId>) -> Self {
        partners
            .into_iter()
            .enumerate()
            .map(|(receiver_id, proposer_id)| Pair { receiver_id, proposer_id })
            .collect::<Vec<_>>()
            .into()
    }

    /// Number of matched couples
    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pairs in receiver-id order
    pub fn iter(&self) -> impl Iterator<Item = &Pair> {
        self.pairs.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Pair] {
        &self.pairs
    }

    /// Proposer matched to `receiver`
    pub fn proposer_for(&self, receiver: ReceiverId) -> Option<ProposerId> {
        self.pairs
            .binary_search_by_key(&receiver, |pair| pair.receiver_id)
            .ok()
            .map(|index| self.pairs[index].proposer_id)
    }

    /// Receiver matched to `proposer`
    pub fn receiver_for(&self, proposer: ProposerId) -> Option<ReceiverId> {
        self.by_proposer.get(proposer).copied().flatten()
    }

    /// True if every proposer id in `[0, len)` is matched exactly once
    pub fn is_bijection(&self) -> bool {
        let mut seen = vec![false; self.pairs.len()];
        for pair in &self.pairs {
            match seen.get_mut(pair.proposer_id) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }

    /// All blocking pairs under the given preferences.
    ///
    /// For each proposer, walks the receivers it ranks above its own partner
    /// and checks whether any of them ranks it above theirs. O(n²).
    pub fn blocking_pairs(&self, proposers: &[Proposer], receivers: &[Receiver]) -> Vec<BlockingPair> {
        let mut blocking = Vec::new();

        for proposer in proposers {
            let Some(own) = self.receiver_for(proposer.id()) else {
                continue;
            };

            for &receiver_id in proposer.preferences() {
                if receiver_id == own {
                    break;
                }
                let (Some(receiver), Some(incumbent)) =
                    (receivers.get(receiver_id), self.proposer_for(receiver_id))
                else {
                    continue;
                };
                if receiver.prefers(proposer.id(), incumbent) {
                    blocking.push(BlockingPair {
                        proposer_id: proposer.id(),
                        receiver_id,
                    });
                }
            }
        }

        blocking
    }

    /// True if no blocking pair exists
    pub fn is_stable(&self, proposers: &[Proposer], receivers: &[Receiver]) -> bool {
        self.blocking_pairs(proposers, receivers).is_empty()
    }
}

impl From<Vec<Pair>> for Pairing {
    fn from(mut pairs: Vec<Pair>) -> Self {
        pairs.sort_by_key(|pair| pair.receiver_id);

        // Proposer ids past the pair count cannot belong to a bijection and
        // are left out of the reverse index.
        let mut by_proposer = vec![None; pairs.len()];
        for pair in &pairs {
            if let Some(slot) = by_proposer.get_mut(pair.proposer_id) {
                *slot = Some(pair.receiver_id);
            }
        }

        Self { pairs, by_proposer }
    }
}

impl From<Pairing> for Vec<Pair> {
    fn from(pairing: Pairing) -> Self {
        pairing.pairs
    }
}

impl<'a> IntoIterator for &'a Pairing {
    type Item = &'a Pair;
    type IntoIter = std::slice::Iter<'a, Pair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
