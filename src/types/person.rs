//! Proposer and receiver entities.
//!
//! ## Ranking Convention
//!
//! Preferences are stored as an ordered list of opposite-group ids.
//! Position 0 is the most preferred: a strictly smaller position means a
//! strictly stronger preference. Because every list is a permutation,
//! ranks never tie.
//!
//! ## Cross-References
//!
//! Entities refer to each other by id, never by reference. Both groups
//! live in plain `Vec`s indexed by id, so `receivers[id].id == id`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a proposer (dense, 0-based)
pub type ProposerId = usize;

/// Identifier of a receiver (dense, 0-based)
pub type ReceiverId = usize;

/// Sentinel stored in a rank table for ids absent from a preference list
const UNRANKED: usize = usize::MAX;

// ============================================================================
// Person
// ============================================================================

/// Role-agnostic entity: an id and a strict ranking over the opposite group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Unique id within its group
    pub id: usize,

    /// Opposite-group ids, most preferred first
    pub preferences: Vec<usize>,
}

impl Person {
    /// Create a person with the given ranking
    pub fn new(id: usize, preferences: Vec<usize>) -> Self {
        Self { id, preferences }
    }

    /// Position of `other` in this person's ranking (lower = more preferred)
    ///
    /// Linear scan; receivers keep an inverse table for O(1) lookups.
    pub fn rank_of(&self, other: usize) -> Option<usize> {
        self.preferences.iter().position(|&id| id == other)
    }

    /// Check that the ranking is a permutation of `[0, group_size)`
    pub fn is_valid_permutation(&self, group_size: usize) -> bool {
        if self.preferences.len() != group_size {
            return false;
        }
        let mut seen = vec![false; group_size];
        for &id in &self.preferences {
            match seen.get_mut(id) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID: {}, Preferences: {:?}", self.id, self.preferences)
    }
}

// ============================================================================
// Proposer
// ============================================================================

/// A member of the proposing side.
///
/// `cursor` indexes the next receiver in `preferences` this proposer has
/// not yet been rejected by. It only ever moves forward and never passes
/// `preferences.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposer {
    person: Person,
    cursor: usize,
}

impl Proposer {
    /// Create a proposer that has not proposed yet
    ///
    /// # Example
    ///
    /// ```
    /// use stable_match::types::Proposer;
    ///
    /// let proposer = Proposer::new(0, vec![1, 0]);
    /// assert_eq!(proposer.cursor(), 0);
    /// assert_eq!(proposer.next_target(), Some(1));
    /// ```
    pub fn new(id: ProposerId, preferences: Vec<ReceiverId>) -> Self {
        Self {
            person: Person::new(id, preferences),
            cursor: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> ProposerId {
        self.person.id
    }

    #[inline]
    pub fn preferences(&self) -> &[ReceiverId] {
        &self.person.preferences
    }

    #[inline]
    pub fn person(&self) -> &Person {
        &self.person
    }

    /// Index of the next receiver to propose to
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Receiver at the cursor, or `None` once the list is exhausted
    #[inline]
    pub fn next_target(&self) -> Option<ReceiverId> {
        self.person.preferences.get(self.cursor).copied()
    }

    /// Move past a rejecting receiver. Saturates at the list length.
    pub(crate) fn advance(&mut self) {
        if self.cursor < self.person.preferences.len() {
            self.cursor += 1;
        }
    }
}

impl fmt::Display for Proposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Cursor: {}", self.person, self.cursor)
    }
}

// ============================================================================
// Receiver
// ============================================================================

/// A member of the receiving side.
///
/// Holds the id of its current partner, if any. The engine is the only
/// writer, so a receiver's partner and the set of matched proposers never
/// drift apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receiver {
    person: Person,

    /// `ranks[proposer_id]` = position of that proposer in `preferences`
    ranks: Vec<usize>,

    partner: Option<ProposerId>,
}

impl Receiver {
    /// Create an unmatched receiver
    ///
    /// Builds the inverse rank table up front. Ids that appear more than once
    /// keep their first (best) position. The table covers `[0, len)` only, so
    /// ids past the list length stay unranked.
    ///
    /// # Example
    ///
    /// ```
    /// use stable_match::types::Receiver;
    ///
    /// let receiver = Receiver::new(0, vec![2, 0, 1]);
    /// assert_eq!(receiver.rank_of(2), Some(0));
    /// assert_eq!(receiver.rank_of(1), Some(2));
    /// assert!(receiver.prefers(0, 1));
    /// assert!(receiver.partner().is_none());
    /// ```
    pub fn new(id: ReceiverId, preferences: Vec<ProposerId>) -> Self {
        let mut ranks = vec![UNRANKED; preferences.len()];
        for (position, &proposer) in preferences.iter().enumerate() {
            if let Some(rank) = ranks.get_mut(proposer) {
                if *rank == UNRANKED {
                    *rank = position;
                }
            }
        }

        Self {
            person: Person::new(id, preferences),
            ranks,
            partner: None,
        }
    }

    #[inline]
    pub fn id(&self) -> ReceiverId {
        self.person.id
    }

    #[inline]
    pub fn preferences(&self) -> &[ProposerId] {
        &self.person.preferences
    }

    #[inline]
    pub fn person(&self) -> &Person {
        &self.person
    }

    /// Current partner, if matched
    #[inline]
    pub fn partner(&self) -> Option<ProposerId> {
        self.partner
    }

    /// Position of `proposer` in this receiver's ranking, O(1)
    #[inline]
    pub fn rank_of(&self, proposer: ProposerId) -> Option<usize> {
        match self.ranks.get(proposer) {
            Some(&rank) if rank != UNRANKED => Some(rank),
            _ => None,
        }
    }

    /// True if `candidate` ranks strictly better than `incumbent`.
    /// Unranked proposers never win.
    pub fn prefers(&self, candidate: ProposerId, incumbent: ProposerId) -> bool {
        match (self.rank_of(candidate), self.rank_of(incumbent)) {
            (Some(c), Some(i)) => c < i,
            (Some(_), None) => true,
            _ => false,
        }
    }

    /// Replace the partner, returning the one displaced
    pub(crate) fn set_partner(&mut self, proposer: ProposerId) -> Option<ProposerId> {
        self.partner.replace(proposer)
    }
}

impl fmt::Display for Receiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.partner {
            Some(partner) => write!(f, "{}, Partner: {}", self.person, partner),
            None => write!(f, "{}", self.person),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
