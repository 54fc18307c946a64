//! Error types for stable matching runs.
//!
//! ## Taxonomy
//!
//! - [`ConfigurationError`]: bad input detected before any work starts.
//!   Fatal to the requested run, but the caller may retry with corrected input.
//! - [`InternalConsistencyError`]: a violated invariant discovered mid-run
//!   (corrupted permutation, dangling id). Always fatal, never recovered.
//!
//! There are no transient errors: generation and matching are pure
//! computations with no I/O.

use thiserror::Error;

use crate::generation::Group;

/// Invalid run parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Group size of zero
    #[error("group size must be positive")]
    EmptyGroup,

    /// Proposer and receiver collections differ in length
    #[error("group size mismatch: {proposers} proposers, {receivers} receivers")]
    GroupSizeMismatch {
        /// Number of proposers supplied
        proposers: usize,
        /// Number of receivers supplied
        receivers: usize,
    },

    /// Worker pool of zero threads
    #[error("worker count must be positive")]
    NoWorkers,
}

/// A broken invariant. Indicates a defect in generation or corrupted input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InternalConsistencyError {
    /// Proposer ran through its whole preference list without being matched
    #[error("proposer {proposer} exhausted its preferences after {proposals} proposals")]
    ProposerExhausted {
        /// Proposer id
        proposer: usize,
        /// Length of the list it walked
        proposals: usize,
    },

    /// Preference list names a receiver that does not exist
    #[error("proposer {proposer} ranks unknown receiver {receiver}")]
    UnknownReceiver {
        /// Proposer id
        proposer: usize,
        /// Receiver id out of range
        receiver: usize,
    },

    /// Receiver has no rank for a proposer that proposed to it
    #[error("receiver {receiver} has no rank for proposer {proposer}")]
    UnrankedProposer {
        /// Receiver id
        receiver: usize,
        /// Proposer id missing from its preferences
        proposer: usize,
    },

    /// Engine terminated while a receiver was still unmatched
    #[error("receiver {receiver} finished without a partner")]
    UnmatchedReceiver {
        /// Receiver id
        receiver: usize,
    },

    /// A generation slot was never filled
    #[error("{group} slot {index} was never generated")]
    MissingEntity {
        /// Group the slot belongs to
        group: Group,
        /// Slot index
        index: usize,
    },

    /// Entity stored in a slot that does not match its id
    #[error("{group} slot {index} holds entity with id {id}")]
    MisplacedEntity {
        /// Group the slot belongs to
        group: Group,
        /// Slot index
        index: usize,
        /// Id found in the slot
        id: usize,
    },

    /// Transition log could not be encoded for fingerprinting
    #[error("failed to encode transition log: {0}")]
    Encoding(String),
}

/// Any failure of a generate or match run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// See [`ConfigurationError`]
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// See [`InternalConsistencyError`]
    #[error(transparent)]
    InternalConsistency(#[from] InternalConsistencyError),
}

impl Error {
    /// True for input errors the caller can correct and retry
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    /// True for violated invariants
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::InternalConsistency(_))
    }
}

/// Result type for generate and match operations
pub type Result<T> = std::result::Result<T, Error>;
