//! Core data types for stable matching
//!
//! ## Types
//!
//! - [`Person`]: An id plus a strict ranking over the opposite group
//! - [`Proposer`]: A person with a proposal cursor
//! - [`Receiver`]: A person with an optional partner
//! - [`TransitionStep`]: One accepted proposal
//! - [`Pairing`]: The final receiver -> proposer mapping
//! - [`PreferenceSnapshot`]: Serializable view of both groups for display
//!
//! ## Ranking Convention
//!
//! Ascending: position 0 in a preference list is the most preferred.

mod person;
mod transition;
mod pairing;
mod snapshot;

// Re-export all types at module level
pub use person::{Person, Proposer, Receiver, ProposerId, ReceiverId};
pub use transition::TransitionStep;
pub use pairing::{Pair, Pairing, BlockingPair};
pub use snapshot::PreferenceSnapshot;
