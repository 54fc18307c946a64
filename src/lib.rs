//! # Stable Match
//!
//! Deferred-acceptance (Gale-Shapley) stable matching between two
//! equally-sized groups, proposers and receivers.
//!
//! ## Architecture
//!
//! A run has two phases:
//!
//! - **Generation**: Every member of both groups gets a uniform random strict
//!   ranking of the other group. One task per entity, fanned out over a
//!   worker pool and joined by a two-group barrier.
//! - **Matching**: A single-threaded propose/accept/reject loop over the
//!   queue of unmatched proposers, producing the proposer-optimal stable
//!   pairing and an ordered log of every acceptance.
//!
//! ## Modules
//!
//! - **Types**: Core data structures (Proposer, Receiver, TransitionStep, Pairing)
//! - **Generation**: PreferenceGenerator and GenerationBarrier
//! - **Engine**: MatchingEngine and TransitionLog
//!
//! ## Design Principles
//!
//! 1. **Determinism**: A fixed seed fixes the preferences; fixed preferences
//!    fix the pairing and the transition log
//! 2. **Ascending ranks**: Position 0 in a preference list is the favourite
//! 3. **No shared mutable state**: Generation writes disjoint slots, matching
//!    runs on one thread
//!
//! ## Example
//!
//! ```
//! use stable_match::{generate, stable_match};
//!
//! let groups = generate(5, false).unwrap();
//! let (pairing, log) = stable_match(groups.proposers, groups.receivers).unwrap();
//!
//! assert_eq!(pairing.len(), 5);
//! assert!(pairing.is_bijection());
//! assert!(!log.is_empty());
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Proposer, Receiver, TransitionStep, Pairing
pub mod types;

/// Generation phase: parallel preference generation and its barrier
pub mod generation;

/// Matching phase: deferred acceptance and the transition log
pub mod engine;

/// Run configuration
pub mod config;

/// Error taxonomy
pub mod error;

/// Tracing subscriber setup for the binary
pub mod logging;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use types::{Pair, Pairing, PreferenceSnapshot, Proposer, Receiver, TransitionStep};
pub use generation::{generate, GenerationBarrier, Groups, PreferenceGenerator};
pub use engine::{stable_match, MatchOutcome, MatchingEngine, TransitionLog};
pub use config::RunConfig;
pub use error::{ConfigurationError, Error, InternalConsistencyError, Result};
