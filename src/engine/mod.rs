//! Matching engine module.
//!
//! ## Design Principles
//!
//! The engine is designed for:
//!
//! 1. **Determinism**: Same preferences always produce the same pairing and log
//! 2. **Single-threaded execution**: All mutation happens on one thread
//! 3. **Id-indexed arenas**: Cross-references are ids, never pointers
//! 4. **Fail fast**: Corrupted preferences stop the run with an error
//!
//! ## Matching Rules
//!
//! - The front unmatched proposer proposes to its best remaining receiver
//! - A free receiver always accepts
//! - A matched receiver accepts only a strictly better-ranked proposer
//! - Displaced partners rejoin the queue at the back
//!
//! ## Example
//!
//! ```
//! use stable_match::engine::stable_match;
//! use stable_match::generation::PreferenceGenerator;
//!
//! let groups = PreferenceGenerator::new(8).unwrap().with_seed(3).generate().unwrap();
//! let (proposers, receivers) = (groups.proposers.clone(), groups.receivers.clone());
//!
//! let (pairing, log) = stable_match(groups.proposers, groups.receivers).unwrap();
//!
//! assert_eq!(pairing.len(), 8);
//! assert!(pairing.is_stable(&proposers, &receivers));
//! assert!(log.len() >= 8);
//! ```

mod fingerprint;
pub mod log;
pub mod matcher;

pub use log::TransitionLog;
pub use matcher::{stable_match, MatchOutcome, MatchingEngine, Proposal, Transitions};
