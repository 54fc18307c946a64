//! Generation phase: random rankings for both groups, built in parallel.
//!
//! ## Components
//!
//! - [`PreferenceGenerator`]: Fans out one task per entity over a worker pool
//! - [`GenerationBarrier`]: Two-group countdown joined before matching starts
//! - [`GenerationProgress`]: Optional per-entity progress sink
//!
//! ## Example
//!
//! ```
//! use stable_match::generation::generate;
//!
//! let groups = generate(3, false).unwrap();
//! assert_eq!(groups.group_size(), 3);
//! assert!(generate(0, false).is_err());
//! ```

pub mod barrier;
pub mod generator;
pub mod progress;

pub use barrier::GenerationBarrier;
pub use generator::{generate, permutation, Groups, PreferenceGenerator};
pub use progress::{GenerationProgress, Group, LogProgress};
