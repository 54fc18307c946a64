//! Parallel random preference generation.
//!
//! ## Task Model
//!
//! Generation is `2 × group_size` independent tasks, one per entity. A
//! bounded pool of scoped worker threads pulls task indices from a shared
//! counter. Task `t < n` builds proposer `t`, task `t >= n` builds receiver
//! `t - n`. Each task writes exactly one pre-sized, write-once slot, so an
//! entity's position never depends on scheduling.
//!
//! ## Determinism
//!
//! Every entity draws its permutation from its own ChaCha8 stream keyed by
//! `(seed, group, index)`. The same seed yields the same groups regardless
//! of worker count or thread interleaving.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;
use std::thread;
use std::time::Instant;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::config::RunConfig;
use crate::error::{ConfigurationError, Error, InternalConsistencyError, Result};
use crate::generation::{GenerationBarrier, GenerationProgress, Group};
use crate::types::{PreferenceSnapshot, Proposer, Receiver};

// ============================================================================
// Groups
// ============================================================================

/// Both fully-initialized groups, ready for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Groups {
    /// `proposers[i].id() == i`
    pub proposers: Vec<Proposer>,

    /// `receivers[i].id() == i`
    pub receivers: Vec<Receiver>,

    /// Seed the permutations were drawn from
    pub seed: u64,
}

impl Groups {
    #[inline]
    pub fn group_size(&self) -> usize {
        self.proposers.len()
    }

    /// Rankings of both groups for display
    pub fn snapshot(&self) -> PreferenceSnapshot {
        PreferenceSnapshot::capture(&self.proposers, &self.receivers)
    }

    pub fn into_parts(self) -> (Vec<Proposer>, Vec<Receiver>) {
        (self.proposers, self.receivers)
    }
}

// ============================================================================
// PreferenceGenerator
// ============================================================================

/// Builds both groups with independent uniform random rankings.
///
/// ## Example
///
/// ```
/// use stable_match::generation::PreferenceGenerator;
///
/// let groups = PreferenceGenerator::new(4)
///     .unwrap()
///     .with_seed(7)
///     .generate()
///     .unwrap();
///
/// assert_eq!(groups.proposers.len(), 4);
/// assert_eq!(groups.receivers.len(), 4);
/// assert!(groups.proposers.iter().all(|p| p.person().is_valid_permutation(4)));
/// ```
#[derive(Debug, Clone)]
pub struct PreferenceGenerator {
    group_size: usize,
    seed: u64,
    workers: usize,
    verbose: bool,
}

impl PreferenceGenerator {
    /// Generator for `group_size` entities per group, with a fresh random seed
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::EmptyGroup`] if `group_size` is zero.
    pub fn new(group_size: usize) -> Result<Self> {
        if group_size == 0 {
            return Err(ConfigurationError::EmptyGroup.into());
        }

        Ok(Self {
            group_size,
            seed: rand::random(),
            workers: default_workers(group_size),
            verbose: false,
        })
    }

    /// Generator configured from a validated [`RunConfig`]
    pub fn from_config(config: &RunConfig) -> Result<Self> {
        config.validate()?;

        let mut generator = Self::new(config.group_size)?.verbose(config.verbose);
        if let Some(seed) = config.seed {
            generator = generator.with_seed(seed);
        }
        if let Some(workers) = config.workers {
            generator = generator.with_workers(workers)?;
        }
        Ok(generator)
    }

    /// Fix the seed for reproducible runs
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Size of the worker pool. Capped at the number of tasks.
    pub fn with_workers(mut self, workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(ConfigurationError::NoWorkers.into());
        }
        self.workers = workers.min(self.group_size.saturating_mul(2));
        Ok(self)
    }

    /// Log every generated ranking at `info`
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    #[inline]
    pub fn group_size(&self) -> usize {
        self.group_size
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Generate both groups without progress reporting
    pub fn generate(&self) -> Result<Groups> {
        self.generate_with_progress(&())
    }

    /// Generate both groups, reporting each completed entity to `progress`.
    ///
    /// Returns only after the [`GenerationBarrier`] has seen every entity of
    /// both groups.
    ///
    /// # Panics
    ///
    /// Re-raises a panic from any worker, including one raised by `progress`,
    /// once all workers have stopped.
    pub fn generate_with_progress<P: GenerationProgress>(&self, progress: &P) -> Result<Groups> {
        let size = self.group_size;
        let total = size.saturating_mul(2);

        info!(
            group_size = size,
            seed = self.seed,
            workers = self.workers,
            "Generating preferences"
        );
        let start = Instant::now();

        let proposer_slots: Vec<OnceLock<Proposer>> = (0..size).map(|_| OnceLock::new()).collect();
        let receiver_slots: Vec<OnceLock<Receiver>> = (0..size).map(|_| OnceLock::new()).collect();
        let barrier = GenerationBarrier::new(size);
        let next_task = AtomicUsize::new(0);

        thread::scope(|scope| {
            for _ in 0..self.workers {
                scope.spawn(|| loop {
                    let task = next_task.fetch_add(1, Ordering::Relaxed);
                    if task >= total {
                        break;
                    }

                    let (group, index) = if task < size {
                        (Group::Proposers, task)
                    } else {
                        (Group::Receivers, task - size)
                    };
                    let preferences = permutation(self.seed, group, index, size);

                    // Each index is handed out once, so every slot is set once
                    let stored = match group {
                        Group::Proposers => proposer_slots[index]
                            .set(Proposer::new(index, preferences))
                            .is_ok(),
                        Group::Receivers => receiver_slots[index]
                            .set(Receiver::new(index, preferences))
                            .is_ok(),
                    };
                    debug_assert!(stored, "{group} slot {index} generated twice");

                    progress.entity_generated(group, index);
                    barrier.arrive(group);
                });
            }
        });

        // The scope has joined every worker and re-raised any worker panic,
        // so a failed task can never leave this wait hanging.
        barrier.join();

        let proposers = collect_slots(proposer_slots, Group::Proposers)?;
        let receivers = collect_slots(receiver_slots, Group::Receivers)?;

        info!(
            group_size = size,
            elapsed = ?start.elapsed(),
            "Preferences generated"
        );

        if self.verbose {
            for proposer in &proposers {
                info!(id = proposer.id(), preferences = ?proposer.preferences(), "Proposer");
            }
            for receiver in &receivers {
                info!(id = receiver.id(), preferences = ?receiver.preferences(), "Receiver");
            }
        }

        Ok(Groups {
            proposers,
            receivers,
            seed: self.seed,
        })
    }
}

/// Generate both groups with a fresh seed and default worker pool.
///
/// # Errors
///
/// [`ConfigurationError::EmptyGroup`] if `group_size` is zero. No entities
/// are created in that case.
pub fn generate(group_size: usize, verbose: bool) -> Result<Groups> {
    PreferenceGenerator::new(group_size)?
        .verbose(verbose)
        .generate()
}

/// Uniform random permutation of `[0, size)` for one entity.
///
/// Pure function of its arguments.
pub fn permutation(seed: u64, group: Group, index: usize, size: usize) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(((index as u64) << 1) | group.index() as u64);

    let mut preferences: Vec<usize> = (0..size).collect();
    preferences.shuffle(&mut rng);
    preferences
}

fn default_workers(group_size: usize) -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
        .min(group_size.saturating_mul(2))
        .max(1)
}

fn collect_slots<T>(slots: Vec<OnceLock<T>>, group: Group) -> Result<Vec<T>> {
    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.into_inner()
                .ok_or_else(|| Error::from(InternalConsistencyError::MissingEntity { group, index }))
        })
        .collect()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::LogProgress;

    #[test]
    fn test_zero_group_size_is_configuration_error() {
        let err = PreferenceGenerator::new(0).unwrap_err();
        assert!(err.is_configuration());
        assert!(generate(0, false).is_err());
    }

    #[test]
    fn test_zero_workers_is_configuration_error() {
        let err = PreferenceGenerator::new(3).unwrap().with_workers(0).unwrap_err();
        assert_eq!(err, Error::from(ConfigurationError::NoWorkers));
    }

    #[test]
    fn test_workers_capped_at_task_count() {
        let generator = PreferenceGenerator::new(2).unwrap().with_workers(64).unwrap();
        assert_eq!(generator.workers(), 4);
        assert!(PreferenceGenerator::new(1).unwrap().workers() <= 2);
    }

    #[test]
    fn test_slots_hold_matching_ids() {
        let groups = PreferenceGenerator::new(16).unwrap().with_seed(1).generate().unwrap();
        assert_eq!(groups.seed, 1);
        assert_eq!(groups.group_size(), 16);
        for (i, proposer) in groups.proposers.iter().enumerate() {
            assert_eq!(proposer.id(), i);
            assert_eq!(proposer.cursor(), 0);
            assert!(proposer.person().is_valid_permutation(16));
        }
        for (i, receiver) in groups.receivers.iter().enumerate() {
            assert_eq!(receiver.id(), i);
            assert!(receiver.partner().is_none());
            assert!(receiver.person().is_valid_permutation(16));
        }
    }

    #[test]
    fn test_same_seed_same_groups_regardless_of_workers() {
        let single = PreferenceGenerator::new(32)
            .unwrap()
            .with_seed(99)
            .with_workers(1)
            .unwrap()
            .generate()
            .unwrap();
        let many = PreferenceGenerator::new(32)
            .unwrap()
            .with_seed(99)
            .with_workers(8)
            .unwrap()
            .generate()
            .unwrap();
        assert_eq!(single, many);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = PreferenceGenerator::new(32).unwrap().with_seed(1).generate().unwrap();
        let b = PreferenceGenerator::new(32).unwrap().with_seed(2).generate().unwrap();
        assert_ne!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_permutation_streams_are_independent() {
        let proposer = permutation(5, Group::Proposers, 3, 50);
        let receiver = permutation(5, Group::Receivers, 3, 50);
        let other = permutation(5, Group::Proposers, 4, 50);
        assert_ne!(proposer, receiver);
        assert_ne!(proposer, other);
        assert_eq!(proposer, permutation(5, Group::Proposers, 3, 50));
    }

    #[test]
    fn test_progress_sees_every_entity() {
        let progress = LogProgress::new(10);
        PreferenceGenerator::new(10)
            .unwrap()
            .generate_with_progress(&progress)
            .unwrap();
        assert_eq!(progress.completed(Group::Proposers), 10);
        assert_eq!(progress.completed(Group::Receivers), 10);
    }

    #[test]
    fn test_huge_group_size_does_not_overflow_worker_cap() {
        let generator = PreferenceGenerator::new(usize::MAX).unwrap();
        assert!(generator.workers() >= 1);

        let generator = generator.with_workers(8).unwrap();
        assert_eq!(generator.workers(), 8);
    }

    #[test]
    fn test_verbose_generate() {
        let groups = generate(3, true).unwrap();
        assert_eq!(groups.group_size(), 3);
        assert!(groups.proposers.iter().all(|p| p.person().is_valid_permutation(3)));
        assert!(groups.receivers.iter().all(|r| r.person().is_valid_permutation(3)));
    }

    /// Progress sink that panics when a chosen receiver is reported.
    struct PanicOnReceiver(usize);

    impl GenerationProgress for PanicOnReceiver {
        fn entity_generated(&self, group: Group, index: usize) {
            if group == Group::Receivers && index == self.0 {
                panic!("progress sink failed on receiver {index}");
            }
        }
    }

    #[test]
    fn test_worker_panic_propagates_instead_of_hanging() {
        use std::sync::mpsc::{self, RecvTimeoutError};
        use std::time::Duration;

        for workers in [1, 4] {
            let generator = PreferenceGenerator::new(8)
                .unwrap()
                .with_seed(3)
                .with_workers(workers)
                .unwrap();

            let (tx, rx) = mpsc::channel();
            let handle = thread::spawn(move || {
                let result = generator.generate_with_progress(&PanicOnReceiver(0));
                let _ = tx.send(result.is_ok());
            });

            // The sender is dropped without sending when the call panics.
            assert_eq!(
                rx.recv_timeout(Duration::from_secs(10)),
                Err(RecvTimeoutError::Disconnected),
                "generation with {workers} workers did not abort"
            );
            assert!(handle.join().is_err());
        }
    }

    #[test]
    fn test_from_config() {
        let config = RunConfig {
            group_size: 3,
            verbose: true,
            seed: Some(11),
            workers: Some(2),
        };
        let generator = PreferenceGenerator::from_config(&config).unwrap();
        assert_eq!(generator.group_size(), 3);
        assert_eq!(generator.seed(), 11);
        assert_eq!(generator.workers(), 2);
    }
}
