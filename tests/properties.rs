//! Property tests for generation and matching.
//!
//! Preferences are drawn by proptest as shuffled identity permutations, so
//! failures shrink towards small groups.

use proptest::prelude::*;

use stable_match::engine::{MatchingEngine, Proposal};
use stable_match::types::{Pairing, Proposer, Receiver};
use stable_match::PreferenceGenerator;

// ============================================================================
// STRATEGIES
// ============================================================================

fn permutation(n: usize) -> impl Strategy<Value = Vec<usize>> {
    Just((0..n).collect::<Vec<usize>>()).prop_shuffle()
}

/// `(proposer preferences, receiver preferences)` for a random group size
fn preferences(max: usize) -> impl Strategy<Value = (Vec<Vec<usize>>, Vec<Vec<usize>>)> {
    (1..=max).prop_flat_map(|n| {
        (
            prop::collection::vec(permutation(n), n),
            prop::collection::vec(permutation(n), n),
        )
    })
}

fn build(proposer_prefs: &[Vec<usize>], receiver_prefs: &[Vec<usize>]) -> (Vec<Proposer>, Vec<Receiver>) {
    let proposers = proposer_prefs
        .iter()
        .enumerate()
        .map(|(id, p)| Proposer::new(id, p.clone()))
        .collect();
    let receivers = receiver_prefs
        .iter()
        .enumerate()
        .map(|(id, p)| Receiver::new(id, p.clone()))
        .collect();
    (proposers, receivers)
}

/// Every perfect matching of size `n`, as `partners[receiver] = proposer`
fn all_matchings(n: usize) -> Vec<Vec<usize>> {
    fn extend(n: usize, current: &mut Vec<usize>, used: &mut [bool], out: &mut Vec<Vec<usize>>) {
        if current.len() == n {
            out.push(current.clone());
            return;
        }
        for proposer in 0..n {
            if !used[proposer] {
                used[proposer] = true;
                current.push(proposer);
                extend(n, current, used, out);
                current.pop();
                used[proposer] = false;
            }
        }
    }

    let mut out = Vec::new();
    extend(n, &mut Vec::with_capacity(n), &mut vec![false; n], &mut out);
    out
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    /// Every receiver gets exactly one partner and every proposer is used once.
    #[test]
    fn pairing_is_a_bijection((p, r) in preferences(12)) {
        let (proposers, receivers) = build(&p, &r);
        let outcome = MatchingEngine::new(proposers, receivers).unwrap().run().unwrap();

        prop_assert_eq!(outcome.pairing.len(), p.len());
        prop_assert!(outcome.pairing.is_bijection());
        for proposer in 0..p.len() {
            prop_assert!(outcome.pairing.receiver_for(proposer).is_some());
        }
    }

    /// No blocking pair survives.
    #[test]
    fn pairing_is_stable((p, r) in preferences(12)) {
        let (proposers, receivers) = build(&p, &r);
        let outcome = MatchingEngine::new(proposers.clone(), receivers.clone()).unwrap().run().unwrap();

        prop_assert!(outcome.pairing.blocking_pairs(&proposers, &receivers).is_empty());
    }

    /// Every proposer does at least as well as in any other stable matching.
    #[test]
    fn pairing_is_proposer_optimal((p, r) in preferences(6)) {
        let n = p.len();
        let (proposers, receivers) = build(&p, &r);
        let outcome = MatchingEngine::new(proposers.clone(), receivers.clone()).unwrap().run().unwrap();

        for partners in all_matchings(n) {
            let candidate = Pairing::from_partners(partners);
            if !candidate.is_stable(&proposers, &receivers) {
                continue;
            }
            for proposer in &proposers {
                let ours = outcome.pairing.receiver_for(proposer.id()).unwrap();
                let theirs = candidate.receiver_for(proposer.id()).unwrap();
                prop_assert!(
                    proposer.person().rank_of(ours) <= proposer.person().rank_of(theirs),
                    "proposer {} prefers receiver {} from another stable matching over {}",
                    proposer.id(), theirs, ours
                );
            }
        }
    }

    /// Cursors only move forward and stay within the preference list.
    #[test]
    fn cursors_are_monotonic((p, r) in preferences(10)) {
        let n = p.len();
        let (proposers, receivers) = build(&p, &r);
        let mut engine = MatchingEngine::new(proposers, receivers).unwrap();

        let mut previous: Vec<usize> = vec![0; n];
        while let Some(proposal) = engine.step().unwrap() {
            let cursors: Vec<usize> = engine.proposers().iter().map(|p| p.cursor()).collect();
            for (before, after) in previous.iter().zip(&cursors) {
                prop_assert!(before <= after);
                prop_assert!(*after <= n);
            }
            if let Proposal::Rejected { proposer, .. } = proposal {
                prop_assert_eq!(cursors[proposer], previous[proposer] + 1);
            }
            previous = cursors;
        }
    }

    /// Accepted steps are first matches plus displacements, and the run is bounded.
    #[test]
    fn log_accounts_for_every_acceptance((p, r) in preferences(12)) {
        let n = p.len();
        let (proposers, receivers) = build(&p, &r);
        let outcome = MatchingEngine::new(proposers, receivers).unwrap().run().unwrap();

        prop_assert_eq!(outcome.log.len(), n + outcome.log.displacements());
        prop_assert!(outcome.proposals <= 2 * n * n);
        prop_assert!(outcome.proposals >= outcome.log.len());
    }

    /// Same preferences, same pairing and same log.
    #[test]
    fn matching_is_deterministic((p, r) in preferences(12)) {
        let (p1, r1) = build(&p, &r);
        let (p2, r2) = build(&p, &r);
        let a = MatchingEngine::new(p1, r1).unwrap().run().unwrap();
        let b = MatchingEngine::new(p2, r2).unwrap().run().unwrap();

        prop_assert_eq!(a.pairing, b.pairing);
        prop_assert_eq!(a.log, b.log);
    }

    /// Generated rankings are permutations of `[0, n)`.
    #[test]
    fn generated_preferences_are_permutations(n in 1usize..64, seed in any::<u64>()) {
        let groups = PreferenceGenerator::new(n).unwrap().with_seed(seed).generate().unwrap();

        prop_assert_eq!(groups.proposers.len(), n);
        prop_assert_eq!(groups.receivers.len(), n);
        for proposer in &groups.proposers {
            prop_assert!(proposer.person().is_valid_permutation(n));
        }
        for receiver in &groups.receivers {
            prop_assert!(receiver.person().is_valid_permutation(n));
        }
    }
}

#[test]
fn all_matchings_enumerates_factorial() {
    assert_eq!(all_matchings(1).len(), 1);
    assert_eq!(all_matchings(3).len(), 6);
    assert_eq!(all_matchings(4).len(), 24);
}
