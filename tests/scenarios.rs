//! Hand-traced matching scenarios.
//!
//! Each scenario lists the expected transition log step by step, following
//! the engine's queue discipline: the front proposer keeps proposing until
//! accepted, displaced partners rejoin at the back.

use stable_match::engine::{MatchingEngine, Proposal};
use stable_match::types::{Proposer, Receiver, TransitionStep};
use stable_match::{generate, stable_match, ConfigurationError, Error, PreferenceGenerator};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn groups(proposer_prefs: &[&[usize]], receiver_prefs: &[&[usize]]) -> (Vec<Proposer>, Vec<Receiver>) {
    let proposers = proposer_prefs
        .iter()
        .enumerate()
        .map(|(id, p)| Proposer::new(id, p.to_vec()))
        .collect();
    let receivers = receiver_prefs
        .iter()
        .enumerate()
        .map(|(id, p)| Receiver::new(id, p.to_vec()))
        .collect();
    (proposers, receivers)
}

// ============================================================================
// SCENARIOS
// ============================================================================

/// groupSize = 2, no conflicts: each proposer's favourite is free.
#[test]
fn two_members_no_displacement() {
    let (proposers, receivers) = groups(&[&[1, 0], &[0, 1]], &[&[1, 0], &[0, 1]]);

    let (pairing, log) = stable_match(proposers, receivers).unwrap();

    assert_eq!(pairing.proposer_for(0), Some(1));
    assert_eq!(pairing.proposer_for(1), Some(0));
    assert_eq!(log.len(), 2);
    assert_eq!(log.displacements(), 0);
    assert_eq!(
        log.as_slice(),
        &[TransitionStep::new(1, 0, None), TransitionStep::new(0, 1, None)]
    );
}

/// groupSize = 1: trivial pairing, single step.
#[test]
fn single_member() {
    let (proposers, receivers) = groups(&[&[0]], &[&[0]]);

    let (pairing, log) = stable_match(proposers, receivers).unwrap();

    assert_eq!(pairing.len(), 1);
    assert_eq!(pairing.proposer_for(0), Some(0));
    assert_eq!(log.as_slice(), &[TransitionStep::new(0, 0, None)]);
}

/// groupSize = 0: configuration error before anything is created.
#[test]
fn empty_group_is_rejected() {
    assert_eq!(
        generate(0, false).unwrap_err(),
        Error::from(ConfigurationError::EmptyGroup)
    );
    assert!(PreferenceGenerator::new(0).unwrap_err().is_configuration());
}

/// Three members with a displacement chain.
///
/// ```text
/// p0 -> r0  free                      accept
/// p1 -> r0  r0 prefers p1 over p0     accept, p0 to back
/// p2 -> r1  free                      accept
/// p0 -> r0  r0 prefers p1             reject
/// p0 -> r1  r1 prefers p0 over p2     accept, p2 to back
/// p2 -> r1  r1 prefers p0             reject
/// p2 -> r0  r0 prefers p2 over p1     accept, p1 to back
/// p1 -> r0  r0 prefers p2             reject
/// p1 -> r2  free                      accept
/// ```
#[test]
fn three_members_displacement_chain() {
    let (proposers, receivers) = groups(
        &[&[0, 1, 2], &[0, 2, 1], &[1, 0, 2]],
        &[&[2, 1, 0], &[0, 2, 1], &[1, 0, 2]],
    );
    let (p, r) = (proposers.clone(), receivers.clone());

    let outcome = MatchingEngine::new(proposers, receivers).unwrap().run().unwrap();

    assert_eq!(
        outcome.log.as_slice(),
        &[
            TransitionStep::new(0, 0, None),
            TransitionStep::new(0, 1, Some(0)),
            TransitionStep::new(1, 2, None),
            TransitionStep::new(1, 0, Some(2)),
            TransitionStep::new(0, 2, Some(1)),
            TransitionStep::new(2, 1, None),
        ]
    );
    assert_eq!(outcome.log.displacements(), 3);
    assert_eq!(outcome.proposals, 9);

    assert_eq!(outcome.pairing.proposer_for(0), Some(2));
    assert_eq!(outcome.pairing.proposer_for(1), Some(0));
    assert_eq!(outcome.pairing.proposer_for(2), Some(1));
    assert!(outcome.pairing.is_stable(&p, &r));

    let cursors: Vec<_> = outcome.proposers.iter().map(|p| p.cursor()).collect();
    assert_eq!(cursors, vec![1, 1, 1]);
    assert!(outcome.receivers.iter().all(|r| r.partner().is_some()));
}

/// Same scenario, observed one proposal at a time.
#[test]
fn three_members_step_by_step() {
    let (proposers, receivers) = groups(
        &[&[0, 1, 2], &[0, 2, 1], &[1, 0, 2]],
        &[&[2, 1, 0], &[0, 2, 1], &[1, 0, 2]],
    );
    let mut engine = MatchingEngine::new(proposers, receivers).unwrap();

    let mut trace = Vec::new();
    while let Some(proposal) = engine.step().unwrap() {
        trace.push(proposal);
    }

    let rejected = |proposer, receiver| Proposal::Rejected { proposer, receiver };
    let accepted = |r, p, d| Proposal::Accepted(TransitionStep::new(r, p, d));
    assert_eq!(
        trace,
        vec![
            accepted(0, 0, None),
            accepted(0, 1, Some(0)),
            accepted(1, 2, None),
            rejected(0, 0),
            accepted(1, 0, Some(2)),
            rejected(2, 1),
            accepted(0, 2, Some(1)),
            rejected(1, 0),
            accepted(2, 1, None),
        ]
    );
}

/// Every proposer ranks the receivers identically and every receiver ranks
/// proposers identically: proposer i ends with receiver i.
#[test]
fn identical_rankings_pair_by_rank() {
    const N: usize = 6;
    let order: Vec<usize> = (0..N).collect();
    let proposers = (0..N).map(|id| Proposer::new(id, order.clone())).collect();
    let receivers = (0..N).map(|id| Receiver::new(id, order.clone())).collect();

    let outcome = MatchingEngine::new(proposers, receivers).unwrap().run().unwrap();

    for i in 0..N {
        assert_eq!(outcome.pairing.proposer_for(i), Some(i));
    }
    assert_eq!(outcome.log.displacements(), 0);
    // proposer i is turned away i times before landing
    assert_eq!(outcome.proposals, N + N * (N - 1) / 2);
}

/// Generated groups flow straight into the engine.
#[test]
fn generated_groups_match_stably() {
    let groups = PreferenceGenerator::new(50).unwrap().with_seed(2024).generate().unwrap();
    let snapshot = groups.snapshot();
    let (proposers, receivers) = snapshot.restore();

    let outcome = MatchingEngine::from_groups(groups).unwrap().run().unwrap();

    assert!(outcome.pairing.is_bijection());
    assert!(outcome.pairing.is_stable(&proposers, &receivers));
    assert_eq!(outcome.log.len(), 50 + outcome.log.displacements());
}

/// Re-running from the same snapshot reproduces pairing and log exactly.
#[test]
fn rerun_from_snapshot_is_identical() {
    let groups = PreferenceGenerator::new(40).unwrap().with_seed(7).generate().unwrap();
    let snapshot = groups.snapshot();

    let (p1, r1) = snapshot.restore();
    let (p2, r2) = snapshot.restore();
    let (pairing1, log1) = stable_match(p1, r1).unwrap();
    let (pairing2, log2) = stable_match(p2, r2).unwrap();

    assert_eq!(pairing1, pairing2);
    assert_eq!(log1, log2);
    assert_eq!(log1.fingerprint().unwrap(), log2.fingerprint().unwrap());
}
