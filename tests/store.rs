//! Contest storage: transactions, rollback, concurrent reports and cleanup.

mod common;

use common::{contest_with_teams, ids, rng};
use petanque_contest_web::{
    bracket_skeleton, generate_draw, report_result, BracketKind, ContestError, ContestStore,
    GameMatch, Group, MatchId, QualificationRound, Slot, TeamId,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use uuid::Uuid;

#[test]
fn failed_transaction_leaves_the_contest_untouched() {
    let store = ContestStore::new();
    let id = store.insert(contest_with_teams(4)).unwrap().id;

    let result: Result<(), ContestError> = store.transact(id, |c| {
        c.name = "Renamed".to_string();
        c.teams.clear();
        Err(ContestError::InvalidState)
    });
    assert_eq!(result, Err(ContestError::InvalidState));

    let c = store.get(id).unwrap();
    assert_eq!(c.name, "Test contest");
    assert_eq!(c.teams.len(), 4);
}

#[test]
fn successful_transaction_is_committed() {
    let store = ContestStore::new();
    let id = store.insert(contest_with_teams(4)).unwrap().id;
    let summary = store.transact(id, |c| generate_draw(c, &mut rng(1))).unwrap();
    assert_eq!(summary.teams, 4);
    assert_eq!(store.get(id).unwrap().rounds.len(), 2);
}

#[test]
fn structure_inconsistency_rolls_back_the_result() {
    let mut contest = contest_with_teams(0);
    let mut bracket = bracket_skeleton(BracketKind::A, 4).unwrap();
    let t = ids(4);
    let opening = bracket.rounds[0].matches[0];
    let final_idx = bracket.rounds[1].matches[0];
    bracket.matches[opening].fill(Slot::Home, t[0]);
    bracket.matches[opening].fill(Slot::Away, t[1]);
    bracket.matches[final_idx].fill(Slot::Home, t[2]);
    bracket.matches[final_idx].fill(Slot::Away, t[3]);
    let match_id = bracket.matches[opening].id;
    contest.brackets.push(bracket);

    let store = ContestStore::new();
    let id = store.insert(contest).unwrap().id;
    let result = store.transact(id, |c| report_result(c, match_id, t[0], &mut rng(2)));
    assert!(matches!(result, Err(ContestError::StructureInconsistency { .. })));

    let c = store.get(id).unwrap();
    let m = &c.bracket(BracketKind::A).unwrap().matches[opening];
    assert!(!m.is_finished());
    assert_eq!(m.winner, None);
}

#[test]
fn team_with_no_open_slot_rolls_back_the_result() {
    let mut contest = contest_with_teams(4);
    let t: Vec<TeamId> = contest.teams.iter().map(|t| t.id).collect();
    let mut first = GameMatch::pairing(1, t[0], t[1]);
    first.record_result(t[0]).unwrap();
    let mut second = GameMatch::pairing(2, t[2], t[3]);
    second.record_result(t[2]).unwrap();
    let winners = GameMatch::pairing(1, t[0], t[2]).in_group(Group::Winners);
    let losers = GameMatch::pairing(2, t[1], t[3]).in_group(Group::Losers);
    let match_id = winners.id;
    contest.rounds = vec![
        QualificationRound::new(1, vec![first, second]),
        QualificationRound::new(2, vec![winners, losers]),
    ];

    // Bracket A holds one team and somebody already took it.
    let mut bracket_a = bracket_skeleton(BracketKind::A, 1).unwrap();
    bracket_a.matches[0].fill_bye(Uuid::new_v4());
    contest.brackets = vec![bracket_a, bracket_skeleton(BracketKind::B, 2).unwrap()];

    let store = ContestStore::new();
    let id = store.insert(contest).unwrap().id;
    let result = store.transact(id, |c| report_result(c, match_id, t[0], &mut rng(4)));
    assert_eq!(result, Err(ContestError::NoOpenSlot { team: t[0] }));

    let c = store.get(id).unwrap();
    let m = &c.round(2).unwrap().matches[0];
    assert!(!m.is_finished());
    assert_eq!(m.winner, None);
    assert!(!c.bracket(BracketKind::B).unwrap().contains(t[2]));
}

#[test]
fn concurrent_reports_are_applied_one_at_a_time() {
    let store = Arc::new(ContestStore::new());
    let id = store.insert(contest_with_teams(16)).unwrap().id;
    store.transact(id, |c| generate_draw(c, &mut rng(3))).unwrap();

    let pending: Vec<(MatchId, TeamId)> = store
        .get(id)
        .unwrap()
        .round(1)
        .unwrap()
        .matches
        .iter()
        .map(|m| (m.id, m.home.unwrap()))
        .collect();
    let handles: Vec<_> = pending
        .iter()
        .copied()
        .enumerate()
        .map(|(i, (match_id, winner))| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(i as u64);
                store
                    .transact(id, |c| report_result(c, match_id, winner, &mut rng))
                    .unwrap();
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let c = store.get(id).unwrap();
    assert!(c.round(1).unwrap().is_complete());
    let round_2 = c.round(2).unwrap();
    let winners: HashSet<TeamId> = round_2
        .group_matches(Group::Winners)
        .flat_map(|(_, m)| m.occupants())
        .collect();
    let expected: HashSet<TeamId> = pending.iter().map(|&(_, w)| w).collect();
    assert_eq!(winners, expected);
    let seated: usize = round_2.matches.iter().map(|m| m.occupant_count()).sum();
    assert_eq!(seated, 16);
}

#[test]
fn unknown_contest_is_not_found() {
    let store = ContestStore::new();
    let missing = Uuid::new_v4();
    assert_eq!(store.get(missing).unwrap_err(), ContestError::ContestNotFound);
    assert_eq!(store.remove(missing), Err(ContestError::ContestNotFound));
    assert_eq!(
        store.transact(missing, |_| Ok(())),
        Err(ContestError::ContestNotFound)
    );
}

#[test]
fn list_and_remove() {
    let store = ContestStore::new();
    assert!(store.is_empty());
    let first = store.insert(contest_with_teams(3)).unwrap().id;
    let second = store.insert(contest_with_teams(5)).unwrap().id;

    let listed = store.list().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed.iter().map(|s| s.teams).sum::<usize>(), 8);

    store.remove(first).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.list().unwrap()[0].id, second);
}

#[test]
fn eviction_removes_idle_contests() {
    let store = ContestStore::new();
    store.insert(contest_with_teams(3)).unwrap();
    store.insert(contest_with_teams(3)).unwrap();

    assert_eq!(store.evict_inactive(Duration::from_secs(3600)).unwrap(), 0);
    assert_eq!(store.len(), 2);
    assert_eq!(store.evict_inactive(Duration::ZERO).unwrap(), 2);
    assert!(store.is_empty());
}
