//! Shared helpers for the integration tests.
#![allow(dead_code)]

use petanque_contest_web::{report_result, Contest, GameMode, MatchId, TeamId, TeamType};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use uuid::Uuid;

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Bare team ids, for the functions that never look at team data.
pub fn ids(n: usize) -> Vec<TeamId> {
    (0..n).map(|_| Uuid::new_v4()).collect()
}

/// Draft tête-à-tête contest with `n` registered teams.
pub fn contest_with_teams(n: usize) -> Contest {
    let mut c = Contest::new("Test contest", TeamType::TeteATete, GameMode::Monte);
    for i in 0..n {
        c.add_team(None, None, vec![format!("P{i}")]).unwrap();
    }
    c
}

/// Any match with two teams and no result yet, qualification rounds first.
pub fn playable(c: &Contest) -> Option<(MatchId, TeamId, TeamId)> {
    let qualification = c.rounds.iter().flat_map(|r| r.matches.iter());
    let brackets = c.brackets.iter().flat_map(|b| b.matches.iter());
    qualification
        .chain(brackets)
        .filter(|m| !m.is_bye && !m.is_finished())
        .find_map(|m| Some((m.id, m.home?, m.away?)))
}

/// Report random winners until no match is left to play. Returns how many were played.
pub fn play_out<R: Rng>(c: &mut Contest, rng: &mut R) -> usize {
    let mut played = 0;
    while let Some((id, home, away)) = playable(c) {
        let winner = if rng.gen_bool(0.5) { home } else { away };
        report_result(c, id, winner, rng).unwrap();
        played += 1;
        assert!(played < 1000, "contest never settles");
    }
    played
}

/// Report every round 1 match, home team winning.
pub fn play_round_1<R: Rng>(c: &mut Contest, rng: &mut R) {
    let pending: Vec<(MatchId, TeamId)> = c
        .round(1)
        .unwrap()
        .matches
        .iter()
        .filter(|m| !m.is_bye)
        .map(|m| (m.id, m.home.unwrap()))
        .collect();
    for (id, winner) in pending {
        report_result(c, id, winner, rng).unwrap();
    }
}

/// No team sits twice in the same qualification round or bracket round.
pub fn assert_no_team_twice_per_round(c: &Contest) {
    for round in &c.rounds {
        let mut seen = HashSet::new();
        for team in round.matches.iter().flat_map(|m| m.occupants()) {
            assert!(seen.insert(team), "team {team} twice in round {}", round.number);
        }
    }
    for bracket in &c.brackets {
        for r in 0..bracket.rounds.len() {
            let mut seen = HashSet::new();
            for (_, m) in bracket.round_matches(r) {
                for team in m.occupants() {
                    assert!(seen.insert(team), "team {team} twice in bracket {:?}", bracket.kind);
                }
            }
        }
    }
}
