//! Single-elimination bracket construction: sizing, round names, round-to-round links.

use crate::logic::shuffle::shuffled;
use crate::models::{Bracket, BracketKind, BracketRound, GameMatch, TeamId};
use rand::Rng;

/// Shape of a bracket for a given number of teams.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BracketLayout {
    /// Smallest power of two >= the team count (1 for a single team).
    pub size: usize,
    /// Bye matches at the tail of round 1.
    pub byes: usize,
    /// log2(size); 0 for a single team, which still gets one "Final" round.
    pub rounds: u32,
}

impl BracketLayout {
    pub fn for_count(count: usize) -> Self {
        let size = count.max(1).next_power_of_two();
        Self {
            size,
            byes: size - count.max(1),
            rounds: size.trailing_zeros(),
        }
    }

    /// Ordinary (two-team) matches in round 1.
    pub fn first_round_pairings(&self) -> usize {
        self.size / 2 - self.byes
    }
}

/// Round name by distance from the final.
pub fn round_name(round: u32, total_rounds: u32) -> String {
    match total_rounds.saturating_sub(round) + 1 {
        1 => "Final".to_string(),
        2 => "Semifinal".to_string(),
        3 => "Quarterfinal".to_string(),
        4 => "Round of 16".to_string(),
        _ => format!("Round {}", round),
    }
}

/// Empty bracket for `count` teams: byes flagged at the tail of round 1, later rounds
/// empty, every non-final match linked to its successor. None when `count` is 0.
pub fn bracket_skeleton(kind: BracketKind, count: usize) -> Option<Bracket> {
    if count == 0 {
        return None;
    }
    let layout = BracketLayout::for_count(count);
    let mut bracket = Bracket {
        kind,
        rounds: Vec::new(),
        matches: Vec::new(),
    };

    if layout.rounds == 0 {
        bracket.matches.push(GameMatch::empty_bye(1));
        bracket.rounds.push(BracketRound {
            number: 1,
            name: round_name(1, 1),
            matches: vec![0],
        });
        return Some(bracket);
    }

    let mut matches_in_round = layout.size / 2;
    for round in 1..=layout.rounds {
        let mut indices = Vec::with_capacity(matches_in_round);
        for i in 0..matches_in_round {
            let number = i as u32 + 1;
            let m = if round == 1 && i >= layout.first_round_pairings() {
                GameMatch::empty_bye(number)
            } else {
                GameMatch::empty(number)
            };
            indices.push(bracket.matches.len());
            bracket.matches.push(m);
        }
        bracket.rounds.push(BracketRound {
            number: round,
            name: round_name(round, layout.rounds),
            matches: indices,
        });
        matches_in_round /= 2;
    }

    link_rounds(&mut bracket);
    Some(bracket)
}

/// Match `j` of round `i` feeds match `j / 2` of round `i + 1`.
fn link_rounds(bracket: &mut Bracket) {
    for r in 0..bracket.rounds.len().saturating_sub(1) {
        let next_round = bracket.rounds[r + 1].matches.clone();
        for (j, &idx) in bracket.rounds[r].matches.iter().enumerate() {
            bracket.matches[idx].next_match = next_round.get(j / 2).copied();
        }
    }
}

/// Full bracket for a known set of teams: shuffled into round 1, two per ordinary
/// match, one per trailing bye (finished, occupant wins). Later rounds stay empty.
pub fn build_bracket<R: Rng + ?Sized>(
    kind: BracketKind,
    teams: &[TeamId],
    rng: &mut R,
) -> Option<Bracket> {
    let mut bracket = bracket_skeleton(kind, teams.len())?;
    let mut order = shuffled(teams, rng).into_iter();
    let first_round = bracket.rounds[0].matches.clone();
    for idx in first_round {
        let m = &mut bracket.matches[idx];
        if m.is_bye {
            if let Some(team) = order.next() {
                m.fill_bye(team);
            }
        } else {
            m.home = order.next();
            m.away = order.next();
        }
    }
    Some(bracket)
}
