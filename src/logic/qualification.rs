//! Qualification stage: round 1 pairing, round 1 classification, round 2 groups and
//! the final split into bracket A, bracket B and eliminated teams.

use crate::logic::shuffle::{pick, shuffled};
use crate::models::{Contest, ContestError, GameMatch, Group, TeamId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Round 1 split: who won (a bye counts as a win), who lost, and who got the bye.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round1Outcome {
    pub winners: Vec<TeamId>,
    pub losers: Vec<TeamId>,
    pub exempted: Option<TeamId>,
}

/// Result of both qualification rounds. The three sets partition the entrants.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Qualification {
    /// Two wins.
    pub bracket_a: Vec<TeamId>,
    /// One win.
    pub bracket_b: Vec<TeamId>,
    /// No win.
    pub eliminated: Vec<TeamId>,
}

/// Pair every team for round 1.
///
/// The teams are shuffled and paired in order. With an odd count the last shuffled team
/// gets a bye, numbered after the ordinary matches.
pub fn pair_round_1<R: Rng + ?Sized>(
    teams: &[TeamId],
    rng: &mut R,
) -> Result<Vec<GameMatch>, ContestError> {
    if teams.len() < 2 {
        return Err(ContestError::InsufficientEntrants {
            required: 2,
            found: teams.len(),
        });
    }
    Ok(pair_group(teams, 1, None, rng))
}

/// Indices of the members allowed to receive a bye.
///
/// When the round 1 exempted team is in the group, every other member is eligible and it
/// is not, unless it is the only member. Otherwise only the last member is eligible.
pub fn bye_candidates(members: &[TeamId], exempted: Option<TeamId>) -> Vec<usize> {
    match exempted {
        Some(e) if members.contains(&e) => {
            let others: Vec<usize> = (0..members.len()).filter(|&i| members[i] != e).collect();
            if others.is_empty() {
                (0..members.len()).collect()
            } else {
                others
            }
        }
        _ => members.len().checked_sub(1).into_iter().collect(),
    }
}

/// Pair one group. Numbering starts at `start_number`; the bye, if any, comes last.
fn pair_group<R: Rng + ?Sized>(
    members: &[TeamId],
    start_number: u32,
    exempted: Option<TeamId>,
    rng: &mut R,
) -> Vec<GameMatch> {
    if members.is_empty() {
        return Vec::new();
    }
    if members.len() == 1 {
        return vec![GameMatch::bye(start_number, members[0])];
    }

    let mut order = shuffled(members, rng);
    let bye_team = if order.len() % 2 == 1 {
        let candidates = bye_candidates(&order, exempted);
        let idx = pick(&candidates, rng).unwrap_or(order.len() - 1);
        Some(order.remove(idx))
    } else {
        None
    };

    let mut number = start_number;
    let mut matches: Vec<GameMatch> = order
        .chunks_exact(2)
        .map(|pair| {
            let m = GameMatch::pairing(number, pair[0], pair[1]);
            number += 1;
            m
        })
        .collect();
    if let Some(team) = bye_team {
        matches.push(GameMatch::bye(number, team));
    }
    matches
}

/// Split finished round 1 matches into winners and losers.
///
/// Teams outside `teams` are ignored; unfinished matches contribute nothing.
pub fn classify_round_1(matches: &[GameMatch], teams: &[TeamId]) -> Round1Outcome {
    let mut outcome = Round1Outcome::default();
    for m in matches {
        if m.is_bye {
            if let Some(team) = m.home.filter(|t| teams.contains(t)) {
                outcome.winners.push(team);
                outcome.exempted = Some(team);
            }
        } else if let (Some(w), Some(l)) = (m.winner, m.loser) {
            if teams.contains(&w) {
                outcome.winners.push(w);
            }
            if teams.contains(&l) {
                outcome.losers.push(l);
            }
        }
    }
    outcome
}

/// Pair round 2: winners among themselves, then losers among themselves, numbered
/// across both groups. The round 1 exempted team never gets a second bye when
/// anyone else in its group could take it.
pub fn pair_round_2<R: Rng + ?Sized>(outcome: &Round1Outcome, rng: &mut R) -> Vec<GameMatch> {
    let mut matches: Vec<GameMatch> = pair_group(&outcome.winners, 1, outcome.exempted, rng)
        .into_iter()
        .map(|m| m.in_group(Group::Winners))
        .collect();
    let next = matches.len() as u32 + 1;
    matches.extend(
        pair_group(&outcome.losers, next, outcome.exempted, rng)
            .into_iter()
            .map(|m| m.in_group(Group::Losers)),
    );
    matches
}

/// Count wins over both rounds (a bye is a win) and classify every team.
pub fn qualify(round_1: &[GameMatch], round_2: &[GameMatch], teams: &[TeamId]) -> Qualification {
    let mut wins: HashMap<TeamId, u8> = HashMap::new();
    for m in round_1.iter().chain(round_2.iter()) {
        let winner = if m.is_bye { m.home } else { m.winner };
        if let Some(w) = winner {
            *wins.entry(w).or_default() += 1;
        }
    }

    let mut q = Qualification::default();
    for &team in teams {
        match wins.get(&team).copied().unwrap_or(0) {
            0 => q.eliminated.push(team),
            1 => q.bracket_b.push(team),
            _ => q.bracket_a.push(team),
        }
    }
    q
}

impl Contest {
    fn team_ids(&self) -> Vec<TeamId> {
        self.teams.iter().map(|t| t.id).collect()
    }

    /// Round 1 winners and losers, once every round 1 match is finished.
    pub fn round_1_outcome(&self) -> Option<Round1Outcome> {
        let round_1 = self.round(1).filter(|r| r.is_complete())?;
        Some(classify_round_1(&round_1.matches, &self.team_ids()))
    }

    /// Bracket A / bracket B / eliminated split, once both rounds are finished.
    pub fn qualification(&self) -> Option<Qualification> {
        let round_1 = self.round(1).filter(|r| r.is_complete())?;
        let round_2 = self.round(2).filter(|r| r.is_complete())?;
        Some(qualify(&round_1.matches, &round_2.matches, &self.team_ids()))
    }
}
