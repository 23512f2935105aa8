//! Single-elimination bracket stored as an arena of matches.

use crate::models::game::{GameMatch, MatchId, Slot};
use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};

/// Main (A) or consolation (B) final bracket.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum BracketKind {
    A,
    B,
}

/// One round of a bracket: its display name and the arena indices of its matches, in order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketRound {
    /// 1 for the opening round, up to the final.
    pub number: u32,
    pub name: String,
    pub matches: Vec<usize>,
}

/// Every match lives in `matches`; rounds and `next_match` links refer to it by index.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub kind: BracketKind,
    pub rounds: Vec<BracketRound>,
    pub matches: Vec<GameMatch>,
}

impl Bracket {
    /// Matches of the round at `round_index` (0-based) with their arena indices.
    pub fn round_matches(
        &self,
        round_index: usize,
    ) -> impl Iterator<Item = (usize, &GameMatch)> + '_ {
        self.rounds
            .get(round_index)
            .into_iter()
            .flat_map(|r| r.matches.iter())
            .map(move |&i| (i, &self.matches[i]))
    }

    pub fn match_index(&self, id: MatchId) -> Option<usize> {
        self.matches.iter().position(|m| m.id == id)
    }

    /// Where `team` currently sits in this bracket, if anywhere.
    pub fn position_of(&self, team: TeamId) -> Option<(usize, Slot)> {
        self.matches.iter().enumerate().find_map(|(i, m)| {
            if m.home == Some(team) {
                Some((i, Slot::Home))
            } else if m.away == Some(team) {
                Some((i, Slot::Away))
            } else {
                None
            }
        })
    }

    pub fn contains(&self, team: TeamId) -> bool {
        self.position_of(team).is_some()
    }

    pub fn final_match(&self) -> Option<&GameMatch> {
        let last = self.rounds.last()?;
        last.matches.first().map(|&i| &self.matches[i])
    }

    /// Winner of the final, once it is decided.
    pub fn champion(&self) -> Option<TeamId> {
        self.final_match()
            .filter(|m| m.is_finished())
            .and_then(|m| m.winner)
    }

    pub fn is_complete(&self) -> bool {
        self.champion().is_some()
    }
}
