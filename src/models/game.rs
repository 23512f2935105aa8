//! Match (game), its two slots and result state.

use crate::models::bracket::BracketKind;
use crate::models::contest::ContestError;
use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// One of the two positions a team can occupy in a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Home,
    Away,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Finished,
}

/// Second qualification round group: teams that won round 1, or teams that lost it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    Winners,
    Losers,
}

impl Group {
    /// Bracket the group's round 2 winners go to.
    pub fn winner_bracket(self) -> BracketKind {
        match self {
            Group::Winners => BracketKind::A,
            Group::Losers => BracketKind::B,
        }
    }
}

/// A single match. Slots fill over time; identity never changes after creation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    /// Position within its round, starting at 1.
    pub number: u32,
    pub home: Option<TeamId>,
    pub away: Option<TeamId>,
    pub is_bye: bool,
    pub status: MatchStatus,
    pub winner: Option<TeamId>,
    pub loser: Option<TeamId>,
    /// Round 2 only.
    pub group: Option<Group>,
    /// Bracket only: index of the successor in the bracket's match arena.
    pub next_match: Option<usize>,
}

impl GameMatch {
    /// An unplayed match with no occupants yet.
    pub fn empty(number: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            number,
            home: None,
            away: None,
            is_bye: false,
            status: MatchStatus::Scheduled,
            winner: None,
            loser: None,
            group: None,
            next_match: None,
        }
    }

    /// A bye slot waiting for its single occupant (bracket skeletons).
    pub fn empty_bye(number: u32) -> Self {
        Self {
            is_bye: true,
            ..Self::empty(number)
        }
    }

    pub fn pairing(number: u32, home: TeamId, away: TeamId) -> Self {
        Self {
            home: Some(home),
            away: Some(away),
            ..Self::empty(number)
        }
    }

    /// A finished bye: the single occupant is the winner.
    pub fn bye(number: u32, team: TeamId) -> Self {
        let mut m = Self::empty_bye(number);
        m.fill_bye(team);
        m
    }

    pub fn in_group(mut self, group: Group) -> Self {
        self.group = Some(group);
        self
    }

    pub fn occupant(&self, slot: Slot) -> Option<TeamId> {
        match slot {
            Slot::Home => self.home,
            Slot::Away => self.away,
        }
    }

    pub fn occupants(&self) -> impl Iterator<Item = TeamId> + '_ {
        self.home.iter().chain(self.away.iter()).copied()
    }

    pub fn occupant_count(&self) -> usize {
        self.occupants().count()
    }

    pub fn contains(&self, team: TeamId) -> bool {
        self.home == Some(team) || self.away == Some(team)
    }

    /// Empty slots, home first.
    pub fn open_slots(&self) -> Vec<Slot> {
        [Slot::Home, Slot::Away]
            .into_iter()
            .filter(|&s| self.occupant(s).is_none())
            .collect()
    }

    pub fn first_open_slot(&self) -> Option<Slot> {
        self.open_slots().into_iter().next()
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    pub fn fill(&mut self, slot: Slot, team: TeamId) {
        match slot {
            Slot::Home => self.home = Some(team),
            Slot::Away => self.away = Some(team),
        }
    }

    /// Put `team` alone in the match and finish it with `team` as winner.
    pub fn fill_bye(&mut self, team: TeamId) {
        self.is_bye = true;
        self.home = Some(team);
        self.away = None;
        self.winner = Some(team);
        self.loser = None;
        self.status = MatchStatus::Finished;
    }

    /// Turn a match holding exactly one team into a finished bye, moving a lone
    /// away occupant to home. Returns the bye winner.
    pub fn convert_to_bye(&mut self) -> Option<TeamId> {
        if self.occupant_count() != 1 {
            return None;
        }
        let team = self.home.or(self.away)?;
        self.fill_bye(team);
        Some(team)
    }

    /// Validate and record a played result. Returns the loser.
    pub fn record_result(&mut self, winner: TeamId) -> Result<TeamId, ContestError> {
        if self.is_bye {
            return Err(ContestError::ByeMatchImmutable);
        }
        if self.is_finished() {
            return Err(ContestError::AlreadyFinished);
        }
        let (home, away) = match (self.home, self.away) {
            (Some(h), Some(a)) => (h, a),
            _ => return Err(ContestError::InvalidWinner),
        };
        let loser = if winner == home {
            away
        } else if winner == away {
            home
        } else {
            return Err(ContestError::InvalidWinner);
        };
        self.winner = Some(winner);
        self.loser = Some(loser);
        self.status = MatchStatus::Finished;
        Ok(loser)
    }
}
