//! Team (the entrant of a contest), melee players and team composition.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team (used in match slots and lookups).
pub type TeamId = Uuid;

/// Unique identifier for a player registered individually in melee mode.
pub type PlayerId = Uuid;

/// How many players make up one team.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamType {
    TeteATete,
    #[default]
    Doublette,
    Triplette,
}

impl TeamType {
    pub fn players_per_team(self) -> usize {
        match self {
            TeamType::TeteATete => 1,
            TeamType::Doublette => 2,
            TeamType::Triplette => 3,
        }
    }
}

/// Whether a team is still in the contest.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamStatus {
    #[default]
    Registered,
    /// Lost both qualification rounds.
    Eliminated,
}

/// A team entered in the contest. The engine only ever moves its id between slots.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    /// Sequential registration number, starting at 1.
    pub number: u32,
    pub name: Option<String>,
    pub club: Option<String>,
    pub players: Vec<String>,
    pub status: TeamStatus,
}

impl Team {
    pub fn new(number: u32, players: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            number,
            name: None,
            club: None,
            players,
            status: TeamStatus::Registered,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_club(mut self, club: impl Into<String>) -> Self {
        self.club = Some(club.into());
        self
    }

    /// Display label: the explicit name, else the players joined with " & ".
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None if self.players.is_empty() => format!("Team {}", self.number),
            None => self.players.join(" & "),
        }
    }

    pub fn eliminate(&mut self) {
        self.status = TeamStatus::Eliminated;
    }

    pub fn is_eliminated(&self) -> bool {
        self.status == TeamStatus::Eliminated
    }
}

/// A player registered on their own; teams are drawn from these in melee mode.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MeleePlayer {
    pub id: PlayerId,
    pub name: String,
}

impl MeleePlayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}
