//! Contest: teams, qualification rounds, brackets and phase.

use crate::models::bracket::{Bracket, BracketKind};
use crate::models::game::{GameMatch, Group, MatchId};
use crate::models::team::{MeleePlayer, PlayerId, Team, TeamId, TeamType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during contest operations.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ContestError {
    /// Not enough teams (or melee players) to draw.
    #[error("Need at least {required} entrants to draw (found {found})")]
    InsufficientEntrants { required: usize, found: usize },
    /// Reported winner is not one of the match's two occupants, or the match is not full yet.
    #[error("Winner must be one of the two teams of the match")]
    InvalidWinner,
    #[error("Match already has a result")]
    AlreadyFinished,
    #[error("A bye match has no result to report")]
    ByeMatchImmutable,
    /// A successor match was already full when a winner had to move into it.
    #[error("Match {match_id} already has both teams assigned")]
    StructureInconsistency { match_id: MatchId },
    /// A team that had to move on found every slot of its next structure taken.
    #[error("No open slot left for team {team}")]
    NoOpenSlot { team: TeamId },
    #[error("Contest not found")]
    ContestNotFound,
    #[error("Match not found")]
    MatchNotFound,
    #[error("Team not found")]
    TeamNotFound(TeamId),
    #[error("Player not found")]
    PlayerNotFound(PlayerId),
    /// Contest is not in a state that allows this action.
    #[error("Invalid state for this action")]
    InvalidState,
    #[error("A team needs exactly {expected} player(s) (got {found})")]
    InvalidTeamSize { expected: usize, found: usize },
    /// Team names are unique, case-insensitive.
    #[error("A team with this name already exists")]
    DuplicateTeamName,
    #[error("A name is required")]
    EmptyName,
    #[error("Invalid import: {0}")]
    InvalidImport(String),
    #[error("Contest storage lock poisoned")]
    LockPoisoned,
}

/// Unique identifier for a contest.
pub type ContestId = Uuid;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContestStatus {
    /// Registering teams; nothing drawn yet.
    #[default]
    Draft,
    /// Draw generated; results are coming in.
    InProgress,
    /// Every bracket final has a winner.
    Finished,
}

/// How teams are formed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Teams register already formed.
    #[default]
    Monte,
    /// Players register alone; teams are drawn at random.
    Melee,
}

/// A qualification round (1 or 2) and its matches in number order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct QualificationRound {
    pub number: u8,
    pub matches: Vec<GameMatch>,
}

impl QualificationRound {
    pub fn new(number: u8, matches: Vec<GameMatch>) -> Self {
        Self { number, matches }
    }

    pub fn is_complete(&self) -> bool {
        self.matches.iter().all(|m| m.is_finished())
    }

    pub fn group_matches(&self, group: Group) -> impl Iterator<Item = (usize, &GameMatch)> + '_ {
        self.matches
            .iter()
            .enumerate()
            .filter(move |(_, m)| m.group == Some(group))
    }
}

/// Where a match lives inside a contest.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MatchLocation {
    Qualification { round: u8, index: usize },
    Bracket { kind: BracketKind, index: usize },
}

/// Full contest state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Contest {
    pub id: ContestId,
    pub name: String,
    pub location: Option<String>,
    pub team_type: TeamType,
    pub game_mode: GameMode,
    pub status: ContestStatus,
    pub teams: Vec<Team>,
    /// Melee mode only: players waiting to be drawn into teams.
    pub melee_players: Vec<MeleePlayer>,
    pub rounds: Vec<QualificationRound>,
    pub brackets: Vec<Bracket>,
    pub created_at: DateTime<Utc>,
}

impl Contest {
    /// Create a new contest in Draft state with no teams.
    pub fn new(name: impl Into<String>, team_type: TeamType, game_mode: GameMode) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            location: None,
            team_type,
            game_mode,
            status: ContestStatus::Draft,
            teams: Vec::new(),
            melee_players: Vec::new(),
            rounds: Vec::new(),
            brackets: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn team_mut(&mut self, id: TeamId) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| t.id == id)
    }

    pub fn round(&self, number: u8) -> Option<&QualificationRound> {
        self.rounds.iter().find(|r| r.number == number)
    }

    pub fn round_mut(&mut self, number: u8) -> Option<&mut QualificationRound> {
        self.rounds.iter_mut().find(|r| r.number == number)
    }

    pub fn bracket(&self, kind: BracketKind) -> Option<&Bracket> {
        self.brackets.iter().find(|b| b.kind == kind)
    }

    pub fn bracket_mut(&mut self, kind: BracketKind) -> Option<&mut Bracket> {
        self.brackets.iter_mut().find(|b| b.kind == kind)
    }

    pub fn locate_match(&self, id: MatchId) -> Option<MatchLocation> {
        for round in &self.rounds {
            if let Some(index) = round.matches.iter().position(|m| m.id == id) {
                return Some(MatchLocation::Qualification {
                    round: round.number,
                    index,
                });
            }
        }
        self.brackets.iter().find_map(|b| {
            b.match_index(id)
                .map(|index| MatchLocation::Bracket { kind: b.kind, index })
        })
    }

    /// Number of teams drawn into round 1.
    pub fn round_1_entrant_count(&self) -> usize {
        self.round(1)
            .map(|r| r.matches.iter().map(GameMatch::occupant_count).sum())
            .unwrap_or(0)
    }

    /// The team that received the round 1 bye, if the count was odd.
    pub fn round_1_exempted(&self) -> Option<TeamId> {
        self.round(1)?
            .matches
            .iter()
            .find(|m| m.is_bye)
            .and_then(|m| m.home)
    }

    pub fn champion(&self, kind: BracketKind) -> Option<TeamId> {
        self.bracket(kind).and_then(Bracket::champion)
    }

    fn require_draft(&self) -> Result<(), ContestError> {
        if self.status != ContestStatus::Draft {
            return Err(ContestError::InvalidState);
        }
        Ok(())
    }

    /// Register a formed team (Draft only). Player count must match the team type.
    pub fn add_team(
        &mut self,
        name: Option<String>,
        club: Option<String>,
        players: Vec<String>,
    ) -> Result<TeamId, ContestError> {
        self.require_draft()?;
        let players: Vec<String> = players
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        let expected = self.team_type.players_per_team();
        if players.len() != expected {
            return Err(ContestError::InvalidTeamSize {
                expected,
                found: players.len(),
            });
        }
        let number = self.teams.iter().map(|t| t.number).max().unwrap_or(0) + 1;
        let mut team = Team::new(number, players);
        if let Some(name) = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
            team = team.with_name(name);
        }
        if let Some(club) = club.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()) {
            team = team.with_club(club);
        }
        let label = team.label();
        if self.teams.iter().any(|t| t.label().eq_ignore_ascii_case(&label)) {
            return Err(ContestError::DuplicateTeamName);
        }
        let id = team.id;
        self.teams.push(team);
        Ok(id)
    }

    /// Remove a team by id (Draft only).
    pub fn remove_team(&mut self, team_id: TeamId) -> Result<(), ContestError> {
        self.require_draft()?;
        let idx = self
            .teams
            .iter()
            .position(|t| t.id == team_id)
            .ok_or(ContestError::TeamNotFound(team_id))?;
        self.teams.remove(idx);
        Ok(())
    }

    /// Register a single player for a melee contest (Draft only).
    pub fn add_melee_player(&mut self, name: impl Into<String>) -> Result<PlayerId, ContestError> {
        self.require_draft()?;
        if self.game_mode != GameMode::Melee {
            return Err(ContestError::InvalidState);
        }
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(ContestError::EmptyName);
        }
        let player = MeleePlayer::new(name);
        let id = player.id;
        self.melee_players.push(player);
        Ok(id)
    }

    pub fn remove_melee_player(&mut self, player_id: PlayerId) -> Result<(), ContestError> {
        self.require_draft()?;
        let idx = self
            .melee_players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(ContestError::PlayerNotFound(player_id))?;
        self.melee_players.remove(idx);
        Ok(())
    }
}
