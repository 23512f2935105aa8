//! Data structures for a petanque contest: teams, matches, brackets, contest state.

mod bracket;
mod contest;
mod game;
mod team;

pub use bracket::{Bracket, BracketKind, BracketRound};
pub use contest::{
    Contest, ContestError, ContestId, ContestStatus, GameMode, MatchLocation, QualificationRound,
};
pub use game::{GameMatch, Group, MatchId, MatchStatus, Slot};
pub use team::{MeleePlayer, PlayerId, Team, TeamId, TeamStatus, TeamType};
