//! Petanque contest web app: library with models, draw and propagation logic, storage and API.

pub mod api;
pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use config::ServerConfig;
pub use logic::{
    bracket_skeleton, build_bracket, bye_candidates, check_round_2_completion, classify_round_1,
    forward_winner, generate_draw, import_teams_csv, pair_round_1, pair_round_2, place_in_bracket,
    place_in_round_2, qualify, report_result, round_name, BracketLayout, DrawSummary, Placement,
    Qualification, Round1Outcome, MIN_TEAMS,
};
pub use models::{
    Bracket, BracketKind, BracketRound, Contest, ContestError, ContestId, ContestStatus,
    GameMatch, GameMode, Group, MatchId, MatchLocation, MatchStatus, MeleePlayer, PlayerId,
    QualificationRound, Slot, Team, TeamId, TeamStatus, TeamType,
};
pub use store::{ContestStore, ContestSummary};
