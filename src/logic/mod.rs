//! Contest business logic: qualification, brackets, live propagation, draw, results.

mod bracket;
mod draw;
mod propagation;
mod qualification;
mod registration;
mod results;
mod shuffle;

pub use bracket::{bracket_skeleton, build_bracket, round_name, BracketLayout};
pub use draw::{generate_draw, DrawSummary, MIN_TEAMS};
pub use propagation::{
    check_round_2_completion, forward_winner, place_in_bracket, place_in_round_2, Placement,
};
pub use qualification::{
    bye_candidates, classify_round_1, pair_round_1, pair_round_2, qualify, Qualification,
    Round1Outcome,
};
pub use registration::import_teams_csv;
pub use results::report_result;
pub use shuffle::{pick, shuffled};
