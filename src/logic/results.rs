//! Result reporting: record one match result and run the propagation it triggers.

use crate::logic::propagation::{
    check_round_2_completion, forward_winner, place_in_bracket, place_in_round_2,
};
use crate::models::{
    BracketKind, Contest, ContestError, ContestStatus, GameMatch, Group, MatchId, MatchLocation,
    TeamId,
};
use rand::Rng;

/// Record `winner` for match `match_id` and propagate.
///
/// - Round 1: winner to the round 2 winners group, loser to the losers group.
/// - Round 2 winners group: winner to bracket A, loser to bracket B.
/// - Round 2 losers group: winner to bracket B, loser eliminated.
/// - Bracket: winner to the successor match.
///
/// A team with nowhere to go fails the whole report with `NoOpenSlot`.
/// Run inside one contest transaction: on error, the caller must discard the contest.
pub fn report_result<R: Rng + ?Sized>(
    contest: &mut Contest,
    match_id: MatchId,
    winner: TeamId,
    rng: &mut R,
) -> Result<GameMatch, ContestError> {
    let location = contest
        .locate_match(match_id)
        .ok_or(ContestError::MatchNotFound)?;

    match location {
        MatchLocation::Qualification { round, index } => {
            let m = &mut contest
                .round_mut(round)
                .ok_or(ContestError::MatchNotFound)?
                .matches[index];
            let loser = m.record_result(winner)?;
            let (group, snapshot) = (m.group, m.clone());
            log::info!("Round {} match {} won by {}", round, snapshot.number, winner);

            if round == 1 {
                place_in_round_2(contest, winner, Group::Winners, rng)?.required(winner)?;
                place_in_round_2(contest, loser, Group::Losers, rng)?.required(loser)?;
            } else if let Some(group) = group {
                place_in_bracket(contest, winner, group.winner_bracket(), rng)?.required(winner)?;
                match group {
                    Group::Winners => {
                        place_in_bracket(contest, loser, BracketKind::B, rng)?.required(loser)?;
                    }
                    Group::Losers => {
                        if let Some(team) = contest.team_mut(loser) {
                            team.eliminate();
                        }
                    }
                }
            }
            check_round_2_completion(contest, rng)?;
            update_status(contest);
            Ok(snapshot)
        }
        MatchLocation::Bracket { kind, index } => {
            let bracket = contest
                .bracket_mut(kind)
                .ok_or(ContestError::MatchNotFound)?;
            bracket.matches[index].record_result(winner)?;
            forward_winner(bracket, index)?;
            let snapshot = bracket.matches[index].clone();
            if let Some(champion) = bracket.champion() {
                log::info!("Bracket {:?} won by {}", kind, champion);
            }
            update_status(contest);
            Ok(snapshot)
        }
    }
}

/// Mark the contest finished once every bracket has a champion.
fn update_status(contest: &mut Contest) {
    if !contest.brackets.is_empty() && contest.brackets.iter().all(|b| b.is_complete()) {
        contest.status = ContestStatus::Finished;
    }
}
