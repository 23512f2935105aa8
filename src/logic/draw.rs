//! Draw: turn a Draft contest into the full skeleton (round 1 played out, round 2 and
//! both brackets empty) so matches can be played without waiting for a whole round.

use crate::logic::bracket::bracket_skeleton;
use crate::logic::propagation::place_in_round_2;
use crate::logic::qualification::pair_round_1;
use crate::logic::shuffle::shuffled;
use crate::models::{
    BracketKind, Contest, ContestError, ContestStatus, GameMatch, GameMode, Group,
    QualificationRound, Team, TeamId,
};
use rand::Rng;
use serde::Serialize;

/// Fewest teams a contest can be drawn with.
pub const MIN_TEAMS: usize = 3;

/// Sizes of the structures created by a draw.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct DrawSummary {
    pub teams: usize,
    pub round_1_matches: usize,
    pub round_2_winners_matches: usize,
    pub round_2_losers_matches: usize,
    pub bracket_a_teams: usize,
    pub bracket_b_teams: usize,
}

/// Generate the draw (Draft only). Melee contests first get their teams drawn from the
/// registered players.
///
/// With `n` teams, round 1 yields `W = ceil(n/2)` winners and `L = floor(n/2)` losers.
/// Round 2 gets `ceil(W/2)` winners matches and `ceil(L/2)` losers matches; bracket A
/// is sized for `ceil(W/2)` teams and bracket B for `floor(W/2) + ceil(L/2)`.
pub fn generate_draw<R: Rng + ?Sized>(
    contest: &mut Contest,
    rng: &mut R,
) -> Result<DrawSummary, ContestError> {
    if contest.status != ContestStatus::Draft {
        return Err(ContestError::InvalidState);
    }
    if contest.game_mode == GameMode::Melee {
        contest.teams = form_melee_teams(contest, rng)?;
    }

    let teams: Vec<TeamId> = contest
        .teams
        .iter()
        .filter(|t| !t.is_eliminated())
        .map(|t| t.id)
        .collect();
    if teams.len() < MIN_TEAMS {
        return Err(ContestError::InsufficientEntrants {
            required: MIN_TEAMS,
            found: teams.len(),
        });
    }

    let n = teams.len();
    let round_1 = pair_round_1(&teams, rng)?;
    let winners = (n + 1) / 2;
    let losers = n / 2;
    let winners_matches = (winners + 1) / 2;
    let losers_matches = (losers + 1) / 2;

    let round_2: Vec<GameMatch> = (0..winners_matches)
        .map(|_| Group::Winners)
        .chain((0..losers_matches).map(|_| Group::Losers))
        .enumerate()
        .map(|(i, group)| GameMatch::empty(i as u32 + 1).in_group(group))
        .collect();

    let summary = DrawSummary {
        teams: n,
        round_1_matches: round_1.len(),
        round_2_winners_matches: winners_matches,
        round_2_losers_matches: losers_matches,
        bracket_a_teams: (winners + 1) / 2,
        bracket_b_teams: winners / 2 + (losers + 1) / 2,
    };

    let exempted = round_1.iter().find(|m| m.is_bye).and_then(|m| m.home);
    contest.rounds = vec![
        QualificationRound::new(1, round_1),
        QualificationRound::new(2, round_2),
    ];
    contest.brackets = [
        bracket_skeleton(BracketKind::A, summary.bracket_a_teams),
        bracket_skeleton(BracketKind::B, summary.bracket_b_teams),
    ]
    .into_iter()
    .flatten()
    .collect();

    if let Some(team) = exempted {
        place_in_round_2(contest, team, Group::Winners, rng)?.required(team)?;
    }

    contest.status = ContestStatus::InProgress;
    log::info!(
        "Draw generated for contest {}: {} teams, {} round 1 matches, brackets A={} B={}",
        contest.id,
        n,
        summary.round_1_matches,
        summary.bracket_a_teams,
        summary.bracket_b_teams
    );
    Ok(summary)
}

/// Shuffle the melee players and cut them into teams. Players left over after the last
/// full team are not drawn.
fn form_melee_teams<R: Rng + ?Sized>(
    contest: &Contest,
    rng: &mut R,
) -> Result<Vec<Team>, ContestError> {
    let per_team = contest.team_type.players_per_team();
    let players = &contest.melee_players;
    if players.len() / per_team < MIN_TEAMS {
        return Err(ContestError::InsufficientEntrants {
            required: MIN_TEAMS * per_team,
            found: players.len(),
        });
    }

    let order = shuffled(players, rng);
    let teams: Vec<Team> = order
        .chunks_exact(per_team)
        .enumerate()
        .map(|(i, chunk)| {
            let names = chunk.iter().map(|p| p.name.clone()).collect();
            Team::new(i as u32 + 1, names)
        })
        .collect();

    let leftover = players.len() % per_team;
    if leftover > 0 {
        log::warn!(
            "{} melee player(s) left without a team in contest {}",
            leftover,
            contest.id
        );
    }
    Ok(teams)
}
