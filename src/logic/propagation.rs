//! Live slot filling: as soon as one match resolves, its teams move into a random open
//! slot of the next structure (round 2, bracket A or bracket B).
//!
//! Every function here reads the current state before writing, so calling it again
//! with the same finished match changes nothing.

use crate::logic::shuffle::pick;
use crate::models::{
    Bracket, BracketKind, Contest, ContestError, GameMatch, Group, MatchId, Slot, TeamId,
};
use rand::Rng;

/// What a placement attempt did.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Placement {
    /// The team now sits in `slot` of `match_id` (after any bye advance).
    Placed { match_id: MatchId, slot: Slot },
    /// The team already occupied a slot of the structure.
    AlreadyPlaced,
    /// No open slot; nothing changed.
    NoOpenSlot,
}

impl Placement {
    /// Fail when `team` found no slot, so a result never commits with a team left out.
    pub fn required(self, team: TeamId) -> Result<Placement, ContestError> {
        match self {
            Placement::NoOpenSlot => Err(ContestError::NoOpenSlot { team }),
            placed => Ok(placed),
        }
    }
}

/// Number of teams a round 2 group will hold once round 1 is over.
fn expected_group_size(contest: &Contest, group: Group) -> usize {
    let n = contest.round_1_entrant_count();
    match group {
        Group::Winners => (n + 1) / 2,
        Group::Losers => n / 2,
    }
}

/// True if putting `team` at (`idx`, `slot`) leaves `exempted` alone in its match.
fn leaves_alone(
    matches: &[GameMatch],
    group: Group,
    exempted: TeamId,
    team: TeamId,
    idx: usize,
    slot: Slot,
) -> bool {
    if team == exempted {
        let other = match slot {
            Slot::Home => Slot::Away,
            Slot::Away => Slot::Home,
        };
        return matches[idx].occupant(other).is_none();
    }
    let own = matches
        .iter()
        .position(|m| m.group == Some(group) && !m.is_bye && m.contains(exempted));
    match own {
        Some(i) => i != idx && matches[i].occupant_count() == 1,
        None => false,
    }
}

/// Drop candidates that would hand the round 1 bye team a second bye. Only the last
/// placement of a group decides which slot stays empty, so earlier ones are untouched.
/// If every candidate is excluded the filter yields.
fn avoid_repeat_bye(
    matches: &[GameMatch],
    group: Group,
    candidates: Vec<(usize, Slot)>,
    team: TeamId,
    exempted: Option<TeamId>,
    expected: usize,
) -> Vec<(usize, Slot)> {
    let Some(exempted) = exempted else {
        return candidates;
    };
    let placed: usize = matches
        .iter()
        .filter(|m| m.group == Some(group))
        .map(GameMatch::occupant_count)
        .sum();
    if placed + 1 != expected {
        return candidates;
    }
    let allowed: Vec<(usize, Slot)> = candidates
        .iter()
        .copied()
        .filter(|&(idx, slot)| !leaves_alone(matches, group, exempted, team, idx, slot))
        .collect();
    if allowed.is_empty() {
        candidates
    } else {
        allowed
    }
}

/// Put `team` into a uniformly random open slot of its round 2 group.
pub fn place_in_round_2<R: Rng + ?Sized>(
    contest: &mut Contest,
    team: TeamId,
    group: Group,
    rng: &mut R,
) -> Result<Placement, ContestError> {
    let exempted = contest.round_1_exempted();
    let expected = expected_group_size(contest, group);
    let Some(round_2) = contest.round_mut(2) else {
        log::warn!("No round 2 to place team {} into", team);
        return Ok(Placement::NoOpenSlot);
    };

    if round_2.group_matches(group).any(|(_, m)| m.contains(team)) {
        return Ok(Placement::AlreadyPlaced);
    }

    let candidates: Vec<(usize, Slot)> = round_2
        .group_matches(group)
        .filter(|(_, m)| !m.is_bye && !m.is_finished())
        .flat_map(|(i, m)| m.open_slots().into_iter().map(move |s| (i, s)))
        .collect();
    let candidates =
        avoid_repeat_bye(&round_2.matches, group, candidates, team, exempted, expected);

    let Some((idx, slot)) = pick(&candidates, rng) else {
        log::warn!("No open round 2 slot for team {} in {:?} group", team, group);
        return Ok(Placement::NoOpenSlot);
    };
    let m = &mut round_2.matches[idx];
    m.fill(slot, team);
    log::debug!("Team {} placed in round 2 match {} ({:?})", team, m.number, slot);
    Ok(Placement::Placed {
        match_id: m.id,
        slot,
    })
}

/// Move the winner of match `from` into the first open slot of its successor, home
/// first. Returns where the winner ended up, if it moved.
///
/// Byes only exist in round 1 and round 1 is nobody's successor, so a single step is
/// all a bye winner needs. A successor already holding the winner is left alone. A full
/// successor is a corrupt structure and is reported rather than overwritten.
pub fn forward_winner(
    bracket: &mut Bracket,
    from: usize,
) -> Result<Option<(usize, Slot)>, ContestError> {
    let m = &bracket.matches[from];
    let (Some(winner), Some(next)) = (m.winner, m.next_match) else {
        return Ok(None);
    };
    let successor = &mut bracket.matches[next];
    if successor.home == Some(winner) {
        return Ok(Some((next, Slot::Home)));
    }
    if successor.away == Some(winner) {
        return Ok(Some((next, Slot::Away)));
    }
    let slot = successor
        .first_open_slot()
        .ok_or(ContestError::StructureInconsistency {
            match_id: successor.id,
        })?;
    successor.fill(slot, winner);
    log::debug!("Team {} advanced to match {} ({:?})", winner, successor.number, slot);
    Ok(Some((next, slot)))
}

/// Put `team` into bracket `kind`: a random open slot of an ordinary round 1 match
/// first, else a random round 1 bye (which finishes at once and advances the team),
/// else the first open slot of a later round.
pub fn place_in_bracket<R: Rng + ?Sized>(
    contest: &mut Contest,
    team: TeamId,
    kind: BracketKind,
    rng: &mut R,
) -> Result<Placement, ContestError> {
    let Some(bracket) = contest.bracket_mut(kind) else {
        log::warn!("No bracket {:?} to place team {} into", kind, team);
        return Ok(Placement::NoOpenSlot);
    };
    if bracket.contains(team) {
        return Ok(Placement::AlreadyPlaced);
    }

    let mut regular: Vec<(usize, Slot)> = Vec::new();
    let mut byes: Vec<usize> = Vec::new();
    for (idx, m) in bracket.round_matches(0) {
        if m.is_finished() {
            continue;
        }
        if m.is_bye {
            if m.home.is_none() {
                byes.push(idx);
            }
        } else {
            regular.extend(m.open_slots().into_iter().map(|s| (idx, s)));
        }
    }

    if let Some((idx, slot)) = pick(&regular, rng) {
        let m = &mut bracket.matches[idx];
        m.fill(slot, team);
        log::debug!(
            "Team {} placed in bracket {:?} match {} ({:?})",
            team,
            kind,
            m.number,
            slot
        );
        return Ok(Placement::Placed { match_id: m.id, slot });
    }

    if let Some(idx) = pick(&byes, rng) {
        bracket.matches[idx].fill_bye(team);
        log::debug!("Team {} takes a bye in bracket {:?}", team, kind);
        let (at, slot) = forward_winner(bracket, idx)?.unwrap_or((idx, Slot::Home));
        return Ok(Placement::Placed {
            match_id: bracket.matches[at].id,
            slot,
        });
    }

    let fallback = (1..bracket.rounds.len()).find_map(|r| {
        bracket
            .round_matches(r)
            .filter(|(_, m)| !m.is_finished())
            .find_map(|(idx, m)| m.first_open_slot().map(|s| (idx, s)))
    });
    if let Some((idx, slot)) = fallback {
        log::warn!("Bracket {:?} round 1 full; team {} placed in a later round", kind, team);
        let m = &mut bracket.matches[idx];
        m.fill(slot, team);
        return Ok(Placement::Placed { match_id: m.id, slot });
    }

    log::warn!("No open slot for team {} in bracket {:?}", team, kind);
    Ok(Placement::NoOpenSlot)
}

/// Once round 1 is over, settle round 2: drop matches nobody was placed in, turn
/// single-team matches into byes and send those teams to their bracket. When round 2 is
/// then entirely finished, forward every winner and eliminate the losers-group losers.
pub fn check_round_2_completion<R: Rng + ?Sized>(
    contest: &mut Contest,
    rng: &mut R,
) -> Result<(), ContestError> {
    if !contest.round(1).map_or(false, |r| r.is_complete()) {
        return Ok(());
    }
    let Some(round_2) = contest.round_mut(2) else {
        return Ok(());
    };

    let before = round_2.matches.len();
    round_2.matches.retain(|m| m.is_bye || m.occupant_count() > 0);
    let removed = before - round_2.matches.len();
    if removed > 0 {
        log::warn!("Removed {} empty round 2 match(es)", removed);
    }

    let byes: Vec<(TeamId, Option<Group>)> = round_2
        .matches
        .iter_mut()
        .filter(|m| !m.is_bye && !m.is_finished())
        .filter_map(|m| m.convert_to_bye().map(|team| (team, m.group)))
        .collect();
    for (team, group) in byes {
        if let Some(group) = group {
            log::debug!("Team {} gets a round 2 bye ({:?} group)", team, group);
            place_in_bracket(contest, team, group.winner_bracket(), rng)?.required(team)?;
        }
    }

    let Some(round_2) = contest.round(2).filter(|r| r.is_complete()) else {
        return Ok(());
    };
    let results: Vec<(Option<Group>, Option<TeamId>, Option<TeamId>)> = round_2
        .matches
        .iter()
        .map(|m| (m.group, m.winner, m.loser))
        .collect();
    for (group, winner, loser) in results {
        let Some(group) = group else { continue };
        if let Some(w) = winner {
            place_in_bracket(contest, w, group.winner_bracket(), rng)?.required(w)?;
        }
        if group == Group::Losers {
            if let Some(team) = loser.and_then(|l| contest.team_mut(l)) {
                team.eliminate();
            }
        }
    }
    log::info!("Qualification complete for contest {}", contest.id);
    Ok(())
}
