//! Qualification stage: round 1 pairing, classification, round 2 groups and the A/B split.

mod common;

use common::{ids, rng};
use petanque_contest_web::{
    bye_candidates, classify_round_1, pair_round_1, pair_round_2, qualify, ContestError,
    GameMatch, Group, Round1Outcome, TeamId,
};
use std::collections::HashSet;

fn sorted(mut v: Vec<TeamId>) -> Vec<TeamId> {
    v.sort();
    v
}

/// Home team wins every ordinary match.
fn home_wins(matches: &mut [GameMatch]) {
    for m in matches.iter_mut().filter(|m| !m.is_bye) {
        let home = m.home.unwrap();
        m.record_result(home).unwrap();
    }
}

fn in_group(matches: &[GameMatch], group: Group) -> Vec<&GameMatch> {
    matches.iter().filter(|m| m.group == Some(group)).collect()
}

#[test]
fn round_1_pairs_every_team_once() {
    for n in 2..=40 {
        let teams = ids(n);
        let matches = pair_round_1(&teams, &mut rng(n as u64)).unwrap();

        assert_eq!(matches.len(), (n + 1) / 2, "n = {n}");
        assert_eq!(matches.iter().filter(|m| m.is_bye).count(), n % 2);
        let placed: Vec<TeamId> = matches.iter().flat_map(|m| m.occupants()).collect();
        assert_eq!(sorted(placed), sorted(teams.clone()));
        for (i, m) in matches.iter().enumerate() {
            assert_eq!(m.number, i as u32 + 1);
            assert!(m.group.is_none());
        }
    }
}

#[test]
fn round_1_bye_is_last_and_already_won() {
    let matches = pair_round_1(&ids(7), &mut rng(3)).unwrap();
    let bye = matches.last().unwrap();
    assert!(bye.is_bye);
    assert!(bye.is_finished());
    assert!(bye.away.is_none());
    assert_eq!(bye.winner, bye.home);
    assert!(matches[..3].iter().all(|m| !m.is_bye && !m.is_finished()));
}

#[test]
fn round_1_needs_two_teams() {
    for n in 0..2 {
        assert_eq!(
            pair_round_1(&ids(n), &mut rng(0)),
            Err(ContestError::InsufficientEntrants {
                required: 2,
                found: n
            })
        );
    }
}

#[test]
fn classify_splits_winners_and_losers() {
    let teams = ids(7);
    let mut matches = pair_round_1(&teams, &mut rng(11)).unwrap();
    home_wins(&mut matches);

    let outcome = classify_round_1(&matches, &teams);
    assert_eq!(outcome.winners.len(), 4);
    assert_eq!(outcome.losers.len(), 3);
    let exempted = matches.last().unwrap().home;
    assert_eq!(outcome.exempted, exempted);
    assert!(outcome.winners.contains(&exempted.unwrap()));
}

#[test]
fn classify_skips_unfinished_matches_and_unknown_teams() {
    let teams = ids(5);
    let mut matches = pair_round_1(&teams, &mut rng(5)).unwrap();

    let outcome = classify_round_1(&matches, &teams);
    assert_eq!(outcome.winners.len(), 1);
    assert!(outcome.losers.is_empty());

    home_wins(&mut matches);
    let dropped = matches[0].away.unwrap();
    let known: Vec<TeamId> = teams.iter().copied().filter(|&t| t != dropped).collect();
    let outcome = classify_round_1(&matches, &known);
    assert_eq!(outcome.winners.len(), 3);
    assert_eq!(outcome.losers.len(), 1);
    assert!(!outcome.losers.contains(&dropped));
}

#[test]
fn round_2_pairs_each_group_separately() {
    let outcome = Round1Outcome {
        winners: ids(5),
        losers: ids(4),
        exempted: None,
    };
    let matches = pair_round_2(&outcome, &mut rng(9));

    let winners = in_group(&matches, Group::Winners);
    let losers = in_group(&matches, Group::Losers);
    assert_eq!(winners.len(), 3);
    assert_eq!(losers.len(), 2);
    assert_eq!(winners.iter().filter(|m| m.is_bye).count(), 1);
    assert!(losers.iter().all(|m| !m.is_bye));

    let numbers: Vec<u32> = matches.iter().map(|m| m.number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5]);

    let in_winners: Vec<TeamId> = winners.iter().flat_map(|m| m.occupants()).collect();
    let in_losers: Vec<TeamId> = losers.iter().flat_map(|m| m.occupants()).collect();
    assert_eq!(sorted(in_winners), sorted(outcome.winners.clone()));
    assert_eq!(sorted(in_losers), sorted(outcome.losers.clone()));
}

#[test]
fn exempted_team_never_gets_a_second_bye() {
    for seed in 0..200 {
        let winners = ids(5);
        let exempted = winners[seed as usize % 5];
        let outcome = Round1Outcome {
            winners,
            losers: ids(4),
            exempted: Some(exempted),
        };
        let matches = pair_round_2(&outcome, &mut rng(seed));
        let bye = matches.iter().find(|m| m.is_bye).unwrap();
        assert_ne!(bye.home, Some(exempted), "seed {seed}");
    }
}

#[test]
fn exempted_team_alone_in_its_group_still_gets_the_bye() {
    let exempted = ids(1)[0];
    let outcome = Round1Outcome {
        winners: vec![exempted],
        losers: Vec::new(),
        exempted: Some(exempted),
    };
    let matches = pair_round_2(&outcome, &mut rng(0));
    assert_eq!(matches.len(), 1);
    assert!(matches[0].is_bye);
    assert_eq!(matches[0].home, Some(exempted));
}

#[test]
fn bye_candidates_exclude_the_exempted_team() {
    let members = ids(3);
    assert_eq!(bye_candidates(&members, Some(members[1])), vec![0, 2]);
    assert_eq!(bye_candidates(&members, None), vec![2]);
    assert_eq!(bye_candidates(&members, Some(ids(1)[0])), vec![2]);
    assert_eq!(bye_candidates(&members[..1], Some(members[0])), vec![0]);
    assert!(bye_candidates(&[], None).is_empty());
}

#[test]
fn qualify_partitions_the_entrants() {
    let teams = ids(9);
    let mut round_1 = pair_round_1(&teams, &mut rng(21)).unwrap();
    home_wins(&mut round_1);
    let outcome = classify_round_1(&round_1, &teams);
    let mut round_2 = pair_round_2(&outcome, &mut rng(22));
    home_wins(&mut round_2);

    let q = qualify(&round_1, &round_2, &teams);
    assert_eq!(q.bracket_a.len(), 3);
    assert_eq!(q.bracket_b.len(), 4);
    assert_eq!(q.eliminated.len(), 2);

    let all: Vec<TeamId> = q
        .bracket_a
        .iter()
        .chain(&q.bracket_b)
        .chain(&q.eliminated)
        .copied()
        .collect();
    assert_eq!(all.iter().collect::<HashSet<_>>().len(), teams.len());
    assert_eq!(sorted(all), sorted(teams));
}

#[test]
fn qualify_counts_a_bye_as_a_win() {
    let teams = ids(3);
    let round_1 = vec![
        {
            let mut m = GameMatch::pairing(1, teams[0], teams[1]);
            m.record_result(teams[0]).unwrap();
            m
        },
        GameMatch::bye(2, teams[2]),
    ];
    let round_2 = vec![
        {
            let mut m = GameMatch::pairing(1, teams[0], teams[2]).in_group(Group::Winners);
            m.record_result(teams[2]).unwrap();
            m
        },
        GameMatch::bye(2, teams[1]).in_group(Group::Losers),
    ];

    let q = qualify(&round_1, &round_2, &teams);
    assert_eq!(q.bracket_a, vec![teams[2]]);
    assert_eq!(sorted(q.bracket_b), sorted(vec![teams[0], teams[1]]));
    assert!(q.eliminated.is_empty());
}
