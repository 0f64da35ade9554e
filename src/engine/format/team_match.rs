//! Team-match week resolution: each configured matchup compares the two
//! rosters' combined net totals; lower wins, equal totals tie.

use std::collections::HashMap;

use uuid::Uuid;

use crate::dao::models::{
    MatchupEntity, MatchupResultEntity, ScoreEntity, TeamDelta, TeamEntity,
};

/// Resolve every matchup of a week against the approved scores.
///
/// Only roster members with a complete round contribute to a side's total;
/// a side with no scored member has no total, and a matchup where neither
/// side scored is recorded with no winner and no stat changes.
pub fn resolve_matchups(
    matchups: &[MatchupEntity],
    teams: &[TeamEntity],
    scores: &[ScoreEntity],
) -> Vec<MatchupResultEntity> {
    let rosters: HashMap<Uuid, &TeamEntity> = teams.iter().map(|t| (t.id, t)).collect();
    let nets: HashMap<Uuid, i32> = scores
        .iter()
        .filter_map(|s| s.net_total.map(|net| (s.user_id, net)))
        .collect();

    matchups
        .iter()
        .map(|matchup| {
            let home = side_total(rosters.get(&matchup.home_team_id), &nets);
            let away = side_total(rosters.get(&matchup.away_team_id), &nets);

            let (winner_team_id, tie) = match (home, away) {
                (None, None) => (None, false),
                (Some(_), None) => (Some(matchup.home_team_id), false),
                (None, Some(_)) => (Some(matchup.away_team_id), false),
                (Some(h), Some(a)) => {
                    if h == a {
                        (None, true)
                    } else if h < a {
                        (Some(matchup.home_team_id), false)
                    } else {
                        (Some(matchup.away_team_id), false)
                    }
                }
            };

            MatchupResultEntity {
                home_team_id: matchup.home_team_id,
                away_team_id: matchup.away_team_id,
                home_total: home,
                away_total: away,
                winner_team_id,
                tie,
            }
        })
        .collect()
}

/// Combined net total for one side. The scored-member count distinguishes
/// a genuinely empty side from a side summing to zero.
fn side_total(team: Option<&&TeamEntity>, nets: &HashMap<Uuid, i32>) -> Option<i32> {
    let team = team?;
    let mut total = 0i32;
    let mut scored = 0usize;
    for member_id in &team.member_ids {
        if let Some(net) = nets.get(member_id) {
            total += net;
            scored += 1;
        }
    }
    (scored > 0).then_some(total)
}

/// The week's announced winner: the decisive winning team with the lowest
/// winning total across all matchups.
pub fn overall_winner(outcomes: &[MatchupResultEntity]) -> Option<(Uuid, i32)> {
    outcomes
        .iter()
        .filter_map(|outcome| {
            let winner = outcome.winner_team_id?;
            let total = if winner == outcome.home_team_id {
                outcome.home_total
            } else {
                outcome.away_total
            }?;
            Some((winner, total))
        })
        .min_by_key(|(_, total)| *total)
}

/// Counter increments per team from the resolved matchups.
///
/// Win: `wins + 1` and `points_per_win × multiplier` for the winner,
/// `losses + 1` for the loser. Tie: both sides `ties + 1` and
/// `points_per_tie × multiplier`. No-score matchups change nothing.
pub fn team_deltas(
    outcomes: &[MatchupResultEntity],
    points_per_win: u32,
    points_per_tie: u32,
    multiplier: f64,
) -> Vec<(Uuid, TeamDelta)> {
    let win_points = (points_per_win as f64 * multiplier).round() as u32;
    let tie_points = (points_per_tie as f64 * multiplier).round() as u32;

    let mut deltas: Vec<(Uuid, TeamDelta)> = Vec::new();
    for outcome in outcomes {
        if outcome.tie {
            for team_id in [outcome.home_team_id, outcome.away_team_id] {
                deltas.push((
                    team_id,
                    TeamDelta {
                        ties: 1,
                        points: tie_points,
                        ..TeamDelta::default()
                    },
                ));
            }
        } else if let Some(winner) = outcome.winner_team_id {
            let loser = if winner == outcome.home_team_id {
                outcome.away_team_id
            } else {
                outcome.home_team_id
            };
            deltas.push((
                winner,
                TeamDelta {
                    wins: 1,
                    points: win_points,
                    ..TeamDelta::default()
                },
            ));
            deltas.push((
                loser,
                TeamDelta {
                    losses: 1,
                    ..TeamDelta::default()
                },
            ));
        }
    }
    deltas
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::dao::models::ScoreStatus;

    fn team(league_id: Uuid, name: &str, members: Vec<Uuid>) -> TeamEntity {
        TeamEntity {
            id: Uuid::new_v4(),
            league_id,
            name: name.into(),
            member_ids: members,
            wins: 0,
            losses: 0,
            ties: 0,
            total_points: 0,
        }
    }

    fn score(user_id: Uuid, net: i32) -> ScoreEntity {
        ScoreEntity {
            id: Uuid::new_v4(),
            league_id: Uuid::nil(),
            user_id,
            week: 1,
            course_id: "course".into(),
            tee_id: "white".into(),
            course_handicap: 0,
            holes: vec![],
            gross_total: Some(net as u32),
            net_total: Some(net),
            status: ScoreStatus::Approved,
            submitted_at: Utc::now(),
        }
    }

    fn matchup(league_id: Uuid, home: &TeamEntity, away: &TeamEntity) -> MatchupEntity {
        MatchupEntity {
            league_id,
            week: 1,
            home_team_id: home.id,
            away_team_id: away.id,
        }
    }

    #[test]
    fn equal_totals_with_scores_on_both_sides_tie() {
        let league_id = Uuid::new_v4();
        let (p1, p2, p3, p4) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let x = team(league_id, "X", vec![p1, p2]);
        let y = team(league_id, "Y", vec![p3, p4]);
        let scores = vec![score(p1, 70), score(p2, 74), score(p3, 72), score(p4, 72)];

        let outcomes = resolve_matchups(
            &[matchup(league_id, &x, &y)],
            &[x.clone(), y.clone()],
            &scores,
        );
        assert_eq!(outcomes[0].home_total, Some(144));
        assert_eq!(outcomes[0].away_total, Some(144));
        assert_eq!(outcomes[0].winner_team_id, None);
        assert!(outcomes[0].tie);

        let deltas = team_deltas(&outcomes, 3, 1, 2.0);
        assert_eq!(deltas.len(), 2);
        for (team_id, delta) in &deltas {
            assert!(*team_id == x.id || *team_id == y.id);
            assert_eq!(delta.ties, 1);
            assert_eq!(delta.points, 2);
            assert_eq!(delta.wins, 0);
            assert_eq!(delta.losses, 0);
        }
    }

    #[test]
    fn lower_total_wins_and_loser_only_counts_a_loss() {
        let league_id = Uuid::new_v4();
        let (p1, p2) = (Uuid::new_v4(), Uuid::new_v4());
        let x = team(league_id, "X", vec![p1]);
        let y = team(league_id, "Y", vec![p2]);
        let scores = vec![score(p1, 68), score(p2, 75)];

        let outcomes = resolve_matchups(
            &[matchup(league_id, &x, &y)],
            &[x.clone(), y.clone()],
            &scores,
        );
        assert_eq!(outcomes[0].winner_team_id, Some(x.id));

        let deltas = team_deltas(&outcomes, 3, 1, 1.0);
        let winner = deltas.iter().find(|(id, _)| *id == x.id).unwrap();
        let loser = deltas.iter().find(|(id, _)| *id == y.id).unwrap();
        assert_eq!(winner.1.wins, 1);
        assert_eq!(winner.1.points, 3);
        assert_eq!(loser.1.losses, 1);
        assert_eq!(loser.1.points, 0);
    }

    #[test]
    fn silent_matchup_is_recorded_with_no_winner_or_deltas() {
        let league_id = Uuid::new_v4();
        let x = team(league_id, "X", vec![Uuid::new_v4()]);
        let y = team(league_id, "Y", vec![Uuid::new_v4()]);

        let outcomes =
            resolve_matchups(&[matchup(league_id, &x, &y)], &[x.clone(), y.clone()], &[]);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].winner_team_id, None);
        assert!(!outcomes[0].tie);
        assert_eq!(outcomes[0].home_total, None);
        assert_eq!(outcomes[0].away_total, None);
        assert!(team_deltas(&outcomes, 3, 1, 1.0).is_empty());
    }

    #[test]
    fn one_sided_matchup_goes_to_the_side_that_played() {
        let league_id = Uuid::new_v4();
        let p1 = Uuid::new_v4();
        let x = team(league_id, "X", vec![p1]);
        let y = team(league_id, "Y", vec![Uuid::new_v4()]);
        let scores = vec![score(p1, 90)];

        let outcomes = resolve_matchups(
            &[matchup(league_id, &x, &y)],
            &[x.clone(), y.clone()],
            &scores,
        );
        assert_eq!(outcomes[0].winner_team_id, Some(x.id));
        assert_eq!(outcomes[0].away_total, None);
    }

    #[test]
    fn overall_winner_takes_the_lowest_decisive_total() {
        let league_id = Uuid::new_v4();
        let (p1, p2, p3, p4) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let a = team(league_id, "A", vec![p1]);
        let b = team(league_id, "B", vec![p2]);
        let c = team(league_id, "C", vec![p3]);
        let d = team(league_id, "D", vec![p4]);
        let scores = vec![score(p1, 70), score(p2, 80), score(p3, 65), score(p4, 77)];
        let teams = vec![a.clone(), b.clone(), c.clone(), d.clone()];
        let matchups = vec![matchup(league_id, &a, &b), matchup(league_id, &c, &d)];

        let outcomes = resolve_matchups(&matchups, &teams, &scores);
        let (winner, total) = overall_winner(&outcomes).unwrap();
        assert_eq!(winner, c.id);
        assert_eq!(total, 65);
    }
}
