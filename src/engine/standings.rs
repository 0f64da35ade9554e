//! Cumulative standings math: week points, member deltas, and tie-aware
//! position assignment.

use uuid::Uuid;

use crate::dao::models::{MemberEntity, MemberPosition, MemberWeekDelta};

/// One line of a week's ranked result, ascending by net score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedScore {
    /// The member's user id.
    pub user_id: Uuid,
    /// Display name carried into snapshots and notifications.
    pub display_name: String,
    /// Net total for the round.
    pub net: i32,
    /// Gross total for the round.
    pub gross: u32,
}

/// Standings points for rank `rank` (0-based) of `scored` members:
/// `max(scored − rank, 1)` scaled by the week's multiplier.
pub fn week_points(rank: usize, scored: usize, multiplier: f64) -> u32 {
    let base = scored.saturating_sub(rank).max(1);
    (base as f64 * multiplier).round() as u32
}

/// Build each ranked member's week delta. Rank 0 is the week winner.
pub fn member_deltas(ranked: &[RankedScore], week: u32, multiplier: f64) -> Vec<MemberWeekDelta> {
    ranked
        .iter()
        .enumerate()
        .map(|(rank, line)| MemberWeekDelta {
            week,
            placement: rank as u32 + 1,
            points: week_points(rank, ranked.len(), multiplier),
            net: line.net,
            gross: line.gross,
            won_week: rank == 0,
        })
        .collect()
}

/// Recompute table positions from cumulative points, descending.
///
/// Equal totals share a position number and the next distinct total takes
/// `index + 1`, so totals `[50, 50, 40]` produce positions `[1, 1, 3]`.
/// Each member's previous position is snapshotted from the entity as it
/// was read, before this pass wrote anything.
pub fn assign_positions(members: &[MemberEntity]) -> Vec<MemberPosition> {
    let mut ordered: Vec<&MemberEntity> = members.iter().collect();
    ordered.sort_by(|a, b| b.total_points.cmp(&a.total_points));

    let mut positions = Vec::with_capacity(ordered.len());
    let mut last_points: Option<u32> = None;
    let mut last_position = 0u32;

    for (index, member) in ordered.iter().enumerate() {
        let position = match last_points {
            Some(points) if points == member.total_points => last_position,
            _ => index as u32 + 1,
        };
        last_points = Some(member.total_points);
        last_position = position;

        positions.push(MemberPosition {
            user_id: member.user_id,
            position,
            previous_position: member.position,
        });
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(points: u32, position: Option<u32>) -> MemberEntity {
        MemberEntity {
            league_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            display_name: "player".into(),
            status: "active".into(),
            total_points: points,
            net_sum: 0,
            gross_sum: 0,
            rounds_played: 0,
            wins: 0,
            position,
            previous_position: None,
            weekly: Default::default(),
        }
    }

    #[test]
    fn tied_totals_share_a_position_and_skip_the_next() {
        let members = vec![member(50, None), member(40, None), member(50, None)];
        let positions = assign_positions(&members);

        let mut by_points: Vec<(u32, u32)> = members
            .iter()
            .zip(positions.iter())
            .map(|(m, p)| (m.total_points, p.position))
            .collect();
        by_points.sort_by(|a, b| b.0.cmp(&a.0));

        assert_eq!(
            by_points,
            vec![(50, 1), (50, 1), (40, 3)],
            "ties share rank and the counter does not compress"
        );
    }

    #[test]
    fn consecutive_tied_groups_track_the_last_distinct_total() {
        let members = vec![
            member(60, None),
            member(60, None),
            member(50, None),
            member(50, None),
            member(10, None),
        ];
        let mut positions: Vec<u32> = assign_positions(&members)
            .into_iter()
            .map(|p| p.position)
            .collect();
        positions.sort_unstable();
        assert_eq!(positions, vec![1, 1, 3, 3, 5]);
    }

    #[test]
    fn previous_position_snapshots_the_prior_table() {
        let members = vec![member(10, Some(1)), member(90, Some(2))];
        let positions = assign_positions(&members);

        let leader = positions
            .iter()
            .find(|p| p.user_id == members[1].user_id)
            .unwrap();
        assert_eq!(leader.position, 1);
        assert_eq!(leader.previous_position, Some(2));
    }

    #[test]
    fn week_points_floor_at_one_and_scale() {
        assert_eq!(week_points(0, 8, 1.0), 8);
        assert_eq!(week_points(7, 8, 1.0), 1);
        // Last place still earns a point even past the floor boundary.
        assert_eq!(week_points(9, 8, 1.0), 1);
        assert_eq!(week_points(0, 8, 2.0), 16);
        assert_eq!(week_points(2, 4, 1.5), 3);
    }

    #[test]
    fn deltas_mark_only_the_winner() {
        let ranked = vec![
            RankedScore {
                user_id: Uuid::new_v4(),
                display_name: "a".into(),
                net: 68,
                gross: 80,
            },
            RankedScore {
                user_id: Uuid::new_v4(),
                display_name: "b".into(),
                net: 72,
                gross: 84,
            },
        ];
        let deltas = member_deltas(&ranked, 4, 1.0);
        assert!(deltas[0].won_week);
        assert!(!deltas[1].won_week);
        assert_eq!(deltas[0].placement, 1);
        assert_eq!(deltas[1].placement, 2);
        assert_eq!(deltas[0].points, 2);
        assert_eq!(deltas[1].points, 1);
    }
}
