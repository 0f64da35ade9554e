//! Purse and prize computation.
//!
//! A league carries a purse only when at least one pool is non-zero;
//! everything here treats an absent purse as "all prizes are zero".

use crate::dao::models::{LeagueEntity, PrizeEntity, PurseEntity};

/// Multiplier applied to standings points on non-elevated weeks.
const BASE_MULTIPLIER: f64 = 1.0;
/// Default elevated-week multiplier when the config omits one.
pub const DEFAULT_ELEVATED_MULTIPLIER: f64 = 2.0;

/// Normalise a raw purse: present only if any pool is non-zero.
pub fn normalize(purse: Option<PurseEntity>) -> Option<PurseEntity> {
    purse.filter(|p| p.season_pool > 0 || p.weekly_pool > 0 || p.elevated_pool > 0)
}

/// Whether the league designates `week` as elevated.
pub fn is_elevated(league: &LeagueEntity, week: u32) -> bool {
    league
        .elevated
        .as_ref()
        .is_some_and(|e| e.weeks.contains(&week))
}

/// Standings-point multiplier for `week`.
pub fn multiplier(league: &LeagueEntity, week: u32) -> f64 {
    if !is_elevated(league, week) {
        return BASE_MULTIPLIER;
    }
    league
        .elevated
        .as_ref()
        .map(|e| e.multiplier)
        .filter(|m| *m > 0.0)
        .unwrap_or(DEFAULT_ELEVATED_MULTIPLIER)
}

/// Prize paid to the winner of `week`: the weekly pool, plus the elevated
/// pool when the week is elevated. `None` when nothing would be paid.
pub fn weekly_prize(league: &LeagueEntity, week: u32) -> Option<PrizeEntity> {
    let purse = league.purse.as_ref()?;
    let mut amount = purse.weekly_pool;
    if is_elevated(league, week) {
        amount += purse.elevated_pool;
    }
    (amount > 0).then(|| PrizeEntity {
        amount,
        currency: purse.currency.clone(),
    })
}

/// Championship prize paid once at season completion.
pub fn season_prize(league: &LeagueEntity) -> Option<PrizeEntity> {
    let purse = league.purse.as_ref()?;
    (purse.season_pool > 0).then(|| PrizeEntity {
        amount: purse.season_pool,
        currency: purse.currency.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::ElevatedEntity;
    use crate::engine::season::tests::league_fixture;

    fn with_purse(purse: PurseEntity, elevated_weeks: Vec<u32>) -> LeagueEntity {
        let mut league = league_fixture();
        league.purse = Some(purse);
        league.elevated = Some(ElevatedEntity {
            weeks: elevated_weeks,
            multiplier: 2.0,
        });
        league
    }

    #[test]
    fn all_zero_pools_normalise_to_no_purse() {
        let purse = PurseEntity {
            season_pool: 0,
            weekly_pool: 0,
            elevated_pool: 0,
            currency: "USD".into(),
        };
        assert!(normalize(Some(purse)).is_none());
    }

    #[test]
    fn elevated_week_adds_bonus_pool() {
        let league = with_purse(
            PurseEntity {
                season_pool: 500,
                weekly_pool: 25,
                elevated_pool: 75,
                currency: "USD".into(),
            },
            vec![3],
        );

        assert_eq!(weekly_prize(&league, 1).unwrap().amount, 25);
        assert_eq!(weekly_prize(&league, 3).unwrap().amount, 100);
        assert_eq!(season_prize(&league).unwrap().amount, 500);
    }

    #[test]
    fn multiplier_defaults_on_elevated_weeks_only() {
        let mut league = with_purse(
            PurseEntity {
                season_pool: 0,
                weekly_pool: 10,
                elevated_pool: 0,
                currency: "USD".into(),
            },
            vec![2],
        );
        assert_eq!(multiplier(&league, 1), 1.0);
        assert_eq!(multiplier(&league, 2), 2.0);

        // A zeroed multiplier falls back to the default rather than
        // wiping the week's points.
        league.elevated.as_mut().unwrap().multiplier = 0.0;
        assert_eq!(multiplier(&league, 2), DEFAULT_ELEVATED_MULTIPLIER);
    }

    #[test]
    fn no_purse_means_no_prizes() {
        let league = league_fixture();
        assert!(weekly_prize(&league, 1).is_none());
        assert!(season_prize(&league).is_none());
    }
}
