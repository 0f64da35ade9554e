//! The scheduled processor: one entry point invoked by the platform
//! scheduler several times a day.
//!
//! Each tick resolves the canonical-zone dates once, then runs four
//! independent sweeps (announce, activate, remind, complete) over the
//! leagues matching each phase's status/day predicate. Every transition is
//! claimed through a compare-and-set store update before any notification
//! is written, so a repeated tick is a no-op. A failing league is logged
//! and skipped; the next tick retries it because its marker never moved.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    dao::{
        league_store::LeagueStore,
        models::{
            ChampionEntity, LeagueEntity, LeagueFormat, LeagueStatus, MatchupResultEntity,
            MemberEntity, ScoreStatus, TeamEntity, WeekResultEntity, WeekStandingEntity,
        },
    },
    dto::process::TickReport,
    engine::{
        format::{stroke_play, team_match},
        purse,
        season::{self, SeasonStep, TickDates},
        standings,
    },
    error::ServiceError,
    services::notify::{self, LeagueEvent},
    state::SharedState,
};

/// How one league fared in the completion sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WeekOutcome {
    /// Nothing to do, or another tick won the guard.
    Skipped,
    /// Week results applied; the league moved to the next week.
    Advanced,
    /// Week results applied; the season completed.
    Completed,
}

/// Run one processor tick at the given instant.
pub async fn run_tick(
    state: &SharedState,
    now: DateTime<Utc>,
) -> Result<TickReport, ServiceError> {
    let store = state.require_league_store().await?;
    let dates = TickDates::at(now, state.config().utc_offset_hours);
    let ttl_days = state.config().notification_ttl_days;
    let mut report = TickReport::default();

    announce_sweep(&store, &dates, now, ttl_days, &mut report).await;
    activate_sweep(&store, &dates, now, ttl_days, &mut report).await;
    remind_sweep(&store, &dates, now, ttl_days, &mut report).await;
    completion_sweep(&store, &dates, now, ttl_days, &mut report).await;

    info!(
        announced = report.announced,
        activated = report.activated,
        reminded = report.reminded,
        weeks_advanced = report.weeks_advanced,
        seasons_completed = report.seasons_completed,
        failures = report.failures,
        "processor tick finished"
    );
    Ok(report)
}

async fn announce_sweep(
    store: &Arc<dyn LeagueStore>,
    dates: &TickDates,
    now: DateTime<Utc>,
    ttl_days: i64,
    report: &mut TickReport,
) {
    let leagues = match store
        .leagues_starting(LeagueStatus::Upcoming, dates.tomorrow_key())
        .await
    {
        Ok(leagues) => leagues,
        Err(err) => {
            error!(error = %err, "announce sweep query failed");
            report.failures += 1;
            return;
        }
    };

    for league in leagues {
        match announce_league(store, &league, dates, now, ttl_days).await {
            Ok(true) => report.announced += 1,
            Ok(false) => {}
            Err(err) => {
                error!(league_id = %league.id, error = %err, "announce failed");
                report.failures += 1;
            }
        }
    }
}

async fn announce_league(
    store: &Arc<dyn LeagueStore>,
    league: &LeagueEntity,
    dates: &TickDates,
    now: DateTime<Utc>,
    ttl_days: i64,
) -> Result<bool, ServiceError> {
    if !season::announcement_due(league, dates) {
        return Ok(false);
    }
    if !store.claim_start_notice(league.id, dates.today_key()).await? {
        return Ok(false);
    }

    let members = store.active_members(league.id).await?;
    let recipients: Vec<Uuid> = members.iter().map(|m| m.user_id).collect();
    let records = notify::build_notifications(
        &LeagueEvent::StartingTomorrow { league },
        &recipients,
        now,
        ttl_days,
    );
    if !records.is_empty() {
        store.insert_notifications(records).await?;
    }
    info!(league_id = %league.id, members = recipients.len(), "announced season start");
    Ok(true)
}

async fn activate_sweep(
    store: &Arc<dyn LeagueStore>,
    dates: &TickDates,
    now: DateTime<Utc>,
    ttl_days: i64,
    report: &mut TickReport,
) {
    let leagues = match store
        .leagues_starting(LeagueStatus::Upcoming, dates.today_key())
        .await
    {
        Ok(leagues) => leagues,
        Err(err) => {
            error!(error = %err, "activate sweep query failed");
            report.failures += 1;
            return;
        }
    };

    for league in leagues {
        match activate_league(store, &league, dates, now, ttl_days).await {
            Ok(true) => report.activated += 1,
            Ok(false) => {}
            Err(err) => {
                error!(league_id = %league.id, error = %err, "activation failed");
                report.failures += 1;
            }
        }
    }
}

async fn activate_league(
    store: &Arc<dyn LeagueStore>,
    league: &LeagueEntity,
    dates: &TickDates,
    now: DateTime<Utc>,
    ttl_days: i64,
) -> Result<bool, ServiceError> {
    if !season::activation_due(league, dates) {
        return Ok(false);
    }
    if !store.activate_league(league.id, dates.today_key()).await? {
        return Ok(false);
    }

    let members = store.active_members(league.id).await?;
    let recipients: Vec<Uuid> = members.iter().map(|m| m.user_id).collect();
    let records = notify::build_notifications(
        &LeagueEvent::SeasonStarted { league },
        &recipients,
        now,
        ttl_days,
    );
    if !records.is_empty() {
        store.insert_notifications(records).await?;
    }
    info!(league_id = %league.id, "season activated");
    Ok(true)
}

async fn remind_sweep(
    store: &Arc<dyn LeagueStore>,
    dates: &TickDates,
    now: DateTime<Utc>,
    ttl_days: i64,
    report: &mut TickReport,
) {
    let leagues = match store
        .leagues_by_play_day(LeagueStatus::Active, dates.today_weekday().to_owned())
        .await
    {
        Ok(leagues) => leagues,
        Err(err) => {
            error!(error = %err, "reminder sweep query failed");
            report.failures += 1;
            return;
        }
    };

    for league in leagues {
        match remind_league(store, &league, dates, now, ttl_days).await {
            Ok(true) => report.reminded += 1,
            Ok(false) => {}
            Err(err) => {
                error!(league_id = %league.id, error = %err, "reminders failed");
                report.failures += 1;
            }
        }
    }
}

async fn remind_league(
    store: &Arc<dyn LeagueStore>,
    league: &LeagueEntity,
    dates: &TickDates,
    now: DateTime<Utc>,
    ttl_days: i64,
) -> Result<bool, ServiceError> {
    let Some(reminder_key) = season::reminder_due(league, dates) else {
        return Ok(false);
    };
    if !store.claim_reminder(league.id, reminder_key).await? {
        return Ok(false);
    }

    // Anyone with a pending or approved card already played; only chase
    // members with no score record at all.
    let members = store.active_members(league.id).await?;
    let scores = store
        .scores_for_week(
            league.id,
            league.current_week,
            vec![ScoreStatus::Approved, ScoreStatus::Pending],
        )
        .await?;
    let scored: HashSet<Uuid> = scores.iter().map(|s| s.user_id).collect();

    let recipients: Vec<Uuid> = members
        .iter()
        .filter(|m| !scored.contains(&m.user_id))
        .map(|m| m.user_id)
        .collect();
    if recipients.is_empty() {
        return Ok(true);
    }

    let records = notify::build_notifications(
        &LeagueEvent::ScoreReminder {
            league,
            week: league.current_week,
        },
        &recipients,
        now,
        ttl_days,
    );
    store.insert_notifications(records).await?;
    info!(
        league_id = %league.id,
        week = league.current_week,
        reminded = recipients.len(),
        "score reminders sent"
    );
    Ok(true)
}

async fn completion_sweep(
    store: &Arc<dyn LeagueStore>,
    dates: &TickDates,
    now: DateTime<Utc>,
    ttl_days: i64,
    report: &mut TickReport,
) {
    let leagues = match store
        .leagues_by_play_day(LeagueStatus::Active, dates.yesterday_weekday().to_owned())
        .await
    {
        Ok(leagues) => leagues,
        Err(err) => {
            error!(error = %err, "completion sweep query failed");
            report.failures += 1;
            return;
        }
    };

    for league in leagues {
        match complete_league_week(store, &league, dates, now, ttl_days).await {
            Ok(WeekOutcome::Advanced) => report.weeks_advanced += 1,
            Ok(WeekOutcome::Completed) => report.seasons_completed += 1,
            Ok(WeekOutcome::Skipped) => {}
            Err(err) => {
                error!(league_id = %league.id, error = %err, "week completion failed");
                report.failures += 1;
            }
        }
    }
}

/// Resolve one league's current week: format strategy, standings update,
/// week result record, then the advance-or-complete transition.
///
/// The pipeline is strictly ordered: every member delta lands before the
/// position pass reads the updated totals, and the guard write comes last
/// so a failed run leaves the week unprocessed for the next tick.
async fn complete_league_week(
    store: &Arc<dyn LeagueStore>,
    league: &LeagueEntity,
    dates: &TickDates,
    now: DateTime<Utc>,
    ttl_days: i64,
) -> Result<WeekOutcome, ServiceError> {
    if !season::completion_due(league, dates) {
        return Ok(WeekOutcome::Skipped);
    }
    let week = league.current_week;

    let members = store.active_members(league.id).await?;
    let scores = store
        .scores_for_week(league.id, week, vec![ScoreStatus::Approved])
        .await?;
    if scores.is_empty() {
        warn!(league_id = %league.id, week, "no approved scores; week left unprocessed");
        return Ok(WeekOutcome::Skipped);
    }
    let ranked = stroke_play::rank_week(&scores, &members);
    if ranked.is_empty() {
        warn!(league_id = %league.id, week, "no complete rounds; week left unprocessed");
        return Ok(WeekOutcome::Skipped);
    }

    // Validate team configuration before any write so a misconfigured
    // league never ends up half-applied.
    let mut matchup_results: Vec<MatchupResultEntity> = Vec::new();
    let mut teams: Vec<TeamEntity> = Vec::new();
    let mut team_scoring = None;
    if league.format == LeagueFormat::TeamMatch {
        let matchups = store.matchups(league.id, week).await?;
        if matchups.is_empty() {
            warn!(league_id = %league.id, week, "no matchups configured; week left unprocessed");
            return Ok(WeekOutcome::Skipped);
        }
        let Some(scoring) = league.team_scoring.clone() else {
            warn!(league_id = %league.id, "team league without scoring config; week left unprocessed");
            return Ok(WeekOutcome::Skipped);
        };
        teams = store.teams(league.id).await?;
        matchup_results = team_match::resolve_matchups(&matchups, &teams, &scores);
        team_scoring = Some(scoring);
    }

    let multiplier = purse::multiplier(league, week);
    let elevated = purse::is_elevated(league, week);

    // Standings updater: every member delta, then the position pass over
    // the refreshed totals.
    let deltas = standings::member_deltas(&ranked, week, multiplier);
    for (line, delta) in ranked.iter().zip(deltas.iter()) {
        store
            .apply_member_result(league.id, line.user_id, delta.clone())
            .await?;
    }

    if let Some(scoring) = &team_scoring {
        for (team_id, delta) in team_match::team_deltas(
            &matchup_results,
            scoring.points_per_win,
            scoring.points_per_tie,
            multiplier,
        ) {
            store.apply_team_outcome(league.id, team_id, delta).await?;
        }
    }

    let refreshed = store.active_members(league.id).await?;
    let positions = standings::assign_positions(&refreshed);
    store.set_member_positions(league.id, positions).await?;

    let winner = week_winner(league, &ranked, &matchup_results, &teams);
    let standings_snapshot: Vec<WeekStandingEntity> = ranked
        .iter()
        .zip(deltas.iter())
        .map(|(line, delta)| WeekStandingEntity {
            user_id: line.user_id,
            display_name: line.display_name.clone(),
            placement: delta.placement,
            points: delta.points,
            net: line.net,
            gross: line.gross,
        })
        .collect();
    let week_prize = purse::weekly_prize(league, week);
    store
        .insert_week_result(WeekResultEntity {
            id: Uuid::new_v4(),
            league_id: league.id,
            week,
            elevated,
            prize: week_prize.clone(),
            winner: winner.clone(),
            standings: standings_snapshot,
            matchups: matchup_results,
            created_at: now,
        })
        .await?;

    let recipients: Vec<Uuid> = members.iter().map(|m| m.user_id).collect();
    let winner_net = match league.format {
        LeagueFormat::Stroke => ranked.first().map(|r| r.net),
        LeagueFormat::TeamMatch => None,
    };

    match season::next_step(league) {
        SeasonStep::Advance { next_week } => {
            if !store.advance_week(league.id, week).await? {
                return Ok(WeekOutcome::Skipped);
            }

            let mut records = Vec::new();
            if let Some(winner) = &winner {
                records.extend(notify::build_notifications(
                    &LeagueEvent::WeekWinner {
                        league,
                        week,
                        winner,
                        net: winner_net,
                        elevated,
                        prize: week_prize.as_ref(),
                    },
                    &recipients,
                    now,
                    ttl_days,
                ));
            }
            records.extend(
                next_week_notifications(store, league, next_week, &members, now, ttl_days).await?,
            );
            if !records.is_empty() {
                store.insert_notifications(records).await?;
            }
            info!(league_id = %league.id, week, next_week, "week resolved; league advanced");
            Ok(WeekOutcome::Advanced)
        }
        SeasonStep::Complete => {
            let Some(champion) = champion(store, league, &refreshed).await? else {
                warn!(league_id = %league.id, "no champion candidate; season left open");
                return Ok(WeekOutcome::Skipped);
            };
            let season_prize = purse::season_prize(league);
            if !store
                .complete_season(league.id, week, champion.clone(), season_prize.clone())
                .await?
            {
                return Ok(WeekOutcome::Skipped);
            }

            let mut records = Vec::new();
            if let Some(winner) = &winner {
                records.extend(notify::build_notifications(
                    &LeagueEvent::WeekWinner {
                        league,
                        week,
                        winner,
                        net: winner_net,
                        elevated,
                        prize: week_prize.as_ref(),
                    },
                    &recipients,
                    now,
                    ttl_days,
                ));
            }
            records.extend(notify::build_notifications(
                &LeagueEvent::SeasonComplete {
                    league,
                    champion: &champion,
                    prize: season_prize.as_ref(),
                },
                &recipients,
                now,
                ttl_days,
            ));
            store.insert_notifications(records).await?;
            info!(league_id = %league.id, champion = %champion.name, "season completed");
            Ok(WeekOutcome::Completed)
        }
    }
}

/// The week's announced winner: lowest net member for stroke leagues,
/// lowest-scoring decisive team for team leagues.
fn week_winner(
    league: &LeagueEntity,
    ranked: &[standings::RankedScore],
    matchup_results: &[MatchupResultEntity],
    teams: &[TeamEntity],
) -> Option<ChampionEntity> {
    match league.format {
        LeagueFormat::Stroke => ranked.first().map(|line| ChampionEntity {
            id: line.user_id,
            name: line.display_name.clone(),
        }),
        LeagueFormat::TeamMatch => {
            let (team_id, _) = team_match::overall_winner(matchup_results)?;
            let team = teams.iter().find(|t| t.id == team_id)?;
            Some(ChampionEntity {
                id: team.id,
                name: team.name.clone(),
            })
        }
    }
}

/// The season champion: top cumulative-points member, or top team for
/// team leagues, read after the final week's deltas were applied.
async fn champion(
    store: &Arc<dyn LeagueStore>,
    league: &LeagueEntity,
    refreshed_members: &[MemberEntity],
) -> Result<Option<ChampionEntity>, ServiceError> {
    match league.format {
        LeagueFormat::Stroke => Ok(refreshed_members
            .iter()
            .max_by_key(|m| m.total_points)
            .map(|m| ChampionEntity {
                id: m.user_id,
                name: m.display_name.clone(),
            })),
        LeagueFormat::TeamMatch => {
            let teams = store.teams(league.id).await?;
            Ok(teams
                .into_iter()
                .max_by_key(|t| t.total_points)
                .map(|t| ChampionEntity {
                    id: t.id,
                    name: t.name,
                }))
        }
    }
}

/// Notifications announcing the next week: per-side matchup messages for
/// team leagues (falling back to a plain week-start message when the next
/// week has no matchups yet), a plain week-start message otherwise.
async fn next_week_notifications(
    store: &Arc<dyn LeagueStore>,
    league: &LeagueEntity,
    next_week: u32,
    members: &[MemberEntity],
    now: DateTime<Utc>,
    ttl_days: i64,
) -> Result<Vec<crate::dao::models::NotificationEntity>, ServiceError> {
    let all_recipients: Vec<Uuid> = members.iter().map(|m| m.user_id).collect();

    if league.format == LeagueFormat::TeamMatch {
        let matchups = store.matchups(league.id, next_week).await?;
        if !matchups.is_empty() {
            let teams = store.teams(league.id).await?;
            let mut records = Vec::new();
            for matchup in &matchups {
                let home = teams.iter().find(|t| t.id == matchup.home_team_id);
                let away = teams.iter().find(|t| t.id == matchup.away_team_id);
                let (Some(home), Some(away)) = (home, away) else {
                    warn!(
                        league_id = %league.id,
                        week = next_week,
                        "matchup references unknown team; announcement skipped"
                    );
                    continue;
                };
                for (team, opponent) in [(home, away), (away, home)] {
                    records.extend(notify::build_notifications(
                        &LeagueEvent::MatchupAnnounced {
                            league,
                            week: next_week,
                            team_name: &team.name,
                            opponent_name: &opponent.name,
                        },
                        &team.member_ids,
                        now,
                        ttl_days,
                    ));
                }
            }
            return Ok(records);
        }
        warn!(
            league_id = %league.id,
            week = next_week,
            "no matchups configured for next week; sending plain week start"
        );
    }

    Ok(notify::build_notifications(
        &LeagueEvent::WeekStarted {
            league,
            week: next_week,
        },
        &all_recipients,
        now,
        ttl_days,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::{
        config::AppConfig,
        dao::{
            league_store::memory::MemoryLeagueStore,
            models::{
                ElevatedEntity, MatchupEntity, PurseEntity, ScoreEntity, TeamScoringEntity,
            },
        },
        engine::season::tests::league_fixture,
        state::AppState,
    };

    /// Sunday 2024-05-12 06:00 UTC, the morning after the fixture
    /// league's Saturday round, with a zero canonical offset.
    fn sunday_morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 12, 6, 0, 0).unwrap()
    }

    async fn state_with(store: &MemoryLeagueStore) -> SharedState {
        let state = AppState::new(AppConfig::default());
        state.set_league_store(Arc::new(store.clone())).await;
        state
    }

    fn member(league_id: Uuid, name: &str) -> MemberEntity {
        MemberEntity {
            league_id,
            user_id: Uuid::new_v4(),
            display_name: name.into(),
            status: "active".into(),
            total_points: 0,
            net_sum: 0,
            gross_sum: 0,
            rounds_played: 0,
            wins: 0,
            position: None,
            previous_position: None,
            weekly: Default::default(),
        }
    }

    fn score(
        league_id: Uuid,
        user_id: Uuid,
        week: u32,
        net: i32,
        status: ScoreStatus,
    ) -> ScoreEntity {
        ScoreEntity {
            id: Uuid::new_v4(),
            league_id,
            user_id,
            week,
            course_id: "course".into(),
            tee_id: "white".into(),
            course_handicap: 10,
            holes: vec![],
            gross_total: Some((net + 10) as u32),
            net_total: Some(net),
            status,
            submitted_at: sunday_morning(),
        }
    }

    fn kind_count(store: &MemoryLeagueStore, kind: &str) -> usize {
        store
            .state()
            .notifications
            .iter()
            .filter(|n| n.kind == kind)
            .count()
    }

    #[tokio::test]
    async fn stroke_week_advances_and_repeat_tick_is_a_noop() {
        let store = MemoryLeagueStore::new();
        let league = league_fixture();
        let league_id = league.id;
        let (ana, ben, cal) = (
            member(league_id, "Ana"),
            member(league_id, "Ben"),
            member(league_id, "Cal"),
        );
        {
            let mut state = store.state();
            state.scores.push(score(league_id, ana.user_id, 2, 70, ScoreStatus::Approved));
            state.scores.push(score(league_id, ben.user_id, 2, 72, ScoreStatus::Approved));
            state.scores.push(score(league_id, cal.user_id, 2, 75, ScoreStatus::Approved));
            state.members.extend([ana.clone(), ben.clone(), cal.clone()]);
            state.leagues.push(league);
        }
        let app = state_with(&store).await;

        let report = run_tick(&app, sunday_morning()).await.unwrap();
        assert_eq!(report.weeks_advanced, 1);
        assert_eq!(report.failures, 0);

        {
            let state = store.state();
            let league = &state.leagues[0];
            assert_eq!(league.current_week, 3);
            assert_eq!(league.last_processed_week, Some(2));

            let winner = state
                .members
                .iter()
                .find(|m| m.user_id == ana.user_id)
                .unwrap();
            assert_eq!(winner.total_points, 3);
            assert_eq!(winner.rounds_played, 1);
            assert_eq!(winner.wins, 1);
            assert_eq!(winner.position, Some(1));
            assert_eq!(winner.weekly.get("2").unwrap().placement, 1);

            assert_eq!(state.week_results.len(), 1);
            assert_eq!(
                state.week_results[0].winner.as_ref().unwrap().id,
                ana.user_id
            );
            assert_eq!(state.week_results[0].standings.len(), 3);
        }
        assert_eq!(kind_count(&store, "week_winner"), 3);
        assert_eq!(kind_count(&store, "week_started"), 3);

        // Same instant again: the marker moved, week 3 has no scores, so
        // nothing is written twice.
        let repeat = run_tick(&app, sunday_morning()).await.unwrap();
        assert_eq!(repeat.weeks_advanced, 0);
        assert_eq!(store.state().notifications.len(), 6);
        assert_eq!(store.state().week_results.len(), 1);
        let winner_after = store
            .state()
            .members
            .iter()
            .find(|m| m.user_id == ana.user_id)
            .cloned()
            .unwrap();
        assert_eq!(winner_after.rounds_played, 1);
        assert_eq!(winner_after.total_points, 3);
    }

    #[tokio::test]
    async fn announcement_and_activation_each_fire_once() {
        let store = MemoryLeagueStore::new();

        let mut starting_tomorrow = league_fixture();
        starting_tomorrow.status = LeagueStatus::Upcoming;
        starting_tomorrow.current_week = 0;
        starting_tomorrow.last_processed_week = None;
        starting_tomorrow.start_date = "2024-05-13".into();
        let mut starting_today = league_fixture();
        starting_today.status = LeagueStatus::Upcoming;
        starting_today.current_week = 0;
        starting_today.last_processed_week = None;
        starting_today.start_date = "2024-05-12".into();
        let today_id = starting_today.id;

        {
            let mut state = store.state();
            state.members.push(member(starting_tomorrow.id, "Ana"));
            state.members.push(member(today_id, "Ben"));
            state.leagues.push(starting_tomorrow);
            state.leagues.push(starting_today);
        }
        let app = state_with(&store).await;

        let report = run_tick(&app, sunday_morning()).await.unwrap();
        assert_eq!(report.announced, 1);
        assert_eq!(report.activated, 1);

        {
            let state = store.state();
            let activated = state.leagues.iter().find(|l| l.id == today_id).unwrap();
            assert_eq!(activated.status, LeagueStatus::Active);
            assert_eq!(activated.current_week, 1);
            assert_eq!(activated.last_activated.as_deref(), Some("2024-05-12"));
        }
        assert_eq!(kind_count(&store, "league_starting"), 1);
        assert_eq!(kind_count(&store, "league_started"), 1);

        let repeat = run_tick(&app, sunday_morning()).await.unwrap();
        assert_eq!(repeat.announced, 0);
        assert_eq!(repeat.activated, 0);
        assert_eq!(kind_count(&store, "league_starting"), 1);
        assert_eq!(kind_count(&store, "league_started"), 1);
    }

    #[tokio::test]
    async fn reminders_skip_members_with_a_pending_card() {
        let store = MemoryLeagueStore::new();
        let mut league = league_fixture();
        league.play_day = "sunday".into();
        let league_id = league.id;
        let played = member(league_id, "Ana");
        let missing = member(league_id, "Ben");
        {
            let mut state = store.state();
            state
                .scores
                .push(score(league_id, played.user_id, 2, 71, ScoreStatus::Pending));
            state.members.extend([played.clone(), missing.clone()]);
            state.leagues.push(league);
        }
        let app = state_with(&store).await;

        // Sunday 15:00: inside the 09:00 tee + 6h ± 1h window.
        let mid_afternoon = Utc.with_ymd_and_hms(2024, 5, 12, 15, 0, 0).unwrap();
        let report = run_tick(&app, mid_afternoon).await.unwrap();
        assert_eq!(report.reminded, 1);

        {
            let state = store.state();
            let reminders: Vec<_> = state
                .notifications
                .iter()
                .filter(|n| n.kind == "score_reminder")
                .collect();
            assert_eq!(reminders.len(), 1);
            assert_eq!(reminders[0].user_id, missing.user_id);
            assert_eq!(
                state.leagues[0].last_score_reminder.as_deref(),
                Some("2024-05-12:2")
            );
        }

        let repeat = run_tick(&app, mid_afternoon).await.unwrap();
        assert_eq!(repeat.reminded, 0);
        assert_eq!(kind_count(&store, "score_reminder"), 1);
    }

    #[tokio::test]
    async fn final_week_completes_the_season_with_champion_and_prize() {
        let store = MemoryLeagueStore::new();
        let mut league = league_fixture();
        league.current_week = league.total_weeks;
        league.last_processed_week = Some(league.total_weeks - 1);
        league.purse = Some(PurseEntity {
            season_pool: 500,
            weekly_pool: 25,
            elevated_pool: 0,
            currency: "USD".into(),
        });
        let league_id = league.id;
        let total_weeks = league.total_weeks;

        let mut leader = member(league_id, "Ana");
        leader.total_points = 40;
        let mut chaser = member(league_id, "Ben");
        chaser.total_points = 10;
        {
            let mut state = store.state();
            // The chaser wins the final week, but not by enough.
            state.scores.push(score(
                league_id,
                chaser.user_id,
                total_weeks,
                66,
                ScoreStatus::Approved,
            ));
            state.scores.push(score(
                league_id,
                leader.user_id,
                total_weeks,
                70,
                ScoreStatus::Approved,
            ));
            state.members.extend([leader.clone(), chaser.clone()]);
            state.leagues.push(league);
        }
        let app = state_with(&store).await;

        let report = run_tick(&app, sunday_morning()).await.unwrap();
        assert_eq!(report.seasons_completed, 1);

        {
            let state = store.state();
            let league = &state.leagues[0];
            assert_eq!(league.status, LeagueStatus::Completed);
            assert_eq!(league.last_processed_week, Some(total_weeks));
            let champion = league.champion.as_ref().unwrap();
            assert_eq!(champion.id, leader.user_id);
            assert_eq!(league.championship_prize.as_ref().unwrap().amount, 500);
        }
        assert_eq!(kind_count(&store, "season_complete"), 2);
        assert_eq!(kind_count(&store, "week_winner"), 2);

        // Completed seasons never match the active-league sweep again.
        let repeat = run_tick(&app, sunday_morning()).await.unwrap();
        assert_eq!(repeat.seasons_completed, 0);
        assert_eq!(repeat.weeks_advanced, 0);
        assert_eq!(kind_count(&store, "season_complete"), 2);
    }

    #[tokio::test]
    async fn team_match_tie_credits_both_teams_with_boosted_tie_points() {
        let store = MemoryLeagueStore::new();
        let mut league = league_fixture();
        league.format = LeagueFormat::TeamMatch;
        league.team_scoring = Some(TeamScoringEntity {
            points_per_win: 3,
            points_per_tie: 1,
        });
        league.elevated = Some(ElevatedEntity {
            weeks: vec![2],
            multiplier: 2.0,
        });
        let league_id = league.id;

        let (p1, p2, p3, p4) = (
            member(league_id, "Ana"),
            member(league_id, "Ben"),
            member(league_id, "Cal"),
            member(league_id, "Dot"),
        );
        let team_x = TeamEntity {
            id: Uuid::new_v4(),
            league_id,
            name: "Mulligans".into(),
            member_ids: vec![p1.user_id, p2.user_id],
            wins: 0,
            losses: 0,
            ties: 0,
            total_points: 0,
        };
        let team_y = TeamEntity {
            id: Uuid::new_v4(),
            league_id,
            name: "Sandbaggers".into(),
            member_ids: vec![p3.user_id, p4.user_id],
            wins: 0,
            losses: 0,
            ties: 0,
            total_points: 0,
        };
        {
            let mut state = store.state();
            state.scores.extend([
                score(league_id, p1.user_id, 2, 70, ScoreStatus::Approved),
                score(league_id, p2.user_id, 2, 74, ScoreStatus::Approved),
                score(league_id, p3.user_id, 2, 72, ScoreStatus::Approved),
                score(league_id, p4.user_id, 2, 72, ScoreStatus::Approved),
            ]);
            state.matchups.push(MatchupEntity {
                league_id,
                week: 2,
                home_team_id: team_x.id,
                away_team_id: team_y.id,
            });
            state.members.extend([p1, p2, p3, p4]);
            state.teams.extend([team_x.clone(), team_y.clone()]);
            state.leagues.push(league);
        }
        let app = state_with(&store).await;

        let report = run_tick(&app, sunday_morning()).await.unwrap();
        assert_eq!(report.weeks_advanced, 1);

        {
            let state = store.state();
            for team in &state.teams {
                assert_eq!(team.ties, 1, "{} should record the tie", team.name);
                assert_eq!(team.wins, 0);
                assert_eq!(team.losses, 0);
                // points_per_tie 1 × elevated multiplier 2.
                assert_eq!(team.total_points, 2);
            }

            let result = &state.week_results[0];
            assert!(result.elevated);
            assert_eq!(result.matchups.len(), 1);
            assert_eq!(result.matchups[0].home_total, Some(144));
            assert_eq!(result.matchups[0].away_total, Some(144));
            assert_eq!(result.matchups[0].winner_team_id, None);
            assert!(result.matchups[0].tie);
            // No decisive matchup means no announced week winner.
            assert!(result.winner.is_none());
        }

        // Week 3 has no configured matchups, so the fallback week-start
        // message goes to everyone.
        assert_eq!(kind_count(&store, "week_started"), 4);
        assert_eq!(kind_count(&store, "week_winner"), 0);

        let repeat = run_tick(&app, sunday_morning()).await.unwrap();
        assert_eq!(repeat.weeks_advanced, 0);
        let ties: u32 = store.state().teams.iter().map(|t| t.ties).sum();
        assert_eq!(ties, 2);
    }
}
