//! In-memory [`LeagueStore`] used by orchestrator tests. Implements the
//! same compare-and-set semantics as the MongoDB backend so idempotency
//! tests exercise the real guard behaviour.

use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::BoxFuture;
use uuid::Uuid;

use super::LeagueStore;
use crate::dao::models::{
    ChampionEntity, HoleInfoEntity, LeagueEntity, LeagueStatus, MatchupEntity, MemberEntity,
    MemberPosition, MemberWeekDelta, MemberWeekEntity, NotificationEntity, PrizeEntity,
    ScoreEntity, ScoreStatus, TeamDelta, TeamEntity, WeekResultEntity,
};
use crate::dao::storage::StorageResult;

/// Everything the store holds, exposed so tests can seed and inspect it.
#[derive(Debug, Default)]
#[allow(missing_docs)]
pub struct MemoryState {
    pub leagues: Vec<LeagueEntity>,
    pub members: Vec<MemberEntity>,
    pub teams: Vec<TeamEntity>,
    pub matchups: Vec<MatchupEntity>,
    pub scores: Vec<ScoreEntity>,
    pub week_results: Vec<WeekResultEntity>,
    pub notifications: Vec<NotificationEntity>,
    pub hole_info: Vec<HoleInfoEntity>,
}

/// Mutex-backed store sharing one [`MemoryState`] across clones.
#[derive(Clone, Default)]
pub struct MemoryLeagueStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryLeagueStore {
    /// Fresh, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct access for seeding and assertions.
    pub fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().expect("memory store poisoned")
    }

    fn with_league<R>(
        &self,
        league_id: Uuid,
        apply: impl FnOnce(&mut LeagueEntity) -> R,
    ) -> Option<R> {
        let mut state = self.state();
        state
            .leagues
            .iter_mut()
            .find(|l| l.id == league_id)
            .map(apply)
    }
}

impl LeagueStore for MemoryLeagueStore {
    fn leagues_starting(
        &self,
        status: LeagueStatus,
        start_date: String,
    ) -> BoxFuture<'static, StorageResult<Vec<LeagueEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .state()
                .leagues
                .iter()
                .filter(|l| l.status == status && l.start_date == start_date)
                .cloned()
                .collect())
        })
    }

    fn leagues_by_play_day(
        &self,
        status: LeagueStatus,
        play_day: String,
    ) -> BoxFuture<'static, StorageResult<Vec<LeagueEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .state()
                .leagues
                .iter()
                .filter(|l| l.status == status && l.play_day == play_day)
                .cloned()
                .collect())
        })
    }

    fn find_league(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<LeagueEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store.state().leagues.iter().find(|l| l.id == id).cloned())
        })
    }

    fn claim_start_notice(
        &self,
        league_id: Uuid,
        date_key: String,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .with_league(league_id, |league| {
                    let claimable = league.status == LeagueStatus::Upcoming
                        && league.last_notified_starting.as_deref() != Some(date_key.as_str());
                    if claimable {
                        league.last_notified_starting = Some(date_key);
                    }
                    claimable
                })
                .unwrap_or(false))
        })
    }

    fn activate_league(
        &self,
        league_id: Uuid,
        date_key: String,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .with_league(league_id, |league| {
                    let claimable = league.status == LeagueStatus::Upcoming;
                    if claimable {
                        league.status = LeagueStatus::Active;
                        league.current_week = 1;
                        league.last_activated = Some(date_key);
                    }
                    claimable
                })
                .unwrap_or(false))
        })
    }

    fn claim_reminder(
        &self,
        league_id: Uuid,
        reminder_key: String,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .with_league(league_id, |league| {
                    let claimable = league.status == LeagueStatus::Active
                        && league.last_score_reminder.as_deref() != Some(reminder_key.as_str());
                    if claimable {
                        league.last_score_reminder = Some(reminder_key);
                    }
                    claimable
                })
                .unwrap_or(false))
        })
    }

    fn advance_week(
        &self,
        league_id: Uuid,
        processed_week: u32,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .with_league(league_id, |league| {
                    let claimable = league.status == LeagueStatus::Active
                        && league.current_week == processed_week
                        && league.last_processed_week != Some(processed_week);
                    if claimable {
                        league.last_processed_week = Some(processed_week);
                        league.current_week = processed_week + 1;
                    }
                    claimable
                })
                .unwrap_or(false))
        })
    }

    fn complete_season(
        &self,
        league_id: Uuid,
        processed_week: u32,
        champion: ChampionEntity,
        prize: Option<PrizeEntity>,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .with_league(league_id, |league| {
                    let claimable = league.status == LeagueStatus::Active
                        && league.current_week == processed_week
                        && league.last_processed_week != Some(processed_week);
                    if claimable {
                        league.status = LeagueStatus::Completed;
                        league.last_processed_week = Some(processed_week);
                        league.champion = Some(champion);
                        league.championship_prize = prize;
                    }
                    claimable
                })
                .unwrap_or(false))
        })
    }

    fn active_members(
        &self,
        league_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<MemberEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .state()
                .members
                .iter()
                .filter(|m| m.league_id == league_id && m.status == "active")
                .cloned()
                .collect())
        })
    }

    fn apply_member_result(
        &self,
        league_id: Uuid,
        user_id: Uuid,
        delta: MemberWeekDelta,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let mut state = store.state();
            if let Some(member) = state
                .members
                .iter_mut()
                .find(|m| m.league_id == league_id && m.user_id == user_id)
            {
                member.total_points += delta.points;
                member.rounds_played += 1;
                member.net_sum += i64::from(delta.net);
                member.gross_sum += i64::from(delta.gross);
                member.wins += u32::from(delta.won_week);
                member.weekly.insert(
                    delta.week.to_string(),
                    MemberWeekEntity {
                        placement: delta.placement,
                        points: delta.points,
                        net: delta.net,
                        gross: delta.gross,
                    },
                );
            }
            Ok(())
        })
    }

    fn set_member_positions(
        &self,
        league_id: Uuid,
        positions: Vec<MemberPosition>,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let mut state = store.state();
            for entry in positions {
                if let Some(member) = state
                    .members
                    .iter_mut()
                    .find(|m| m.league_id == league_id && m.user_id == entry.user_id)
                {
                    member.position = Some(entry.position);
                    member.previous_position = entry.previous_position;
                }
            }
            Ok(())
        })
    }

    fn teams(&self, league_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .state()
                .teams
                .iter()
                .filter(|t| t.league_id == league_id)
                .cloned()
                .collect())
        })
    }

    fn apply_team_outcome(
        &self,
        league_id: Uuid,
        team_id: Uuid,
        delta: TeamDelta,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let mut state = store.state();
            if let Some(team) = state
                .teams
                .iter_mut()
                .find(|t| t.league_id == league_id && t.id == team_id)
            {
                team.wins += delta.wins;
                team.losses += delta.losses;
                team.ties += delta.ties;
                team.total_points += delta.points;
            }
            Ok(())
        })
    }

    fn matchups(
        &self,
        league_id: Uuid,
        week: u32,
    ) -> BoxFuture<'static, StorageResult<Vec<MatchupEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .state()
                .matchups
                .iter()
                .filter(|m| m.league_id == league_id && m.week == week)
                .cloned()
                .collect())
        })
    }

    fn scores_for_week(
        &self,
        league_id: Uuid,
        week: u32,
        statuses: Vec<ScoreStatus>,
    ) -> BoxFuture<'static, StorageResult<Vec<ScoreEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .state()
                .scores
                .iter()
                .filter(|s| {
                    s.league_id == league_id && s.week == week && statuses.contains(&s.status)
                })
                .cloned()
                .collect())
        })
    }

    fn insert_score(&self, score: ScoreEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.state().scores.push(score);
            Ok(())
        })
    }

    fn insert_week_result(
        &self,
        result: WeekResultEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.state().week_results.push(result);
            Ok(())
        })
    }

    fn insert_notifications(
        &self,
        notifications: Vec<NotificationEntity>,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.state().notifications.extend(notifications);
            Ok(())
        })
    }

    fn hole_info(
        &self,
        course_id: String,
        tee_id: String,
    ) -> BoxFuture<'static, StorageResult<Vec<HoleInfoEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let mut holes: Vec<HoleInfoEntity> = store
                .state()
                .hole_info
                .iter()
                .filter(|h| h.course_id == course_id && h.tee_id == tee_id)
                .cloned()
                .collect();
            holes.sort_by_key(|h| h.hole);
            Ok(holes)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
