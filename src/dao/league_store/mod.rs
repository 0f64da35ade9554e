#[cfg(test)]
pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::models::{
    ChampionEntity, HoleInfoEntity, LeagueEntity, LeagueStatus, MatchupEntity, MemberEntity,
    MemberPosition, MemberWeekDelta, NotificationEntity, PrizeEntity, ScoreEntity, ScoreStatus,
    TeamDelta, TeamEntity, WeekResultEntity,
};
use crate::dao::storage::StorageResult;

/// Abstraction over the persistence layer for leagues and their
/// sub-collections.
///
/// The `claim_*` / `activate_league` / `advance_week` / `complete_season`
/// operations are compare-and-set transitions: the backend re-checks the
/// stated precondition in the same call that writes the new state and the
/// guard marker, and returns `false` when the precondition no longer holds.
/// Callers treat `false` as a silent no-op (another tick already ran).
pub trait LeagueStore: Send + Sync {
    /// Leagues with the given status whose start date equals `start_date`.
    fn leagues_starting(
        &self,
        status: LeagueStatus,
        start_date: String,
    ) -> BoxFuture<'static, StorageResult<Vec<LeagueEntity>>>;

    /// Leagues with the given status playing on the given weekday.
    fn leagues_by_play_day(
        &self,
        status: LeagueStatus,
        play_day: String,
    ) -> BoxFuture<'static, StorageResult<Vec<LeagueEntity>>>;

    /// Load one league by id.
    fn find_league(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<LeagueEntity>>>;

    /// CAS: record the "starting tomorrow" batch for `date_key`.
    /// Precondition: status is upcoming and the marker differs.
    fn claim_start_notice(
        &self,
        league_id: Uuid,
        date_key: String,
    ) -> BoxFuture<'static, StorageResult<bool>>;

    /// CAS: upcoming → active with current week 1.
    /// Precondition: status is upcoming.
    fn activate_league(
        &self,
        league_id: Uuid,
        date_key: String,
    ) -> BoxFuture<'static, StorageResult<bool>>;

    /// CAS: record the score-reminder batch for `reminder_key`.
    /// Precondition: status is active and the marker differs.
    fn claim_reminder(
        &self,
        league_id: Uuid,
        reminder_key: String,
    ) -> BoxFuture<'static, StorageResult<bool>>;

    /// CAS: mark `processed_week` done and move to the next week.
    /// Precondition: status is active, current week equals
    /// `processed_week` and the processed marker differs.
    fn advance_week(
        &self,
        league_id: Uuid,
        processed_week: u32,
    ) -> BoxFuture<'static, StorageResult<bool>>;

    /// CAS: mark `processed_week` done and finish the season with the
    /// given champion and championship prize. Same precondition as
    /// [`LeagueStore::advance_week`].
    fn complete_season(
        &self,
        league_id: Uuid,
        processed_week: u32,
        champion: ChampionEntity,
        prize: Option<PrizeEntity>,
    ) -> BoxFuture<'static, StorageResult<bool>>;

    /// Active members of a league.
    fn active_members(
        &self,
        league_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<MemberEntity>>>;

    /// Apply one member's week delta: atomic counter increments plus the
    /// keyed week snapshot, in a single update.
    fn apply_member_result(
        &self,
        league_id: Uuid,
        user_id: Uuid,
        delta: MemberWeekDelta,
    ) -> BoxFuture<'static, StorageResult<()>>;

    /// Write recomputed table positions for the given members.
    fn set_member_positions(
        &self,
        league_id: Uuid,
        positions: Vec<MemberPosition>,
    ) -> BoxFuture<'static, StorageResult<()>>;

    /// Teams of a league.
    fn teams(&self, league_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>>;

    /// Apply one team's matchup outcome as atomic counter increments.
    fn apply_team_outcome(
        &self,
        league_id: Uuid,
        team_id: Uuid,
        delta: TeamDelta,
    ) -> BoxFuture<'static, StorageResult<()>>;

    /// Configured matchups for one week of a league.
    fn matchups(
        &self,
        league_id: Uuid,
        week: u32,
    ) -> BoxFuture<'static, StorageResult<Vec<MatchupEntity>>>;

    /// Scores for one week of a league whose status is in `statuses`.
    fn scores_for_week(
        &self,
        league_id: Uuid,
        week: u32,
        statuses: Vec<ScoreStatus>,
    ) -> BoxFuture<'static, StorageResult<Vec<ScoreEntity>>>;

    /// Persist a newly submitted score card.
    fn insert_score(&self, score: ScoreEntity) -> BoxFuture<'static, StorageResult<()>>;

    /// Persist a week's resolved result record.
    fn insert_week_result(
        &self,
        result: WeekResultEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;

    /// Persist a batch of notification records for delivery.
    fn insert_notifications(
        &self,
        notifications: Vec<NotificationEntity>,
    ) -> BoxFuture<'static, StorageResult<()>>;

    /// Per-hole reference data for a course/tee pairing, in hole order.
    fn hole_info(
        &self,
        course_id: String,
        tee_id: String,
    ) -> BoxFuture<'static, StorageResult<Vec<HoleInfoEntity>>>;

    /// Cheap connectivity probe.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;

    /// Attempt to re-establish the backend connection.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
