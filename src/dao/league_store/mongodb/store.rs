use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::{self, DateTime, Document, doc},
    options::IndexOptions,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{MongoLeagueDocument, doc_id, uuid_as_binary},
};
use crate::dao::{
    league_store::LeagueStore,
    models::{
        ChampionEntity, HoleInfoEntity, LeagueEntity, LeagueStatus, MatchupEntity, MemberEntity,
        MemberPosition, MemberWeekDelta, MemberWeekEntity, NotificationEntity, PrizeEntity,
        ScoreEntity, ScoreStatus, TeamDelta, TeamEntity, WeekResultEntity,
    },
    storage::StorageResult,
};

const LEAGUE_COLLECTION: &str = "leagues";
const MEMBER_COLLECTION: &str = "members";
const TEAM_COLLECTION: &str = "teams";
const MATCHUP_COLLECTION: &str = "matchups";
const SCORE_COLLECTION: &str = "scores";
const WEEK_RESULT_COLLECTION: &str = "week_results";
const NOTIFICATION_COLLECTION: &str = "notifications";
const HOLE_INFO_COLLECTION: &str = "hole_info";

#[derive(Clone)]
pub struct MongoLeagueStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoLeagueStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = self.database().await;

        ensure_index(
            &database,
            LEAGUE_COLLECTION,
            doc! {"status": 1, "play_day": 1},
            "league_status_play_day_idx",
            false,
        )
        .await?;
        ensure_index(
            &database,
            LEAGUE_COLLECTION,
            doc! {"status": 1, "start_date": 1},
            "league_status_start_date_idx",
            false,
        )
        .await?;
        ensure_index(
            &database,
            MEMBER_COLLECTION,
            doc! {"league_id": 1, "user_id": 1},
            "member_league_user_idx",
            true,
        )
        .await?;
        ensure_index(
            &database,
            TEAM_COLLECTION,
            doc! {"league_id": 1},
            "team_league_idx",
            false,
        )
        .await?;
        ensure_index(
            &database,
            MATCHUP_COLLECTION,
            doc! {"league_id": 1, "week": 1},
            "matchup_league_week_idx",
            false,
        )
        .await?;
        ensure_index(
            &database,
            SCORE_COLLECTION,
            doc! {"league_id": 1, "week": 1, "status": 1},
            "score_league_week_status_idx",
            false,
        )
        .await?;
        ensure_index(
            &database,
            NOTIFICATION_COLLECTION,
            doc! {"user_id": 1, "created_at": -1},
            "notification_user_idx",
            false,
        )
        .await?;
        ensure_index(
            &database,
            HOLE_INFO_COLLECTION,
            doc! {"course_id": 1, "tee_id": 1, "hole": 1},
            "hole_info_course_tee_idx",
            true,
        )
        .await?;

        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn league_collection(&self) -> Collection<MongoLeagueDocument> {
        self.database().await.collection(LEAGUE_COLLECTION)
    }

    async fn member_collection(&self) -> Collection<MemberEntity> {
        self.database().await.collection(MEMBER_COLLECTION)
    }

    async fn team_collection(&self) -> Collection<TeamEntity> {
        self.database().await.collection(TEAM_COLLECTION)
    }

    async fn matchup_collection(&self) -> Collection<MatchupEntity> {
        self.database().await.collection(MATCHUP_COLLECTION)
    }

    async fn score_collection(&self) -> Collection<ScoreEntity> {
        self.database().await.collection(SCORE_COLLECTION)
    }

    async fn week_result_collection(&self) -> Collection<WeekResultEntity> {
        self.database().await.collection(WEEK_RESULT_COLLECTION)
    }

    async fn notification_collection(&self) -> Collection<NotificationEntity> {
        self.database().await.collection(NOTIFICATION_COLLECTION)
    }

    async fn hole_info_collection(&self) -> Collection<HoleInfoEntity> {
        self.database().await.collection(HOLE_INFO_COLLECTION)
    }

    async fn query_leagues(&self, filter: Document) -> MongoResult<Vec<LeagueEntity>> {
        let documents: Vec<MongoLeagueDocument> = self
            .league_collection()
            .await
            .find(filter)
            .await
            .map_err(|source| MongoDaoError::QueryLeagues { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::QueryLeagues { source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    /// Apply a guarded league update: the filter re-checks the transition
    /// precondition, so a lost race shows up as zero modified documents.
    async fn guarded_update(
        &self,
        league_id: Uuid,
        mut filter: Document,
        update: Document,
    ) -> MongoResult<bool> {
        filter.insert("_id", uuid_as_binary(league_id));
        let result = self
            .league_collection()
            .await
            .update_one(filter, update)
            .await
            .map_err(|source| MongoDaoError::TransitionLeague {
                id: league_id,
                source,
            })?;
        Ok(result.modified_count > 0)
    }
}

async fn ensure_index(
    database: &Database,
    collection: &'static str,
    keys: Document,
    name: &'static str,
    unique: bool,
) -> MongoResult<()> {
    let index = IndexModel::builder()
        .keys(keys)
        .options(
            IndexOptions::builder()
                .name(Some(name.to_owned()))
                .unique(unique.then_some(true))
                .build(),
        )
        .build();

    database
        .collection::<Document>(collection)
        .create_index(index)
        .await
        .map_err(|source| MongoDaoError::EnsureIndex {
            collection,
            index: name,
            source,
        })?;
    Ok(())
}

impl MongoLeagueStore {
    async fn find_league(&self, id: Uuid) -> MongoResult<Option<LeagueEntity>> {
        let document = self
            .league_collection()
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadLeague { id, source })?;
        Ok(document.map(Into::into))
    }

    async fn active_members(&self, league_id: Uuid) -> MongoResult<Vec<MemberEntity>> {
        self.member_collection()
            .await
            .find(doc! {"league_id": uuid_as_binary(league_id), "status": "active"})
            .await
            .map_err(|source| MongoDaoError::LoadMembers { league_id, source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::LoadMembers { league_id, source })
    }

    async fn apply_member_result(
        &self,
        league_id: Uuid,
        user_id: Uuid,
        delta: MemberWeekDelta,
    ) -> MongoResult<()> {
        let snapshot = MemberWeekEntity {
            placement: delta.placement,
            points: delta.points,
            net: delta.net,
            gross: delta.gross,
        };
        let snapshot_bson =
            bson::serialize_to_bson(&snapshot).map_err(|source| MongoDaoError::UpdateMember {
                league_id,
                user_id,
                source: source.into(),
            })?;

        self.member_collection()
            .await
            .update_one(
                doc! {"league_id": uuid_as_binary(league_id), "user_id": uuid_as_binary(user_id)},
                doc! {
                    "$inc": {
                        "total_points": i64::from(delta.points),
                        "rounds_played": 1,
                        "net_sum": i64::from(delta.net),
                        "gross_sum": i64::from(delta.gross),
                        "wins": i64::from(delta.won_week),
                    },
                    "$set": {
                        format!("weekly.{}", delta.week): snapshot_bson,
                    },
                },
            )
            .await
            .map_err(|source| MongoDaoError::UpdateMember {
                league_id,
                user_id,
                source,
            })?;
        Ok(())
    }

    async fn set_member_positions(
        &self,
        league_id: Uuid,
        positions: Vec<MemberPosition>,
    ) -> MongoResult<()> {
        let collection = self.member_collection().await;
        for entry in positions {
            let previous = match entry.previous_position {
                Some(position) => bson::Bson::from(i64::from(position)),
                None => bson::Bson::Null,
            };
            collection
                .update_one(
                    doc! {
                        "league_id": uuid_as_binary(league_id),
                        "user_id": uuid_as_binary(entry.user_id),
                    },
                    doc! {"$set": {
                        "position": i64::from(entry.position),
                        "previous_position": previous,
                    }},
                )
                .await
                .map_err(|source| MongoDaoError::UpdateMember {
                    league_id,
                    user_id: entry.user_id,
                    source,
                })?;
        }
        Ok(())
    }

    async fn league_teams(&self, league_id: Uuid) -> MongoResult<Vec<TeamEntity>> {
        self.team_collection()
            .await
            .find(doc! {"league_id": uuid_as_binary(league_id)})
            .await
            .map_err(|source| MongoDaoError::LoadTeams { league_id, source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::LoadTeams { league_id, source })
    }

    async fn apply_team_outcome(
        &self,
        league_id: Uuid,
        team_id: Uuid,
        delta: TeamDelta,
    ) -> MongoResult<()> {
        self.team_collection()
            .await
            .update_one(
                doc! {"league_id": uuid_as_binary(league_id), "_id": uuid_as_binary(team_id)},
                doc! {"$inc": {
                    "wins": i64::from(delta.wins),
                    "losses": i64::from(delta.losses),
                    "ties": i64::from(delta.ties),
                    "total_points": i64::from(delta.points),
                }},
            )
            .await
            .map_err(|source| MongoDaoError::UpdateTeam {
                league_id,
                team_id,
                source,
            })?;
        Ok(())
    }

    async fn week_matchups(&self, league_id: Uuid, week: u32) -> MongoResult<Vec<MatchupEntity>> {
        self.matchup_collection()
            .await
            .find(doc! {"league_id": uuid_as_binary(league_id), "week": week})
            .await
            .map_err(|source| MongoDaoError::LoadMatchups { league_id, source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::LoadMatchups { league_id, source })
    }

    async fn scores_for_week(
        &self,
        league_id: Uuid,
        week: u32,
        statuses: Vec<ScoreStatus>,
    ) -> MongoResult<Vec<ScoreEntity>> {
        let statuses: Vec<&str> = statuses.iter().map(ScoreStatus::as_str).collect();
        self.score_collection()
            .await
            .find(doc! {
                "league_id": uuid_as_binary(league_id),
                "week": week,
                "status": {"$in": statuses},
            })
            .await
            .map_err(|source| MongoDaoError::LoadScores { league_id, source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::LoadScores { league_id, source })
    }

    async fn tee_holes(&self, course_id: String, tee_id: String) -> MongoResult<Vec<HoleInfoEntity>> {
        self.hole_info_collection()
            .await
            .find(doc! {"course_id": course_id.as_str(), "tee_id": tee_id.as_str()})
            .sort(doc! {"hole": 1})
            .await
            .map_err(|source| MongoDaoError::LoadHoleInfo {
                course_id: course_id.clone(),
                tee_id: tee_id.clone(),
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::LoadHoleInfo {
                course_id,
                tee_id,
                source,
            })
    }
}

impl LeagueStore for MongoLeagueStore {
    fn leagues_starting(
        &self,
        status: LeagueStatus,
        start_date: String,
    ) -> BoxFuture<'static, StorageResult<Vec<LeagueEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .query_leagues(doc! {"status": status.as_str(), "start_date": start_date})
                .await
                .map_err(Into::into)
        })
    }

    fn leagues_by_play_day(
        &self,
        status: LeagueStatus,
        play_day: String,
    ) -> BoxFuture<'static, StorageResult<Vec<LeagueEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .query_leagues(doc! {"status": status.as_str(), "play_day": play_day})
                .await
                .map_err(Into::into)
        })
    }

    fn find_league(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<LeagueEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_league(id).await.map_err(Into::into) })
    }

    fn claim_start_notice(
        &self,
        league_id: Uuid,
        date_key: String,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .guarded_update(
                    league_id,
                    doc! {
                        "status": LeagueStatus::Upcoming.as_str(),
                        "last_notified_starting": {"$ne": date_key.as_str()},
                    },
                    doc! {"$set": {
                        "last_notified_starting": date_key.as_str(),
                        "updated_at": DateTime::now(),
                    }},
                )
                .await
                .map_err(Into::into)
        })
    }

    fn activate_league(
        &self,
        league_id: Uuid,
        date_key: String,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .guarded_update(
                    league_id,
                    doc! {"status": LeagueStatus::Upcoming.as_str()},
                    doc! {"$set": {
                        "status": LeagueStatus::Active.as_str(),
                        "current_week": 1,
                        "last_activated": date_key.as_str(),
                        "updated_at": DateTime::now(),
                    }},
                )
                .await
                .map_err(Into::into)
        })
    }

    fn claim_reminder(
        &self,
        league_id: Uuid,
        reminder_key: String,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .guarded_update(
                    league_id,
                    doc! {
                        "status": LeagueStatus::Active.as_str(),
                        "last_score_reminder": {"$ne": reminder_key.as_str()},
                    },
                    doc! {"$set": {
                        "last_score_reminder": reminder_key.as_str(),
                        "updated_at": DateTime::now(),
                    }},
                )
                .await
                .map_err(Into::into)
        })
    }

    fn advance_week(
        &self,
        league_id: Uuid,
        processed_week: u32,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .guarded_update(
                    league_id,
                    doc! {
                        "status": LeagueStatus::Active.as_str(),
                        "current_week": processed_week,
                        "last_processed_week": {"$ne": processed_week},
                    },
                    doc! {"$set": {
                        "last_processed_week": processed_week,
                        "current_week": processed_week + 1,
                        "updated_at": DateTime::now(),
                    }},
                )
                .await
                .map_err(Into::into)
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
            let champion_bson =
                bson::serialize_to_bson(&champion).map_err(|source| MongoDaoError::TransitionLeague {
                    id: league_id,
                    source: source.into(),
                })?;
            let prize_bson = match &prize {
                Some(prize) => {
                    bson::serialize_to_bson(prize).map_err(|source| MongoDaoError::TransitionLeague {
                        id: league_id,
                        source: source.into(),
                    })?
                }
                None => bson::Bson::Null,
            };

            store
                .guarded_update(
                    league_id,
                    doc! {
                        "status": LeagueStatus::Active.as_str(),
                        "current_week": processed_week,
                        "last_processed_week": {"$ne": processed_week},
                    },
                    doc! {"$set": {
                        "status": LeagueStatus::Completed.as_str(),
                        "last_processed_week": processed_week,
                        "champion": champion_bson,
                        "championship_prize": prize_bson,
                        "updated_at": DateTime::now(),
                    }},
                )
                .await
                .map_err(Into::into)
        })
    }

    fn active_members(
        &self,
        league_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<MemberEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.active_members(league_id).await.map_err(Into::into) })
    }

    fn apply_member_result(
        &self,
        league_id: Uuid,
        user_id: Uuid,
        delta: MemberWeekDelta,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .apply_member_result(league_id, user_id, delta)
                .await
                .map_err(Into::into)
        })
    }

    fn set_member_positions(
        &self,
        league_id: Uuid,
        positions: Vec<MemberPosition>,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .set_member_positions(league_id, positions)
                .await
                .map_err(Into::into)
        })
    }

    fn teams(&self, league_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.league_teams(league_id).await.map_err(Into::into) })
    }

    fn apply_team_outcome(
        &self,
        league_id: Uuid,
        team_id: Uuid,
        delta: TeamDelta,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .apply_team_outcome(league_id, team_id, delta)
                .await
                .map_err(Into::into)
        })
    }

    fn matchups(
        &self,
        league_id: Uuid,
        week: u32,
    ) -> BoxFuture<'static, StorageResult<Vec<MatchupEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .week_matchups(league_id, week)
                .await
                .map_err(Into::into)
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
            store
                .scores_for_week(league_id, week, statuses)
                .await
                .map_err(Into::into)
        })
    }

    fn insert_score(&self, score: ScoreEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let id = score.id;
            store
                .score_collection()
                .await
                .insert_one(&score)
                .await
                .map_err(|source| MongoDaoError::SaveScore { id, source })?;
            Ok(())
        })
    }

    fn insert_week_result(
        &self,
        result: WeekResultEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let id = result.id;
            store
                .week_result_collection()
                .await
                .insert_one(&result)
                .await
                .map_err(|source| MongoDaoError::SaveWeekResult { id, source })?;
            Ok(())
        })
    }

    fn insert_notifications(
        &self,
        notifications: Vec<NotificationEntity>,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            if notifications.is_empty() {
                return Ok(());
            }
            let count = notifications.len();
            store
                .notification_collection()
                .await
                .insert_many(&notifications)
                .await
                .map_err(|source| MongoDaoError::SaveNotifications { count, source })?;
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
            store
                .tee_holes(course_id, tee_id)
                .await
                .map_err(Into::into)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
