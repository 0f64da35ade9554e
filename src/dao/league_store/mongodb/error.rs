use mongodb::error::Error as MongoError;
use thiserror::Error;
use uuid::Uuid;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to query leagues")]
    QueryLeagues {
        #[source]
        source: MongoError,
    },
    #[error("failed to load league `{id}`")]
    LoadLeague {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to apply transition on league `{id}`")]
    TransitionLeague {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to load members of league `{league_id}`")]
    LoadMembers {
        league_id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to update member `{user_id}` of league `{league_id}`")]
    UpdateMember {
        league_id: Uuid,
        user_id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to load teams of league `{league_id}`")]
    LoadTeams {
        league_id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to update team `{team_id}` of league `{league_id}`")]
    UpdateTeam {
        league_id: Uuid,
        team_id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to load matchups of league `{league_id}`")]
    LoadMatchups {
        league_id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to load scores of league `{league_id}`")]
    LoadScores {
        league_id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to save score `{id}`")]
    SaveScore {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to save week result `{id}`")]
    SaveWeekResult {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to save notification batch of {count} record(s)")]
    SaveNotifications {
        count: usize,
        #[source]
        source: MongoError,
    },
    #[error("failed to load hole info for course `{course_id}` tee `{tee_id}`")]
    LoadHoleInfo {
        course_id: String,
        tee_id: String,
        #[source]
        source: MongoError,
    },
}
