use mongodb::bson::{Binary, DateTime, Document, doc, spec::BinarySubtype};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{
    ChampionEntity, ElevatedEntity, LeagueEntity, LeagueFormat, LeagueStatus, PrizeEntity,
    PurseEntity, TeamScoringEntity,
};
use crate::engine::purse;

/// Stored league document.
///
/// Early league documents carried flat purse/elevated fields instead of
/// the nested config structs; both shapes deserialize here and are folded
/// onto the canonical entity once, at read time, so the scoring logic
/// never sees the legacy shape. Writes always emit the canonical shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoLeagueDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    name: String,
    format: LeagueFormat,
    holes_per_round: u32,
    total_weeks: u32,
    play_day: String,
    tee_time: String,
    start_date: String,
    status: LeagueStatus,
    current_week: u32,
    #[serde(default)]
    purse: Option<PurseEntity>,
    #[serde(default)]
    elevated: Option<ElevatedEntity>,
    #[serde(default)]
    team_scoring: Option<TeamScoringEntity>,
    #[serde(default)]
    champion: Option<ChampionEntity>,
    #[serde(default)]
    championship_prize: Option<PrizeEntity>,
    #[serde(default)]
    last_notified_starting: Option<String>,
    #[serde(default)]
    last_activated: Option<String>,
    #[serde(default)]
    last_score_reminder: Option<String>,
    #[serde(default)]
    last_processed_week: Option<u32>,
    created_at: DateTime,
    updated_at: DateTime,

    // Legacy flat purse shape.
    #[serde(default, skip_serializing)]
    season_pool: Option<u32>,
    #[serde(default, skip_serializing)]
    weekly_pool: Option<u32>,
    #[serde(default, skip_serializing)]
    elevated_pool: Option<u32>,
    #[serde(default, skip_serializing)]
    purse_currency: Option<String>,
    // Legacy flat elevated-week shape.
    #[serde(default, skip_serializing)]
    elevated_weeks: Option<Vec<u32>>,
    #[serde(default, skip_serializing)]
    elevated_multiplier: Option<f64>,
}

impl From<LeagueEntity> for MongoLeagueDocument {
    fn from(value: LeagueEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            format: value.format,
            holes_per_round: value.holes_per_round,
            total_weeks: value.total_weeks,
            play_day: value.play_day,
            tee_time: value.tee_time,
            start_date: value.start_date,
            status: value.status,
            current_week: value.current_week,
            purse: value.purse,
            elevated: value.elevated,
            team_scoring: value.team_scoring,
            champion: value.champion,
            championship_prize: value.championship_prize,
            last_notified_starting: value.last_notified_starting,
            last_activated: value.last_activated,
            last_score_reminder: value.last_score_reminder,
            last_processed_week: value.last_processed_week,
            created_at: DateTime::from_millis(value.created_at.timestamp_millis()),
            updated_at: DateTime::from_millis(value.updated_at.timestamp_millis()),
            season_pool: None,
            weekly_pool: None,
            elevated_pool: None,
            purse_currency: None,
            elevated_weeks: None,
            elevated_multiplier: None,
        }
    }
}

impl From<MongoLeagueDocument> for LeagueEntity {
    fn from(value: MongoLeagueDocument) -> Self {
        let raw_purse = value.purse.or_else(|| {
            let any_pool = value.season_pool.is_some()
                || value.weekly_pool.is_some()
                || value.elevated_pool.is_some();
            any_pool.then(|| PurseEntity {
                season_pool: value.season_pool.unwrap_or(0),
                weekly_pool: value.weekly_pool.unwrap_or(0),
                elevated_pool: value.elevated_pool.unwrap_or(0),
                currency: value.purse_currency.clone().unwrap_or_else(|| "USD".into()),
            })
        });
        let elevated = value.elevated.or_else(|| {
            value
                .elevated_weeks
                .filter(|weeks| !weeks.is_empty())
                .map(|weeks| ElevatedEntity {
                    weeks,
                    multiplier: value
                        .elevated_multiplier
                        .filter(|m| *m > 0.0)
                        .unwrap_or(purse::DEFAULT_ELEVATED_MULTIPLIER),
                })
        });

        Self {
            id: value.id,
            name: value.name,
            format: value.format,
            holes_per_round: value.holes_per_round,
            total_weeks: value.total_weeks,
            play_day: value.play_day,
            tee_time: value.tee_time,
            start_date: value.start_date,
            status: value.status,
            current_week: value.current_week,
            purse: purse::normalize(raw_purse),
            elevated,
            team_scoring: value.team_scoring,
            champion: value.champion,
            championship_prize: value.championship_prize,
            last_notified_starting: value.last_notified_starting,
            last_activated: value.last_activated,
            last_score_reminder: value.last_score_reminder,
            last_processed_week: value.last_processed_week,
            created_at: chrono::DateTime::from_timestamp_millis(value.created_at.timestamp_millis())
                .unwrap_or_default(),
            updated_at: chrono::DateTime::from_timestamp_millis(value.updated_at.timestamp_millis())
                .unwrap_or_default(),
        }
    }
}

pub fn uuid_as_binary(id: Uuid) -> Binary {
    Binary {
        subtype: BinarySubtype::Uuid,
        bytes: id.into_bytes().to_vec(),
    }
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": uuid_as_binary(id)}
}
