use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dao::models::{ScoreEntity, ScoreStatus};

/// Gross hole scores posted by the score-entry flow. Stroke allocation
/// and net totals are computed server-side from course reference data.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitScoreRequest {
    /// Submitting member's user id.
    pub user_id: Uuid,
    /// Week the round belongs to.
    #[validate(range(min = 1))]
    pub week: u32,
    /// Course the round was played on.
    #[validate(length(min = 1))]
    pub course_id: String,
    /// Tee set the round was played from.
    #[validate(length(min = 1))]
    pub tee_id: String,
    /// The player's handicap index.
    #[validate(range(min = -10.0, max = 54.0))]
    pub handicap_index: f64,
    /// Slope rating of the played tee.
    #[validate(range(min = 55, max = 155))]
    pub slope_rating: u32,
    /// Gross strokes per hole in hole order; `null` for unscored holes.
    #[validate(length(min = 1, max = 18))]
    pub hole_scores: Vec<Option<u32>>,
}

/// Summary of a persisted score card.
#[derive(Debug, Serialize)]
pub struct ScoreSummary {
    /// Primary key of the score card.
    pub id: Uuid,
    /// Submitting member's user id.
    pub user_id: Uuid,
    /// Week the round belongs to.
    pub week: u32,
    /// Course handicap used for stroke allocation.
    pub course_handicap: i32,
    /// Gross total; absent while any hole is unscored.
    pub gross_total: Option<u32>,
    /// Net total; absent while any hole is unscored.
    pub net_total: Option<i32>,
    /// Approval status.
    pub status: ScoreStatus,
}

impl From<ScoreEntity> for ScoreSummary {
    fn from(score: ScoreEntity) -> Self {
        Self {
            id: score.id,
            user_id: score.user_id,
            week: score.week,
            course_handicap: score.course_handicap,
            gross_total: score.gross_total,
            net_total: score.net_total,
            status: score.status,
        }
    }
}
