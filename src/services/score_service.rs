//! Score intake: turn a posted gross card into a stored pending score
//! with allocated strokes and computed totals.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dao::models::{LeagueStatus, ScoreEntity, ScoreStatus},
    dto::scores::{ScoreSummary, SubmitScoreRequest},
    engine::handicap::{self, RoundTotals},
    error::ServiceError,
    state::SharedState,
};

/// Validate a submission against the league and course data, compute the
/// stroke allocation and totals, and persist a pending score card.
pub async fn submit_score(
    state: &SharedState,
    league_id: Uuid,
    request: SubmitScoreRequest,
) -> Result<ScoreSummary, ServiceError> {
    let store = state.require_league_store().await?;

    let Some(league) = store.find_league(league_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "league `{league_id}` not found"
        )));
    };
    if league.status != LeagueStatus::Active {
        return Err(ServiceError::InvalidState(format!(
            "league `{}` is not accepting scores",
            league.name
        )));
    }
    if request.week > league.total_weeks {
        return Err(ServiceError::InvalidInput(format!(
            "week {} is past the {}-week season",
            request.week, league.total_weeks
        )));
    }
    if request.hole_scores.len() != league.holes_per_round as usize {
        return Err(ServiceError::InvalidInput(format!(
            "expected {} hole scores, got {}",
            league.holes_per_round,
            request.hole_scores.len()
        )));
    }

    let tee = store
        .hole_info(request.course_id.clone(), request.tee_id.clone())
        .await?;
    if tee.len() != league.holes_per_round as usize
        || tee
            .iter()
            .any(|h| h.stroke_index == 0 || h.stroke_index > league.holes_per_round)
    {
        warn!(
            league_id = %league.id,
            course_id = %request.course_id,
            tee_id = %request.tee_id,
            "course stroke-index data missing or malformed"
        );
        return Err(ServiceError::MissingConfiguration(format!(
            "no usable hole data for tee `{}` on course `{}`",
            request.tee_id, request.course_id
        )));
    }

    let course_handicap = handicap::course_handicap(
        request.handicap_index,
        request.slope_rating,
        league.holes_per_round,
    );
    let holes = handicap::score_round(course_handicap, &tee, &request.hole_scores);
    let totals = RoundTotals::of(&holes);

    let score = ScoreEntity {
        id: Uuid::new_v4(),
        league_id: league.id,
        user_id: request.user_id,
        week: request.week,
        course_id: request.course_id,
        tee_id: request.tee_id,
        course_handicap,
        holes,
        gross_total: totals.total.gross,
        net_total: totals.total.adjusted,
        status: ScoreStatus::Pending,
        submitted_at: Utc::now(),
    };
    store.insert_score(score.clone()).await?;
    info!(
        league_id = %league.id,
        user_id = %score.user_id,
        week = score.week,
        net = ?score.net_total,
        "score card stored"
    );

    Ok(score.into())
}
