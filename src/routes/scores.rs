use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::scores::SubmitScoreRequest, error::AppError, services::score_service,
    state::SharedState,
};

/// Accept a gross score card for a league week, compute the stroke
/// allocation and totals, and store it pending approval.
pub async fn submit_score(
    State(state): State<SharedState>,
    Path(league_id): Path<Uuid>,
    Valid(Json(request)): Valid<Json<SubmitScoreRequest>>,
) -> Result<impl IntoResponse, AppError> {
    let summary = score_service::submit_score(&state, league_id, request).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// Configure the score routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/leagues/{league_id}/scores", post(submit_score))
}
