use axum::{Json, Router, extract::State, routing::post};
use chrono::Utc;

use crate::{
    dto::process::TickReport, error::AppError, services::processor, state::SharedState,
};

/// Run one processor tick. The platform scheduler hits this endpoint
/// several times a day; it takes no arguments and is safe to repeat.
pub async fn process(State(state): State<SharedState>) -> Result<Json<TickReport>, AppError> {
    let report = processor::run_tick(&state, Utc::now()).await?;
    Ok(Json(report))
}

/// Configure the internal processing routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/internal/process", post(process))
}
