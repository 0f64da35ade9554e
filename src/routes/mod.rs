use axum::Router;

use crate::state::SharedState;

pub mod health;
pub mod process;
pub mod scores;

/// Compose all route trees, wiring in shared state.
pub fn router(state: SharedState) -> Router<()> {
    health::router()
        .merge(process::router())
        .merge(scores::router())
        .with_state(state)
}
