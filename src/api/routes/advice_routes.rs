//! Advice Routes

use crate::api::handlers::advice_handler::*;
use axum::{Router, routing::get};

use crate::api::app_state::AppState;

pub fn create_advice_router() -> Router<AppState> {
    Router::new()
        .route("/advice/workout", get(workout_advice))
        .route("/advice/diet", get(diet_advice))
}
