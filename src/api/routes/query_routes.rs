//! Query Routes
//!
//! 会话内提问与会话记录。

use crate::api::handlers::query_handler::*;
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::app_state::AppState;

pub fn create_query_router() -> Router<AppState> {
    Router::new()
        .route("/sessions/:id/queries", post(submit_query))
        .route("/sessions/:id/transcript", get(get_transcript))
}
