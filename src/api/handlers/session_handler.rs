use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    api::{app_state::AppState, dto::session_dto::*},
    error::AppError,
    services::session::ChatSession,
};

pub(crate) fn session_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Session not found: {}", id))
}

pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let preferences = request.into_preferences();
    debug!(
        "Creating new session: goal={}, experience={}",
        preferences.goal, preferences.experience
    );

    let session = ChatSession::open(preferences, state.chat_model.clone(), &state.settings);
    let response = CreateSessionResponse {
        id: session.id().to_string(),
        created_at: session.created_at(),
        preferences: session.preferences().clone(),
    };

    state.sessions.insert(session);
    state.metrics.session_opened();

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Getting session: {}", id);

    let shared = state
        .sessions
        .get(&id)
        .ok_or_else(|| session_not_found(&id))?;
    let session = shared.lock().await;

    let mean = session.transcript().mean_metric();
    let response = SessionSummaryResponse {
        id: session.id().to_string(),
        created_at: session.created_at(),
        preferences: session.preferences().clone(),
        model: session.client().model_name(),
        turns: session.transcript().len(),
        mean_bleu: mean.map(|m| m.bleu),
        mean_wer: mean.map(|m| m.wer),
    };

    Ok(Json(response))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Deleting session: {}", id);

    let shared = state
        .sessions
        .remove(&id)
        .ok_or_else(|| session_not_found(&id))?;
    state.metrics.session_closed();

    // 仍有进行中的提问时只读取轮次数，会话在最后一个句柄释放时销毁
    let turns = match Arc::try_unwrap(shared) {
        Ok(session) => session.into_inner().close().len(),
        Err(shared) => shared.lock().await.transcript().len(),
    };

    info!(session_id = %id, turns, "Session deleted");
    Ok(Json(DeleteSessionResponse { id, turns }))
}
