use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use std::time::Instant;
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::query_dto::*, handlers::session_handler::session_not_found},
    error::AppError,
};

pub async fn submit_query(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SubmitQueryRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;
    debug!("Submitting query to session: {}", id);

    let shared = state
        .sessions
        .get(&id)
        .ok_or_else(|| session_not_found(&id))?;

    let started = Instant::now();
    let report = {
        let mut session = shared.lock().await;
        session.process_query(&state.corpus, &request.query).await
    };
    state
        .metrics
        .record_query(started.elapsed().as_millis() as u64, report.turn.is_failed());

    Ok(Json(QueryResponse::from(report)))
}

pub async fn get_transcript(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Getting transcript: {}", id);

    let shared = state
        .sessions
        .get(&id)
        .ok_or_else(|| session_not_found(&id))?;
    let session = shared.lock().await;

    Ok(Json(TranscriptResponse::new(session.id(), session.transcript())))
}
