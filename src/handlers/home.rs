// src/handlers/home.rs

use axum::{
    Extension, Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{
    error::AppError,
    models::history::HomeView,
    services::{exposure::question_stats, session::SessionId},
    state::AppState,
};

/// Query parameters carried back to the home page after a soft failure.
#[derive(Debug, Deserialize)]
pub struct HomeParams {
    pub error: Option<String>,
}

/// Home page: pool size and how often each question has been drawn.
pub async fn home(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Query(params): Query<HomeParams>,
) -> Result<impl IntoResponse, AppError> {
    let history = state.history.load().await?;
    let question_stats = question_stats(&state.pool, &history);

    let error = params.error.map(|code| match code.as_str() {
        "no_questions" => "No questions available in the pool.".to_string(),
        _ => code,
    });

    Ok(Json(HomeView {
        total_pool_questions: state.pool.len(),
        question_stats,
        has_active_exam: state.sessions.contains(&session_id).await,
        error,
    }))
}
