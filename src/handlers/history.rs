// src/handlers/history.rs

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    error::AppError,
    models::history::{HistorySummary, ResultsView},
    services::explanation,
    state::AppState,
    utils::redirect::found,
};

/// Lists past attempts, most recent first.
pub async fn list_history(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let summaries: Vec<HistorySummary> = state
        .history
        .recent()
        .await?
        .iter()
        .map(HistorySummary::from)
        .collect();

    Ok(Json(summaries))
}

/// Replays the results view of one past attempt. Read-only.
pub async fn get_history_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Some(record) = state.history.find(&id).await? else {
        return Ok(found("/history"));
    };

    let explanations = explanation::load(&state.config.explanations_path).await;
    Ok(Json(ResultsView::from_record(record, &explanations)).into_response())
}

/// Deletes every history record.
pub async fn clear_history(State(state): State<AppState>) -> Result<Response, AppError> {
    state.history.replace_all(Vec::new()).await?;
    tracing::info!("Exam history cleared");
    Ok(found("/history"))
}
