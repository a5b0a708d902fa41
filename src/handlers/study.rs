// src/handlers/study.rs

use axum::{Json, extract::State, response::IntoResponse};

use crate::{models::question::StudyItem, services::explanation, state::AppState};

const NO_EXPLANATION: &str = "No detailed explanation available.";

/// Study mode: every pool question in pool order with its answer key and explanation.
pub async fn study(State(state): State<AppState>) -> impl IntoResponse {
    let explanations = explanation::load(&state.config.explanations_path).await;

    let items: Vec<StudyItem> = state
        .pool
        .questions()
        .iter()
        .map(|q| StudyItem {
            q_num: q.id,
            question: q.clone(),
            correct_options: q.correct_tokens(),
            explanation: explanations
                .get(&q.id)
                .cloned()
                .unwrap_or_else(|| NO_EXPLANATION.to_string()),
        })
        .collect();

    Json(items)
}
