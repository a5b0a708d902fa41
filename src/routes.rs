// src/routes.rs

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{
    handlers::{exam, history, home, study},
    state::AppState,
    utils::session_cookie::session_middleware,
};

/// Assembles the main application router.
///
/// * Exam lifecycle: start, question view, answer submission, results.
/// * History and study views.
/// * Applies global middleware (Trace, session cookie).
pub fn create_router(state: AppState) -> Router {
    let exam_routes = Router::new()
        .route("/start", post(exam::start_exam))
        .route("/exam/{q_num}", get(exam::show_question))
        .route("/submit-answer", post(exam::submit_answer))
        .route("/results", get(exam::finish_exam));

    let history_routes = Router::new()
        .route("/", get(history::list_history))
        .route("/clear", post(history::clear_history))
        .route("/{id}", get(history::get_history_entry));

    Router::new()
        .route("/", get(home::home))
        .route("/study", get(study::study))
        .merge(exam_routes)
        .nest("/history", history_routes)
        // Global Middleware (applied from outside in)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
