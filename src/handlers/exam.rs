// src/handlers/exam.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use validator::Validate;

use crate::{
    error::{AppError, ExamError},
    models::{
        exam_session::{AnswerSet, ExamQuestionView, ExamSelection, NavAction, SubmitAnswerRequest},
        history::{HistoryRecord, ResultsView},
        question::PublicQuestion,
    },
    services::{
        explanation,
        exposure::exposure_counts,
        scorer::{build_record, score},
        selector::select_exam,
        session::{SessionId, current_question, record_answer, start_session},
    },
    state::AppState,
    storage::question_pool::QuestionPool,
    utils::redirect::found,
};

/// Draws a selection with a thread-local random source.
/// Kept synchronous so the generator never lives across an await.
fn draw_exam(
    pool: &QuestionPool,
    history: &[HistoryRecord],
    limit: usize,
) -> Result<ExamSelection, ExamError> {
    let exposure = exposure_counts(pool, history);
    select_exam(pool.questions(), &exposure, limit, &mut rand::thread_rng())
}

/// Starts a new exam, replacing any unfinished one.
///
/// * Least-exposed questions are drawn first, ties shuffled.
/// * Redirects to the first question, or home with an error flag if the pool is empty.
pub async fn start_exam(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
) -> Result<Response, AppError> {
    if state.pool.is_empty() {
        tracing::warn!("Exam start refused: question pool is empty");
        return Ok(found("/?error=no_questions"));
    }

    let history = state.history.load().await?;

    let selection = match draw_exam(&state.pool, &history, state.config.exam_question_limit) {
        Ok(selection) => selection,
        Err(ExamError::NoQuestionsAvailable) => return Ok(found("/?error=no_questions")),
    };

    tracing::info!(
        "Starting exam with {} questions (pool size {})",
        selection.questions.len(),
        state.pool.len()
    );

    let session = start_session(selection, state.config.exam_time_limit_secs);
    state.sessions.insert(&session_id, session).await;

    Ok(found("/exam/1"))
}

/// Shows one question of the active exam.
/// Without an exam, or for an id outside it, redirects home.
pub async fn show_question(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Path(q_num): Path<String>,
) -> Response {
    let Some(session) = state.sessions.get(&session_id).await else {
        return found("/");
    };

    let Some(question) = q_num
        .parse::<u32>()
        .ok()
        .and_then(|n| current_question(&session, n))
    else {
        return found("/");
    };

    let elapsed = session.elapsed_seconds(Utc::now());

    Json(ExamQuestionView {
        q_num: question.id,
        total_questions: session.total_questions(),
        question: PublicQuestion::from(question),
        selected_answers: session
            .user_answers
            .get(&question.id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default(),
        answered_questions: session.user_answers.keys().copied().collect(),
        start_time: session.start_time,
        time_limit_seconds: session.time_limit_seconds,
        remaining_seconds: session.time_limit_seconds.saturating_sub(elapsed),
    })
    .into_response()
}

/// Where to go after an answer submission. `jumpTo` beats `action`.
fn next_location(req: &SubmitAnswerRequest) -> String {
    if let Some(target) = req.jump_to {
        return format!("/exam/{}", target);
    }
    match req.action {
        Some(NavAction::Next) => format!("/exam/{}", req.q_num + 1),
        Some(NavAction::Back) => format!("/exam/{}", req.q_num.saturating_sub(1)),
        Some(NavAction::Finish) => "/results".to_string(),
        None => format!("/exam/{}", req.q_num),
    }
}

/// Records the answer for `qNum` and redirects according to the navigation fields.
pub async fn submit_answer(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<Response, AppError> {
    if let Err(validation_errors) = req.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let raw_answer = req.answer_set();

    let outcome = state
        .sessions
        .update(&session_id, |session| {
            let Some(question) = current_question(session, req.q_num) else {
                return Ok(false);
            };

            let mut answer = AnswerSet::new();
            for token in &raw_answer {
                let Some(canonical) = question.canonical_token(token) else {
                    return Err(AppError::BadRequest(format!(
                        "'{}' is not an option of question {}",
                        token, req.q_num
                    )));
                };
                answer.insert(canonical);
            }

            Ok(record_answer(session, req.q_num, answer))
        })
        .await;

    match outcome {
        None => return Ok(found("/")),
        Some(Err(e)) => return Err(e),
        Some(Ok(false)) => {
            tracing::warn!("Ignoring answer for unknown exam question {}", req.q_num);
        }
        Some(Ok(true)) => {}
    }

    Ok(found(&next_location(&req)))
}

/// Finalizes the active exam: scores it, appends a history record and
/// discards the session.
///
/// The session is removed before scoring, so a repeated call finds none and
/// redirects to the latest history entry instead of recording twice.
pub async fn finish_exam(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
) -> Result<Response, AppError> {
    let Some(session) = state.sessions.take(&session_id).await else {
        return Ok(match state.history.latest().await? {
            Some(latest) => found(&format!("/history/{}", latest.id)),
            None => found("/"),
        });
    };

    let finished_at = Utc::now();
    let summary = score(&session);

    let record = build_record(&session, summary, finished_at);

    if record.time_limit_seconds > 0 && record.elapsed_seconds > record.time_limit_seconds {
        tracing::warn!(
            "Exam finished after the time limit ({}s > {}s); accepting anyway",
            record.elapsed_seconds,
            record.time_limit_seconds
        );
    }

    let record = match state.history.append(record).await {
        Ok(stored) => stored,
        Err(e) => {
            tracing::error!("Failed to persist exam result: {}", e);
            state.sessions.insert(&session_id, session).await;
            return Err(e);
        }
    };

    tracing::info!(
        "Exam {} scored {}/{} ({:.2}%)",
        record.id,
        record.correct_count,
        record.total_questions,
        record.score
    );

    let explanations = explanation::load(&state.config.explanations_path).await;
    Ok(Json(ResultsView::from_record(record, &explanations)).into_response())
}
