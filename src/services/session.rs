// src/services/session.rs

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use crate::models::{
    exam_session::{AnswerSet, ExamSelection, ExamSession},
    question::PoolQuestion,
};

/// Opaque per-browser session token, injected by the session middleware.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(pub String);

/// Creates a fresh exam session from a selection.
pub fn start_session(selection: ExamSelection, time_limit_seconds: u64) -> ExamSession {
    ExamSession {
        questions: selection.questions,
        question_map: selection.question_map,
        user_answers: Default::default(),
        start_time: Utc::now(),
        time_limit_seconds,
    }
}

/// Stores the answer for one exam question, replacing any earlier one.
///
/// An empty set is stored as-is: the question then counts as visited and
/// cleared. Returns `false` when the exam has no question `exam_q_num`.
pub fn record_answer(session: &mut ExamSession, exam_q_num: u32, answer: AnswerSet) -> bool {
    if current_question(session, exam_q_num).is_none() {
        return false;
    }
    session.user_answers.insert(exam_q_num, answer);
    true
}

/// Looks up an exam question by its exam-local id.
pub fn current_question(session: &ExamSession, exam_q_num: u32) -> Option<&PoolQuestion> {
    // Exam ids are 1..K in order, so the id doubles as a position.
    let index = (exam_q_num as usize).checked_sub(1)?;
    session.questions.get(index).filter(|q| q.id == exam_q_num)
}

/// Server-side exam sessions keyed by session token.
///
/// Sessions have no expiry of their own. An entry older than the cookie
/// lifetime can no longer be reached, so it is purged when a new exam starts.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, ExamSession>>>,
    max_age: Duration,
}

impl SessionStore {
    pub fn new(max_age_secs: u64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            // Capped at ten years to stay inside chrono's range.
            max_age: Duration::seconds(max_age_secs.min(10 * 365 * 24 * 3600) as i64),
        }
    }

    /// Installs a new exam for `id`, replacing any unfinished one.
    pub async fn insert(&self, id: &SessionId, session: ExamSession) {
        let mut sessions = self.sessions.write().await;
        let cutoff = Utc::now() - self.max_age;
        let before = sessions.len();
        sessions.retain(|_, s| s.start_time > cutoff);
        let purged = before - sessions.len();
        if purged > 0 {
            tracing::debug!("Purged {} expired exam sessions", purged);
        }
        sessions.insert(id.clone(), session);
    }

    pub async fn get(&self, id: &SessionId) -> Option<ExamSession> {
        self.sessions.read().await.get(id).cloned()
    }

    pub async fn contains(&self, id: &SessionId) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    /// Applies `f` to the active exam of `id`, if any.
    pub async fn update<T>(
        &self,
        id: &SessionId,
        f: impl FnOnce(&mut ExamSession) -> T,
    ) -> Option<T> {
        self.sessions.write().await.get_mut(id).map(f)
    }

    /// Removes and returns the active exam. Only one caller can win this,
    /// which is what keeps result finalization from running twice.
    pub async fn take(&self, id: &SessionId) -> Option<ExamSession> {
        self.sessions.write().await.remove(id)
    }
}
