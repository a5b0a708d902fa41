use std::sync::Arc;

use crate::config::Config;
use crate::services::session::SessionStore;
use crate::storage::{history_repository::HistoryRepository, question_pool::QuestionPool};
use axum::extract::FromRef;

#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<QuestionPool>,
    pub history: Arc<dyn HistoryRepository>,
    pub sessions: SessionStore,
    pub config: Config,
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
