// src/storage/question_pool.rs

use std::collections::HashSet;
use std::path::Path;

use crate::models::question::PoolQuestion;

/// The static set of candidate questions, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct QuestionPool {
    questions: Vec<PoolQuestion>,
}

impl QuestionPool {
    /// Builds a pool from already-parsed questions.
    ///
    /// Questions without an id are numbered in document order after the
    /// highest explicit id. Duplicate explicit ids make the pool unusable,
    /// so the result is an error in that case.
    pub fn from_questions(mut questions: Vec<PoolQuestion>) -> Result<Self, String> {
        let mut next_id = questions.iter().map(|q| q.id).max().unwrap_or(0);
        for q in questions.iter_mut().filter(|q| q.id == 0) {
            next_id += 1;
            q.id = next_id;
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for q in &questions {
            if !seen.insert(q.id) {
                return Err(format!("duplicate question id {}", q.id));
            }
        }

        questions.sort_by_key(|q| q.id);
        Ok(Self { questions })
    }

    /// Loads the pool document.
    ///
    /// A missing or corrupt document is logged and yields an empty pool;
    /// the server keeps running and reports "no questions available".
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("Failed to read question pool {}: {}", path.display(), e);
                return Self::default();
            }
        };

        let parsed = serde_json::from_str::<Vec<PoolQuestion>>(&raw)
            .map_err(|e| e.to_string())
            .and_then(Self::from_questions);

        match parsed {
            Ok(pool) => {
                tracing::info!("Loaded {} questions from {}", pool.len(), path.display());
                pool
            }
            Err(e) => {
                tracing::error!("Failed to parse question pool {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Questions ordered by pool id.
    pub fn questions(&self) -> &[PoolQuestion] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
