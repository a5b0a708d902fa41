// src/services/exposure.rs

use std::collections::HashMap;

use crate::{
    models::history::{HistoryRecord, QuestionStat},
    storage::question_pool::QuestionPool,
};

/// Counts how many past exams each pool question appeared in.
///
/// Every pool question gets an entry (0 when never drawn); history
/// entries whose pool id no longer exists are ignored.
pub fn exposure_counts(pool: &QuestionPool, history: &[HistoryRecord]) -> HashMap<u32, u32> {
    let mut counts: HashMap<u32, u32> = pool.questions().iter().map(|q| (q.id, 0)).collect();

    for record in history {
        for result in &record.results {
            if let Some(count) = counts.get_mut(&result.pool_q_num) {
                *count += 1;
            }
        }
    }

    counts
}

/// Exposure counts listed in pool order, for the home view.
pub fn question_stats(pool: &QuestionPool, history: &[HistoryRecord]) -> Vec<QuestionStat> {
    let counts = exposure_counts(pool, history);
    pool.questions()
        .iter()
        .map(|q| QuestionStat {
            q_num: q.id,
            count: counts.get(&q.id).copied().unwrap_or(0),
        })
        .collect()
}
