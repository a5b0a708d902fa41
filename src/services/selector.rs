// src/services/selector.rs

use std::collections::{BTreeMap, HashMap};

use rand::Rng;

use crate::{
    error::ExamError,
    models::{exam_session::ExamSelection, question::PoolQuestion},
};

/// In-place Fisher-Yates shuffle driven by the supplied random source.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Draws the questions for a new exam.
///
/// Questions are grouped by how often they appeared in past exams, groups
/// are taken least-exposed first, and each group is shuffled so ties are
/// broken without favouring pool order. The first `limit` questions are
/// renumbered 1..K; the pool ids survive only in the returned map.
pub fn select_exam<R: Rng + ?Sized>(
    pool: &[PoolQuestion],
    exposure: &HashMap<u32, u32>,
    limit: usize,
    rng: &mut R,
) -> Result<ExamSelection, ExamError> {
    if pool.is_empty() {
        return Err(ExamError::NoQuestionsAvailable);
    }

    let mut groups: BTreeMap<u32, Vec<&PoolQuestion>> = BTreeMap::new();
    for q in pool {
        let count = exposure.get(&q.id).copied().unwrap_or(0);
        groups.entry(count).or_default().push(q);
    }

    let mut ordered = Vec::with_capacity(pool.len());
    for (_, mut group) in groups {
        shuffle(&mut group, rng);
        ordered.extend(group);
    }
    ordered.truncate(limit);

    let mut questions = Vec::with_capacity(ordered.len());
    let mut question_map = BTreeMap::new();
    for (index, q) in ordered.into_iter().enumerate() {
        let exam_id = index as u32 + 1;
        question_map.insert(exam_id, q.id);
        questions.push(PoolQuestion {
            id: exam_id,
            ..q.clone()
        });
    }

    tracing::debug!(
        "Selected {} of {} pool questions for a new exam",
        questions.len(),
        pool.len()
    );

    Ok(ExamSelection {
        questions,
        question_map,
    })
}
