// src/services/scorer.rs

use chrono::{DateTime, Utc};

use crate::models::{
    exam_session::{AnswerSet, ExamSession},
    history::{HistoryRecord, ResultEntry},
};

/// Aggregate outcome of scoring one session.
#[derive(Debug, Clone)]
pub struct ScoreSummary {
    pub results: Vec<ResultEntry>,
    pub total_correct: usize,
    /// 0-100, rounded to 2 decimals.
    pub percentage: f64,
}

/// Rounds to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Scores every question of the session against its answer key.
///
/// A question counts as correct only when the selected tokens equal the
/// correct tokens exactly; partial multi-select answers score nothing.
pub fn score(session: &ExamSession) -> ScoreSummary {
    let results: Vec<ResultEntry> = session
        .questions
        .iter()
        .map(|q| {
            let correct_options: AnswerSet = q.correct_tokens().into_iter().collect();
            let recorded = session.user_answers.get(&q.id);
            let user_answer = recorded.cloned().unwrap_or_default();
            let is_correct = user_answer == correct_options;

            ResultEntry {
                exam_q_num: q.id,
                pool_q_num: session.question_map.get(&q.id).copied().unwrap_or(q.id),
                user_answer,
                correct_options,
                is_correct,
                answered: recorded.is_some(),
                question: q.clone(),
            }
        })
        .collect();

    let total_correct = results.iter().filter(|r| r.is_correct).count();
    let percentage = if results.is_empty() {
        0.0
    } else {
        round2(100.0 * total_correct as f64 / results.len() as f64)
    };

    ScoreSummary {
        results,
        total_correct,
        percentage,
    }
}

/// Builds the history record for a scored session.
///
/// The id is the finish time in milliseconds; the history store makes it
/// unique when it appends the record.
pub fn build_record(
    session: &ExamSession,
    summary: ScoreSummary,
    finished_at: DateTime<Utc>,
) -> HistoryRecord {
    HistoryRecord {
        id: finished_at.timestamp_millis().to_string(),
        timestamp: finished_at,
        score: summary.percentage,
        correct_count: summary.total_correct,
        total_questions: summary.results.len(),
        results: summary.results,
        question_map: session.question_map.clone(),
        elapsed_seconds: session.elapsed_seconds(finished_at),
        time_limit_seconds: session.time_limit_seconds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{PoolQuestion, QuestionOption};
    use chrono::Duration;
    use std::collections::BTreeMap;

    fn option(is_correct: bool) -> QuestionOption {
        QuestionOption {
            text: String::new(),
            image: None,
            is_correct,
        }
    }

    /// Exam question 1 has correct options {1, 3}; question 2 has {2}.
    fn session() -> ExamSession {
        let questions = vec![
            PoolQuestion {
                id: 1,
                text: "multi".to_string(),
                image: None,
                options: vec![option(true), option(false), option(true)],
                is_multiple_choice: true,
            },
            PoolQuestion {
                id: 2,
                text: "single".to_string(),
                image: None,
                options: vec![option(false), option(true)],
                is_multiple_choice: false,
            },
        ];

        ExamSession {
            questions,
            question_map: BTreeMap::from([(1, 40), (2, 17)]),
            user_answers: BTreeMap::new(),
            start_time: Utc::now() - Duration::seconds(90),
            time_limit_seconds: 60,
        }
    }

    fn answers(tokens: &[&str]) -> AnswerSet {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn requires_exact_set_equality() {
        let mut s = session();

        s.user_answers.insert(1, answers(&["1"]));
        assert!(!score(&s).results[0].is_correct);

        s.user_answers.insert(1, answers(&["3", "1"]));
        assert!(score(&s).results[0].is_correct);

        s.user_answers.insert(1, answers(&["1", "2", "3"]));
        assert!(!score(&s).results[0].is_correct);
    }

    #[test]
    fn unanswered_questions_score_as_wrong() {
        let mut s = session();
        s.user_answers.insert(2, answers(&["2"]));

        let summary = score(&s);
        assert_eq!(summary.total_correct, 1);
        assert_eq!(summary.percentage, 50.0);

        let first = &summary.results[0];
        assert!(first.user_answer.is_empty());
        assert!(!first.answered);
        assert_eq!(first.pool_q_num, 40);
        assert_eq!(first.correct_options, answers(&["1", "3"]));
    }

    #[test]
    fn cleared_answer_is_answered_but_wrong() {
        let mut s = session();
        s.user_answers.insert(2, AnswerSet::new());

        let summary = score(&s);
        assert!(summary.results[1].answered);
        assert!(!summary.results[1].is_correct);
    }

    #[test]
    fn percentage_is_rounded_to_two_decimals() {
        assert_eq!(round2(100.0 * 1.0 / 3.0), 33.33);
        assert_eq!(round2(100.0 * 2.0 / 3.0), 66.67);
    }

    #[test]
    fn record_keeps_map_and_time_derived_id() {
        let s = session();
        let finished = Utc::now();

        let record = build_record(&s, score(&s), finished);
        assert_eq!(record.id, finished.timestamp_millis().to_string());
        assert_eq!(record.results.len(), record.question_map.len());
        assert_eq!(record.total_questions, 2);
        assert!(record.elapsed_seconds >= 90);
        assert_eq!(record.time_limit_seconds, 60);
    }
}
