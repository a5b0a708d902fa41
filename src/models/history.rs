// src/models/history.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{exam_session::AnswerSet, question::PoolQuestion};

/// Outcome for one question of a scored exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEntry {
    pub exam_q_num: u32,
    pub pool_q_num: u32,
    pub user_answer: AnswerSet,
    pub correct_options: AnswerSet,
    pub is_correct: bool,
    /// False when the question never received a submission.
    #[serde(default)]
    pub answered: bool,
    /// Exam copy of the question, kept so a past attempt can be replayed.
    pub question: PoolQuestion,
}

/// One completed exam attempt as stored in the history document.
/// Never mutated after it is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    /// Millisecond timestamp, suffixed when two attempts share a millisecond.
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Percentage 0-100, rounded to 2 decimals.
    pub score: f64,
    pub correct_count: usize,
    pub total_questions: usize,
    pub results: Vec<ResultEntry>,
    /// Exam-local id -> pool id.
    pub question_map: BTreeMap<u32, u32>,
    #[serde(default)]
    pub elapsed_seconds: u64,
    #[serde(default)]
    pub time_limit_seconds: u64,
}

/// Row of `GET /history`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub display_time: String,
    pub score: f64,
    pub correct_count: usize,
    pub total_questions: usize,
}

impl From<&HistoryRecord> for HistorySummary {
    fn from(record: &HistoryRecord) -> Self {
        HistorySummary {
            id: record.id.clone(),
            timestamp: record.timestamp,
            display_time: format_timestamp(record.timestamp),
            score: record.score,
            correct_count: record.correct_count,
            total_questions: record.total_questions,
        }
    }
}

/// Formats a timestamp as `HH:MM:SS dd/mm/YYYY` in server local time.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%H:%M:%S %d/%m/%Y")
        .to_string()
}

/// Results view shared by `GET /results` and `GET /history/{id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsView {
    pub history_id: String,
    pub display_time: String,
    /// Number of correctly answered questions.
    pub score: usize,
    /// Percentage, 2 decimals.
    pub total_score: f64,
    pub total_questions: usize,
    pub results: Vec<ResultEntry>,
    /// Pool id -> explanation text, limited to the questions of this attempt.
    pub explanations: BTreeMap<u32, String>,
    pub question_map: BTreeMap<u32, u32>,
    pub elapsed_seconds: u64,
    pub time_limit_seconds: u64,
    /// Set when the attempt finished after the advisory time limit.
    /// Late submissions are still accepted.
    pub exceeded_time_limit: bool,
}

impl ResultsView {
    pub fn from_record(record: HistoryRecord, all_explanations: &BTreeMap<u32, String>) -> Self {
        let explanations = record
            .results
            .iter()
            .filter_map(|r| {
                all_explanations
                    .get(&r.pool_q_num)
                    .map(|text| (r.pool_q_num, text.clone()))
            })
            .collect();

        let exceeded_time_limit =
            record.time_limit_seconds > 0 && record.elapsed_seconds > record.time_limit_seconds;

        ResultsView {
            display_time: format_timestamp(record.timestamp),
            score: record.correct_count,
            total_score: record.score,
            total_questions: record.total_questions,
            elapsed_seconds: record.elapsed_seconds,
            time_limit_seconds: record.time_limit_seconds,
            exceeded_time_limit,
            history_id: record.id,
            results: record.results,
            explanations,
            question_map: record.question_map,
        }
    }
}

/// Exposure count of one pool question, as listed on the home view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionStat {
    pub q_num: u32,
    pub count: u32,
}

/// View returned by `GET /`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub total_pool_questions: usize,
    pub question_stats: Vec<QuestionStat>,
    pub has_active_exam: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
