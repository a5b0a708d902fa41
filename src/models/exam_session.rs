// src/models/exam_session.rs

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::models::question::{PoolQuestion, PublicQuestion};

/// Set of option tokens ("1", "3", ...) chosen for one question.
pub type AnswerSet = BTreeSet<String>;

/// Output of the selector: exam copies numbered 1..K plus the exam id -> pool id map.
#[derive(Debug, Clone)]
pub struct ExamSelection {
    pub questions: Vec<PoolQuestion>,
    pub question_map: BTreeMap<u32, u32>,
}

/// An exam attempt in progress, kept server-side for one session token.
#[derive(Debug, Clone)]
pub struct ExamSession {
    /// Exam copies of the drawn questions; `id` is the exam-local number.
    pub questions: Vec<PoolQuestion>,
    /// Exam-local id -> pool id.
    pub question_map: BTreeMap<u32, u32>,
    /// Absent key: never submitted. Present but empty: explicitly cleared.
    pub user_answers: BTreeMap<u32, AnswerSet>,
    pub start_time: DateTime<Utc>,
    pub time_limit_seconds: u64,
}

impl ExamSession {
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        (now - self.start_time).num_seconds().max(0) as u64
    }
}

/// Navigation requested together with an answer submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Next,
    Back,
    Finish,
}

/// DTO for `POST /submit-answer`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    #[validate(range(min = 1, message = "qNum must be a positive question number."))]
    #[serde(deserialize_with = "deserialize_number_or_string")]
    pub q_num: u32,

    /// A single token or a list of tokens; absent means "no answer".
    #[serde(default, deserialize_with = "deserialize_one_or_many")]
    pub answer: Vec<String>,

    #[serde(default, deserialize_with = "deserialize_action")]
    pub action: Option<NavAction>,

    /// Navigation target; ids outside the exam end up on the home page.
    #[serde(default, deserialize_with = "deserialize_optional_number_or_string")]
    pub jump_to: Option<u32>,
}

impl SubmitAnswerRequest {
    /// Raw answer as a set: trimmed, blanks dropped, duplicates merged.
    /// Tokens are made canonical against the question when recorded.
    pub fn answer_set(&self) -> AnswerSet {
        self.answer
            .iter()
            .map(|token| token.trim())
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn deserialize_one_or_many<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(match Option::<OneOrMany>::deserialize(d)? {
        Some(OneOrMany::One(token)) => vec![token],
        Some(OneOrMany::Many(tokens)) => tokens,
        None => Vec::new(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u32),
    Text(String),
}

impl NumberOrString {
    fn into_number<E: serde::de::Error>(self) -> Result<Option<u32>, E> {
        match self {
            NumberOrString::Number(n) => Ok(Some(n)),
            NumberOrString::Text(s) if s.trim().is_empty() => Ok(None),
            NumberOrString::Text(s) => s.trim().parse().map(Some).map_err(E::custom),
        }
    }
}

/// HTML forms send numbers as strings, so both shapes are accepted.
fn deserialize_number_or_string<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    NumberOrString::deserialize(d)?
        .into_number()?
        .ok_or_else(|| serde::de::Error::custom("expected a question number"))
}

fn deserialize_optional_number_or_string<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<u32>, D::Error> {
    match Option::<NumberOrString>::deserialize(d)? {
        Some(value) => value.into_number(),
        None => Ok(None),
    }
}

/// Unknown or empty actions behave like "stay on this question".
fn deserialize_action<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NavAction>, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw.and_then(|s| match s.trim() {
        "next" => Some(NavAction::Next),
        "back" => Some(NavAction::Back),
        "finish" => Some(NavAction::Finish),
        _ => None,
    }))
}

/// View returned by `GET /exam/{qNum}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamQuestionView {
    pub q_num: u32,
    pub total_questions: usize,
    pub question: PublicQuestion,
    pub selected_answers: Vec<String>,
    /// Exam ids that have a recorded submission (possibly empty).
    pub answered_questions: Vec<u32>,
    pub start_time: DateTime<Utc>,
    pub time_limit_seconds: u64,
    /// Advisory only: the client timer is the one that auto-submits.
    pub remaining_seconds: u64,
}
