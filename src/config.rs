// src/config.rs

use std::env;
use std::str::FromStr;
use dotenvy::dotenv;

/// Maximum number of questions drawn into one exam.
pub const EXAM_QUESTION_LIMIT: usize = 65;

/// Advisory exam duration (180 minutes).
pub const EXAM_TIME_LIMIT_SECS: u64 = 180 * 60;

/// Lifetime of the session cookie, and therefore of an unfinished exam.
pub const SESSION_MAX_AGE_SECS: u64 = 60 * 60 * 24;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub questions_path: String,
    pub explanations_path: String,
    pub history_path: String,
    pub exam_question_limit: usize,
    pub exam_time_limit_secs: u64,
    pub session_max_age_secs: u64,
    pub log_dir: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let port = parse_or("PORT", 3000);

        let questions_path = env::var("QUESTIONS_FILE")
            .unwrap_or_else(|_| "data/questions.json".to_string());

        let explanations_path = env::var("EXPLANATIONS_FILE")
            .unwrap_or_else(|_| "Explain.txt".to_string());

        let history_path = env::var("HISTORY_FILE")
            .unwrap_or_else(|_| "db.json".to_string());

        let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        Self {
            port,
            questions_path,
            explanations_path,
            history_path,
            exam_question_limit: parse_or("EXAM_QUESTION_LIMIT", EXAM_QUESTION_LIMIT),
            exam_time_limit_secs: parse_or("EXAM_TIME_LIMIT_SECS", EXAM_TIME_LIMIT_SECS),
            session_max_age_secs: parse_or("SESSION_MAX_AGE_SECS", SESSION_MAX_AGE_SECS),
            log_dir,
            rust_log,
        }
    }
}

/// Reads a numeric variable, keeping the default when it is unset or malformed.
fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            eprintln!("Ignoring invalid value for {key}: {raw:?}");
            default
        }),
        Err(_) => default,
    }
}
