// src/storage/mod.rs

pub mod history_repository;
pub mod question_pool;
