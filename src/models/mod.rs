// src/models/mod.rs

pub mod exam_session;
pub mod history;
pub mod question;
