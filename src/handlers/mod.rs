// src/handlers/mod.rs

pub mod exam;
pub mod history;
pub mod home;
pub mod study;
