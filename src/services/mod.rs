// src/services/mod.rs

pub mod explanation;
pub mod exposure;
pub mod scorer;
pub mod selector;
pub mod session;
