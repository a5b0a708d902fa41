// src/utils/mod.rs

pub mod redirect;
pub mod session_cookie;
