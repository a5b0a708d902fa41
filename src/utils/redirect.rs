// src/utils/redirect.rs

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// `302 Found` redirect, the status browsers follow with a GET after a form POST.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
