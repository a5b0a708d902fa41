// src/utils/session_cookie.rs

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request, header},
    middleware::Next,
    response::Response,
};

use crate::{config::Config, services::session::SessionId};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "exam_sid";

/// Extracts the session token from a `Cookie` header value.
pub fn session_token(cookie_header: &str) -> Option<&str> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// Axum Middleware: Session cookie.
///
/// Reads the `exam_sid` cookie and injects a `SessionId` into the request
/// extensions. Requests without one get a fresh token, which is returned
/// in a `Set-Cookie` header whose `Max-Age` bounds the life of an exam.
pub async fn session_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let existing = req
        .headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(session_token)
        .map(str::to_string);

    let (session_id, is_new) = match existing {
        Some(token) => (SessionId(token), false),
        None => (SessionId(uuid::Uuid::new_v4().simple().to_string()), true),
    };

    req.extensions_mut().insert(session_id.clone());
    let mut response = next.run(req).await;

    if is_new {
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            SESSION_COOKIE, session_id.0, config.session_max_age_secs
        );
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::error!("Failed to build session cookie: {}", e),
        }
    }

    response
}
