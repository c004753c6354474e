//! Basic-authentication middleware for the submission form.
//!
//! Applied with `route_layer` to `GET /` and `POST /` only; paste retrieval
//! stays public.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::AppError;
use crate::state::AppState;

/// Middleware that checks the `Authorization: Basic ...` header against the
/// configured credentials.
pub async fn basic_auth_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let authorized = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_basic)
        .is_some_and(|(user, pass)| state.credentials.verify(&user, &pass));

    if !authorized {
        tracing::debug!(path = %req.uri().path(), "basic auth rejected");
        return AppError::Unauthorized.into_response();
    }

    next.run(req).await
}

/// Split a `Basic` authorization header value into username and password.
///
/// The scheme is matched case-insensitively. The password may contain `:`.
fn parse_basic(value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_owned(), pass.to_owned()))
}
