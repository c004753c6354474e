//! HTML pages, rendered with askama from `templates/`.
//!
//! Paste content is HTML-escaped by the template engine.

use askama::Template;
use axum::response::Html;

use crate::error::AppError;

/// The submission form at `GET /`.
#[derive(Template)]
#[template(path = "form.html")]
pub struct FormPage {
    pub max_bytes: usize,
}

/// A single paste at `GET /{id}`.
#[derive(Template)]
#[template(path = "display.html")]
pub struct DisplayPage<'a> {
    pub id: &'a str,
    pub content: &'a str,
}

/// Render a template into an HTML response body.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if rendering fails.
pub fn render(page: &impl Template) -> Result<Html<String>, AppError> {
    Ok(Html(page.render()?))
}
