//! Paste routes.
//!
//! - `GET  /`       : submission form (authenticated)
//! - `POST /`       : store a paste, redirect to it (authenticated)
//! - `GET  /{token}`: show a paste (public)

use std::sync::Arc;

use axum::Form;
use axum::extract::rejection::{FormRejection, PathRejection};
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;
use crate::templates::{DisplayPage, FormPage, render};

/// Body of `POST /`.
#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub paste: String,
}

/// Render the submission form.
pub async fn show_form(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    render(&FormPage {
        max_bytes: state.limits.max_paste_bytes,
    })
}

/// Store a paste and redirect to it.
///
/// Blank submissions store nothing and redirect back to the form. A body
/// that is not `application/x-www-form-urlencoded` has no `paste` field and
/// counts as blank; other rejections (an oversized body, say) keep their
/// own status.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    form: Result<Form<SubmitForm>, FormRejection>,
) -> Result<Response, AppError> {
    let paste = match form {
        Ok(Form(form)) => form.paste,
        Err(FormRejection::InvalidFormContentType(_)) => String::new(),
        Err(rejection) => return Ok(rejection.into_response()),
    };

    let target = match state.pastes.create(&paste).await? {
        Some(id) => format!("/{id}"),
        None => "/".to_owned(),
    };
    Ok(Redirect::to(&target).into_response())
}

/// Show a stored paste.
///
/// A token the path extractor cannot decode (invalid UTF-8 after percent
/// decoding) is answered exactly like an unknown paste.
pub async fn show_paste(
    State(state): State<Arc<AppState>>,
    token: Result<Path<String>, PathRejection>,
) -> Result<Html<String>, AppError> {
    let Ok(Path(token)) = token else {
        return Err(AppError::NotFound);
    };
    let bytes = state.pastes.fetch(&token).await?;
    let content = String::from_utf8_lossy(&bytes);
    render(&DisplayPage {
        id: &token,
        content: &content,
    })
}

/// Anything no route matched, such as multi-segment paths.
pub async fn not_found() -> AppError {
    AppError::NotFound
}
