//! HTTP route assembly.

pub mod pastes;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, header};
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::basic_auth_middleware;
use crate::state::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    let limits = state.limits;

    // The form and submission go through basic auth; retrieval does not.
    let form_routes = Router::new()
        .route(
            "/",
            get(pastes::show_form).merge(
                post(pastes::submit)
                    .layer(ConcurrencyLimitLayer::new(limits.max_concurrent_submissions)),
            ),
        )
        .route_layer(axum_mw::from_fn_with_state(
            Arc::clone(&state),
            basic_auth_middleware,
        ));

    Router::new()
        .merge(form_routes)
        .route("/{token}", get(pastes::show_paste))
        .fallback(pastes::not_found)
        .layer(DefaultBodyLimit::max(limits.max_paste_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .with_state(state)
}
