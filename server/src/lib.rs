pub mod config;
mod error_pages;
pub mod tracing_setup;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use config::{AppConfig, ConfigBuildError};
use pages::{DefaultHandler, Router, Routes, wrap};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub config: AppConfig,
    pub errors: Router,
}

impl AppStateInner {
    pub fn new(config: AppConfig) -> Result<AppState, ConfigBuildError> {
        Ok(Arc::new(AppStateInner {
            errors: build_error_router(&config)?,
            config,
        }))
    }
}

/// Builds the error router the middleware consults: the standard messages
/// with config overrides applied, plus a custom 404 page when one is
/// configured.
fn build_error_router(config: &AppConfig) -> Result<Router, ConfigBuildError> {
    let messages = config.status_messages()?;

    let mut specific = Routes::new();
    if let Some(page) = &config.not_found {
        let page = page.clone();
        specific.insert(
            StatusCode::NOT_FOUND,
            wrap(move |_| Html(page.clone()).into_response()),
        );
    }

    Ok(Router {
        specific,
        fallback: Arc::new(DefaultHandler::new(messages)),
        ..Router::default()
    })
}

pub fn make_app(state: AppState) -> axum::Router {
    axum::Router::new()
        .route(
            "/",
            get(|| async { "This is status-pages, serving your finest error pages" }),
        )
        .route("/teapot", get(|| async { StatusCode::IM_A_TEAPOT }))
        .route("/boom", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .fallback(|| async { StatusCode::NOT_FOUND })
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    error_pages::render,
                )),
        )
        .with_state(state)
        // Processed *outside* the error page stack
        .route("/healthcheck", get(|| async { "ok" }))
}
