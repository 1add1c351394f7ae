// src/http/mod.rs

//! HTTP surface: one route, GET views history, POST runs the pipeline.
//!
//! No authentication and no antiforgery token: the POST is meant to be hit
//! directly by a webhook. Neither method reads a body or query string.

pub mod render;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::pipeline::{PipelineController, PipelineError};

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub controller: Arc<PipelineController>,
}

impl AppState {
    pub fn new(controller: PipelineController) -> Self {
        Self {
            controller: Arc::new(controller),
        }
    }
}

/// Build the router. Other methods on `route` get 405 from axum.
pub fn router(state: AppState, route: &str) -> Router {
    Router::new()
        .route(route, get(view_handler).post(trigger_handler))
        .with_state(state)
}

async fn view_handler(State(state): State<AppState>) -> Html<String> {
    let history = state.controller.view().await;
    Html(render::history_page(&history))
}

/// The pipeline runs in its own task so that a client hanging up mid-request
/// drops only the response, never a half-finished fetch/update/build.
async fn trigger_handler(State(state): State<AppState>) -> Response {
    let controller = Arc::clone(&state.controller);
    let result = match tokio::spawn(async move { controller.trigger().await }).await {
        Ok(result) => result,
        Err(join_err) => {
            error!(error = %join_err, "pipeline task did not complete");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render::error_page("Pipeline aborted", &join_err.to_string())),
            )
                .into_response();
        }
    };

    match result {
        Ok(outcome) => Html(render::trigger_page(&outcome)).into_response(),
        Err(PipelineError::Busy) => (
            StatusCode::CONFLICT,
            Html(render::error_page(
                "Busy",
                "A pipeline run is already in progress. Try again once it has finished.",
            )),
        )
            .into_response(),
        Err(err @ PipelineError::Build(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(render::error_page("Build failed", &err.to_string())),
        )
            .into_response(),
    }
}

/// Serve `app` on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    let addr = listener.local_addr().context("reading listener address")?;
    info!(%addr, "sitehook listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C; serving until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
