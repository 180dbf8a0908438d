//! HTTP API
//!
//! `POST /predict` accepts a flexible field dictionary, `POST /predict/text`
//! a bare `{text}`. Both run the shared normalize -> validate -> predict path.

pub mod routes;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::http::{header, StatusCode};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::Router;
use news_engine::Classifier;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ApiConfig;

/// Application state shared across handlers
pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            start_time: Instant::now(),
        }
    }
}

pub fn router(state: AppState, api: &ApiConfig) -> Router {
    Router::new()
        .merge(routes::info_routes())
        .merge(routes::predict_routes())
        .with_state(Arc::new(state))
        .layer(RequestBodyLimitLayer::new(api.body_limit_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(api.request_timeout_secs)))
        .layer(middleware::map_response(detail_for_layer_errors))
        .layer(TraceLayer::new_for_http())
}

/// Timeout and body-limit layers answer with bare status codes; give them
/// the same `{"detail"}` body as handler errors.
async fn detail_for_layer_errors(response: Response) -> Response {
    let status = response.status();
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v.starts_with("application/json"));

    let detail = match status {
        StatusCode::REQUEST_TIMEOUT => "Request timed out",
        StatusCode::PAYLOAD_TOO_LARGE => "Request body too large",
        _ => return response,
    };
    if is_json {
        return response;
    }
    routes::ApiError {
        status,
        detail: detail.to_string(),
    }
    .into_response()
}

/// Run the HTTP server until Ctrl+C.
pub async fn serve(state: AppState, api: &ApiConfig) -> Result<()> {
    let app = router(state, api);

    let addr = format!("{}:{}", api.host, api.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
    }
}
