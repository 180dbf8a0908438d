//! API routes

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use news_engine::Label;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::error;

use super::AppState;
use crate::preprocess::{FieldMap, RawInput};
use crate::service::{self, AnalyzeError, Analysis, API_PREVIEW_CHARS};

type AppStateArc = Arc<AppState>;

// ============================================================================
// Request / Response Types
// ============================================================================

/// Flexible body for `/predict`: a few named text fields, anything else passes through.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsData {
    pub text: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub content: Option<String>,
    pub article: Option<String>,
    pub headline: Option<String>,
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: FieldMap,
}

impl NewsData {
    /// Named fields first (absent ones as `null`), then the extras in request order.
    pub fn into_fields(self) -> FieldMap {
        let named = [
            ("text", self.text),
            ("title", self.title),
            ("body", self.body),
            ("content", self.content),
            ("article", self.article),
            ("headline", self.headline),
            ("description", self.description),
        ];

        let mut fields = FieldMap::new();
        for (key, value) in named {
            fields.insert(key.to_string(), value.map_or(Value::Null, Value::String));
        }
        fields.extend(self.extra);
        fields
    }
}

/// Body for `/predict/text`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsText {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: Label,
    pub confidence: f32,
    pub processed_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_input: Option<FieldMap>,
}

impl PredictResponse {
    fn new(analysis: Analysis, original_input: Option<FieldMap>) -> Self {
        Self {
            prediction: analysis.prediction.label,
            confidence: analysis.prediction.confidence,
            processed_text: service::preview(&analysis.processed_text, API_PREVIEW_CHARS),
            original_input,
        }
    }
}

/// `{"detail": ...}` error body with a status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl From<AnalyzeError> for ApiError {
    fn from(e: AnalyzeError) -> Self {
        match e {
            AnalyzeError::Preprocess(e) => {
                error!("Input validation error: {}", e);
                Self {
                    status: StatusCode::BAD_REQUEST,
                    detail: e.to_string(),
                }
            }
            AnalyzeError::Inference(e) => {
                error!("Prediction error: {}", e);
                Self::internal(e.to_string())
            }
        }
    }
}

/// Body rejections keep axum's status, except that a well-formed body of the
/// wrong shape is a plain 400 like any other invalid input.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match rejection.status() {
            StatusCode::UNPROCESSABLE_ENTITY => StatusCode::BAD_REQUEST,
            other => other,
        };
        error!("Rejected request body: {}", rejection.body_text());
        Self {
            status,
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

// ============================================================================
// Info Routes
// ============================================================================

pub fn info_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to Fake News Detection API",
        "endpoints": {
            "/predict": "Flexible endpoint accepting various input formats",
            "/predict/text": "Simple endpoint for plain text input",
            "/health": "Liveness and uptime"
        },
        "supported_formats": [
            "Plain text",
            "JSON with text/body/content fields",
            "Dictionary with various field names",
            "HTML content (will be cleaned)"
        ]
    }))
}

async fn health(State(state): State<AppStateArc>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

// ============================================================================
// Predict Routes
// ============================================================================

pub fn predict_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/predict", post(predict))
        .route("/predict/text", post(predict_text))
}

async fn predict(
    State(state): State<AppStateArc>,
    payload: Result<Json<NewsData>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(news) = payload?;
    let original_input = news.into_fields();
    let analysis = run_analysis(&state, RawInput::Fields(original_input.clone())).await?;
    Ok(Json(PredictResponse::new(analysis, Some(original_input))))
}

async fn predict_text(
    State(state): State<AppStateArc>,
    payload: Result<Json<NewsText>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(news) = payload?;
    let analysis = run_analysis(&state, RawInput::Text(news.text)).await?;
    Ok(Json(PredictResponse::new(analysis, None)))
}

/// Inference is CPU-bound; keep it off the async workers. A panic inside the
/// classifier surfaces as a failed join and becomes a 500.
async fn run_analysis(state: &AppStateArc, input: RawInput) -> Result<Analysis, ApiError> {
    let classifier = Arc::clone(&state.classifier);
    let result = tokio::task::spawn_blocking(move || service::analyze(classifier.as_ref(), input))
        .await
        .map_err(|e| {
            error!("Prediction task failed: {}", e);
            ApiError::internal(e.to_string())
        })?;
    Ok(result?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_data_passthrough_order() {
        let news: NewsData = serde_json::from_str(
            r#"{"author": "Jane", "title": "Headline", "views": 3, "body": "Body"}"#,
        )
        .unwrap();
        assert_eq!(news.title.as_deref(), Some("Headline"));

        let fields = news.into_fields();
        let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["text", "title", "body", "content", "article", "headline", "description", "author", "views"]
        );
        assert_eq!(fields["text"], Value::Null);
        assert_eq!(fields["views"], json!(3));
    }

    #[test]
    fn test_news_data_rejects_non_string_named_field() {
        assert!(serde_json::from_str::<NewsData>(r#"{"text": 5}"#).is_err());
    }

    #[test]
    fn test_status_mapping() {
        use crate::preprocess::PreprocessError;
        use news_engine::InferenceError;

        let bad = ApiError::from(AnalyzeError::Preprocess(PreprocessError::InsufficientText { len: 3 }));
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);

        let internal = ApiError::from(AnalyzeError::Inference(InferenceError::EmptyLogits));
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
