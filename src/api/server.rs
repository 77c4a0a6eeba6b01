//! HTTP server implementation for the API

use anyhow::Result;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use super::{handlers, models::ApiError};
use crate::config::Config;
use crate::models::{Captioner, ColorClusterer, Detector};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub captioner: Arc<dyn Captioner>,
    pub detector: Arc<dyn Detector>,
    pub clusterer: Arc<dyn ColorClusterer>,
    pub config: Arc<Config>,
}

/// Configure and start the HTTP server
pub async fn start_http_server(
    captioner: Arc<dyn Captioner>,
    detector: Arc<dyn Detector>,
    clusterer: Arc<dyn ColorClusterer>,
    config: Arc<Config>,
) -> Result<()> {
    let port = config.server.port;
    let max_upload = config.server.max_upload_bytes;

    let app_state = AppState {
        captioner,
        detector,
        clusterer,
        config,
    };

    // Allow browser clients to call the API directly
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let app = Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/analyze-video", post(analyze_video_handler))
        .route("/api/analyze-image", post(analyze_image_handler))
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("🌐 API server listening on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check handler
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let status = handlers::health_check(&state.captioner, &state.detector).await;
    (StatusCode::OK, Json(status))
}

/// Video upload handler
async fn analyze_video_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> impl IntoResponse {
    let bytes = match read_upload_field(multipart, "video").await {
        Ok(bytes) => bytes,
        Err(message) => {
            return (StatusCode::BAD_REQUEST, Json(serde_json::json!(ApiError::new(message))))
                .into_response();
        }
    };

    match handlers::analyze_video(
        state.captioner.clone(),
        state.detector.clone(),
        state.config.clone(),
        bytes,
    )
    .await
    {
        Ok(result) => (StatusCode::OK, Json(serde_json::json!(result))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!(ApiError::new(format!("Error processing video: {}", e)))),
        )
            .into_response(),
    }
}

/// Image upload handler
async fn analyze_image_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> impl IntoResponse {
    let bytes = match read_upload_field(multipart, "image").await {
        Ok(bytes) => bytes,
        Err(message) => {
            return (StatusCode::BAD_REQUEST, Json(serde_json::json!(ApiError::new(message))))
                .into_response();
        }
    };

    match handlers::analyze_image(
        state.captioner.clone(),
        state.detector.clone(),
        state.clusterer.clone(),
        state.config.clone(),
        bytes,
    )
    .await
    {
        Ok(result) => (StatusCode::OK, Json(serde_json::json!(result))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!(ApiError::new(format!("Error processing image: {}", e)))),
        )
            .into_response(),
    }
}

/// Pull the named field out of a multipart upload.
async fn read_upload_field(mut multipart: Multipart, name: &str) -> Result<Vec<u8>, String> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Malformed upload: {}", e))?
    {
        if field.name() == Some(name) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| format!("Failed to read upload: {}", e))?;
            return Ok(bytes.to_vec());
        }
    }
    Err(format!("No {} file provided", name))
}
