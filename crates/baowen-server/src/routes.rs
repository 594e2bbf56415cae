//! API routes for baowen-server

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use baowen_core::ai::FAILURE_TITLE;
use baowen_core::html;

use crate::server::AppState;

type AppStateArc = Arc<AppState>;

#[derive(Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    topic: String,
}

#[derive(Serialize)]
pub struct GenerateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    title: String,
    content: String,
}

#[derive(Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    content: String,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Serialize)]
pub struct DownloadResponse {
    html: String,
    filename: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
}

fn bad_request(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

pub fn api_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/generate", post(generate))
        .route("/api/download", post(download))
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/health", get(health))
}

async fn generate(
    State(state): State<AppStateArc>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, (StatusCode, Json<ErrorResponse>)> {
    let topic = req.topic.trim();
    if topic.is_empty() {
        return Err(bad_request("请提供有效的主题"));
    }

    let article = state.generator.generate(topic).await;

    // Failures come back as a sentinel-titled article. Keep the 200 status
    // so the client still receives the embedded reason in the body.
    if article.title == FAILURE_TITLE {
        warn!("Returning failure article for topic: {}", topic);
        return Ok(Json(GenerateResponse {
            error: Some("生成文章失败".to_string()),
            message: Some(article.content.clone()),
            title: article.title,
            content: article.content,
        }));
    }

    Ok(Json(GenerateResponse {
        error: None,
        message: None,
        title: article.title,
        content: article.content,
    }))
}

async fn download(
    Json(req): Json<DownloadRequest>,
) -> Result<Json<DownloadResponse>, (StatusCode, Json<ErrorResponse>)> {
    if req.content.trim().is_empty() {
        return Err(bad_request("请提供有效的文章内容"));
    }

    let title = req.title.as_deref().unwrap_or("文章");

    Ok(Json(DownloadResponse {
        html: html::render_document(&req.content),
        filename: html::download_filename(title),
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
