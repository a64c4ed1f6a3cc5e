//! REST API server for the financial agent tools
//!
//! Exposes the tool registry via HTTP endpoints so an external
//! agent-orchestration runtime can list and invoke tools.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::models::ToolInput;
use crate::tools::ToolRegistry;

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub registry: Arc<ToolRegistry>,
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Tool Listing Endpoint
/// =============================

async fn list_tools(State(state): State<ApiState>) -> Json<ApiResponse> {
    Json(ApiResponse::success(state.registry.specs()))
}

/// =============================
/// Tool Invocation Endpoint
/// =============================

async fn invoke_tool(
    State(state): State<ApiState>,
    Path(name): Path<String>,
    Json(parameters): Json<serde_json::Value>,
) -> (StatusCode, Json<ApiResponse>) {
    let invocation_id = Uuid::new_v4();
    info!(%invocation_id, tool = %name, "Received tool invocation");

    let Some(tool) = state.registry.get(&name) else {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Tool not found: {}", name))),
        );
    };

    let input = ToolInput {
        tool_name: name.clone(),
        parameters,
    };

    let start = Instant::now();
    match tool.execute(&input).await {
        Ok(output) => {
            let execution_time_ms = start.elapsed().as_millis() as u64;
            info!(%invocation_id, tool = %name, execution_time_ms, "Tool invocation completed");
            (
                StatusCode::OK,
                Json(ApiResponse::success(serde_json::json!({
                    "invocation_id": invocation_id,
                    "tool": name,
                    "execution_time_ms": execution_time_ms,
                    "output": output,
                }))),
            )
        }
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!("Tool invocation failed: {}", e))),
        ),
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(registry: Arc<ToolRegistry>) -> Router {
    let state = ApiState { registry };

    Router::new()
        .route("/health", get(health))
        .route("/api/tools", get(list_tools))
        .route("/api/tools/:name", post(invoke_tool))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    registry: Arc<ToolRegistry>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(registry);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
