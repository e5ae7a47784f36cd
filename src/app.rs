use std::net::SocketAddr;

use axum::{
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use time::OffsetDateTime;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{chat, meals, medications, profile, state::AppState, summary};

const OPENAPI_YAML: &str = include_str!("../openapi.yaml");

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .nest(
            "/api",
            Router::new()
                .merge(chat::router())
                .merge(meals::router())
                .merge(medications::router())
                .merge(summary::router())
                .merge(profile::router())
                .route("/health", get(health))
                .route("/openapi.yaml", get(openapi)),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

async fn index() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the Biorhyme Health Chatbot Demo",
        "endpoints": {
            "chat": "/api/chat",
            "meals": "/api/meals",
            "medications": "/api/medications",
            "summary": "/api/summary",
            "health": "/api/health",
        },
        "documentation": "/api/openapi.yaml",
    }))
}

async fn health() -> Json<Value> {
    let now = OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default();
    Json(json!({
        "status": "ok",
        "message": "Biorhyme Health Chatbot Demo is running",
        "timestamp": now,
    }))
}

async fn openapi() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/x-yaml")], OPENAPI_YAML)
}

pub async fn serve(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
