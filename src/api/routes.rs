use crate::api::api_error::APIError;
use crate::api::server::AppState;
use crate::error::Error;
use axum::extract::{ConnectInfo, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Body returned when no DNS query is recorded for the callback host.
const NOT_FOUND_SENTINEL: &str = "undefined";

pub(super) fn new(state: AppState) -> Router {
    Router::new()
        // HEAD must not reach the callback, it would consume the entry without reading it.
        .route("/", get(callback).head(not_found).fallback(not_found))
        .route("/healthcheck", get(health_check))
        .fallback(not_found)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(state.config.http_timeout))
        .with_state(state)
}

#[allow(clippy::unused_async)]
async fn health_check() -> impl IntoResponse {
    Json(json!({"ok":"healthy"}))
}

#[allow(clippy::unused_async)]
async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Page not found")
}

async fn callback(
    State(state): State<AppState>,
    ConnectInfo(client_addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, APIError> {
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .ok_or(Error::MissingHost)?;
    let key = state.config.key_normalization.host_key(host);

    let resolver = state.store.write().await.consume(&key).await;
    let body = resolver.map_or_else(|| NOT_FOUND_SENTINEL.to_string(), |ip| ip.to_string());
    tracing::info!("callback from {client_addr} for \"{key}\" => {body}");

    Ok(([(header::CONTENT_TYPE, "text/plain")], body))
}
