use anyhow::Context;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{extract::FromRef, routing::get, Router};
use prometheus::{Encoder, TextEncoder};
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes::{category_router, questions_router, quizzes_router};
use crate::catalog::CatalogError;
use crate::settings::{CatalogSettings, Settings};

#[derive(FromRef, Clone)]
pub struct AppState {
    pool: SqlitePool,
    catalog: CatalogSettings,
}

impl AppState {
    pub fn new(pool: SqlitePool, catalog: CatalogSettings) -> Self {
        Self { pool, catalog }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .merge(questions_router())
        .merge(category_router())
        .merge(quizzes_router())
        .fallback(not_found)
        .method_not_allowed_fallback(|| async { CatalogError::MethodNotAllowed })
        .with_state(state)
        .layer(cors())
        .layer(TraceLayer::new_for_http())
}

async fn not_found(method: Method, uri: Uri) -> CatalogError {
    tracing::debug!("No route for {method} {uri}");
    CatalogError::NotFound
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
}

pub async fn run_server(pool: SqlitePool, settings: &Settings) -> anyhow::Result<()> {
    let addr = settings.server.address();
    let state = AppState::new(pool, settings.catalog.clone());

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Serving on {addr}");
    axum::serve(listener, app(state)).await?;
    Ok(())
}

async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metrics = prometheus::gather();
    let mut buf = vec![];
    if let Err(err) = encoder.encode(&metrics, &mut buf) {
        tracing::error!("Failed to encode metrics: {err}");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    (
        [(header::CONTENT_TYPE, encoder.format_type().to_owned())],
        buf,
    )
        .into_response()
}
