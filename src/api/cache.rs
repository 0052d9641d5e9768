//! Cache administration endpoints.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue},
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;
use skalp::types::CacheStats;
use tracing::info;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CacheActionResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsData {
    #[serde(flatten)]
    pub stats: CacheStats,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    pub success: bool,
    pub data: CacheStatsData,
}

fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn no_store() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    headers
}

/// Create the cache router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", delete(clear_cache))
        .route("/stats", get(get_stats))
        .route("/:key", delete(evict_key))
}

async fn get_stats(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    Json(CacheStatsResponse {
        success: true,
        data: CacheStatsData {
            stats: state.market.cache_stats(),
            timestamp: now_iso(),
        },
    })
}

async fn clear_cache(State(state): State<AppState>) -> (HeaderMap, Json<CacheActionResponse>) {
    state.market.clear_cache();

    (
        no_store(),
        Json(CacheActionResponse {
            success: true,
            message: "Keş uğurla silindi".to_string(),
            timestamp: now_iso(),
        }),
    )
}

async fn evict_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> (HeaderMap, Json<CacheActionResponse>) {
    let removed = state.market.evict(&key);
    info!("Evict {}: {}", key, removed);

    let message = if removed {
        format!("Keş açarı \"{}\" uğurla silindi", key)
    } else {
        format!("Keş açarı \"{}\" tapılmadı", key)
    };

    (
        no_store(),
        Json(CacheActionResponse {
            success: removed,
            message,
            timestamp: now_iso(),
        }),
    )
}
