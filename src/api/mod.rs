pub mod analysis;
pub mod cache;
pub mod health;
pub mod market;
pub mod params;
pub mod scalp;

use crate::AppState;
use axum::Router;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(market::router())
        .merge(scalp::router())
        .merge(analysis::router())
        .nest("/api/cache", cache::router())
}
