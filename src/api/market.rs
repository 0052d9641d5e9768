//! Exchange pass-through endpoints.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use skalp::Result;

use super::params::{KlinesParams, KlinesQuery};
use crate::AppState;

/// Create the market router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/klines", get(get_klines))
        .route("/api/symbols", get(get_symbols))
}

/// Raw exchange candles.
async fn get_klines(
    State(state): State<AppState>,
    Query(query): Query<KlinesQuery>,
) -> Result<Json<Value>> {
    let params = KlinesParams::resolve(query, &state.config);

    let raw = state
        .market
        .klines_raw(&params.symbol, &params.interval, params.limit)
        .await
        .map_err(|e| e.localized("Klineləri yükləmək mümkün olmadı"))?;

    Ok(Json(raw))
}

/// USDT trading symbols, sorted.
async fn get_symbols(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    let symbols = state
        .market
        .trading_symbols()
        .await
        .map_err(|e| e.localized("Simvolları yükləmək mümkün olmadı"))?;

    Ok(Json(symbols))
}
