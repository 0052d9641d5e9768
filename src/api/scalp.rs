use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use skalp::types::ScalpResponse;
use skalp::Result;
use tracing::debug;

use super::params::{SignalParams, SignalQuery};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/scalp30s", get(get_scalp))
}

/// Bars for the requested timeframe with the scalp classification of the
/// last bar.
async fn get_scalp(
    State(state): State<AppState>,
    Query(query): Query<SignalQuery>,
) -> Result<Json<ScalpResponse>> {
    let params = SignalParams::resolve(query, &state.config);

    let series = state
        .market
        .bars(&params.symbol, params.timeframe)
        .await
        .map_err(|e| e.localized("30s tövsiyələrini hesablamaq mümkün olmadı"))?;

    let result = state.classifier.classify(series.bars());
    debug!(
        "{} {}: {:?} / {}",
        params.symbol,
        params.timeframe.as_str(),
        result.trend,
        result.signal.label()
    );

    Ok(Json(ScalpResponse::from_series(series, result)))
}
