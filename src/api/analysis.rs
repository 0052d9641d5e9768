use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use skalp::types::AnalysisResponse;
use skalp::Result;

use super::params::{SignalParams, SignalQuery};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/deepseek", get(get_analysis))
}

async fn get_analysis(
    State(state): State<AppState>,
    Query(query): Query<SignalQuery>,
) -> Result<Json<AnalysisResponse>> {
    let params = SignalParams::resolve(query, &state.config);

    let response = state
        .analysis
        .analyze(state.market.as_ref(), &params.symbol, params.timeframe)
        .await
        .map_err(|e| e.localized("DeepSeek analizi alınmadı"))?;

    Ok(Json(response))
}
