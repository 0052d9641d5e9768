use serde::{Deserialize, Serialize};

use super::{Bar, BarSeries};

/// EMA alignment at the most recent bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    /// EMA7 > EMA25 > EMA99: only long setups are considered.
    #[serde(rename = "only-long")]
    OnlyLong,
    /// EMA7 < EMA25 < EMA99: only short setups are considered.
    #[serde(rename = "only-short")]
    OnlyShort,
    #[serde(rename = "mixed")]
    Mixed,
}

/// Classifier verdict for the current bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SignalKind {
    #[default]
    #[serde(rename = "Nötr")]
    Neutral,
    #[serde(rename = "Long düşün")]
    Long,
    #[serde(rename = "Short düşün")]
    Short,
}

impl SignalKind {
    pub fn label(&self) -> &'static str {
        match self {
            SignalKind::Neutral => "Nötr",
            SignalKind::Long => "Long düşün",
            SignalKind::Short => "Short düşün",
        }
    }
}

/// Position side of a trade suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Long,
    Short,
}

/// Entry with take-profit and stop-loss levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub side: Side,
    pub entry: f64,
    #[serde(rename = "tp")]
    pub take_profit: f64,
    #[serde(rename = "sl")]
    pub stop_loss: f64,
    #[serde(rename = "rr")]
    pub risk_reward_label: String,
}

/// Output of the signal classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalResult {
    pub trend: Trend,
    pub signal: SignalKind,
    pub suggestion: Option<Suggestion>,
}

impl SignalResult {
    pub fn neutral(trend: Trend) -> Self {
        Self {
            trend,
            signal: SignalKind::Neutral,
            suggestion: None,
        }
    }
}

/// Response body of the scalp signal endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalpResponse {
    pub mode: String,
    pub trend: Trend,
    pub signal: SignalKind,
    pub suggestion: Option<Suggestion>,
    pub bars: Vec<Bar>,
}

impl ScalpResponse {
    /// Combine a bar series with the classification computed on it.
    pub fn from_series(series: BarSeries, result: SignalResult) -> Self {
        Self {
            mode: series.mode_label(),
            trend: result.trend,
            signal: result.signal,
            suggestion: result.suggestion,
            bars: series.into_bars(),
        }
    }
}
