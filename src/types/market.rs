use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Summary of one symbol's recent closes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SymbolStat {
    pub last_close: Option<f64>,
    pub change_pct: Option<f64>,
}

impl SymbolStat {
    /// Compute the stat from a window of closes, oldest first.
    ///
    /// An empty window gives nulls. A zero first close gives a 0% change.
    pub fn from_closes(closes: &[f64]) -> Self {
        let (Some(&first), Some(&last)) = (closes.first(), closes.last()) else {
            return Self::default();
        };

        let change_pct = if first != 0.0 && !first.is_nan() {
            (last - first) / first * 100.0
        } else {
            0.0
        };

        Self {
            last_close: Some(last),
            change_pct: Some(change_pct),
        }
    }
}

/// Response body of the narrative analysis endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub analysis: String,
    pub symbols: Vec<String>,
    pub stats: HashMap<String, SymbolStat>,
}

/// Entry counts of the shared caches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub raw_entries: usize,
    pub bar_entries: usize,
    pub symbol_entries: usize,
    pub total_keys: usize,
}
