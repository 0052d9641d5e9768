//! Query parameters, parsed and defaulted at the HTTP boundary.

use serde::Deserialize;
use skalp::types::Timeframe;
use skalp::Config;

pub const DEFAULT_KLINES_LIMIT: u32 = 500;
pub const MAX_KLINES_LIMIT: u32 = 1000;
pub const DEFAULT_INTERVAL: &str = "1m";

/// Raw query for the klines endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct KlinesQuery {
    pub symbol: Option<String>,
    pub interval: Option<String>,
    pub limit: Option<String>,
}

/// Raw query for the signal and analysis endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct SignalQuery {
    pub symbol: Option<String>,
    pub tf: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KlinesParams {
    pub symbol: String,
    pub interval: String,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalParams {
    pub symbol: String,
    pub timeframe: Timeframe,
}

fn resolve_symbol(symbol: Option<String>, config: &Config) -> String {
    symbol
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| config.default_symbol.clone())
}

impl KlinesParams {
    pub fn resolve(query: KlinesQuery, config: &Config) -> Self {
        let limit = query
            .limit
            .and_then(|l| l.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_KLINES_LIMIT)
            .clamp(1, MAX_KLINES_LIMIT);

        Self {
            symbol: resolve_symbol(query.symbol, config),
            interval: query
                .interval
                .filter(|i| !i.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_INTERVAL.to_string()),
            limit,
        }
    }
}

impl SignalParams {
    /// Missing timeframe uses the configured default; an unknown code falls
    /// back to 1m.
    pub fn resolve(query: SignalQuery, config: &Config) -> Self {
        let timeframe = match query.tf.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            Some(code) => code.parse().unwrap_or(Timeframe::OneMinute),
            None => config.default_timeframe.parse::<Timeframe>().unwrap_or_default(),
        };

        Self {
            symbol: resolve_symbol(query.symbol, config),
            timeframe,
        }
    }
}
