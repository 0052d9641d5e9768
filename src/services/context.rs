use crate::sources::MarketSource;
use crate::types::{SymbolStat, Timeframe};
use std::collections::HashMap;
use tracing::warn;

use super::market_data::MarketDataService;

/// Trailing closes kept per symbol.
pub const CONTEXT_WINDOW: usize = 60;

/// Recent closes and summary for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolContext {
    pub symbol: String,
    pub closes: Vec<f64>,
    pub stat: SymbolStat,
}

/// Cross-market snapshot for one analysis request, in symbol order.
#[derive(Debug, Clone, Default)]
pub struct MarketContext {
    pub entries: Vec<SymbolContext>,
}

impl MarketContext {
    pub fn symbols(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.symbol.clone()).collect()
    }

    pub fn stats(&self) -> HashMap<String, SymbolStat> {
        self.entries
            .iter()
            .map(|e| (e.symbol.clone(), e.stat))
            .collect()
    }

    pub fn get(&self, symbol: &str) -> Option<&SymbolContext> {
        self.entries.iter().find(|e| e.symbol == symbol)
    }
}

/// `primary` followed by the reference symbols, duplicates removed.
pub fn symbol_set(primary: &str, references: &[String]) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::with_capacity(references.len() + 1);
    for symbol in std::iter::once(primary).chain(references.iter().map(String::as_str)) {
        if !symbols.iter().any(|s| s == symbol) {
            symbols.push(symbol.to_string());
        }
    }
    symbols
}

/// Builds comparative statistics for a primary symbol and fixed references.
#[derive(Debug, Clone)]
pub struct MultiSymbolContextBuilder {
    reference_symbols: Vec<String>,
    window: usize,
}

impl MultiSymbolContextBuilder {
    pub fn new(reference_symbols: Vec<String>) -> Self {
        Self {
            reference_symbols,
            window: CONTEXT_WINDOW,
        }
    }

    /// Fetch each symbol in turn. A symbol that fails to load gets empty
    /// closes and null stats; the others are unaffected.
    pub async fn build<S: MarketSource>(
        &self,
        market: &MarketDataService<S>,
        primary: &str,
        timeframe: Timeframe,
    ) -> MarketContext {
        let mut entries = Vec::new();

        for symbol in symbol_set(primary, &self.reference_symbols) {
            let closes = match market.bars(&symbol, timeframe).await {
                Ok(series) => {
                    let closes = series.closes();
                    let start = closes.len().saturating_sub(self.window);
                    closes[start..].to_vec()
                }
                Err(e) => {
                    warn!("Context fetch failed for {}: {}", symbol, e);
                    Vec::new()
                }
            };

            let stat = SymbolStat::from_closes(&closes);
            entries.push(SymbolContext {
                symbol,
                closes,
                stat,
            });
        }

        MarketContext { entries }
    }
}
