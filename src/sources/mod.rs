//! Upstream data sources: the exchange REST API and the completion API.

pub mod binance;
pub mod deepseek;

use crate::error::Result;
use crate::types::Trade;
use serde_json::Value;
use std::future::Future;

pub use binance::{parse_kline_rows, usdt_trading_symbols, BinanceClient};
pub use deepseek::DeepSeekClient;

/// Exchange market data the bar pipeline reads from.
///
/// Candle and exchange-info bodies are returned raw so they can be cached and
/// passed through unchanged.
pub trait MarketSource: Send + Sync {
    /// Full exchange info document.
    fn exchange_info(&self) -> impl Future<Output = Result<Value>> + Send;

    /// Raw candle rows for `symbol` at `interval`.
    fn klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Value>> + Send;

    /// Most recent aggregated trades, oldest first.
    fn agg_trades(&self, symbol: &str, limit: u32) -> impl Future<Output = Result<Vec<Trade>>> + Send;
}

/// A chat-style text completion backend.
pub trait TextGenerator: Send + Sync {
    fn complete(&self, system: &str, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}
