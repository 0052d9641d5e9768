//! Bar pipeline fronted by the shared TTL caches.
//!
//! 30s bars come from aggregated trades when there are enough of them and
//! from split 1-minute candles otherwise. Every other timeframe is served
//! straight from exchange candles.

use crate::config::CacheConfig;
use crate::error::Result;
use crate::sources::{parse_kline_rows, usdt_trading_symbols, MarketSource};
use crate::types::{Bar, BarSeries, CacheStats, Timeframe};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::aggregator::TradeBucketAggregator;
use super::cache::Cache;
use super::synthesizer::{KlineFallbackSynthesizer, FALLBACK_CANDLES};

/// Trades requested when building real 30s bars.
pub const TRADE_FETCH_LIMIT: u32 = 800;
/// Candles requested for non-30s timeframes.
pub const KLINE_FETCH_LIMIT: u32 = 200;
/// Candles kept from a non-30s fetch.
pub const KLINE_KEEP: usize = 120;

const SYMBOLS_KEY: &str = "symbols_usdt_trading";

pub fn klines_key(symbol: &str, interval: &str, limit: u32) -> String {
    format!("klines_{}_{}_{}", symbol, interval, limit)
}

pub fn bars_key(symbol: &str, timeframe: Timeframe) -> String {
    format!("bars_{}_{}", symbol, timeframe.as_str())
}

/// Market data service composing the exchange source with the caches.
pub struct MarketDataService<S> {
    source: S,
    raw_cache: Cache<Value>,
    bar_cache: Cache<BarSeries>,
    symbol_cache: Cache<Vec<String>>,
    aggregator: TradeBucketAggregator,
    synthesizer: KlineFallbackSynthesizer,
}

impl<S: MarketSource> MarketDataService<S> {
    pub fn new(source: S, cache: &CacheConfig) -> Self {
        Self {
            source,
            raw_cache: Cache::new(cache.klines_ttl),
            bar_cache: Cache::new(cache.bars_ttl),
            symbol_cache: Cache::new(cache.symbols_ttl),
            aggregator: TradeBucketAggregator::default(),
            synthesizer: KlineFallbackSynthesizer::default(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Raw candle rows, cached per (symbol, interval, limit).
    pub async fn klines_raw(&self, symbol: &str, interval: &str, limit: u32) -> Result<Value> {
        let key = klines_key(symbol, interval, limit);
        if let Some(raw) = self.raw_cache.get(&key) {
            debug!("Cache hit: {}", key);
            return Ok(raw);
        }
        debug!("Cache miss: {}", key);

        let raw = self.source.klines(symbol, interval, limit).await?;
        self.raw_cache.set(key, raw.clone());
        Ok(raw)
    }

    /// Candles parsed into bars, through the raw cache.
    pub async fn candles(&self, symbol: &str, interval: &str, limit: u32) -> Result<Vec<Bar>> {
        let raw = self.klines_raw(symbol, interval, limit).await?;
        parse_kline_rows(&raw)
    }

    /// Sorted USDT trading symbols.
    pub async fn trading_symbols(&self) -> Result<Vec<String>> {
        if let Some(symbols) = self.symbol_cache.get(SYMBOLS_KEY) {
            return Ok(symbols);
        }

        let info = self.source.exchange_info().await?;
        let symbols = usdt_trading_symbols(&info);
        info!("Loaded {} trading symbols", symbols.len());
        self.symbol_cache.set(SYMBOLS_KEY.to_string(), symbols.clone());
        Ok(symbols)
    }

    /// Bar series for `symbol` at `timeframe`.
    pub async fn bars(&self, symbol: &str, timeframe: Timeframe) -> Result<BarSeries> {
        let key = bars_key(symbol, timeframe);
        if let Some(series) = self.bar_cache.get(&key) {
            debug!("Cache hit: {}", key);
            return Ok(series);
        }
        debug!("Cache miss: {}", key);

        let series = match timeframe.kline_interval() {
            None => self.thirty_second_bars(symbol).await?,
            Some(interval) => {
                let mut bars = self.candles(symbol, interval, KLINE_FETCH_LIMIT).await?;
                if bars.len() > KLINE_KEEP {
                    bars.drain(..bars.len() - KLINE_KEEP);
                }
                BarSeries::Klines {
                    interval: interval.to_string(),
                    bars,
                }
            }
        };

        self.bar_cache.set(key, series.clone());
        Ok(series)
    }

    async fn thirty_second_bars(&self, symbol: &str) -> Result<BarSeries> {
        match self.source.agg_trades(symbol, TRADE_FETCH_LIMIT).await {
            Ok(trades) => {
                if let Some(bars) = self.aggregator.build(&trades) {
                    return Ok(BarSeries::Real(bars));
                }
                info!(
                    "Not enough trade data for {} ({} trades), using 1m candles",
                    symbol,
                    trades.len()
                );
            }
            Err(e) => {
                warn!("Trade fetch failed for {}: {}, using 1m candles", symbol, e);
            }
        }

        let candles = self.candles(symbol, "1m", FALLBACK_CANDLES).await?;
        Ok(BarSeries::Synthetic(self.synthesizer.synthesize(&candles)))
    }

    /// Drop every cached entry.
    pub fn clear_cache(&self) {
        self.raw_cache.clear();
        self.bar_cache.clear();
        self.symbol_cache.clear();
        info!("Caches cleared");
    }

    /// Drop one key from whichever cache holds it.
    pub fn evict(&self, key: &str) -> bool {
        let raw = self.raw_cache.remove(key).is_some();
        let bars = self.bar_cache.remove(key).is_some();
        let symbols = self.symbol_cache.remove(key).is_some();
        raw || bars || symbols
    }

    pub fn cache_stats(&self) -> CacheStats {
        let raw_entries = self.raw_cache.len();
        let bar_entries = self.bar_cache.len();
        let symbol_entries = self.symbol_cache.len();
        CacheStats {
            raw_entries,
            bar_entries,
            symbol_entries,
            total_keys: raw_entries + bar_entries + symbol_entries,
        }
    }
}
