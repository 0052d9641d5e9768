//! End-to-end flow tests: scripted exchange data through bars, signals,
//! context and analysis.

use serde_json::{json, Value};
use skalp::config::CacheConfig;
use skalp::services::{
    AnalysisService, MarketDataService, MultiSymbolContextBuilder, SignalClassifier,
};
use skalp::sources::{MarketSource, TextGenerator};
use skalp::types::{BarSeries, ScalpResponse, Side, SignalKind, Timeframe, Trade, Trend};
use skalp::{AppError, Result};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tokio_test::{assert_err, assert_ok};

mod common {
    use super::*;

    /// In-memory exchange keyed by symbol.
    #[derive(Default)]
    pub struct ScriptedSource {
        pub trades: HashMap<String, Vec<Trade>>,
        pub candles: HashMap<String, Value>,
        pub failing: HashSet<String>,
    }

    impl ScriptedSource {
        pub fn with_candles(mut self, symbol: &str, rows: Value) -> Self {
            self.candles.insert(symbol.to_string(), rows);
            self
        }

        pub fn with_trades(mut self, symbol: &str, trades: Vec<Trade>) -> Self {
            self.trades.insert(symbol.to_string(), trades);
            self
        }

        pub fn failing(mut self, symbol: &str) -> Self {
            self.failing.insert(symbol.to_string());
            self
        }

        fn check(&self, symbol: &str) -> Result<()> {
            if self.failing.contains(symbol) {
                return Err(AppError::upstream(
                    "Binance API error: 400 Bad Request",
                    400,
                    r#"{"code":-1121,"msg":"Invalid symbol."}"#,
                ));
            }
            Ok(())
        }
    }

    impl MarketSource for ScriptedSource {
        async fn exchange_info(&self) -> Result<Value> {
            Ok(json!({"symbols": []}))
        }

        async fn klines(&self, symbol: &str, _interval: &str, _limit: u32) -> Result<Value> {
            self.check(symbol)?;
            Ok(self.candles.get(symbol).cloned().unwrap_or_else(|| json!([])))
        }

        async fn agg_trades(&self, symbol: &str, _limit: u32) -> Result<Vec<Trade>> {
            self.check(symbol)?;
            Ok(self.trades.get(symbol).cloned().unwrap_or_default())
        }
    }

    /// Candle rows with each open at the previous close.
    pub fn candle_rows(closes: &[f64], volumes: &[f64]) -> Value {
        let mut prev = closes[0];
        let rows: Vec<Value> = closes
            .iter()
            .zip(volumes)
            .enumerate()
            .map(|(i, (&close, &volume))| {
                let open = prev;
                prev = close;
                json!([
                    1_700_000_040_000i64 + i as i64 * 60_000,
                    open.to_string(),
                    open.max(close).to_string(),
                    open.min(close).to_string(),
                    close.to_string(),
                    volume.to_string(),
                    1_700_000_040_000i64 + i as i64 * 60_000 + 59_999
                ])
            })
            .collect();
        Value::Array(rows)
    }

    /// One trade per 30s bucket.
    pub fn trades_for(closes: &[f64], volumes: &[f64]) -> Vec<Trade> {
        closes
            .iter()
            .zip(volumes)
            .enumerate()
            .map(|(i, (&price, &qty))| Trade::new(1_700_000_010_000 + i as i64 * 30_000, price, qty))
            .collect()
    }

    pub fn service(source: ScriptedSource) -> MarketDataService<ScriptedSource> {
        MarketDataService::new(source, &CacheConfig::default())
    }
}

use common::*;

async fn scalp(
    market: &MarketDataService<ScriptedSource>,
    symbol: &str,
    timeframe: Timeframe,
) -> Result<ScalpResponse> {
    let series = market.bars(symbol, timeframe).await?;
    let result = SignalClassifier::default().classify(series.bars());
    Ok(ScalpResponse::from_series(series, result))
}

#[tokio::test]
async fn test_rising_candles_synthesize_long_trend() {
    let closes: Vec<f64> = (0..20).map(|i| 100.0 + 10.0 * i as f64 / 19.0).collect();
    let volumes: Vec<f64> = (0..20).map(|i| 10.0 + i as f64).collect();
    let market = service(
        ScriptedSource::default()
            .with_trades("SOLUSDT", vec![Trade::new(1_700_000_000_000, 100.0, 1.0)])
            .with_candles("SOLUSDT", candle_rows(&closes, &volumes)),
    );

    let response = assert_ok!(scalp(&market, "SOLUSDT", Timeframe::ThirtySeconds).await);

    assert_eq!(response.mode, "sintetik 30s (1m-dən törədilmiş)");
    assert_eq!(response.bars.len(), 40);
    assert_eq!(response.trend, Trend::OnlyLong);
    assert_ne!(response.signal, SignalKind::Short);

    let last_close = response.bars.last().unwrap().close;
    assert!((last_close - 110.0).abs() < 1e-9);
    if let Some(suggestion) = response.suggestion {
        assert_eq!(suggestion.side, Side::Long);
        assert_eq!(suggestion.entry, last_close);
        assert!((suggestion.take_profit - last_close * 1.005).abs() < 1e-6);
        assert!((suggestion.stop_loss - last_close * 0.997).abs() < 1e-6);
    }
}

#[tokio::test]
async fn test_real_trades_breakout_long() {
    let mut closes: Vec<f64> = (0..31).map(|i| if i % 2 == 0 { 100.0 } else { 101.0 }).collect();
    closes.push(101.2);
    let mut volumes = vec![10.0; 31];
    volumes.push(30.0);

    let market = service(ScriptedSource::default().with_trades("SOLUSDT", trades_for(&closes, &volumes)));
    let response = scalp(&market, "SOLUSDT", Timeframe::ThirtySeconds).await.unwrap();

    assert_eq!(response.mode, "gerçək 30s (aggTrades)");
    assert_eq!(response.bars.len(), 32);
    assert_eq!(response.trend, Trend::OnlyLong);
    assert_eq!(response.signal, SignalKind::Long);

    let suggestion = response.suggestion.unwrap();
    assert_eq!(suggestion.entry, 101.2);
    assert!((suggestion.take_profit - 101.706).abs() < 1e-9);
    assert!((suggestion.stop_loss - 100.8964).abs() < 1e-9);
    assert_eq!(suggestion.risk_reward_label, "1:1.5");
}

#[tokio::test]
async fn test_long_after_decline_with_short_history() {
    // 60 real bars: too few for EMA99, which must not force an only-short trend
    let mut closes: Vec<f64> = (0..59)
        .map(|i| 100.0 - 0.02 * i as f64 + if i % 2 == 1 { 0.1 } else { -0.1 })
        .collect();
    closes.push(closes[58] + 0.2);
    let mut volumes = vec![10.0; 59];
    volumes.push(30.0);

    let market = service(ScriptedSource::default().with_trades("XRPUSDT", trades_for(&closes, &volumes)));
    let response = scalp(&market, "XRPUSDT", Timeframe::ThirtySeconds).await.unwrap();

    assert_eq!(response.mode, "gerçək 30s (aggTrades)");
    assert_eq!(response.bars.len(), 60);
    assert_eq!(response.trend, Trend::Mixed);
    assert_eq!(response.signal, SignalKind::Long);
    assert_eq!(response.suggestion.unwrap().side, Side::Long);
}

#[tokio::test]
async fn test_flat_market_is_neutral() {
    let closes = vec![50.0; 150];
    let volumes = vec![5.0; 150];
    let market = service(ScriptedSource::default().with_candles("ADAUSDT", candle_rows(&closes, &volumes)));

    let response = scalp(&market, "ADAUSDT", Timeframe::ThirtySeconds).await.unwrap();

    assert_eq!(response.bars.len(), 100);
    assert_eq!(response.signal, SignalKind::Neutral);
    assert!(response.suggestion.is_none());
}

#[tokio::test]
async fn test_kline_timeframe_mode() {
    let closes: Vec<f64> = (0..200).map(|i| 20.0 + (i % 7) as f64).collect();
    let volumes = vec![1.0; 200];
    let market = service(ScriptedSource::default().with_candles("BNBUSDT", candle_rows(&closes, &volumes)));

    let response = scalp(&market, "BNBUSDT", Timeframe::TenHours).await.unwrap();

    assert_eq!(response.mode, "klines 8h");
    assert_eq!(response.bars.len(), 120);
}

#[tokio::test]
async fn test_upstream_failure_is_localized() {
    let market = service(ScriptedSource::default().failing("NOPEUSDT"));

    let err = assert_err!(scalp(&market, "NOPEUSDT", Timeframe::ThirtySeconds).await)
        .localized("30s tövsiyələrini hesablamaq mümkün olmadı");

    match err {
        AppError::Failed { message, status, body } => {
            assert_eq!(message, "30s tövsiyələrini hesablamaq mümkün olmadı");
            assert_eq!(status, Some(400));
            assert_eq!(body.unwrap()["code"], -1121);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_context_isolates_failing_symbol() {
    let rising: Vec<f64> = (0..80).map(|i| 100.0 + i as f64).collect();
    let volumes = vec![1.0; 80];
    let market = service(
        ScriptedSource::default()
            .with_candles("SOLUSDT", candle_rows(&rising, &volumes))
            .with_candles("BTCUSDT", candle_rows(&rising, &volumes))
            .failing("ETHUSDT"),
    );
    let builder = MultiSymbolContextBuilder::new(vec![
        "BTCUSDT".to_string(),
        "ETHUSDT".to_string(),
        "SOLUSDT".to_string(),
    ]);

    let context = builder.build(&market, "SOLUSDT", Timeframe::OneMinute).await;

    assert_eq!(context.symbols(), vec!["SOLUSDT", "BTCUSDT", "ETHUSDT"]);

    let sol = context.get("SOLUSDT").unwrap();
    assert_eq!(sol.closes.len(), 60);
    assert_eq!(sol.closes[0], 120.0);
    assert_eq!(sol.stat.last_close, Some(179.0));
    assert!((sol.stat.change_pct.unwrap() - 49.166_666_666).abs() < 1e-6);

    let eth = context.get("ETHUSDT").unwrap();
    assert!(eth.closes.is_empty());
    assert_eq!(eth.stat.last_close, None);
    assert_eq!(eth.stat.change_pct, None);

    assert_eq!(context.stats()["BTCUSDT"], sol.stat);
}

/// Generator that records the prompt and replies with a fixed text.
#[derive(Default)]
struct RecordingGenerator {
    prompts: Mutex<Vec<String>>,
}

impl TextGenerator for RecordingGenerator {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        assert!(system.contains("skalp"));
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok("Long düşün: giriş 101".to_string())
    }
}

#[tokio::test]
async fn test_analysis_response() {
    let closes: Vec<f64> = (0..30).map(|i| 10.0 + i as f64 * 0.5).collect();
    let volumes = vec![2.0; 30];
    let market = service(
        ScriptedSource::default()
            .with_candles("SOLUSDT", candle_rows(&closes, &volumes))
            .with_candles("BTCUSDT", candle_rows(&closes, &volumes))
            .failing("BNBUSDT"),
    );
    let analysis = AnalysisService::new(
        RecordingGenerator::default(),
        MultiSymbolContextBuilder::new(vec!["BTCUSDT".to_string(), "BNBUSDT".to_string()]),
    );

    let response = analysis
        .analyze(&market, "SOLUSDT", Timeframe::FiveMinutes)
        .await
        .unwrap();

    assert_eq!(response.analysis, "Long düşün: giriş 101");
    assert_eq!(response.symbols, vec!["SOLUSDT", "BTCUSDT", "BNBUSDT"]);
    assert_eq!(response.stats["SOLUSDT"].last_close, Some(24.5));
    assert_eq!(response.stats["BNBUSDT"].last_close, None);

    let prompts = analysis.generator().prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Zaman çərçivəsi: 5m. Seçilmiş simvol: SOLUSDT."));
    assert!(prompts[0].contains("\nBNBUSDT: \n"));
}

#[tokio::test]
async fn test_bar_series_reused_from_cache() {
    let closes: Vec<f64> = (0..20).map(|i| 1.0 + i as f64).collect();
    let volumes = vec![1.0; 20];
    let market = service(ScriptedSource::default().with_candles("SOLUSDT", candle_rows(&closes, &volumes)));

    let first = market.bars("SOLUSDT", Timeframe::ThirtySeconds).await.unwrap();
    let second = market.bars("SOLUSDT", Timeframe::ThirtySeconds).await.unwrap();

    assert!(matches!(first, BarSeries::Synthetic(_)));
    assert_eq!(first, second);
    // One raw candle entry plus one bar series entry
    assert_eq!(market.cache_stats().total_keys, 2);
}
