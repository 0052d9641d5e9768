use crate::error::{AppError, Result};
use crate::types::{Bar, Trade};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::MarketSource;

/// Leveraged-token suffixes excluded from the symbol listing.
const LEVERAGED_SUFFIXES: &[&str] = &["UPUSDT", "DOWNUSDT"];

/// Aggregated trade as returned by `/api/v3/aggTrades`.
#[derive(Debug, Deserialize)]
struct AggTrade {
    #[serde(rename = "T")]
    time: i64,
    #[serde(rename = "p")]
    price: String,
    #[serde(rename = "q")]
    quantity: String,
}

impl AggTrade {
    fn to_trade(&self) -> Option<Trade> {
        let price = self.price.parse().ok()?;
        let quantity = self.quantity.parse().ok()?;
        Some(Trade::new(self.time, price, quantity))
    }
}

/// Binance public REST client.
#[derive(Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
}

impl BinanceClient {
    /// Create a new Binance client.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Skalp/1.0")
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(
                "Binance {} returned {}: {}",
                path,
                status,
                text.chars().take(200).collect::<String>()
            );
            return Err(AppError::upstream(
                format!("Binance API error: {}", status),
                status.as_u16(),
                &text,
            ));
        }

        Ok(response.json().await?)
    }
}

impl MarketSource for BinanceClient {
    async fn exchange_info(&self) -> Result<Value> {
        self.fetch_json("/api/v3/exchangeInfo", &[]).await
    }

    async fn klines(&self, symbol: &str, interval: &str, limit: u32) -> Result<Value> {
        self.fetch_json(
            "/api/v3/klines",
            &[
                ("symbol", symbol.to_string()),
                ("interval", interval.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    async fn agg_trades(&self, symbol: &str, limit: u32) -> Result<Vec<Trade>> {
        let raw: Vec<AggTrade> = serde_json::from_value(
            self.fetch_json(
                "/api/v3/aggTrades",
                &[("symbol", symbol.to_string()), ("limit", limit.to_string())],
            )
            .await?,
        )?;

        let trades: Vec<Trade> = raw.iter().filter_map(AggTrade::to_trade).collect();
        if trades.len() < raw.len() {
            warn!(
                "Dropped {} unparsable trades for {}",
                raw.len() - trades.len(),
                symbol
            );
        }
        debug!("Fetched {} trades for {}", trades.len(), symbol);
        Ok(trades)
    }
}

/// Exchange numbers arrive as strings; accept plain numbers too.
fn parse_str_f64(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.parse().ok(),
        other => other.as_f64(),
    }
}

/// Parse raw candle rows (`[openTime, o, h, l, c, v, ...]`) into bars.
///
/// Malformed rows are skipped. A body that is not an array is an error.
pub fn parse_kline_rows(raw: &Value) -> Result<Vec<Bar>> {
    let rows = raw.as_array().ok_or_else(|| AppError::ExternalApi {
        message: "Unexpected klines response".to_string(),
        status: None,
        body: Some(raw.clone()),
    })?;

    let mut bars = Vec::with_capacity(rows.len());
    for row in rows {
        let parsed = row.as_array().filter(|arr| arr.len() >= 6).and_then(|arr| {
            Some(Bar::new(
                arr[0].as_i64()?,
                parse_str_f64(&arr[1])?,
                parse_str_f64(&arr[2])?,
                parse_str_f64(&arr[3])?,
                parse_str_f64(&arr[4])?,
                parse_str_f64(&arr[5])?,
            ))
        });

        match parsed {
            Some(bar) => bars.push(bar),
            None => warn!("Skipping malformed kline row: {}", row),
        }
    }

    Ok(bars)
}

/// USDT-quoted symbols currently trading, leveraged tokens excluded, sorted.
pub fn usdt_trading_symbols(info: &Value) -> Vec<String> {
    let mut symbols: Vec<String> = info
        .get("symbols")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter(|s| s.get("status").and_then(Value::as_str) == Some("TRADING"))
                .filter(|s| s.get("quoteAsset").and_then(Value::as_str) == Some("USDT"))
                .filter_map(|s| s.get("symbol").and_then(Value::as_str))
                .filter(|sym| !LEVERAGED_SUFFIXES.iter().any(|suffix| sym.contains(*suffix)))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    symbols.sort();
    symbols
}
