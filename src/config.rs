use std::env;
use std::time::Duration;

/// Time-to-live settings for the shared caches.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Raw candle pass-through responses.
    pub klines_ttl: Duration,
    /// Trading-symbol listing.
    pub symbols_ttl: Duration,
    /// Built bar series per (symbol, timeframe).
    pub bars_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            klines_ttl: Duration::from_secs(10),
            symbols_ttl: Duration::from_secs(5 * 60),
            bars_ttl: Duration::from_secs(5),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Exchange REST base URL.
    pub binance_api_url: String,
    /// Chat-completions endpoint used for narrative analysis.
    pub deepseek_api_url: String,
    /// Bearer token for the chat-completions endpoint.
    pub deepseek_api_key: Option<String>,
    /// Model name sent with each completion request.
    pub deepseek_model: String,
    /// Timeout for exchange requests.
    pub market_timeout: Duration,
    /// Timeout for completion requests.
    pub analysis_timeout: Duration,
    /// Symbol used when a request does not name one.
    pub default_symbol: String,
    /// Timeframe code used when a request does not name one.
    pub default_timeframe: String,
    /// Symbols always included in the comparative context.
    pub reference_symbols: Vec<String>,
    /// Cache lifetimes.
    pub cache: CacheConfig,
}

fn env_millis(key: &str, default: Duration) -> Duration {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_millis)
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        // Format: "BTCUSDT,ETHUSDT,BNBUSDT"
        let reference_symbols = env::var("REFERENCE_SYMBOLS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|sym| sym.trim().to_uppercase())
                    .filter(|sym| !sym.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|symbols| !symbols.is_empty())
            .unwrap_or_else(default_reference_symbols);

        let defaults = CacheConfig::default();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            binance_api_url: env::var("BINANCE_API_URL")
                .unwrap_or_else(|_| "https://api.binance.com".to_string()),
            deepseek_api_url: env::var("DEEPSEEK_API_URL")
                .unwrap_or_else(|_| "https://api.deepseek.com/v1/chat/completions".to_string()),
            deepseek_api_key: env::var("DEEPSEEK_API_KEY").ok().filter(|k| !k.is_empty()),
            deepseek_model: env::var("DEEPSEEK_MODEL")
                .unwrap_or_else(|_| "deepseek-chat".to_string()),
            market_timeout: env_millis("MARKET_TIMEOUT_MS", Duration::from_secs(15)),
            analysis_timeout: env_millis("ANALYSIS_TIMEOUT_MS", Duration::from_secs(20)),
            default_symbol: env::var("DEFAULT_SYMBOL")
                .map(|s| s.to_uppercase())
                .unwrap_or_else(|_| "SOLUSDT".to_string()),
            default_timeframe: env::var("DEFAULT_TIMEFRAME").unwrap_or_else(|_| "30s".to_string()),
            reference_symbols,
            cache: CacheConfig {
                klines_ttl: env_millis("KLINES_CACHE_TTL_MS", defaults.klines_ttl),
                symbols_ttl: env_millis("SYMBOLS_CACHE_TTL_MS", defaults.symbols_ttl),
                bars_ttl: env_millis("BARS_CACHE_TTL_MS", defaults.bars_ttl),
            },
        }
    }
}

fn default_reference_symbols() -> Vec<String> {
    vec![
        "BTCUSDT".to_string(),
        "ETHUSDT".to_string(),
        "BNBUSDT".to_string(),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
