use serde::{Deserialize, Serialize};

/// Width of a 30-second bucket in milliseconds.
pub const THIRTY_SECONDS_MS: i64 = 30_000;

/// A single executed trade as reported by the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Execution time in epoch milliseconds.
    pub timestamp: i64,
    pub price: f64,
    pub quantity: f64,
}

impl Trade {
    pub fn new(timestamp: i64, price: f64, quantity: f64) -> Self {
        Self {
            timestamp,
            price,
            quantity,
        }
    }
}

/// OHLCV bar for one fixed-width time bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bucket start in epoch milliseconds.
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Open a bucket with a single trade.
    pub fn opened_at(time: i64, price: f64, quantity: f64) -> Self {
        Self::new(time, price, price, price, price, quantity)
    }

    /// Fold another trade into the bucket. The last trade sets the close.
    pub fn absorb(&mut self, price: f64, quantity: f64) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
        self.volume += quantity;
    }
}

/// Supported chart timeframe codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    #[default]
    #[serde(rename = "30s")]
    ThirtySeconds,
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "3m")]
    ThreeMinutes,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "2h")]
    TwoHours,
    #[serde(rename = "3h")]
    ThreeHours,
    #[serde(rename = "5h")]
    FiveHours,
    #[serde(rename = "10h")]
    TenHours,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "2d")]
    TwoDays,
    #[serde(rename = "3d")]
    ThreeDays,
}

impl std::str::FromStr for Timeframe {
    type Err = String;

    /// Parse a timeframe code such as `30s` or `5h`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "30s" => Ok(Self::ThirtySeconds),
            "1m" => Ok(Self::OneMinute),
            "3m" => Ok(Self::ThreeMinutes),
            "5m" => Ok(Self::FiveMinutes),
            "1h" => Ok(Self::OneHour),
            "2h" => Ok(Self::TwoHours),
            "3h" => Ok(Self::ThreeHours),
            "5h" => Ok(Self::FiveHours),
            "10h" => Ok(Self::TenHours),
            "1d" => Ok(Self::OneDay),
            "2d" => Ok(Self::TwoDays),
            "3d" => Ok(Self::ThreeDays),
            _ => Err(format!("Unknown timeframe: {}", s)),
        }
    }
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThirtySeconds => "30s",
            Self::OneMinute => "1m",
            Self::ThreeMinutes => "3m",
            Self::FiveMinutes => "5m",
            Self::OneHour => "1h",
            Self::TwoHours => "2h",
            Self::ThreeHours => "3h",
            Self::FiveHours => "5h",
            Self::TenHours => "10h",
            Self::OneDay => "1d",
            Self::TwoDays => "2d",
            Self::ThreeDays => "3d",
        }
    }

    /// Exchange candle interval backing this timeframe.
    ///
    /// `None` for 30s: the exchange has no such interval, so those bars are
    /// built from trades instead.
    pub fn kline_interval(&self) -> Option<&'static str> {
        match self {
            Self::ThirtySeconds => None,
            Self::FiveHours => Some("4h"),
            Self::TenHours => Some("8h"),
            Self::TwoDays => Some("3d"),
            other => Some(other.as_str()),
        }
    }
}

/// A bar series tagged with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum BarSeries {
    /// Built from individual exchange trades.
    Real(Vec<Bar>),
    /// Derived from 1-minute candles because trade data was insufficient.
    Synthetic(Vec<Bar>),
    /// Exchange candles taken as-is.
    Klines { interval: String, bars: Vec<Bar> },
}

impl BarSeries {
    pub fn bars(&self) -> &[Bar] {
        match self {
            Self::Real(bars) | Self::Synthetic(bars) => bars,
            Self::Klines { bars, .. } => bars,
        }
    }

    pub fn into_bars(self) -> Vec<Bar> {
        match self {
            Self::Real(bars) | Self::Synthetic(bars) => bars,
            Self::Klines { bars, .. } => bars,
        }
    }

    /// Human-readable label of the bar source shown to clients.
    pub fn mode_label(&self) -> String {
        match self {
            Self::Real(_) => "gerçək 30s (aggTrades)".to_string(),
            Self::Synthetic(_) => "sintetik 30s (1m-dən törədilmiş)".to_string(),
            Self::Klines { interval, .. } => format!("klines {}", interval),
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, Self::Synthetic(_))
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars().iter().map(|b| b.close).collect()
    }
}
