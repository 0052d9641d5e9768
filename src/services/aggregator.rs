use crate::types::{Bar, Trade, THIRTY_SECONDS_MS};
use tracing::debug;

/// Fewest bars accepted as a real series.
pub const MIN_REAL_BARS: usize = 10;
/// Most bars kept from a real series.
pub const MAX_BARS: usize = 100;

/// Start of the bucket containing `timestamp`.
pub fn bucket_start(timestamp: i64, width_ms: i64) -> i64 {
    timestamp.div_euclid(width_ms) * width_ms
}

/// Groups trades into fixed-width OHLCV bars.
#[derive(Debug, Clone)]
pub struct TradeBucketAggregator {
    width_ms: i64,
    min_bars: usize,
    max_bars: usize,
}

impl Default for TradeBucketAggregator {
    fn default() -> Self {
        Self::new(THIRTY_SECONDS_MS)
    }
}

impl TradeBucketAggregator {
    pub fn new(width_ms: i64) -> Self {
        Self {
            width_ms: width_ms.max(1),
            min_bars: MIN_REAL_BARS,
            max_bars: MAX_BARS,
        }
    }

    /// Aggregate every trade into time-ascending bars.
    ///
    /// Trades are ordered by timestamp first (stable, so arrival order breaks
    /// ties) so the last trade in a bucket always sets its close.
    pub fn aggregate(&self, trades: &[Trade]) -> Vec<Bar> {
        let mut ordered: Vec<&Trade> = trades
            .iter()
            .filter(|t| t.price.is_finite() && t.quantity.is_finite())
            .collect();
        ordered.sort_by_key(|t| t.timestamp);

        let mut bars: Vec<Bar> = Vec::new();
        for trade in ordered {
            let bucket = bucket_start(trade.timestamp, self.width_ms);

            if let Some(last) = bars.last_mut() {
                if last.time == bucket {
                    last.absorb(trade.price, trade.quantity);
                    continue;
                }
            }

            bars.push(Bar::opened_at(bucket, trade.price, trade.quantity));
        }

        bars
    }

    /// Build a real bar series, or `None` when there is too little data.
    ///
    /// The result holds at most the most recent `MAX_BARS` bars.
    pub fn build(&self, trades: &[Trade]) -> Option<Vec<Bar>> {
        let mut bars = self.aggregate(trades);
        if bars.len() < self.min_bars {
            debug!(
                "Only {} bars from {} trades (need {})",
                bars.len(),
                trades.len(),
                self.min_bars
            );
            return None;
        }

        if bars.len() > self.max_bars {
            bars.drain(..bars.len() - self.max_bars);
        }
        Some(bars)
    }
}
