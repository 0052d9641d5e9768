use crate::types::{Bar, THIRTY_SECONDS_MS};

use super::aggregator::MAX_BARS;

/// One-minute candles requested for the fallback, enough for `MAX_BARS`
/// after the 2x expansion.
pub const FALLBACK_CANDLES: u32 = 150;

/// Derives 30-second bars from 1-minute candles.
///
/// Each candle becomes two bars: the first closes at the candle's midpoint
/// between open and close, the second opens there and closes at the candle
/// close. Both keep the full candle high/low and half of its volume.
#[derive(Debug, Clone)]
pub struct KlineFallbackSynthesizer {
    max_bars: usize,
}

impl Default for KlineFallbackSynthesizer {
    fn default() -> Self {
        Self { max_bars: MAX_BARS }
    }
}

impl KlineFallbackSynthesizer {
    /// Split one 1-minute candle into two 30-second bars.
    pub fn split(candle: &Bar) -> [Bar; 2] {
        let mid = (candle.open + candle.close) / 2.0;
        let half_volume = candle.volume / 2.0;

        [
            Bar::new(candle.time, candle.open, candle.high, candle.low, mid, half_volume),
            Bar::new(
                candle.time + THIRTY_SECONDS_MS,
                mid,
                candle.high,
                candle.low,
                candle.close,
                half_volume,
            ),
        ]
    }

    /// Expand candles into synthetic bars, keeping the most recent ones.
    pub fn synthesize(&self, candles: &[Bar]) -> Vec<Bar> {
        let mut bars: Vec<Bar> = candles.iter().flat_map(Self::split).collect();
        if bars.len() > self.max_bars {
            bars.drain(..bars.len() - self.max_bars);
        }
        bars
    }
}
