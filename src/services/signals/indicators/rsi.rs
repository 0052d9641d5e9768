//! Relative Strength Index (RSI) indicator.

use super::{Indicator, IndicatorSeries};

/// RS used when there have been no losses at all.
const NO_LOSS_RS: f64 = 100.0;

/// RSI (Relative Strength Index) indicator.
///
/// Measures momentum by comparing the magnitude of recent gains to recent losses.
/// Values range from 0-100:
/// - Below 30: Oversold
/// - Above 70: Overbought
#[derive(Debug, Clone, Copy)]
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Rsi {
    fn period(&self) -> usize {
        self.period
    }

    fn warmup(&self) -> usize {
        self.period
    }

    fn series(&self, values: &[f64]) -> IndicatorSeries {
        rsi(values, self.period)
    }
}

/// Streaming RSI with Wilder smoothing.
///
/// Feed one price per tick; the first value comes out after `period` price
/// changes have been seen.
#[derive(Debug, Clone)]
pub struct WilderRsi {
    period: usize,
    prev: Option<f64>,
    changes: usize,
    avg_gain: f64,
    avg_loss: f64,
}

impl WilderRsi {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            prev: None,
            changes: 0,
            avg_gain: 0.0,
            avg_loss: 0.0,
        }
    }

    /// Push the next price and return the RSI at this position, if defined.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        let prev = self.prev.replace(value)?;
        if self.period == 0 {
            return None;
        }

        let change = value - prev;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);
        let period = self.period as f64;
        self.changes += 1;

        if self.changes < self.period {
            // Accumulate sums until the seed window is full
            self.avg_gain += gain;
            self.avg_loss += loss;
            return None;
        }

        if self.changes == self.period {
            self.avg_gain = (self.avg_gain + gain) / period;
            self.avg_loss = (self.avg_loss + loss) / period;
        } else {
            self.avg_gain = (self.avg_gain * (period - 1.0) + gain) / period;
            self.avg_loss = (self.avg_loss * (period - 1.0) + loss) / period;
        }

        Some(self.value())
    }

    /// RSI for the current averages. Meaningless before the first value.
    fn value(&self) -> f64 {
        let rs = if self.avg_loss == 0.0 {
            NO_LOSS_RS
        } else {
            self.avg_gain / self.avg_loss
        };
        100.0 - 100.0 / (1.0 + rs)
    }

    pub fn avg_gain(&self) -> f64 {
        self.avg_gain
    }

    pub fn avg_loss(&self) -> f64 {
        self.avg_loss
    }
}

/// RSI over `values`, same length as the input.
///
/// All null when there are fewer than `period + 1` values.
pub fn rsi(values: &[f64], period: usize) -> IndicatorSeries {
    if period == 0 || values.len() < period + 1 {
        return vec![None; values.len()];
    }

    let mut state = WilderRsi::new(period);
    values.iter().map(|v| state.push(*v)).collect()
}
