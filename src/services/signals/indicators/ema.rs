//! Exponential Moving Average (EMA) indicator.

use super::{Indicator, IndicatorSeries};

/// EMA (Exponential Moving Average) indicator.
///
/// Like SMA but gives more weight to recent prices. The first value, at
/// index `period - 1`, is the simple average of the first `period` values.
#[derive(Debug, Clone, Copy)]
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Ema {
    fn period(&self) -> usize {
        self.period
    }

    fn warmup(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn series(&self, values: &[f64]) -> IndicatorSeries {
        ema(values, self.period)
    }
}

/// Exponential moving average over `values`, same length as the input.
pub fn ema(values: &[f64], period: usize) -> IndicatorSeries {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let multiplier = 2.0 / (period as f64 + 1.0);

    // First EMA is SMA
    let mut prev = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(prev);

    for i in period..values.len() {
        prev = values[i] * multiplier + prev * (1.0 - multiplier);
        out[i] = Some(prev);
    }

    out
}
