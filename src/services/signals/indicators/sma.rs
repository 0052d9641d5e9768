//! Simple Moving Average (SMA) indicator.

use super::{Indicator, IndicatorSeries};

/// SMA (Simple Moving Average) indicator.
///
/// Average of the trailing `period` values, kept as a running sum over a
/// sliding window. Defined from index `period - 1` onward.
#[derive(Debug, Clone, Copy)]
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Sma {
    fn period(&self) -> usize {
        self.period
    }

    fn warmup(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn series(&self, values: &[f64]) -> IndicatorSeries {
        sma(values, self.period)
    }
}

/// Simple moving average over `values`, same length as the input.
pub fn sma(values: &[f64], period: usize) -> IndicatorSeries {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }

    let mut sum = 0.0;
    for (i, value) in values.iter().enumerate() {
        sum += value;
        if i >= period {
            sum -= values[i - period];
        }
        if i + 1 >= period {
            out[i] = Some(sum / period as f64);
        }
    }

    out
}
