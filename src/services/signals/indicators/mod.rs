//! Technical indicator implementations.
//!
//! Every indicator maps an input series to an output of the same length,
//! with `None` at positions that are still inside the warm-up window.

pub mod ema;
pub mod rsi;
pub mod sma;

pub use ema::{ema, Ema};
pub use rsi::{rsi, Rsi, WilderRsi};
pub use sma::{sma, Sma};

/// Indicator output aligned index-for-index with its input.
pub type IndicatorSeries = Vec<Option<f64>>;

/// Trait for implementing technical indicators.
pub trait Indicator: Send + Sync {
    /// Lookback period.
    fn period(&self) -> usize;

    /// Number of leading positions that are always undefined.
    fn warmup(&self) -> usize;

    /// Compute the full series.
    fn series(&self, values: &[f64]) -> IndicatorSeries;

    /// Value at the last position, if defined.
    fn latest(&self, values: &[f64]) -> Option<f64> {
        self.series(values).last().copied().flatten()
    }
}
