//! Trading signals service module.
//!
//! Provides the indicator engine and the scalp signal classifier built on it.

pub mod classifier;
pub mod indicators;

pub use classifier::{ClassifierConfig, SignalClassifier};
pub use indicators::{Indicator, IndicatorSeries};
