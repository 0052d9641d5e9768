use crate::types::{Bar, Timeframe};
use std::collections::VecDeque;

use super::aggregator::MAX_BARS;

/// Client-side view of one chart: the bars currently displayed.
///
/// A full refresh replaces the series; incremental updates either append a
/// newer bar or merge into the last one.
#[derive(Debug, Clone)]
pub struct ChartSession {
    symbol: String,
    timeframe: Timeframe,
    bars: VecDeque<Bar>,
    max_bars: usize,
}

impl ChartSession {
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self::with_capacity(symbol, timeframe, MAX_BARS)
    }

    pub fn with_capacity(symbol: impl Into<String>, timeframe: Timeframe, max_bars: usize) -> Self {
        let max_bars = max_bars.max(1);
        Self {
            symbol: symbol.into(),
            timeframe,
            bars: VecDeque::with_capacity(max_bars),
            max_bars,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// Whether this session already shows `symbol` at `timeframe`.
    pub fn shows(&self, symbol: &str, timeframe: Timeframe) -> bool {
        self.symbol == symbol && self.timeframe == timeframe
    }

    /// Switch to another chart, dropping the current bars.
    pub fn switch(&mut self, symbol: impl Into<String>, timeframe: Timeframe) {
        self.symbol = symbol.into();
        self.timeframe = timeframe;
        self.bars.clear();
    }

    /// Replace the whole series, e.g. after switching symbol or timeframe.
    pub fn replace(&mut self, bars: impl IntoIterator<Item = Bar>) {
        self.bars.clear();
        self.bars.extend(bars);
        self.trim();
    }

    /// Apply one incremental bar.
    ///
    /// Appends when `bar` is newer than the last bar. Otherwise the last bar
    /// is updated: high/low widen to cover both, close and volume are taken
    /// from `bar`.
    pub fn apply(&mut self, bar: Bar) {
        if let Some(last) = self.bars.back_mut() {
            if bar.time <= last.time {
                last.high = last.high.max(bar.high);
                last.low = last.low.min(bar.low);
                last.close = bar.close;
                last.volume = bar.volume;
                return;
            }
        }

        self.bars.push_back(bar);
        self.trim();
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.back()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn bars(&self) -> Vec<Bar> {
        self.bars.iter().copied().collect()
    }

    fn trim(&mut self) {
        while self.bars.len() > self.max_bars {
            self.bars.pop_front();
        }
    }
}
