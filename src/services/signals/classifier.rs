//! Scalp signal classifier.
//!
//! Evaluates the most recent bar only and keeps no state between calls.

use super::indicators::{Ema, Indicator, IndicatorSeries, Rsi, Sma};
use crate::types::{Bar, Side, SignalKind, SignalResult, Suggestion, Trend};
use tracing::debug;

/// Risk/reward label attached to every suggestion.
///
/// Fixed text; it is not derived from the take-profit and stop-loss factors.
pub const RISK_REWARD_LABEL: &str = "1:1.5";

/// Inclusive RSI band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsiBand {
    pub min: f64,
    pub max: f64,
}

impl RsiBand {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: Option<f64>) -> bool {
        matches!(value, Some(v) if v >= self.min && v <= self.max)
    }
}

/// Exit levels as multiples of the entry price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitFactors {
    pub take_profit: f64,
    pub stop_loss: f64,
}

/// Periods, bands and exit levels used by the classifier.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub ema_fast: usize,
    pub ema_mid: usize,
    pub ema_slow: usize,
    pub rsi_period: usize,
    pub volume_period: usize,
    pub long_rsi: RsiBand,
    pub short_rsi: RsiBand,
    pub long_exits: ExitFactors,
    pub short_exits: ExitFactors,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            ema_fast: 7,
            ema_mid: 25,
            ema_slow: 99,
            rsi_period: 14,
            volume_period: 20,
            long_rsi: RsiBand::new(40.0, 65.0),
            short_rsi: RsiBand::new(35.0, 60.0),
            // +0.5% target, -0.3% stop
            long_exits: ExitFactors {
                take_profit: 1.005,
                stop_loss: 0.997,
            },
            short_exits: ExitFactors {
                take_profit: 0.995,
                stop_loss: 1.003,
            },
        }
    }
}

/// Turns a bar series into a trend label, a signal and an optional trade
/// suggestion.
#[derive(Debug, Clone, Default)]
pub struct SignalClassifier {
    config: ClassifierConfig,
}

impl SignalClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classify the last bar of `bars`.
    pub fn classify(&self, bars: &[Bar]) -> SignalResult {
        let Some(last) = bars.len().checked_sub(1) else {
            return SignalResult::neutral(Trend::Mixed);
        };

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();

        let ema_fast = Ema::new(self.config.ema_fast).series(&closes);
        let ema_mid = Ema::new(self.config.ema_mid).series(&closes);
        let ema_slow = Ema::new(self.config.ema_slow).series(&closes);
        let rsi = Rsi::new(self.config.rsi_period).series(&closes);
        let volume_sma = Sma::new(self.config.volume_period).series(&volumes);

        let trend = trend_at(ema_fast[last], ema_mid[last], ema_slow[last]);
        let last_rsi = rsi[last];
        let volume_ok = matches!(volume_sma[last], Some(avg) if volumes[last] > avg);

        debug!(
            "Classifying {} bars: trend={:?} rsi={:?} volume_ok={}",
            bars.len(),
            trend,
            last_rsi,
            volume_ok
        );

        let entry = closes[last];

        if trend != Trend::OnlyShort
            && self.config.long_rsi.contains(last_rsi)
            && volume_ok
            && crossed_above(&closes, &ema_fast, last)
        {
            return SignalResult {
                trend,
                signal: SignalKind::Long,
                suggestion: Some(suggest(Side::Long, entry, self.config.long_exits)),
            };
        }

        // Only reached when no long fired
        if trend != Trend::OnlyLong
            && self.config.short_rsi.contains(last_rsi)
            && volume_ok
            && crossed_below(&closes, &ema_fast, last)
        {
            return SignalResult {
                trend,
                signal: SignalKind::Short,
                suggestion: Some(suggest(Side::Short, entry, self.config.short_exits)),
            };
        }

        SignalResult::neutral(trend)
    }
}

/// Trend from the fast, mid and slow EMAs at one bar.
///
/// Fast and mid must be defined for any directional label. A slow EMA that is
/// still warming up does not block `OnlyLong`, but `OnlyShort` needs all three.
pub fn trend_at(fast: Option<f64>, mid: Option<f64>, slow: Option<f64>) -> Trend {
    let (Some(fast), Some(mid)) = (fast, mid) else {
        return Trend::Mixed;
    };

    match slow {
        None if fast > mid => Trend::OnlyLong,
        Some(slow) if fast > mid && mid > slow => Trend::OnlyLong,
        Some(slow) if fast < mid && mid < slow => Trend::OnlyShort,
        _ => Trend::Mixed,
    }
}

/// Close moved from at-or-below the average to above it at index `i`.
pub fn crossed_above(closes: &[f64], average: &IndicatorSeries, i: usize) -> bool {
    if i == 0 {
        return false;
    }
    match (average[i], average[i - 1]) {
        (Some(now), Some(before)) => closes[i] > now && closes[i - 1] <= before,
        _ => false,
    }
}

/// Close moved from at-or-above the average to below it at index `i`.
pub fn crossed_below(closes: &[f64], average: &IndicatorSeries, i: usize) -> bool {
    if i == 0 {
        return false;
    }
    match (average[i], average[i - 1]) {
        (Some(now), Some(before)) => closes[i] < now && closes[i - 1] >= before,
        _ => false,
    }
}

fn suggest(side: Side, entry: f64, exits: ExitFactors) -> Suggestion {
    Suggestion {
        side,
        entry,
        take_profit: round6(entry * exits.take_profit),
        stop_loss: round6(entry * exits.stop_loss),
        risk_reward_label: RISK_REWARD_LABEL.to_string(),
    }
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars_from(closes: &[f64], volumes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .zip(volumes)
            .enumerate()
            .map(|(i, (&close, &volume))| {
                let open = if i == 0 { close } else { closes[i - 1] };
                Bar::new(
                    i as i64 * 30_000,
                    open,
                    open.max(close),
                    open.min(close),
                    close,
                    volume,
                )
            })
            .collect()
    }

    /// Alternating closes with a breakout on the last bar and a volume spike.
    fn breakout(low_first: bool, last_close: f64, last_volume: f64) -> Vec<Bar> {
        let (a, b) = if low_first { (100.0, 101.0) } else { (101.0, 100.0) };
        let mut closes: Vec<f64> = (0..31).map(|i| if i % 2 == 0 { a } else { b }).collect();
        closes.push(last_close);
        let mut volumes = vec![10.0; 31];
        volumes.push(last_volume);
        bars_from(&closes, &volumes)
    }

    #[test]
    fn test_empty_bars_are_neutral() {
        let result = SignalClassifier::default().classify(&[]);
        assert_eq!(result.trend, Trend::Mixed);
        assert_eq!(result.signal, SignalKind::Neutral);
        assert!(result.suggestion.is_none());
    }

    #[test]
    fn test_flat_series_is_neutral() {
        let bars = bars_from(&[100.0; 120], &[5.0; 120]);
        let result = SignalClassifier::default().classify(&bars);
        assert_eq!(result.signal, SignalKind::Neutral);
        assert!(result.suggestion.is_none());
    }

    #[test]
    fn test_long_on_upward_cross() {
        let bars = breakout(true, 101.2, 30.0);
        let result = SignalClassifier::default().classify(&bars);

        assert_eq!(result.trend, Trend::OnlyLong);
        assert_eq!(result.signal, SignalKind::Long);
        let suggestion = result.suggestion.unwrap();
        assert_eq!(suggestion.side, Side::Long);
        assert_eq!(suggestion.entry, 101.2);
        assert!((suggestion.take_profit - 101.2 * 1.005).abs() < 1e-6);
        assert!((suggestion.stop_loss - 101.2 * 0.997).abs() < 1e-6);
        assert_eq!(suggestion.risk_reward_label, "1:1.5");
    }

    #[test]
    fn test_short_on_downward_cross() {
        let bars = breakout(false, 99.8, 30.0);
        let result = SignalClassifier::default().classify(&bars);

        // 32 bars: the slow EMA is undefined, so the trend cannot be only-short
        assert_eq!(result.trend, Trend::Mixed);
        assert_eq!(result.signal, SignalKind::Short);
        let suggestion = result.suggestion.unwrap();
        assert_eq!(suggestion.side, Side::Short);
        assert_eq!(suggestion.entry, 99.8);
        assert!((suggestion.take_profit - 99.8 * 0.995).abs() < 1e-6);
        assert!((suggestion.stop_loss - 99.8 * 1.003).abs() < 1e-6);
        assert_eq!(suggestion.risk_reward_label, "1:1.5");
    }

    #[test]
    fn test_cross_without_volume_is_neutral() {
        let bars = breakout(true, 101.2, 10.0);
        let result = SignalClassifier::default().classify(&bars);
        assert_eq!(result.signal, SignalKind::Neutral);
        assert!(result.suggestion.is_none());
    }

    #[test]
    fn test_cross_outside_rsi_band_is_neutral() {
        let config = ClassifierConfig {
            long_rsi: RsiBand::new(70.0, 80.0),
            ..ClassifierConfig::default()
        };
        let bars = breakout(true, 101.2, 30.0);
        let result = SignalClassifier::new(config).classify(&bars);
        assert_eq!(result.signal, SignalKind::Neutral);
    }

    #[test]
    fn test_short_blocked_in_long_trend() {
        let config = ClassifierConfig {
            short_rsi: RsiBand::new(0.0, 100.0),
            ..ClassifierConfig::default()
        };
        // Steady climb then a dip through EMA7: trend stays only-long
        let mut closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * 0.5).collect();
        closes.push(127.0);
        let mut volumes = vec![10.0; 60];
        volumes.push(50.0);
        let bars = bars_from(&closes, &volumes);

        let result = SignalClassifier::new(config).classify(&bars);
        assert_eq!(result.trend, Trend::OnlyLong);
        assert_eq!(result.signal, SignalKind::Neutral);
    }

    #[test]
    fn test_trend_at_orderings() {
        assert_eq!(trend_at(Some(3.0), Some(2.0), Some(1.0)), Trend::OnlyLong);
        assert_eq!(trend_at(Some(1.0), Some(2.0), Some(3.0)), Trend::OnlyShort);
        assert_eq!(trend_at(Some(2.0), Some(3.0), Some(1.0)), Trend::Mixed);
        assert_eq!(trend_at(Some(2.0), Some(2.0), Some(2.0)), Trend::Mixed);
        assert_eq!(trend_at(Some(3.0), None, None), Trend::Mixed);
        assert_eq!(trend_at(None, None, None), Trend::Mixed);
    }

    #[test]
    fn test_trend_at_slow_warming_up() {
        assert_eq!(trend_at(Some(3.0), Some(2.0), None), Trend::OnlyLong);
        assert_eq!(trend_at(Some(1.0), Some(2.0), None), Trend::Mixed);
        assert_eq!(trend_at(Some(2.0), Some(2.0), None), Trend::Mixed);
        assert_eq!(trend_at(None, Some(2.0), Some(3.0)), Trend::Mixed);
    }

    #[test]
    fn test_long_after_decline_without_slow_ema() {
        // Gentle decline with noise, then the last bar closes back above EMA7
        let mut closes: Vec<f64> = (0..59)
            .map(|i| 100.0 - 0.02 * i as f64 + if i % 2 == 1 { 0.1 } else { -0.1 })
            .collect();
        closes.push(closes[58] + 0.2);
        let mut volumes = vec![10.0; 59];
        volumes.push(30.0);
        let bars = bars_from(&closes, &volumes);

        let result = SignalClassifier::default().classify(&bars);

        assert_eq!(result.trend, Trend::Mixed);
        assert_eq!(result.signal, SignalKind::Long);
        let suggestion = result.suggestion.unwrap();
        assert_eq!(suggestion.side, Side::Long);
        assert_eq!(suggestion.entry, closes[59]);
    }

    #[test]
    fn test_crossings_need_defined_average() {
        let closes = [1.0, 2.0];
        assert!(!crossed_above(&closes, &vec![None, Some(1.5)], 1));
        assert!(crossed_above(&closes, &vec![Some(1.5), Some(1.5)], 1));
        assert!(!crossed_above(&closes, &vec![Some(1.5), Some(1.5)], 0));
        assert!(crossed_below(&[2.0, 1.0], &vec![Some(1.5), Some(1.5)], 1));
    }

    #[test]
    fn test_rsi_band_inclusive() {
        let band = RsiBand::new(40.0, 65.0);
        assert!(band.contains(Some(40.0)));
        assert!(band.contains(Some(65.0)));
        assert!(!band.contains(Some(65.01)));
        assert!(!band.contains(None));
    }

    #[test]
    fn test_round6() {
        assert_eq!(round6(1.23456789), 1.234568);
        assert_eq!(round6(101.706), 101.706);
    }
}
