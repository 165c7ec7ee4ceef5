/// Market Regime Detector using moving averages + trailing returns
///
/// Classifies a daily close series:
/// - Bull: MA20 > MA50 + 30-period move above +5% + positive 60-period move
/// - Bear: MA20 < MA50 + 30-period move below -5% + negative 60-period move
/// - Sideways: everything else
///
/// Regime output feeds advisory displays only, so internal faults degrade to
/// the default SIDEWAYS result instead of failing the caller.

use crate::config::RegimeConfig;
use crate::error::PredictionError;
use crate::indicators::{calculate_sma, calculate_volatility};
use crate::models::{closes, validate_price_history, MarketRegime, PricePoint, RegimeResult};
use crate::Result;

/// Daily return a BULL (BEAR) run may fall (rise) by and still count
const TREND_DURATION_THRESHOLD: f64 = 0.05;
/// Largest absolute daily return inside a SIDEWAYS run
const SIDEWAYS_DURATION_THRESHOLD: f64 = 0.03;

/// Long look-back of the 60-period trend
const LONG_TREND_PERIOD: usize = 60;
const SHORT_TREND_PERIOD: usize = 30;

#[derive(Debug, Clone, Default)]
pub struct RegimeDetector {
    config: RegimeConfig,
}

impl RegimeDetector {
    pub fn new(config: RegimeConfig) -> Self {
        Self { config }
    }

    /// Detect current market regime from a price history
    ///
    /// # Errors
    /// Only `InsufficientData` (fewer than 60 points by default). Any other
    /// failure is logged and replaced by `{SIDEWAYS, 0.5, 0}`.
    pub fn detect(&self, history: &[PricePoint]) -> Result<RegimeResult> {
        let required = self.config.min_points.max(LONG_TREND_PERIOD);
        if history.len() < required {
            return Err(PredictionError::insufficient(
                "regime detector",
                required,
                history.len(),
            ));
        }

        match self.classify(history) {
            Ok(result) => Ok(result),
            Err(e) => {
                tracing::warn!("Regime detection failed, using default: {}", e);
                Ok(RegimeResult::default())
            }
        }
    }

    fn classify(&self, history: &[PricePoint]) -> Result<RegimeResult> {
        validate_price_history(history)?;
        let prices = closes(history);

        let ma_short = calculate_sma(&prices, self.config.short_ma_period);
        let ma_long = calculate_sma(&prices, self.config.long_ma_period);
        let trend30 = trailing_change(&prices, SHORT_TREND_PERIOD);
        let trend60 = trailing_change(&prices, LONG_TREND_PERIOD);
        let volatility = calculate_volatility(&prices, self.config.volatility_period);

        let threshold = self.config.trend_threshold;
        let regime = if ma_short > ma_long && trend30 > threshold && trend60 > 0.0 {
            MarketRegime::Bull
        } else if ma_short < ma_long && trend30 < -threshold && trend60 < 0.0 {
            MarketRegime::Bear
        } else {
            MarketRegime::Sideways
        };

        let strength = match regime {
            MarketRegime::Bull | MarketRegime::Bear => {
                let base = ((trend30.abs() * 5.0 + trend60.abs() * 3.0) / 8.0).min(1.0);
                (base * (1.0 + volatility)).min(1.0)
            }
            MarketRegime::Sideways => {
                let base = ((1.0 - trend30.abs() * 10.0) * (1.0 - trend60.abs() * 5.0)).min(1.0);
                base * (1.0 - volatility * 5.0).max(0.2)
            }
        };

        if !strength.is_finite() {
            return Err(PredictionError::InvalidData(format!(
                "non-finite regime strength (trend30={}, trend60={}, volatility={})",
                trend30, trend60, volatility
            )));
        }

        let duration = regime_duration(&prices, regime);

        tracing::debug!(
            "Regime: ma{}={:.2} ma{}={:.2} trend30={:.4} trend60={:.4} volatility={:.4} -> {:?} strength={:.3} duration={}",
            self.config.short_ma_period,
            ma_short,
            self.config.long_ma_period,
            ma_long,
            trend30,
            trend60,
            volatility,
            regime,
            strength,
            duration
        );

        Ok(RegimeResult {
            regime,
            strength: strength.clamp(0.0, 1.0),
            duration,
        })
    }
}

/// Relative change of the last price over the price `period` points earlier
///
/// Starts from the first price when the history is not that long, which is
/// the case for the 60-period trend on exactly 60 points.
fn trailing_change(prices: &[f64], period: usize) -> f64 {
    let Some(&last) = prices.last() else {
        return 0.0;
    };
    let start = prices[prices.len().saturating_sub(period + 1)];
    (last - start) / start
}

/// Count trailing daily returns consistent with the regime, newest first
fn regime_duration(prices: &[f64], regime: MarketRegime) -> usize {
    prices
        .windows(2)
        .rev()
        .map(|w| (w[1] - w[0]) / w[0])
        .take_while(|daily_return| match regime {
            MarketRegime::Bull => *daily_return >= -TREND_DURATION_THRESHOLD,
            MarketRegime::Bear => *daily_return <= TREND_DURATION_THRESHOLD,
            MarketRegime::Sideways => daily_return.abs() <= SIDEWAYS_DURATION_THRESHOLD,
        })
        .count()
}
