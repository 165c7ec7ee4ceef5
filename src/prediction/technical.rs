use chrono::NaiveDate;

use super::{round_confidence, round_price, target_date};
use crate::config::TechnicalConfig;
use crate::error::PredictionError;
use crate::indicators::{
    calculate_momentum, calculate_sma, calculate_trend_consistency, calculate_volatility,
};
use crate::models::{closes, validate_price_history, Direction, Prediction, PredictionType, PricePoint};
use crate::Result;

/// Indicator readings behind a technical prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TechnicalSignals {
    pub latest_price: f64,
    pub short_ma: f64,
    pub long_ma: f64,
    /// Rate of change in percent
    pub momentum: f64,
    pub volatility: f64,
    pub trend_consistency: f64,
}

impl TechnicalSignals {
    /// UP needs the short MA above the long MA with positive momentum,
    /// DOWN the mirror image; anything else is NEUTRAL.
    pub fn direction(&self) -> Direction {
        if self.short_ma > self.long_ma && self.momentum > 0.0 {
            Direction::Up
        } else if self.short_ma < self.long_ma && self.momentum < 0.0 {
            Direction::Down
        } else {
            Direction::Neutral
        }
    }

    /// `50 + consistency * 30 + max(0, 1 - 2 * volatility) * 20`, clamped to [0, 100]
    pub fn confidence(&self) -> f64 {
        let volatility_factor = (1.0 - self.volatility * 2.0).max(0.0);
        (50.0 + self.trend_consistency * 30.0 + volatility_factor * 20.0).clamp(0.0, 100.0)
    }

    /// Linear momentum extrapolation for directional calls
    ///
    /// The same `momentum * days * 0.01` multiplier applies whatever the sign
    /// of the momentum; NEUTRAL keeps the latest price.
    pub fn projected_price(&self, days_ahead: u32) -> f64 {
        match self.direction() {
            Direction::Up | Direction::Down => {
                self.latest_price * (1.0 + self.momentum * days_ahead as f64 * 0.01)
            }
            Direction::Neutral => self.latest_price,
        }
    }
}

/// Moving-average crossover plus momentum predictor
#[derive(Debug, Clone, Default)]
pub struct TechnicalPredictor {
    config: TechnicalConfig,
}

impl TechnicalPredictor {
    pub fn new(config: TechnicalConfig) -> Self {
        Self { config }
    }

    pub fn min_points(&self) -> usize {
        self.config.min_points
    }

    /// Compute the indicator readings for a close series, oldest first
    ///
    /// Returns None for an empty series.
    pub fn analyze(&self, prices: &[f64]) -> Option<TechnicalSignals> {
        let latest_price = *prices.last()?;

        Some(TechnicalSignals {
            latest_price,
            short_ma: calculate_sma(prices, self.config.short_ma_period),
            long_ma: calculate_sma(prices, self.config.long_ma_period),
            momentum: calculate_momentum(prices, self.config.momentum_period),
            volatility: calculate_volatility(prices, self.config.volatility_period),
            trend_consistency: calculate_trend_consistency(prices, self.config.trend_period),
        })
    }

    /// Predict the price `days_ahead` days after `as_of`
    ///
    /// # Errors
    /// * `InsufficientData` with fewer than `min_points` prices (30 by default)
    /// * `InvalidData` when the history is unordered or holds a non-positive close
    pub fn predict(
        &self,
        ticker: &str,
        history: &[PricePoint],
        as_of: NaiveDate,
        days_ahead: u32,
    ) -> Result<Prediction> {
        if history.len() < self.config.min_points {
            return Err(PredictionError::insufficient(
                "technical predictor",
                self.config.min_points,
                history.len(),
            ));
        }
        validate_price_history(history)?;

        let prices = closes(history);
        let signals = self.analyze(&prices).ok_or_else(|| {
            PredictionError::insufficient("technical predictor", self.config.min_points, 0)
        })?;

        let direction = signals.direction();
        let confidence = signals.confidence();

        tracing::debug!(
            "{} technical: short_ma={:.2} long_ma={:.2} momentum={:.2}% volatility={:.4} consistency={:.2} -> {:?} ({:.1})",
            ticker,
            signals.short_ma,
            signals.long_ma,
            signals.momentum,
            signals.volatility,
            signals.trend_consistency,
            direction,
            confidence
        );

        Ok(Prediction {
            ticker: ticker.to_string(),
            issued_date: as_of,
            target_date: target_date(as_of, days_ahead)?,
            predicted_price: Some(round_price(signals.projected_price(days_ahead))),
            predicted_direction: direction,
            confidence_score: round_confidence(confidence),
            prediction_type: PredictionType::Technical,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
    }

    fn history_from(prices: &[f64]) -> Vec<PricePoint> {
        let start = as_of() - Duration::days(prices.len() as i64 - 1);
        prices
            .iter()
            .enumerate()
            .map(|(i, close)| PricePoint::new(start + Duration::days(i as i64), *close))
            .collect()
    }

    #[test]
    fn test_insufficient_history() {
        let history = history_from(&vec![100.0; 29]);
        let result = TechnicalPredictor::default().predict("AAPL", &history, as_of(), 7);

        assert_eq!(
            result,
            Err(PredictionError::InsufficientData {
                component: "technical predictor",
                required: 30,
                actual: 29,
            })
        );
    }

    #[test]
    fn test_uptrend_prediction() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let history = history_from(&prices);
        let prediction = TechnicalPredictor::default()
            .predict("AAPL", &history, as_of(), 7)
            .unwrap();

        assert_eq!(prediction.predicted_direction, Direction::Up);
        assert_eq!(prediction.prediction_type, PredictionType::Technical);
        assert_eq!(prediction.issued_date, as_of());
        assert_eq!(prediction.target_date, as_of() + Duration::days(7));

        // momentum = (129 - 119) / 119 * 100
        let momentum = 10.0 / 119.0 * 100.0;
        let expected = 129.0 * (1.0 + momentum * 7.0 * 0.01);
        assert!((prediction.predicted_price.unwrap() - expected).abs() < 0.01);

        // Every change agrees with the trend
        assert!(prediction.confidence_score > 99.0);
    }

    #[test]
    fn test_downtrend_uses_same_extrapolation_formula() {
        let prices: Vec<f64> = (0..30).map(|i| 200.0 - i as f64).collect();
        let history = history_from(&prices);
        let prediction = TechnicalPredictor::default()
            .predict("AAPL", &history, as_of(), 5)
            .unwrap();

        assert_eq!(prediction.predicted_direction, Direction::Down);

        // Negative momentum flows through the identical multiplier
        let momentum = (171.0 - 181.0) / 181.0 * 100.0;
        let expected = 171.0 * (1.0 + momentum * 5.0 * 0.01);
        assert!((prediction.predicted_price.unwrap() - expected).abs() < 0.01);
    }

    #[test]
    fn test_flat_history_is_neutral() {
        let history = history_from(&vec![100.0; 40]);
        let prediction = TechnicalPredictor::default()
            .predict("AAPL", &history, as_of(), 7)
            .unwrap();

        assert_eq!(prediction.predicted_direction, Direction::Neutral);
        assert_eq!(prediction.predicted_price, Some(100.0));
        // consistency 1 (flat agrees with flat), zero volatility
        assert_eq!(prediction.confidence_score, 100.0);
    }

    #[test]
    fn test_equal_moving_averages_neutral_for_any_momentum() {
        for momentum in [-5.0, 0.0, 5.0] {
            let signals = TechnicalSignals {
                latest_price: 100.0,
                short_ma: 100.0,
                long_ma: 100.0,
                momentum,
                volatility: 0.01,
                trend_consistency: 0.5,
            };
            assert_eq!(signals.direction(), Direction::Neutral);
            assert_eq!(signals.projected_price(7), 100.0);
        }
    }

    #[test]
    fn test_confidence_formula() {
        let signals = TechnicalSignals {
            latest_price: 100.0,
            short_ma: 101.0,
            long_ma: 100.0,
            momentum: 2.0,
            volatility: 0.1,
            trend_consistency: 0.6,
        };
        // 50 + 18 + 0.8 * 20
        assert!((signals.confidence() - 84.0).abs() < 1e-9);

        let volatile = TechnicalSignals {
            volatility: 0.9,
            ..signals
        };
        assert!((volatile.confidence() - 68.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_unordered_history() {
        let mut history = history_from(&vec![100.0; 30]);
        history.swap(3, 4);
        let result = TechnicalPredictor::default().predict("AAPL", &history, as_of(), 7);
        assert!(matches!(result, Err(PredictionError::InvalidData(_))));
    }
}
