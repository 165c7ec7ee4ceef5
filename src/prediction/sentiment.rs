use chrono::NaiveDate;

use super::{round_confidence, round_price, target_date};
use crate::config::SentimentConfig;
use crate::error::PredictionError;
use crate::models::{
    validate_price_history, validate_sentiment_history, Direction, Prediction, PredictionType,
    PricePoint, SentimentPoint,
};
use crate::utils::{mean, sign};
use crate::Result;

/// Largest per-day price impact attributed to sentiment
const MAX_IMPACT_FACTOR: f64 = 0.1;
const IMPACT_PER_SENTIMENT: f64 = 0.05;

/// Sentiment readings behind a sentiment prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentSignals {
    pub average_sentiment: f64,
    /// Mean of the newer half minus mean of the older half
    pub sentiment_momentum: f64,
    /// Fraction of points whose sign matches the average
    pub consistency: f64,
    pub total_news: u64,
}

/// News-sentiment driven predictor
#[derive(Debug, Clone, Default)]
pub struct SentimentPredictor {
    config: SentimentConfig,
}

impl SentimentPredictor {
    pub fn new(config: SentimentConfig) -> Self {
        Self { config }
    }

    /// Summarise the most recent `window` sentiment points
    ///
    /// Returns None when there are no points or the window is 0.
    pub fn analyze(&self, sentiment: &[SentimentPoint]) -> Option<SentimentSignals> {
        let recent = &sentiment[sentiment.len().saturating_sub(self.config.window)..];
        if recent.is_empty() {
            return None;
        }

        let scores: Vec<f64> = recent.iter().map(|p| p.sentiment_score).collect();

        let average_sentiment = mean(&scores);
        let mid = scores.len() / 2;
        let sentiment_momentum = mean(&scores[mid..]) - mean(&scores[..mid]);

        let average_sign = sign(average_sentiment);
        let agreeing = scores.iter().filter(|s| sign(**s) == average_sign).count();

        Some(SentimentSignals {
            average_sentiment,
            sentiment_momentum,
            consistency: agreeing as f64 / scores.len() as f64,
            total_news: recent.iter().map(|p| p.news_count as u64).sum(),
        })
    }

    pub fn direction(&self, signals: &SentimentSignals) -> Direction {
        let threshold = self.config.signal_threshold;
        if signals.average_sentiment > threshold && signals.sentiment_momentum > 0.0 {
            Direction::Up
        } else if signals.average_sentiment < -threshold && signals.sentiment_momentum < 0.0 {
            Direction::Down
        } else {
            Direction::Neutral
        }
    }

    /// `40 + |avg| * 30 + consistency * 20 + news_volume * 10`, clamped to [0, 100]
    pub fn confidence(&self, signals: &SentimentSignals) -> f64 {
        let news_volume =
            (signals.total_news as f64 / self.config.news_saturation.max(1) as f64).min(1.0);

        (40.0
            + signals.average_sentiment.abs() * 30.0
            + signals.consistency * 20.0
            + news_volume * 10.0)
            .clamp(0.0, 100.0)
    }

    /// Predict the price `days_ahead` days after `as_of` from recent sentiment
    ///
    /// # Errors
    /// * `InsufficientData` with fewer than 10 prices or 5 sentiment points (defaults)
    /// * `InvalidData` when either history breaks ordering or range invariants
    pub fn predict(
        &self,
        ticker: &str,
        prices: &[PricePoint],
        sentiment: &[SentimentPoint],
        as_of: NaiveDate,
        days_ahead: u32,
    ) -> Result<Prediction> {
        if prices.len() < self.config.min_price_points {
            return Err(PredictionError::insufficient(
                "sentiment predictor (prices)",
                self.config.min_price_points,
                prices.len(),
            ));
        }
        if sentiment.len() < self.config.min_sentiment_points {
            return Err(PredictionError::insufficient(
                "sentiment predictor (sentiment)",
                self.config.min_sentiment_points,
                sentiment.len(),
            ));
        }
        validate_price_history(prices)?;
        validate_sentiment_history(sentiment)?;

        let signals = self.analyze(sentiment).ok_or_else(|| {
            PredictionError::InvalidData(format!(
                "sentiment window of {} points selects no sentiment",
                self.config.window
            ))
        })?;
        let latest_price = prices[prices.len() - 1].close;

        let direction = self.direction(&signals);
        let confidence = self.confidence(&signals);

        let impact_factor = (signals.average_sentiment * IMPACT_PER_SENTIMENT)
            .clamp(-MAX_IMPACT_FACTOR, MAX_IMPACT_FACTOR);
        let predicted_price = latest_price * (1.0 + impact_factor * days_ahead as f64);

        tracing::debug!(
            "{} sentiment: avg={:.3} momentum={:.3} consistency={:.2} news={} -> {:?} ({:.1})",
            ticker,
            signals.average_sentiment,
            signals.sentiment_momentum,
            signals.consistency,
            signals.total_news,
            direction,
            confidence
        );

        Ok(Prediction {
            ticker: ticker.to_string(),
            issued_date: as_of,
            target_date: target_date(as_of, days_ahead)?,
            predicted_price: Some(round_price(predicted_price)),
            predicted_direction: direction,
            confidence_score: round_confidence(confidence),
            prediction_type: PredictionType::Sentiment,
        })
    }
}
