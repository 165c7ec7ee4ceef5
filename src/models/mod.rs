use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PredictionError;
use crate::Result;

/// Daily closing price
///
/// Open/high/low/volume are carried through when the provider has them but
/// none of the indicator math reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            close,
            open: None,
            high: None,
            low: None,
            volume: None,
        }
    }
}

/// Aggregated news sentiment for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentPoint {
    pub date: NaiveDate,
    /// In [-1, 1]
    pub sentiment_score: f64,
    #[serde(default)]
    pub news_count: u32,
}

impl SentimentPoint {
    pub fn new(date: NaiveDate, sentiment_score: f64, news_count: u32) -> Self {
        Self {
            date,
            sentiment_score,
            news_count,
        }
    }
}

/// One value of a dated indicator series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub value: f64,
}

pub type IndicatorSeries = Vec<IndicatorPoint>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PredictionType {
    Technical,
    Sentiment,
    Combined,
}

/// Directional price prediction
///
/// Produced by the predictors and never mutated afterwards. Accuracy
/// backfill lives in [`crate::prediction::PredictionOutcome`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub ticker: String,
    pub issued_date: NaiveDate,
    pub target_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_price: Option<f64>,
    pub predicted_direction: Direction,
    /// Heuristic score in [0, 100]
    pub confidence_score: f64,
    pub prediction_type: PredictionType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketRegime {
    Bull,
    Bear,
    Sideways,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeResult {
    pub regime: MarketRegime,
    /// In [0, 1]
    pub strength: f64,
    /// Consecutive trailing periods consistent with the regime
    pub duration: usize,
}

impl Default for RegimeResult {
    fn default() -> Self {
        Self {
            regime: MarketRegime::Sideways,
            strength: 0.5,
            duration: 0,
        }
    }
}

/// Request document read by the CLI: one ticker's price and sentiment history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub ticker: String,
    pub price_data: Vec<PricePoint>,
    #[serde(default)]
    pub sentiment_data: Vec<SentimentPoint>,
}

/// Extract closing prices, oldest first
pub fn closes(history: &[PricePoint]) -> Vec<f64> {
    history.iter().map(|p| p.close).collect()
}

/// Validate that a price history is usable by the predictors
///
/// # Returns
/// * `Ok(())` if every close is finite and positive and dates strictly ascend
/// * `Err(InvalidData)` naming the first offending point otherwise
pub fn validate_price_history(history: &[PricePoint]) -> Result<()> {
    for point in history {
        if !point.close.is_finite() || point.close <= 0.0 {
            return Err(PredictionError::InvalidData(format!(
                "close {} on {} is not a positive finite price",
                point.close, point.date
            )));
        }
    }

    for window in history.windows(2) {
        if window[1].date <= window[0].date {
            return Err(PredictionError::InvalidData(format!(
                "price dates not strictly ascending: {} followed by {}",
                window[0].date, window[1].date
            )));
        }
    }

    Ok(())
}

/// Validate that a sentiment history is ordered and scores lie in [-1, 1]
pub fn validate_sentiment_history(history: &[SentimentPoint]) -> Result<()> {
    for point in history {
        if !point.sentiment_score.is_finite() || point.sentiment_score.abs() > 1.0 {
            return Err(PredictionError::InvalidData(format!(
                "sentiment score {} on {} outside [-1, 1]",
                point.sentiment_score, point.date
            )));
        }
    }

    for window in history.windows(2) {
        if window[1].date <= window[0].date {
            return Err(PredictionError::InvalidData(format!(
                "sentiment dates not strictly ascending: {} followed by {}",
                window[0].date, window[1].date
            )));
        }
    }

    Ok(())
}
