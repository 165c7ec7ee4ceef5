// Price prediction module
pub mod combiner;
pub mod outcome;
pub mod sentiment;
pub mod technical;

pub use combiner::combine_predictions;
pub use outcome::{evaluate, PredictionOutcome};
pub use sentiment::{SentimentPredictor, SentimentSignals};
pub use technical::{TechnicalPredictor, TechnicalSignals};

use chrono::{Days, NaiveDate};

use crate::error::PredictionError;
use crate::utils::round_dp;
use crate::Result;

/// Prediction horizon used when the caller does not choose one
pub const DEFAULT_DAYS_AHEAD: u32 = 7;

pub(crate) fn target_date(as_of: NaiveDate, days_ahead: u32) -> Result<NaiveDate> {
    as_of
        .checked_add_days(Days::new(days_ahead as u64))
        .ok_or_else(|| {
            PredictionError::InvalidData(format!(
                "target date {} + {} days is out of range",
                as_of, days_ahead
            ))
        })
}

pub(crate) fn round_price(price: f64) -> f64 {
    round_dp(price, 2)
}

pub(crate) fn round_confidence(confidence: f64) -> f64 {
    round_dp(confidence, 2)
}
