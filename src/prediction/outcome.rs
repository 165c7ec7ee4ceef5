use serde::{Deserialize, Serialize};

use crate::models::{Direction, Prediction};
use crate::utils::round_dp;

/// Realised move within which a NEUTRAL call counts as correct
const NEUTRAL_TOLERANCE: f64 = 0.01;

/// Accuracy of a prediction once its target date has passed
///
/// Kept apart from [`Prediction`] so produced predictions stay immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionOutcome {
    pub base_price: f64,
    pub actual_price: f64,
    pub realized_change_pct: f64,
    /// `100 - |predicted - actual| / actual * 100`, clamped to [0, 100];
    /// None when the prediction carried no price
    pub accuracy_score: Option<f64>,
    pub direction_correct: bool,
}

/// Score a prediction against the price realised at its target date
///
/// `base_price` is the close the prediction was issued from.
pub fn evaluate(prediction: &Prediction, base_price: f64, actual_price: f64) -> PredictionOutcome {
    let realized_change = if base_price != 0.0 {
        (actual_price - base_price) / base_price
    } else {
        0.0
    };

    let direction_correct = match prediction.predicted_direction {
        Direction::Up => realized_change > 0.0,
        Direction::Down => realized_change < 0.0,
        Direction::Neutral => realized_change.abs() <= NEUTRAL_TOLERANCE,
    };

    let accuracy_score = prediction
        .predicted_price
        .filter(|_| actual_price != 0.0)
        .map(|predicted| {
            let error_pct = (predicted - actual_price).abs() / actual_price.abs() * 100.0;
            round_dp((100.0 - error_pct).clamp(0.0, 100.0), 2)
        });

    PredictionOutcome {
        base_price,
        actual_price,
        realized_change_pct: round_dp(realized_change * 100.0, 2),
        accuracy_score,
        direction_correct,
    }
}
