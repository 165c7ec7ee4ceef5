use crate::models::Prediction;
use crate::prediction::PredictionOutcome;
use crate::utils::{mean, round_dp};
use serde::{Deserialize, Serialize};

/// A replayed prediction and how it turned out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedPrediction {
    pub prediction: Prediction,
    pub outcome: PredictionOutcome,
}

/// Accuracy of a walk-forward replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyReport {
    pub ticker: String,

    // Direction
    pub predictions: usize,
    pub direction_hits: usize,
    pub hit_rate: f64, // Percent of predictions with the right direction

    // Price
    pub mean_accuracy: f64,
    pub mean_abs_pct_error: f64,

    pub evaluations: Vec<EvaluatedPrediction>,
}

impl AccuracyReport {
    /// Summarise evaluated predictions
    pub fn from_evaluations(ticker: &str, evaluations: Vec<EvaluatedPrediction>) -> Self {
        let predictions = evaluations.len();
        let direction_hits = evaluations
            .iter()
            .filter(|e| e.outcome.direction_correct)
            .count();

        let hit_rate = if predictions > 0 {
            (direction_hits as f64 / predictions as f64) * 100.0
        } else {
            0.0
        };

        let accuracies: Vec<f64> = evaluations
            .iter()
            .filter_map(|e| e.outcome.accuracy_score)
            .collect();

        let abs_pct_errors: Vec<f64> = evaluations
            .iter()
            .filter_map(|e| {
                let predicted = e.prediction.predicted_price?;
                let actual = e.outcome.actual_price;
                (actual != 0.0).then(|| (predicted - actual).abs() / actual.abs() * 100.0)
            })
            .collect();

        Self {
            ticker: ticker.to_string(),
            predictions,
            direction_hits,
            hit_rate: round_dp(hit_rate, 2),
            mean_accuracy: round_dp(mean(&accuracies), 2),
            mean_abs_pct_error: round_dp(mean(&abs_pct_errors), 2),
            evaluations,
        }
    }

    /// Log a one-line summary
    pub fn log_summary(&self) {
        tracing::info!(
            "{} walk-forward: {} predictions, {} direction hits ({:.1}%), mean accuracy {:.2}, MAPE {:.2}%",
            self.ticker,
            self.predictions,
            self.direction_hits,
            self.hit_rate,
            self.mean_accuracy,
            self.mean_abs_pct_error
        );
    }
}
