use crate::backtest::metrics::{AccuracyReport, EvaluatedPrediction};
use crate::error::PredictionError;
use crate::models::{validate_price_history, PricePoint};
use crate::prediction::{evaluate, TechnicalPredictor};
use crate::Result;

/// Replays a price history through the technical predictor and scores each
/// prediction against the close realised at its target date
pub struct WalkForwardRunner {
    predictor: TechnicalPredictor,
    days_ahead: u32,
    step: usize,
}

impl WalkForwardRunner {
    /// Create a new runner
    ///
    /// A `step` of 0 is treated as 1.
    pub fn new(predictor: TechnicalPredictor, days_ahead: u32, step: usize) -> Self {
        Self {
            predictor,
            days_ahead,
            step: step.max(1),
        }
    }

    /// Run the replay
    ///
    /// Starting once the predictor's minimum history is available, every
    /// `step` points a prediction is issued from the history so far and
    /// scored against the first close on or after its target date.
    ///
    /// # Errors
    /// * `InsufficientData` when no prediction could be scored
    /// * `InvalidData` when the history is unordered or holds a bad close
    pub fn run(&self, ticker: &str, history: &[PricePoint]) -> Result<AccuracyReport> {
        let min_points = self.predictor.min_points();
        validate_price_history(history)?;

        tracing::info!(
            "Starting walk-forward replay: {} points, predictor needs {}, horizon {} days",
            history.len(),
            min_points,
            self.days_ahead
        );

        let mut evaluations = Vec::new();

        for end in (min_points..=history.len()).step_by(self.step) {
            let window = &history[..end];
            let Some(base) = window.last() else {
                continue;
            };

            let prediction = self.predictor.predict(ticker, window, base.date, self.days_ahead)?;

            let Some(realised) = history[end..]
                .iter()
                .find(|p| p.date >= prediction.target_date)
            else {
                // Later windows reach even further past the end of the history
                break;
            };

            let outcome = evaluate(&prediction, base.close, realised.close);
            tracing::debug!(
                "{} {} -> {}: predicted {:?} {:?}, realised {:.2} (correct: {})",
                ticker,
                prediction.issued_date,
                prediction.target_date,
                prediction.predicted_direction,
                prediction.predicted_price,
                realised.close,
                outcome.direction_correct
            );

            evaluations.push(EvaluatedPrediction {
                prediction,
                outcome,
            });
        }

        if evaluations.is_empty() {
            return Err(PredictionError::insufficient(
                "walk-forward runner",
                min_points + 1,
                history.len(),
            ));
        }

        let report = AccuracyReport::from_evaluations(ticker, evaluations);
        report.log_summary();
        Ok(report)
    }
}
