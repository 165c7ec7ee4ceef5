use thiserror::Error;

/// Errors reported by the prediction engine
///
/// Series primitives never produce these; they degrade to zero or empty
/// output instead. Predictors and the regime detector gate on minimum
/// history lengths and report the shortfall here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("Insufficient data for {component}: need at least {required} points, got {actual}")]
    InsufficientData {
        component: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Mismatched input: expected ticker {expected}, got {actual}")]
    MismatchedInput { expected: String, actual: String },

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl PredictionError {
    pub fn insufficient(component: &'static str, required: usize, actual: usize) -> Self {
        Self::InsufficientData {
            component,
            required,
            actual,
        }
    }
}
