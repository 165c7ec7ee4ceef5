// Core modules
pub mod analysis;
pub mod backtest;
pub mod config;
pub mod error;
pub mod indicators;
pub mod models;
pub mod prediction;
pub mod regime;
pub mod utils;

// Re-export commonly used types
pub use crate::config::{load_config, EngineConfig};
pub use error::PredictionError;
pub use models::*;
pub use prediction::{combine_predictions, SentimentPredictor, TechnicalPredictor};
pub use regime::RegimeDetector;

// Error handling
pub type Result<T> = std::result::Result<T, PredictionError>;
