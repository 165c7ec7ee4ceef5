pub mod metrics;
pub mod runner;
pub mod synthetic;

pub use metrics::{AccuracyReport, EvaluatedPrediction};
pub use runner::WalkForwardRunner;
pub use synthetic::{MarketScenario, SyntheticDataGenerator};
