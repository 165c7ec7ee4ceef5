// Market regime detection module
pub mod detector;

pub use detector::RegimeDetector;
