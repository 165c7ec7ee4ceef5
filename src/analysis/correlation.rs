use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::indicators::simple_returns;
use crate::models::{validate_price_history, validate_sentiment_history, PricePoint, SentimentPoint};
use crate::utils::round_dp;
use crate::Result;

const MIN_SENTIMENT_POINTS: usize = 5;
/// Pairs needed before a correlation is attempted
const MIN_ALIGNED_PAIRS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactStrength {
    High,
    Medium,
    Low,
}

/// How well daily sentiment tracks daily price changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentCorrelation {
    /// Pearson correlation, 3 decimals
    pub correlation: f64,
    pub impact_strength: ImpactStrength,
    pub analysis: String,
    pub data_points: usize,
}

/// Correlate sentiment scores with percent price changes
///
/// Sentiment is paired from its first point with the first price change, so
/// a score lines up with the move that follows it. Both series are cut to the
/// shorter length.
///
/// # Errors
/// * `InvalidData` when either history is unordered or out of range
pub fn sentiment_price_correlation(
    prices: &[PricePoint],
    sentiment: &[SentimentPoint],
) -> Result<SentimentCorrelation> {
    validate_price_history(prices)?;
    validate_sentiment_history(sentiment)?;

    if sentiment.len() < MIN_SENTIMENT_POINTS {
        return Ok(SentimentCorrelation {
            correlation: 0.0,
            impact_strength: ImpactStrength::Low,
            analysis: "Insufficient sentiment data".to_string(),
            data_points: 0,
        });
    }

    let closes: Vec<f64> = prices.iter().map(|p| p.close).collect();
    let price_changes: Vec<f64> = simple_returns(&closes).iter().map(|r| r * 100.0).collect();
    let scores: Vec<f64> = sentiment.iter().map(|s| s.sentiment_score).collect();

    let pairs = price_changes.len().min(scores.len());
    let aligned_scores = &scores[..pairs];
    let aligned_changes = &price_changes[..pairs];

    let correlation = if pairs >= MIN_ALIGNED_PAIRS {
        pearson(aligned_scores, aligned_changes)
    } else {
        0.0
    };

    let impact_strength = if correlation.abs() > 0.5 {
        ImpactStrength::High
    } else if correlation.abs() > 0.3 {
        ImpactStrength::Medium
    } else {
        ImpactStrength::Low
    };

    let analysis = if correlation > 0.3 {
        "Strong positive correlation: sentiment tends to predict price direction"
    } else if correlation < -0.3 {
        "Negative correlation: sentiment often contrarian to price moves"
    } else {
        "Weak correlation: sentiment has limited predictive power"
    };

    Ok(SentimentCorrelation {
        correlation: round_dp(correlation, 3),
        impact_strength,
        analysis: analysis.to_string(),
        data_points: pairs,
    })
}

/// Pearson correlation; 0 when either side has no variance
fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let covariance = xs.iter().covariance(ys.iter());
    let r = covariance / (xs.iter().std_dev() * ys.iter().std_dev());
    if r.is_finite() {
        r
    } else {
        0.0
    }
}
