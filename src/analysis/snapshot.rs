use serde::{Deserialize, Serialize};

use crate::error::PredictionError;
use crate::indicators::{calculate_bollinger_bands, calculate_sma, DEFAULT_RSI_PERIOD};
use crate::utils::round_dp;
use crate::Result;

const BOLLINGER_PERIOD: usize = 20;
const BOLLINGER_STD_DEV: f64 = 2.0;
/// Band half-width used when there is not a full Bollinger window
const FALLBACK_BAND_PCT: f64 = 0.02;
const NEUTRAL_RSI: f64 = 50.0;

/// Headline indicator values for a close series, rounded for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSnapshot {
    pub sma_20: f64,
    pub sma_50: f64,
    pub rsi: f64,
    pub bollinger_upper: f64,
    pub bollinger_lower: f64,
    pub current_price: f64,
}

/// Summarise the latest technical indicators of a close series
///
/// Short series degrade instead of failing: the SMAs average everything
/// available, RSI reads 50 and the bands sit 2% either side of the price.
pub fn technical_snapshot(prices: &[f64]) -> Result<TechnicalSnapshot> {
    let current_price = *prices
        .last()
        .ok_or_else(|| PredictionError::insufficient("technical snapshot", 1, 0))?;

    let rsi = snapshot_rsi(prices, DEFAULT_RSI_PERIOD);

    let bands = calculate_bollinger_bands(prices, BOLLINGER_PERIOD, BOLLINGER_STD_DEV);
    let (upper, lower) = match (bands.upper.last(), bands.lower.last()) {
        (Some(upper), Some(lower)) => (*upper, *lower),
        _ => (
            current_price * (1.0 + FALLBACK_BAND_PCT),
            current_price * (1.0 - FALLBACK_BAND_PCT),
        ),
    };

    Ok(TechnicalSnapshot {
        sma_20: round_dp(calculate_sma(prices, 20), 2),
        sma_50: round_dp(calculate_sma(prices, 50), 2),
        rsi: round_dp(rsi, 2),
        bollinger_upper: round_dp(upper, 2),
        bollinger_lower: round_dp(lower, 2),
        current_price: round_dp(current_price, 2),
    })
}

/// Plain-average RSI over the last `period` changes
///
/// Unlike the Wilder series this reads 100 when the window has no losses,
/// flat windows included, and 50 when there are not `period` changes yet.
fn snapshot_rsi(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period + 1 {
        return NEUTRAL_RSI;
    }

    let changes: Vec<f64> = prices[prices.len() - period - 1..]
        .windows(2)
        .map(|w| w[1] - w[0])
        .collect();
    let avg_gain = changes.iter().map(|c| c.max(0.0)).sum::<f64>() / period as f64;
    let avg_loss = changes.iter().map(|c| (-c).max(0.0)).sum::<f64>() / period as f64;

    if avg_loss == 0.0 {
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}
