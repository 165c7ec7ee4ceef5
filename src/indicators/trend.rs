//! Momentum, volatility and trend consistency over a trailing window
//!
//! All three return 0 when the history is too short for the window.

use statrs::statistics::Statistics;

use crate::utils::sign;

/// Rate of change over `period` points, in percent
///
/// Requires more than `period` prices, else 0.
pub fn calculate_momentum(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() <= period {
        return 0.0;
    }

    let current = prices[prices.len() - 1];
    let base = prices[prices.len() - 1 - period];
    if base == 0.0 {
        return 0.0;
    }

    (current - base) / base * 100.0
}

/// Population standard deviation of the last `period` simple returns
///
/// Requires at least `period + 1` prices, else 0.
pub fn calculate_volatility(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period + 1 {
        return 0.0;
    }

    let returns = simple_returns(&prices[prices.len() - period - 1..]);
    let volatility = returns.iter().population_std_dev();

    if volatility.is_finite() {
        volatility
    } else {
        0.0
    }
}

/// Fraction of the last `period` changes whose sign matches the net move
///
/// Range [0, 1]. A flat window counts flat days as agreeing.
/// Requires at least `period + 1` prices, else 0.
pub fn calculate_trend_consistency(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period + 1 {
        return 0.0;
    }

    let window = &prices[prices.len() - period - 1..];
    let changes: Vec<f64> = window.windows(2).map(|w| w[1] - w[0]).collect();
    let net_direction = sign(changes.iter().sum());

    let agreeing = changes
        .iter()
        .filter(|change| sign(**change) == net_direction)
        .count();

    agreeing as f64 / period as f64
}

/// Day-over-day simple returns `(p[i] - p[i-1]) / p[i-1]`
pub fn simple_returns(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect()
}
