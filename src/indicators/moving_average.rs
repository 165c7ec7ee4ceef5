/// Simple Moving Average of the last `period` prices
///
/// With fewer than `period` prices the whole slice is averaged instead.
/// Empty input or a zero period yields 0.
pub fn calculate_sma(prices: &[f64], period: usize) -> f64 {
    if prices.is_empty() || period == 0 {
        return 0.0;
    }

    let window = period.min(prices.len());
    let sum: f64 = prices.iter().rev().take(window).sum();
    sum / window as f64
}

/// Rolling Simple Moving Average, one value per full window
///
/// Output length is `prices.len() - period + 1`, empty when the input is shorter
/// than one window.
pub fn calculate_sma_series(prices: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || prices.len() < period {
        return Vec::new();
    }

    prices
        .windows(period)
        .map(|window| window.iter().sum::<f64>() / period as f64)
        .collect()
}

/// Exponential Moving Average series
///
/// Seeded with the SMA of the first `period` prices, then
/// `ema = price * k + prev * (1 - k)` with `k = 2 / (period + 1)`.
/// One value per input position from index `period - 1` onward.
pub fn calculate_ema(prices: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || prices.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period as f64 + 1.0);

    // Start with SMA
    let initial_sma = prices[..period].iter().sum::<f64>() / period as f64;

    let mut result = Vec::with_capacity(prices.len() - period + 1);
    result.push(initial_sma);

    let mut ema = initial_sma;
    for price in &prices[period..] {
        ema = price * multiplier + ema * (1.0 - multiplier);
        result.push(ema);
    }

    result
}
