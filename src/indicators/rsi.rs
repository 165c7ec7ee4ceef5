/// Standard RSI look-back
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Substituted for a zero average loss so the ratio stays finite
const LOSS_EPSILON: f64 = 0.001;

/// Calculate Relative Strength Index (RSI) with Wilder's smoothing
///
/// The first value uses plain averages of the first `period` changes; each
/// later change updates `avg = (avg * (period - 1) + x) / period`.
///
/// Values:
/// - RSI > 70: Overbought
/// - RSI < 30: Oversold
///
/// Output length is `prices.len() - period`; empty when fewer than
/// `period + 1` prices are supplied.
pub fn calculate_rsi(prices: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || prices.len() < period + 1 {
        return Vec::new();
    }

    let changes: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let n = period as f64;

    let mut avg_gain = changes[..period].iter().map(|c| c.max(0.0)).sum::<f64>() / n;
    let mut avg_loss = changes[..period].iter().map(|c| (-c).max(0.0)).sum::<f64>() / n;

    let mut values = Vec::with_capacity(prices.len() - period);
    values.push(rsi_value(avg_gain, avg_loss));

    for change in &changes[period..] {
        avg_gain = (avg_gain * (n - 1.0) + change.max(0.0)) / n;
        avg_loss = (avg_loss * (n - 1.0) + (-change).max(0.0)) / n;
        values.push(rsi_value(avg_gain, avg_loss));
    }

    values
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    let avg_loss = if avg_loss == 0.0 { LOSS_EPSILON } else { avg_loss };
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}
