use super::moving_average::calculate_ema;

pub const MACD_FAST_PERIOD: usize = 12;
pub const MACD_SLOW_PERIOD: usize = 26;
pub const MACD_SIGNAL_PERIOD: usize = 9;

/// MACD line, signal line and histogram
///
/// All three series end at the last input price. The signal and histogram are
/// shorter than the MACD line by the signal EMA warm-up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacdResult {
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MacdResult {
    pub fn is_empty(&self) -> bool {
        self.macd_line.is_empty()
    }
}

/// MACD (12, 26, 9)
///
/// Fewer than 26 prices yields empty series for all three outputs.
pub fn calculate_macd(prices: &[f64]) -> MacdResult {
    calculate_macd_with(prices, MACD_FAST_PERIOD, MACD_SLOW_PERIOD, MACD_SIGNAL_PERIOD)
}

pub fn calculate_macd_with(
    prices: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> MacdResult {
    if fast_period == 0
        || signal_period == 0
        || fast_period >= slow_period
        || prices.len() < slow_period
    {
        return MacdResult::default();
    }

    let ema_fast = calculate_ema(prices, fast_period);
    let ema_slow = calculate_ema(prices, slow_period);

    // ema_fast starts (slow - fast) positions earlier than ema_slow
    let offset = slow_period - fast_period;
    let macd_line: Vec<f64> = ema_slow
        .iter()
        .enumerate()
        .map(|(i, slow)| ema_fast[i + offset] - slow)
        .collect();

    let signal_line = calculate_ema(&macd_line, signal_period);

    let hist_offset = macd_line.len() - signal_line.len();
    let histogram = signal_line
        .iter()
        .enumerate()
        .map(|(i, signal)| macd_line[i + hist_offset] - signal)
        .collect();

    MacdResult {
        macd_line,
        signal_line,
        histogram,
    }
}
