use statrs::statistics::Statistics;

use super::moving_average::calculate_sma_series;

/// Bollinger Bands: rolling SMA ± `std_dev` sample standard deviations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

pub fn calculate_bollinger_bands(prices: &[f64], period: usize, std_dev: f64) -> BollingerBands {
    if period == 0 || prices.len() < period {
        return BollingerBands::default();
    }

    let middle = calculate_sma_series(prices, period);
    let mut upper = Vec::with_capacity(middle.len());
    let mut lower = Vec::with_capacity(middle.len());

    for (window, mean) in prices.windows(period).zip(&middle) {
        let sigma = window.iter().std_dev();
        let sigma = if sigma.is_finite() { sigma } else { 0.0 };

        upper.push(mean + std_dev * sigma);
        lower.push(mean - std_dev * sigma);
    }

    BollingerBands {
        upper,
        middle,
        lower,
    }
}
