use crate::models::{PricePoint, SentimentPoint};
use crate::utils::round_dp;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Market scenario types for synthetic data generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketScenario {
    /// Steady uptrend with noise (+0.4% daily average)
    Uptrend,
    /// Steady downtrend with noise (-0.4% daily average)
    Downtrend,
    /// Mean-reverting market (±1% around the base price)
    Sideways,
    /// Large swings (±5% per day)
    Volatile,
}

impl fmt::Display for MarketScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MarketScenario::Uptrend => "uptrend",
            MarketScenario::Downtrend => "downtrend",
            MarketScenario::Sideways => "sideways",
            MarketScenario::Volatile => "volatile",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for MarketScenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "uptrend" | "up" => Ok(MarketScenario::Uptrend),
            "downtrend" | "down" => Ok(MarketScenario::Downtrend),
            "sideways" => Ok(MarketScenario::Sideways),
            "volatile" => Ok(MarketScenario::Volatile),
            other => Err(format!(
                "unknown scenario '{}', expected uptrend, downtrend, sideways or volatile",
                other
            )),
        }
    }
}

/// Generates synthetic daily prices and sentiment for replaying the predictors
pub struct SyntheticDataGenerator {
    rng: StdRng,
    base_price: f64,
    base_volume: f64,
}

impl SyntheticDataGenerator {
    /// Create a new generator with a seed for reproducibility
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            base_price: 150.0,
            base_volume: 1_000_000.0,
        }
    }

    pub fn with_base_price(mut self, base_price: f64) -> Self {
        self.base_price = base_price;
        self
    }

    /// Generate daily closes for a market scenario
    ///
    /// # Arguments
    /// * `scenario` - The market scenario to simulate
    /// * `start` - First trading day (moved forward past a weekend)
    /// * `num_days` - Number of trading days to generate
    ///
    /// # Returns
    /// Weekday-only price points, oldest first
    pub fn generate(
        &mut self,
        scenario: MarketScenario,
        start: NaiveDate,
        num_days: usize,
    ) -> Vec<PricePoint> {
        let mut points = Vec::with_capacity(num_days);
        let mut current_price = self.base_price;
        let mut date = start;

        while points.len() < num_days {
            if is_weekend(date) {
                date = next_day(date);
                continue;
            }

            current_price = self.step(scenario, current_price);
            let point = self.create_point(current_price, date);
            points.push(point);

            date = next_day(date);
        }

        points
    }

    /// Generate one sentiment point per price point
    ///
    /// Scores track the day's return plus noise, so trending scenarios carry
    /// sentiment of the same sign on average.
    pub fn generate_sentiment(&mut self, prices: &[PricePoint]) -> Vec<SentimentPoint> {
        let mut previous_close = prices.first().map(|p| p.close);

        prices
            .iter()
            .map(|point| {
                let daily_return = match previous_close {
                    Some(prev) if prev > 0.0 => (point.close - prev) / prev,
                    _ => 0.0,
                };
                previous_close = Some(point.close);

                let noise = self.rng.gen_range(-0.15..0.15);
                let score = (daily_return * 25.0 + noise).clamp(-1.0, 1.0);
                let news_count = self.rng.gen_range(5..40);

                SentimentPoint::new(point.date, round_dp(score, 3), news_count)
            })
            .collect()
    }

    /// Next close under the scenario's dynamics
    fn step(&mut self, scenario: MarketScenario, current_price: f64) -> f64 {
        match scenario {
            MarketScenario::Uptrend => {
                let noise = self.rng.gen_range(-0.01..0.01);
                current_price * (1.0 + 0.004 + noise)
            }
            MarketScenario::Downtrend => {
                let noise = self.rng.gen_range(-0.01..0.01);
                current_price * (1.0 - 0.004 + noise)
            }
            MarketScenario::Sideways => {
                // 10% pull back to the base price each day
                let reversion = (self.base_price - current_price) * 0.1;
                let noise = current_price * self.rng.gen_range(-0.01..0.01);
                current_price + reversion + noise
            }
            MarketScenario::Volatile => {
                let change = current_price * self.rng.gen_range(-0.05..0.05);
                (current_price + change).max(self.base_price * 0.5)
            }
        }
    }

    /// Build a price point with plausible open/high/low/volume around the close
    fn create_point(&mut self, price: f64, date: NaiveDate) -> PricePoint {
        let noise_pct = 0.005;
        let close = round_dp(price, 2);

        let high = close * (1.0 + self.rng.gen_range(0.0..noise_pct));
        let low = close * (1.0 - self.rng.gen_range(0.0..noise_pct));
        let open = (close * (1.0 + self.rng.gen_range(-noise_pct..noise_pct))).clamp(low, high);

        // Vary volume ±30%
        let volume = self.base_volume * self.rng.gen_range(0.7..1.3);

        PricePoint {
            date,
            close,
            open: Some(round_dp(open, 2)),
            high: Some(round_dp(high, 2)),
            low: Some(round_dp(low, 2)),
            volume: Some(volume.round()),
        }
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::validate_price_history;

    fn start() -> NaiveDate {
        // A Saturday
        NaiveDate::from_ymd_opt(2024, 1, 6).unwrap()
    }

    #[test]
    fn test_generate_uptrend() {
        let mut gen = SyntheticDataGenerator::new(42);
        let points = gen.generate(MarketScenario::Uptrend, start(), 120);

        assert_eq!(points.len(), 120);

        let first_price = points.first().unwrap().close;
        let last_price = points.last().unwrap().close;
        assert!(
            last_price > first_price,
            "Uptrend should end higher: {} -> {}",
            first_price,
            last_price
        );
    }

    #[test]
    fn test_generate_downtrend() {
        let mut gen = SyntheticDataGenerator::new(42);
        let points = gen.generate(MarketScenario::Downtrend, start(), 120);

        let first_price = points.first().unwrap().close;
        let last_price = points.last().unwrap().close;
        assert!(
            last_price < first_price,
            "Downtrend should end lower: {} -> {}",
            first_price,
            last_price
        );
    }

    #[test]
    fn test_generate_sideways() {
        let mut gen = SyntheticDataGenerator::new(42);
        let points = gen.generate(MarketScenario::Sideways, start(), 250);

        // Should stay roughly around base price (±10%)
        let base = gen.base_price;
        for point in &points {
            assert!(
                point.close > base * 0.9 && point.close < base * 1.1,
                "Sideways should stay near base: {} vs {}",
                point.close,
                base
            );
        }
    }

    #[test]
    fn test_volatile_price_floor() {
        let mut gen = SyntheticDataGenerator::new(7);
        let points = gen.generate(MarketScenario::Volatile, start(), 300);

        assert!(points.iter().all(|p| p.close >= 75.0));
    }

    #[test]
    fn test_skips_weekends() {
        let mut gen = SyntheticDataGenerator::new(42);
        let points = gen.generate(MarketScenario::Sideways, start(), 20);

        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert!(points.iter().all(|p| !is_weekend(p.date)));
        assert!(validate_price_history(&points).is_ok());
    }

    #[test]
    fn test_same_seed_same_series() {
        let a = SyntheticDataGenerator::new(99).generate(MarketScenario::Volatile, start(), 50);
        let b = SyntheticDataGenerator::new(99).generate(MarketScenario::Volatile, start(), 50);
        assert_eq!(a, b);
    }

    #[test]
    fn test_ohlc_consistency() {
        let mut gen = SyntheticDataGenerator::new(42);
        let points = gen.generate(MarketScenario::Uptrend, start(), 100);

        for point in &points {
            let (open, high, low) = (point.open.unwrap(), point.high.unwrap(), point.low.unwrap());
            assert!(high >= point.close, "High should be >= close");
            assert!(high >= open, "High should be >= open");
            assert!(low <= point.close, "Low should be <= close");
            assert!(low <= open, "Low should be <= open");
        }
    }

    #[test]
    fn test_sentiment_follows_trend() {
        let mut gen = SyntheticDataGenerator::new(42);
        let prices = gen.generate(MarketScenario::Uptrend, start(), 120);
        let sentiment = gen.generate_sentiment(&prices);

        assert_eq!(sentiment.len(), prices.len());
        assert!(sentiment.iter().all(|s| s.sentiment_score.abs() <= 1.0));
        assert!(sentiment.iter().zip(&prices).all(|(s, p)| s.date == p.date));

        let average: f64 =
            sentiment.iter().map(|s| s.sentiment_score).sum::<f64>() / sentiment.len() as f64;
        assert!(average > 0.0, "Uptrend sentiment should lean positive: {}", average);
    }

    #[test]
    fn test_parse_scenario() {
        assert_eq!("UPTREND".parse::<MarketScenario>(), Ok(MarketScenario::Uptrend));
        assert_eq!("sideways".parse::<MarketScenario>(), Ok(MarketScenario::Sideways));
        assert!("crash".parse::<MarketScenario>().is_err());
    }
}
