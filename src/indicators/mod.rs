// Technical indicators module
// Implements SMA, EMA, RSI, MACD, Bollinger Bands and trend statistics

pub mod bollinger;
pub mod macd;
pub mod moving_average;
pub mod rsi;
pub mod series;
pub mod trend;

pub use bollinger::{calculate_bollinger_bands, BollingerBands};
pub use macd::{calculate_macd, calculate_macd_with, MacdResult};
pub use moving_average::{calculate_ema, calculate_sma, calculate_sma_series};
pub use rsi::{calculate_rsi, DEFAULT_RSI_PERIOD};
pub use series::{align_to_dates, ema_series, macd_series, rsi_series, sma_series, MacdSeries};
pub use trend::{
    calculate_momentum, calculate_trend_consistency, calculate_volatility, simple_returns,
};
