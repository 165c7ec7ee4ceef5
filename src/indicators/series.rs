//! Date-aligned indicator series over a price history
//!
//! Every numeric indicator ends at the newest price, so values are attached to
//! the trailing dates of the history they were computed from.

use serde::{Deserialize, Serialize};

use super::{calculate_ema, calculate_macd, calculate_rsi, calculate_sma_series};
use crate::models::{closes, IndicatorPoint, IndicatorSeries, PricePoint};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdSeries {
    pub macd_line: IndicatorSeries,
    pub signal_line: IndicatorSeries,
    pub histogram: IndicatorSeries,
}

/// Attach the trailing dates of `history` to a tail-aligned value series
pub fn align_to_dates(history: &[PricePoint], values: &[f64]) -> IndicatorSeries {
    let offset = history.len().saturating_sub(values.len());
    history[offset..]
        .iter()
        .zip(values)
        .map(|(point, value)| IndicatorPoint {
            date: point.date,
            value: *value,
        })
        .collect()
}

pub fn sma_series(history: &[PricePoint], period: usize) -> IndicatorSeries {
    align_to_dates(history, &calculate_sma_series(&closes(history), period))
}

pub fn ema_series(history: &[PricePoint], period: usize) -> IndicatorSeries {
    align_to_dates(history, &calculate_ema(&closes(history), period))
}

pub fn rsi_series(history: &[PricePoint], period: usize) -> IndicatorSeries {
    align_to_dates(history, &calculate_rsi(&closes(history), period))
}

pub fn macd_series(history: &[PricePoint]) -> MacdSeries {
    let macd = calculate_macd(&closes(history));
    MacdSeries {
        macd_line: align_to_dates(history, &macd.macd_line),
        signal_line: align_to_dates(history, &macd.signal_line),
        histogram: align_to_dates(history, &macd.histogram),
    }
}
