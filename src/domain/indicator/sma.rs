//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = sum(P[i-j] for j in 0..n) / n.
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlc::{OhlcBar, PriceField};

/// Rolling mean over `period` values; a window touching a `None` yields `None`.
pub fn sma_values(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    if period == 0 {
        return vec![None; values.len()];
    }
    for i in 0..values.len() {
        if i + 1 < period {
            out.push(None);
            continue;
        }
        let window = &values[i + 1 - period..=i];
        let sum: Option<f64> = window.iter().copied().sum();
        out.push(sum.map(|s| s / period as f64));
    }
    out
}

pub fn calculate_sma(bars: &[OhlcBar], period: usize, field: PriceField) -> IndicatorSeries {
    let indicator_type = IndicatorType::Sma(period);
    if period == 0 || bars.is_empty() {
        return IndicatorSeries::empty(indicator_type);
    }

    let prices: Vec<Option<f64>> = bars.iter().map(|b| Some(b.price(field))).collect();
    let values = bars
        .iter()
        .zip(sma_values(&prices, period))
        .map(|(bar, value)| IndicatorPoint {
            date: bar.date,
            valid: value.is_some(),
            value: value.unwrap_or(0.0),
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}
