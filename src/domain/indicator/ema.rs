//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seed with first SMA, then EMA[i] = P[i]*k + EMA[i-1]*(1-k).
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlc::{OhlcBar, PriceField};

pub fn ema_values(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; prices.len()];
    }

    let mut values = Vec::with_capacity(prices.len());
    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = 0.0;
    let mut sum = 0.0;

    for (i, &price) in prices.iter().enumerate() {
        if i < period - 1 {
            sum += price;
            values.push(None);
        } else if i == period - 1 {
            sum += price;
            ema = sum / period as f64;
            values.push(Some(ema));
        } else {
            ema = price * k + ema * (1.0 - k);
            values.push(Some(ema));
        }
    }
    values
}

pub fn calculate_ema(bars: &[OhlcBar], period: usize, field: PriceField) -> IndicatorSeries {
    if period == 0 || bars.is_empty() {
        return IndicatorSeries::empty(IndicatorType::Ema(period));
    }

    let prices: Vec<f64> = bars.iter().map(|b| b.price(field)).collect();
    let values = bars
        .iter()
        .zip(ema_values(&prices, period))
        .map(|(bar, value)| IndicatorPoint {
            date: bar.date,
            valid: value.is_some(),
            value: value.unwrap_or(0.0),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values,
    }
}
