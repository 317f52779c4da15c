//! EMA delta trend: SMA(period) of EMA(short) - EMA(long).
//!
//! Warmup: the delta exists from index max(short, long) - 1, and the smoothing
//! adds another (period - 1) bars.

use crate::domain::indicator::ema::ema_values;
use crate::domain::indicator::sma::sma_values;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlc::{OhlcBar, PriceField};

pub fn calculate_ema_delta(
    bars: &[OhlcBar],
    short: usize,
    long: usize,
    period: usize,
    field: PriceField,
) -> IndicatorSeries {
    let indicator_type = IndicatorType::EmaDelta {
        short,
        long,
        period,
    };
    if short == 0 || long == 0 || period == 0 || bars.is_empty() {
        return IndicatorSeries::empty(indicator_type);
    }

    let prices: Vec<f64> = bars.iter().map(|b| b.price(field)).collect();
    let delta: Vec<Option<f64>> = ema_values(&prices, short)
        .into_iter()
        .zip(ema_values(&prices, long))
        .map(|(s, l)| Some(s? - l?))
        .collect();

    let values = bars
        .iter()
        .zip(sma_values(&delta, period))
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
