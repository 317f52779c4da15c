//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorType`: Indicator identity + parameters (serves as HashMap key)
//! - `IndicatorSeries`: A time series of indicator values

pub mod sma;
pub mod ema;
pub mod ema_delta;

use crate::domain::ohlc::{OhlcBar, PriceField};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    /// SMA(period) of EMA(short) - EMA(long).
    EmaDelta {
        short: usize,
        long: usize,
        period: usize,
    },
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn empty(indicator_type: IndicatorType) -> Self {
        Self {
            indicator_type,
            values: Vec::new(),
        }
    }

    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|p| p.valid).count()
    }
}

impl IndicatorType {
    pub fn calculate(&self, bars: &[OhlcBar], field: PriceField) -> IndicatorSeries {
        match *self {
            IndicatorType::Sma(period) => sma::calculate_sma(bars, period, field),
            IndicatorType::Ema(period) => ema::calculate_ema(bars, period, field),
            IndicatorType::EmaDelta {
                short,
                long,
                period,
            } => ema_delta::calculate_ema_delta(bars, short, long, period, field),
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::EmaDelta {
                short,
                long,
                period,
            } => write!(f, "EMA_DELTA({},{},{})", short, long, period),
        }
    }
}

impl FromStr for IndicatorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = s.trim().to_uppercase();
        let (name, rest) = spec
            .split_once('(')
            .ok_or_else(|| format!("expected NAME(args), got '{}'", s.trim()))?;
        let args = rest
            .strip_suffix(')')
            .ok_or_else(|| format!("missing ')' in '{}'", s.trim()))?;
        let params = args
            .split(',')
            .map(|a| {
                a.trim()
                    .parse::<usize>()
                    .map_err(|_| format!("invalid period '{}' in '{}'", a.trim(), s.trim()))
            })
            .collect::<Result<Vec<usize>, String>>()?;

        match (name.trim(), params.as_slice()) {
            ("SMA", [period]) => Ok(IndicatorType::Sma(*period)),
            ("EMA", [period]) => Ok(IndicatorType::Ema(*period)),
            ("EMA_DELTA", [short, long, period]) => Ok(IndicatorType::EmaDelta {
                short: *short,
                long: *long,
                period: *period,
            }),
            ("SMA" | "EMA", _) => Err(format!("{} takes one period", name.trim())),
            ("EMA_DELTA", _) => Err("EMA_DELTA takes short,long,period".to_string()),
            (other, _) => Err(format!("unknown indicator '{}'", other)),
        }
    }
}
