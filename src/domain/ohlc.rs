//! OHLC observation built from one report row pair.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl OhlcBar {
    /// high - low
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// low <= min(open, close) and max(open, close) <= high
    pub fn is_consistent(&self) -> bool {
        self.low <= self.open.min(self.close) && self.open.max(self.close) <= self.high
    }

    pub fn price(&self, field: PriceField) -> f64 {
        match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
        }
    }
}

/// Which price of a bar an indicator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PriceField {
    Open,
    High,
    Low,
    #[default]
    Close,
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PriceField::Open => "open",
            PriceField::High => "high",
            PriceField::Low => "low",
            PriceField::Close => "close",
        };
        f.write_str(name)
    }
}

impl FromStr for PriceField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(PriceField::Open),
            "high" => Ok(PriceField::High),
            "low" => Ok(PriceField::Low),
            "close" => Ok(PriceField::Close),
            other => Err(format!("unknown price field '{other}'")),
        }
    }
}

/// Observations for one ticker, in report order.
#[derive(Debug, Clone)]
pub struct QuoteSeries {
    pub ticker: String,
    pub bars: Vec<OhlcBar>,
}

impl QuoteSeries {
    pub fn new(ticker: impl Into<String>, bars: Vec<OhlcBar>) -> Self {
        Self {
            ticker: ticker.into(),
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> OhlcBar {
        OhlcBar {
            date: NaiveDate::from_ymd_opt(2025, 10, 17).unwrap(),
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
        }
    }

    #[test]
    fn range() {
        assert!((sample_bar().range() - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn consistent_bar() {
        assert!(sample_bar().is_consistent());
    }

    #[test]
    fn close_above_high_is_inconsistent() {
        let mut bar = sample_bar();
        bar.close = 111.0;
        assert!(!bar.is_consistent());
    }

    #[test]
    fn open_below_low_is_inconsistent() {
        let mut bar = sample_bar();
        bar.open = 89.5;
        assert!(!bar.is_consistent());
    }

    #[test]
    fn price_selects_field() {
        let bar = sample_bar();
        assert_eq!(bar.price(PriceField::Open), 100.0);
        assert_eq!(bar.price(PriceField::High), 110.0);
        assert_eq!(bar.price(PriceField::Low), 90.0);
        assert_eq!(bar.price(PriceField::Close), 105.0);
    }

    #[test]
    fn price_field_parse_and_display() {
        assert_eq!("Close".parse::<PriceField>().unwrap(), PriceField::Close);
        assert_eq!(" high ".parse::<PriceField>().unwrap(), PriceField::High);
        assert!("volume".parse::<PriceField>().is_err());
        assert_eq!(PriceField::Low.to_string(), "low");
        assert_eq!(PriceField::default(), PriceField::Close);
    }
}
