//! Output port for converted observations.

use crate::domain::error::TosQuoteError;
use crate::domain::ohlc::QuoteSeries;

pub trait QuoteSink {
    fn write_series(&self, series: &QuoteSeries) -> Result<(), TosQuoteError>;
}
