//! Strategy report parser.
//!
//! A line-oriented state machine holding at most one pending date. A `SellClose`
//! row sets the pending date; the next `SOHLCP` row consumes it and yields one
//! [`OhlcBar`]. Rows that break the one-to-one pairing are recorded as
//! [`PairingAnomaly`] values: logged and skipped in lenient mode, fatal in strict
//! mode. Unparseable dates or prices are always fatal.

use crate::domain::error::TosQuoteError;
use crate::domain::ohlc::OhlcBar;
use crate::domain::report_row::{self, RowKind, DEFAULT_CENTURY_PIVOT};
use chrono::NaiveDate;
use std::fmt;
use std::io::BufRead;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub century_pivot: u32,
    pub strict: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            century_pivot: DEFAULT_CENTURY_PIVOT,
            strict: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairingAnomaly {
    /// A date row that never met its price row.
    UnpairedDate { line: usize, date: NaiveDate },
    OrphanPrice { line: usize },
    MalformedDateRow { line: usize },
    MalformedPriceRow { line: usize },
}

impl PairingAnomaly {
    pub fn line(&self) -> usize {
        match self {
            PairingAnomaly::UnpairedDate { line, .. }
            | PairingAnomaly::OrphanPrice { line }
            | PairingAnomaly::MalformedDateRow { line }
            | PairingAnomaly::MalformedPriceRow { line } => *line,
        }
    }
}

impl fmt::Display for PairingAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairingAnomaly::UnpairedDate { line, date } => {
                write!(f, "line {line}: date row {date} has no matching price row")
            }
            PairingAnomaly::OrphanPrice { line } => {
                write!(f, "line {line}: price row without a preceding date row")
            }
            PairingAnomaly::MalformedDateRow { line } => {
                write!(f, "line {line}: date row has too few columns")
            }
            PairingAnomaly::MalformedPriceRow { line } => {
                write!(f, "line {line}: price row has too few fields")
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParsedReport {
    pub bars: Vec<OhlcBar>,
    pub anomalies: Vec<PairingAnomaly>,
}

impl ParsedReport {
    /// First and last observation dates, in report order.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.bars.first(), self.bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.anomalies.is_empty()
    }
}

pub struct ReportParser {
    source: String,
    options: ParseOptions,
    pending: Option<(usize, NaiveDate)>,
    report: ParsedReport,
}

impl ReportParser {
    pub fn new(source: impl Into<String>, options: ParseOptions) -> Self {
        Self {
            source: source.into(),
            options,
            pending: None,
            report: ParsedReport::default(),
        }
    }

    /// Feed one line; `line_no` is 1-based.
    pub fn feed_line(&mut self, line_no: usize, line: &str) -> Result<(), TosQuoteError> {
        match report_row::classify(line) {
            RowKind::Price => self.on_price_row(line_no, line),
            RowKind::Date => self.on_date_row(line_no, line),
            RowKind::Other => Ok(()),
        }
    }

    pub fn finish(mut self) -> Result<ParsedReport, TosQuoteError> {
        if let Some((line, date)) = self.pending.take() {
            self.record(PairingAnomaly::UnpairedDate { line, date })?;
        }
        Ok(self.report)
    }

    fn on_date_row(&mut self, line_no: usize, line: &str) -> Result<(), TosQuoteError> {
        let date = report_row::extract_date(line, self.options.century_pivot)
            .map_err(|reason| self.parse_error(line_no, reason))?;
        let Some(date) = date else {
            return self.record(PairingAnomaly::MalformedDateRow { line: line_no });
        };
        if let Some((line, prev)) = self.pending.replace((line_no, date)) {
            self.record(PairingAnomaly::UnpairedDate { line, date: prev })?;
        }
        Ok(())
    }

    fn on_price_row(&mut self, line_no: usize, line: &str) -> Result<(), TosQuoteError> {
        let prices =
            report_row::extract_prices(line).map_err(|reason| self.parse_error(line_no, reason))?;
        let Some([open, high, low, close]) = prices else {
            return self.record(PairingAnomaly::MalformedPriceRow { line: line_no });
        };
        let Some((_, date)) = self.pending.take() else {
            return self.record(PairingAnomaly::OrphanPrice { line: line_no });
        };
        self.report.bars.push(OhlcBar {
            date,
            open,
            high,
            low,
            close,
        });
        Ok(())
    }

    fn record(&mut self, anomaly: PairingAnomaly) -> Result<(), TosQuoteError> {
        if self.options.strict {
            return Err(TosQuoteError::Pairing {
                file: self.source.clone(),
                anomaly,
            });
        }
        warn!(file = %self.source, "{anomaly}");
        self.report.anomalies.push(anomaly);
        Ok(())
    }

    fn parse_error(&self, line: usize, reason: String) -> TosQuoteError {
        TosQuoteError::ReportParse {
            file: self.source.clone(),
            line,
            reason,
        }
    }
}

/// Parse a whole report from a buffered reader.
pub fn parse_report<R: BufRead>(
    source: &str,
    reader: R,
    options: ParseOptions,
) -> Result<ParsedReport, TosQuoteError> {
    let mut parser = ReportParser::new(source, options);
    for (i, line) in reader.lines().enumerate() {
        parser.feed_line(i + 1, &line?)?;
    }
    parser.finish()
}

pub fn parse_report_str(
    source: &str,
    content: &str,
    options: ParseOptions,
) -> Result<ParsedReport, TosQuoteError> {
    parse_report(source, content.as_bytes(), options)
}
