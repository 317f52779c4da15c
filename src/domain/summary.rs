//! One-line description of a parsed report.

use crate::domain::report_parser::ParsedReport;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub ticker: String,
    pub rows: usize,
    pub anomalies: usize,
    pub range: Option<(NaiveDate, NaiveDate)>,
}

impl ReportSummary {
    pub fn of(ticker: &str, report: &ParsedReport) -> Self {
        Self {
            ticker: ticker.to_string(),
            rows: report.bars.len(),
            anomalies: report.anomalies.len(),
            range: report.date_range(),
        }
    }
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.range {
            Some((first, last)) => write!(
                f,
                "{}: {} rows from {} to {}",
                self.ticker, self.rows, first, last
            ),
            None => write!(f, "{}: {} rows from N/A to N/A", self.ticker, self.rows),
        }
    }
}
