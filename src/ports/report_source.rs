//! Strategy report access port trait.

use crate::domain::error::TosQuoteError;
use crate::domain::report_name::ReportFile;
use crate::domain::report_parser::{ParseOptions, ParsedReport};

pub trait ReportSource {
    /// One report per ticker, sorted by ticker.
    fn list_reports(&self) -> Result<Vec<ReportFile>, TosQuoteError>;

    fn read_report(
        &self,
        file: &ReportFile,
        options: &ParseOptions,
    ) -> Result<ParsedReport, TosQuoteError>;

    fn find_report(&self, ticker: &str) -> Result<ReportFile, TosQuoteError> {
        let wanted = ticker.to_uppercase();
        self.list_reports()?
            .into_iter()
            .find(|f| f.ticker == wanted)
            .ok_or(TosQuoteError::UnknownTicker { ticker: wanted })
    }
}
