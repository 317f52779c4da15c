//! Normalized OHLC CSV adapter.
//!
//! Files carry a `date,open,high,low,close` header, one row per observation in
//! report order.

use crate::domain::error::TosQuoteError;
use crate::domain::ohlc::{OhlcBar, QuoteSeries};
use crate::ports::quote_sink::QuoteSink;
use chrono::NaiveDate;
use std::fmt::Write as _;
use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;
use tracing::info;

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
pub const HEADER: [&str; 5] = ["date", "open", "high", "low", "close"];

pub fn write_bars<W: Write>(
    writer: W,
    bars: &[OhlcBar],
    date_format: &str,
) -> Result<(), TosQuoteError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;
    for bar in bars {
        wtr.write_record([
            format_date(bar.date, date_format)?,
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render `date` with a strftime pattern; patterns needing a time of day fail.
pub fn format_date(date: NaiveDate, date_format: &str) -> Result<String, TosQuoteError> {
    let mut out = String::new();
    write!(out, "{}", date.format(date_format)).map_err(|_| TosQuoteError::ConfigInvalid {
        section: "output".into(),
        key: "date_format".into(),
        reason: format!("'{date_format}' cannot render a date"),
    })?;
    Ok(out)
}

/// Read rows written by [`write_bars`]; `source` names the input in errors.
pub fn read_bars<R: Read>(
    source: &str,
    reader: R,
    date_format: &str,
) -> Result<Vec<OhlcBar>, TosQuoteError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut bars = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        // header is line 1
        let line = i + 2;

        let date_str = column(source, &record, 0, "date", line)?;
        let date = NaiveDate::parse_from_str(date_str.trim(), date_format).map_err(|e| {
            row_error(source, line, format!("invalid date '{date_str}': {e}"))
        })?;

        bars.push(OhlcBar {
            date,
            open: price_column(source, &record, 1, "open", line)?,
            high: price_column(source, &record, 2, "high", line)?,
            low: price_column(source, &record, 3, "low", line)?,
            close: price_column(source, &record, 4, "close", line)?,
        });
    }

    Ok(bars)
}

fn row_error(source: &str, line: usize, reason: String) -> TosQuoteError {
    TosQuoteError::ReportParse {
        file: source.to_string(),
        line,
        reason,
    }
}

fn column<'a>(
    source: &str,
    record: &'a csv::StringRecord,
    idx: usize,
    name: &str,
    line: usize,
) -> Result<&'a str, TosQuoteError> {
    record
        .get(idx)
        .ok_or_else(|| row_error(source, line, format!("missing {name} column")))
}

fn price_column(
    source: &str,
    record: &csv::StringRecord,
    idx: usize,
    name: &str,
    line: usize,
) -> Result<f64, TosQuoteError> {
    let raw = column(source, record, idx, name, line)?;
    raw.trim()
        .parse()
        .map_err(|_| row_error(source, line, format!("invalid {name} value '{raw}'")))
}

/// Writes `<dir>/<TICKER>.csv` per series.
pub struct CsvQuoteStore {
    dir: PathBuf,
    date_format: String,
}

impl CsvQuoteStore {
    pub fn new(dir: PathBuf, date_format: impl Into<String>) -> Self {
        Self {
            dir,
            date_format: date_format.into(),
        }
    }

    pub fn csv_path(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", ticker.to_uppercase()))
    }

    pub fn read_series(&self, ticker: &str) -> Result<QuoteSeries, TosQuoteError> {
        let path = self.csv_path(ticker);
        let file = fs::File::open(&path)?;
        let bars = read_bars(&path.display().to_string(), file, &self.date_format)?;
        Ok(QuoteSeries::new(ticker.to_uppercase(), bars))
    }
}

impl QuoteSink for CsvQuoteStore {
    fn write_series(&self, series: &QuoteSeries) -> Result<(), TosQuoteError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.csv_path(&series.ticker);
        let file = fs::File::create(&path)?;
        write_bars(file, &series.bars, &self.date_format)?;
        info!("Wrote {} rows to {}", series.len(), path.display());
        Ok(())
    }
}
