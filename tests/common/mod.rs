#![allow(dead_code)]

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tosquote::cli::Settings;
use tosquote::domain::error::TosQuoteError;
pub use tosquote::domain::ohlc::OhlcBar;
use tosquote::domain::report_name::ReportFile;
use tosquote::domain::report_parser::{parse_report_str, ParseOptions, ParsedReport};
use tosquote::ports::report_source::ReportSource;

pub const REPORT_HEADER: &str = "Strategy report Symbol: SPY Work Time: 10/1/25 - 10/17/25\n\
    Id;Strategy;Side;Amount;Price;Date/Time;Trade P/L;P/L;Position\n";

/// In-memory reports keyed by ticker.
pub struct MockReportSource {
    pub reports: BTreeMap<String, String>,
}

impl MockReportSource {
    pub fn new() -> Self {
        Self {
            reports: BTreeMap::new(),
        }
    }

    pub fn with_report(mut self, ticker: &str, content: &str) -> Self {
        self.reports.insert(ticker.to_string(), content.to_string());
        self
    }
}

impl ReportSource for MockReportSource {
    fn list_reports(&self) -> Result<Vec<ReportFile>, TosQuoteError> {
        Ok(self
            .reports
            .keys()
            .map(|ticker| ReportFile {
                ticker: ticker.clone(),
                stamp: "101825".into(),
                path: PathBuf::from(format!("StrategyReports_{ticker}_101825.csv")),
            })
            .collect())
    }

    fn read_report(
        &self,
        file: &ReportFile,
        options: &ParseOptions,
    ) -> Result<ParsedReport, TosQuoteError> {
        let content = self.reports.get(&file.ticker).cloned().unwrap_or_default();
        parse_report_str(&file.display_name(), &content, *options)
    }
}

pub fn settings(data_folder: &Path) -> Settings {
    Settings {
        data_folder: data_folder.to_path_buf(),
        options: ParseOptions::default(),
        output_dir: None,
        date_format: "%Y-%m-%d".into(),
        log_level: "info".into(),
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Price from integer cents, rendered with `,` thousands separators.
pub fn format_cents(cents: u64) -> String {
    let whole = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}.{:02}", grouped, cents % 100)
}

pub fn date_row(id: usize, date: NaiveDate) -> String {
    format!(
        "{id};SellClose;Sell to Close;-100.0;$1.00;{}/{}/{:02};$0.00;$0.00;0\n",
        date.month(),
        date.day(),
        date.year() % 100
    )
}

pub fn price_row(id: usize, cents: [u64; 4]) -> String {
    format!(
        "{id};SOHLCP(|x|{}|{}|{}|{}|);Buy to Open;100.0;$1.00;;;;100\n",
        format_cents(cents[0]),
        format_cents(cents[1]),
        format_cents(cents[2]),
        format_cents(cents[3])
    )
}

/// A well-formed report with one date/price pair per observation.
pub fn report_text(rows: &[(NaiveDate, [u64; 4])]) -> String {
    let mut text = REPORT_HEADER.to_string();
    for (i, (date, cents)) in rows.iter().enumerate() {
        text.push_str(&date_row(2 * i + 1, *date));
        text.push_str(&price_row(2 * i + 2, *cents));
    }
    text
}

pub fn bar_from_cents(date: NaiveDate, cents: [u64; 4]) -> OhlcBar {
    OhlcBar {
        date,
        open: cents[0] as f64 / 100.0,
        high: cents[1] as f64 / 100.0,
        low: cents[2] as f64 / 100.0,
        close: cents[3] as f64 / 100.0,
    }
}

pub fn sample_rows() -> Vec<(NaiveDate, [u64; 4])> {
    vec![
        (date(2025, 10, 15), [45010, 45200, 44925, 45100]),
        (date(2025, 10, 16), [45100, 45550, 45000, 45475]),
        (date(2025, 10, 17), [45475, 45600, 45300, 45525]),
    ]
}

pub fn write_report(dir: &Path, ticker: &str, stamp: &str, content: &str) -> PathBuf {
    let path = dir.join(format!("StrategyReports_{ticker}_{stamp}.csv"));
    fs::write(&path, content).unwrap();
    path
}
