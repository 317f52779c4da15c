//! Strategy report file naming convention: `StrategyReports_<TICKER>_<MMDDYY>`.

use crate::domain::report_row::expand_two_digit_year;
use chrono::NaiveDate;
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

static REPORT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^StrategyReports_([A-Z]{3,4})_([0-9]+)").expect("static pattern compiles")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportName {
    pub ticker: String,
    pub stamp: String,
}

impl ReportName {
    /// A six-digit stamp is the export date as MMDDYY, years expanded with
    /// the same pivot as report rows.
    pub fn export_date(&self, century_pivot: u32) -> Option<NaiveDate> {
        if self.stamp.len() != 6 || !self.stamp.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let month: u32 = self.stamp[0..2].parse().ok()?;
        let day: u32 = self.stamp[2..4].parse().ok()?;
        let yy: u32 = self.stamp[4..6].parse().ok()?;
        NaiveDate::from_ymd_opt(expand_two_digit_year(yy, century_pivot), month, day)
    }
}

/// Match a file stem against the report naming pattern.
pub fn parse_report_name(stem: &str) -> Option<ReportName> {
    let caps = REPORT_NAME.captures(stem)?;
    Some(ReportName {
        ticker: caps[1].to_string(),
        stamp: caps[2].to_string(),
    })
}

/// A report discovered on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    pub ticker: String,
    pub stamp: String,
    pub path: PathBuf,
}

impl ReportFile {
    pub fn name(&self) -> ReportName {
        ReportName {
            ticker: self.ticker.clone(),
            stamp: self.stamp.clone(),
        }
    }

    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}
