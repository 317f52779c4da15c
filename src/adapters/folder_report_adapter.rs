//! Data folder report source.
//!
//! Reports are exported by hand into a single flat folder, one or more per
//! ticker. Only `.csv` files named `StrategyReports_<TICKER>_<stamp>` are read.

use crate::domain::error::TosQuoteError;
use crate::domain::report_name::{parse_report_name, ReportFile};
use crate::domain::report_parser::{parse_report, ParseOptions, ParsedReport};
use crate::domain::report_row::DEFAULT_CENTURY_PIVOT;
use crate::domain::summary::ReportSummary;
use crate::ports::report_source::ReportSource;
use std::collections::BTreeMap;
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const DEFAULT_DATA_FOLDER: &str = "quote_data";

pub struct FolderReportSource {
    folder: PathBuf,
    century_pivot: u32,
}

impl FolderReportSource {
    pub fn new(folder: PathBuf) -> Self {
        Self {
            folder,
            century_pivot: DEFAULT_CENTURY_PIVOT,
        }
    }

    /// Pivot used to read the export date in file name stamps.
    pub fn with_century_pivot(mut self, century_pivot: u32) -> Self {
        self.century_pivot = century_pivot;
        self
    }

    fn is_csv(path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("csv"))
            .unwrap_or(false)
    }
}

/// The later export wins; undated stamps lose to dated ones, then file name decides.
fn prefer(candidate: &ReportFile, current: &ReportFile, century_pivot: u32) -> bool {
    let key = |f: &ReportFile| (f.name().export_date(century_pivot), f.display_name());
    key(candidate) > key(current)
}

impl ReportSource for FolderReportSource {
    fn list_reports(&self) -> Result<Vec<ReportFile>, TosQuoteError> {
        if !self.folder.is_dir() {
            return Err(TosQuoteError::DataFolderMissing {
                path: self.folder.display().to_string(),
            });
        }

        let mut by_ticker: BTreeMap<String, ReportFile> = BTreeMap::new();

        for entry in fs::read_dir(&self.folder)? {
            let path = entry?.path();
            if !path.is_file() || !Self::is_csv(&path) {
                continue;
            }
            let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            let Some(name) = parse_report_name(&stem) else {
                debug!("Ignoring {}", path.display());
                continue;
            };

            let candidate = ReportFile {
                ticker: name.ticker,
                stamp: name.stamp,
                path,
            };
            match by_ticker.get(&candidate.ticker) {
                Some(current) if !prefer(&candidate, current, self.century_pivot) => {
                    info!(
                        "Skipping {} in favour of {}",
                        candidate.display_name(),
                        current.display_name()
                    );
                }
                Some(current) => {
                    info!(
                        "Skipping {} in favour of {}",
                        current.display_name(),
                        candidate.display_name()
                    );
                    by_ticker.insert(candidate.ticker.clone(), candidate);
                }
                None => {
                    by_ticker.insert(candidate.ticker.clone(), candidate);
                }
            }
        }

        Ok(by_ticker.into_values().collect())
    }

    fn read_report(
        &self,
        file: &ReportFile,
        options: &ParseOptions,
    ) -> Result<ParsedReport, TosQuoteError> {
        info!("Processing file: {}", file.path.display());
        let handle = fs::File::open(&file.path)?;
        let report = parse_report(&file.display_name(), BufReader::new(handle), *options)?;

        let inconsistent = report.bars.iter().filter(|b| !b.is_consistent()).count();
        if inconsistent > 0 {
            warn!(
                "{}: {} rows with prices outside their high/low range",
                file.ticker, inconsistent
            );
        }
        info!("{}", ReportSummary::of(&file.ticker, &report));
        Ok(report)
    }
}
