//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;

use crate::adapters::csv_adapter::{self, CsvQuoteStore, DEFAULT_DATE_FORMAT};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::folder_report_adapter::{FolderReportSource, DEFAULT_DATA_FOLDER};
use crate::adapters::table_adapter::render_table;
use crate::domain::config_validation::{validate_config, validate_date_format, LOG_LEVELS};
use crate::domain::error::TosQuoteError;
use crate::domain::indicator::IndicatorType;
use crate::domain::ohlc::{PriceField, QuoteSeries};
use crate::domain::report_name::ReportFile;
use crate::domain::report_parser::ParseOptions;
use crate::domain::report_row::DEFAULT_CENTURY_PIVOT;
use crate::domain::summary::ReportSummary;
use crate::logging;
use crate::ports::config_port::ConfigPort;
use crate::ports::quote_sink::QuoteSink;
use crate::ports::report_source::ReportSource;

#[derive(Parser, Debug)]
#[command(
    name = "tosquote",
    about = "Convert thinkorswim strategy reports into OHLC data"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// INI config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Folder holding StrategyReports_<TICKER>_<MMDDYY>.csv exports
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,
    /// trace, debug, info, warn or error
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List strategy reports in the data folder
    List {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Convert reports into date,open,high,low,close CSV
    Convert {
        #[command(flatten)]
        common: CommonArgs,
        #[arg(long)]
        ticker: Option<String>,
        /// Write <TICKER>.csv files here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Fail on the first unpaired row
        #[arg(long)]
        strict: bool,
        #[arg(long)]
        date_format: Option<String>,
    },
    /// Print a report as a table
    Show {
        #[command(flatten)]
        common: CommonArgs,
        #[arg(long)]
        ticker: String,
    },
    /// Check that every date row pairs with exactly one price row
    Validate {
        #[command(flatten)]
        common: CommonArgs,
        #[arg(long)]
        ticker: Option<String>,
    },
    /// Compute indicators over a report, e.g. --indicator "EMA(50)"
    Indicators {
        #[command(flatten)]
        common: CommonArgs,
        #[arg(long)]
        ticker: String,
        #[arg(long = "indicator", required = true)]
        indicators: Vec<IndicatorType>,
        #[arg(long, default_value = "close")]
        field: PriceField,
    },
}

/// Effective settings: CLI flags over config file over defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_folder: PathBuf,
    pub options: ParseOptions,
    pub output_dir: Option<PathBuf>,
    pub date_format: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub reports: usize,
    pub anomalies: usize,
}

pub fn run(cli: Cli) -> ExitCode {
    match dispatch(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn dispatch(command: Command) -> Result<ExitCode, TosQuoteError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut code = ExitCode::SUCCESS;

    match command {
        Command::List { common } => {
            let settings = prepare(&common)?;
            let source = folder_source(&settings);
            run_list(&source, &settings, &mut out)?;
        }
        Command::Convert {
            common,
            ticker,
            output,
            strict,
            date_format,
        } => {
            let mut settings = prepare(&common)?;
            if output.is_some() {
                settings.output_dir = output;
            }
            if strict {
                settings.options.strict = true;
            }
            if let Some(format) = date_format {
                validate_date_format(&format).map_err(|reason| {
                    TosQuoteError::ConfigInvalid {
                        section: "output".into(),
                        key: "date_format".into(),
                        reason,
                    }
                })?;
                settings.date_format = format;
            }
            let source = folder_source(&settings);
            run_convert(&source, &settings, ticker.as_deref(), &mut out)?;
        }
        Command::Show { common, ticker } => {
            let settings = prepare(&common)?;
            let source = folder_source(&settings);
            run_show(&source, &settings, &ticker, &mut out)?;
        }
        Command::Validate { common, ticker } => {
            let settings = prepare(&common)?;
            let source = folder_source(&settings);
            let outcome = run_validate(&source, &settings, ticker.as_deref(), &mut out)?;
            if outcome.anomalies > 0 {
                code = ExitCode::from(4);
            }
        }
        Command::Indicators {
            common,
            ticker,
            indicators,
            field,
        } => {
            let settings = prepare(&common)?;
            let source = folder_source(&settings);
            run_indicators(&source, &settings, &ticker, &indicators, field, &mut out)?;
        }
    }

    out.flush()?;
    Ok(code)
}

fn folder_source(settings: &Settings) -> FolderReportSource {
    FolderReportSource::new(settings.data_folder.clone())
        .with_century_pivot(settings.options.century_pivot)
}

/// Load config, resolve settings and start logging.
fn prepare(common: &CommonArgs) -> Result<Settings, TosQuoteError> {
    let config = load_config(common.config.as_ref())?;
    let settings = resolve_settings(&config, common)?;
    logging::init(&settings.log_level);
    Ok(settings)
}

pub fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, TosQuoteError> {
    let Some(path) = path else {
        return Ok(FileConfigAdapter::empty());
    };
    FileConfigAdapter::from_file(path).map_err(|e| TosQuoteError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn resolve_settings(
    config: &dyn ConfigPort,
    common: &CommonArgs,
) -> Result<Settings, TosQuoteError> {
    validate_config(config)?;

    let data_folder = common
        .data_dir
        .clone()
        .or_else(|| config.get_string("data", "folder").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FOLDER));

    let century_pivot =
        config.get_int("parser", "century_pivot", DEFAULT_CENTURY_PIVOT as i64) as u32;
    let strict = config.get_bool("parser", "strict", false);

    let log_level = match &common.log_level {
        Some(level) => {
            let level = level.trim().to_lowercase();
            if !LOG_LEVELS.contains(&level.as_str()) {
                return Err(TosQuoteError::ConfigInvalid {
                    section: "logging".into(),
                    key: "level".into(),
                    reason: format!("unknown level '{level}'"),
                });
            }
            level
        }
        None => config
            .get_string("logging", "level")
            .map(|l| l.trim().to_lowercase())
            .unwrap_or_else(|| logging::DEFAULT_LEVEL.to_string()),
    };

    Ok(Settings {
        data_folder,
        options: ParseOptions {
            century_pivot,
            strict,
        },
        output_dir: config.get_string("output", "dir").map(PathBuf::from),
        date_format: config
            .get_string("output", "date_format")
            .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string()),
        log_level,
    })
}

/// All reports, or the one for `ticker`; an empty folder is an error.
pub fn select_reports(
    source: &dyn ReportSource,
    settings: &Settings,
    ticker: Option<&str>,
) -> Result<Vec<ReportFile>, TosQuoteError> {
    if let Some(ticker) = ticker {
        return Ok(vec![source.find_report(ticker)?]);
    }
    let files = source.list_reports()?;
    if files.is_empty() {
        return Err(TosQuoteError::NoReports {
            folder: settings.data_folder.display().to_string(),
        });
    }
    Ok(files)
}

pub fn load_series(
    source: &dyn ReportSource,
    settings: &Settings,
    file: &ReportFile,
) -> Result<QuoteSeries, TosQuoteError> {
    let report = source.read_report(file, &settings.options)?;
    Ok(QuoteSeries::new(file.ticker.clone(), report.bars))
}

fn load_nonempty_series(
    source: &dyn ReportSource,
    settings: &Settings,
    ticker: &str,
) -> Result<QuoteSeries, TosQuoteError> {
    let file = source.find_report(ticker)?;
    let series = load_series(source, settings, &file)?;
    if series.is_empty() {
        return Err(TosQuoteError::NoObservations {
            ticker: series.ticker,
        });
    }
    Ok(series)
}

pub fn run_list(
    source: &dyn ReportSource,
    settings: &Settings,
    out: &mut dyn Write,
) -> Result<(), TosQuoteError> {
    for file in select_reports(source, settings, None)? {
        writeln!(out, "{}\t{}", file.ticker, file.path.display())?;
    }
    Ok(())
}

pub fn run_convert(
    source: &dyn ReportSource,
    settings: &Settings,
    ticker: Option<&str>,
    out: &mut dyn Write,
) -> Result<(), TosQuoteError> {
    let files = select_reports(source, settings, ticker)?;
    let single = ticker.is_some();
    let store = settings
        .output_dir
        .as_ref()
        .map(|dir| CsvQuoteStore::new(dir.clone(), settings.date_format.clone()));

    for file in &files {
        let series = load_series(source, settings, file)?;
        if series.is_empty() {
            if single {
                return Err(TosQuoteError::NoObservations {
                    ticker: series.ticker,
                });
            }
            warn!("{}: no observations", series.ticker);
        }

        match &store {
            Some(store) => store.write_series(&series)?,
            None => {
                if !single {
                    writeln!(out, "# {}", series.ticker)?;
                }
                csv_adapter::write_bars(&mut *out, &series.bars, &settings.date_format)?;
            }
        }
    }
    Ok(())
}

pub fn run_show(
    source: &dyn ReportSource,
    settings: &Settings,
    ticker: &str,
    out: &mut dyn Write,
) -> Result<(), TosQuoteError> {
    let series = load_nonempty_series(source, settings, ticker)?;
    render_table(out, &series.ticker, &series.bars)?;
    Ok(())
}

pub fn run_validate(
    source: &dyn ReportSource,
    settings: &Settings,
    ticker: Option<&str>,
    out: &mut dyn Write,
) -> Result<ValidationOutcome, TosQuoteError> {
    let files = select_reports(source, settings, ticker)?;
    let options = ParseOptions {
        strict: false,
        ..settings.options
    };

    let mut outcome = ValidationOutcome {
        reports: 0,
        anomalies: 0,
    };
    for file in &files {
        let report = source.read_report(file, &options)?;
        let summary = ReportSummary::of(&file.ticker, &report);
        let status = if report.is_well_formed() { "ok" } else { "UNPAIRED" };
        writeln!(out, "{summary} [{status}]")?;
        for anomaly in &report.anomalies {
            writeln!(out, "  {}: {}", file.display_name(), anomaly)?;
        }
        outcome.reports += 1;
        outcome.anomalies += report.anomalies.len();
    }
    writeln!(
        out,
        "{} reports checked, {} anomalies",
        outcome.reports, outcome.anomalies
    )?;
    Ok(outcome)
}

pub fn run_indicators(
    source: &dyn ReportSource,
    settings: &Settings,
    ticker: &str,
    indicators: &[IndicatorType],
    field: PriceField,
    out: &mut dyn Write,
) -> Result<(), TosQuoteError> {
    let series = load_nonempty_series(source, settings, ticker)?;
    let computed: Vec<_> = indicators
        .iter()
        .map(|ind| ind.calculate(&series.bars, field))
        .collect();

    let mut wtr = csv::Writer::from_writer(&mut *out);
    let mut header = vec!["date".to_string(), field.to_string()];
    header.extend(indicators.iter().map(|ind| ind.to_string()));
    wtr.write_record(&header)?;

    for (i, bar) in series.bars.iter().enumerate() {
        let mut row = vec![
            csv_adapter::format_date(bar.date, &settings.date_format)?,
            bar.price(field).to_string(),
        ];
        for ind in &computed {
            let cell = match ind.values.get(i) {
                Some(point) if point.valid => format!("{:.4}", point.value),
                _ => String::new(),
            };
            row.push(cell);
        }
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}
