//! Domain error types.

use crate::domain::report_parser::PairingAnomaly;

/// Top-level error type for tosquote.
#[derive(Debug, thiserror::Error)]
pub enum TosQuoteError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data folder does not exist: {path}")]
    DataFolderMissing { path: String },

    #[error("no strategy reports found in {folder}")]
    NoReports { folder: String },

    #[error("no strategy report for ticker {ticker}")]
    UnknownTicker { ticker: String },

    #[error("{file}:{line}: {reason}")]
    ReportParse {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("{file}: {anomaly}")]
    Pairing {
        file: String,
        anomaly: PairingAnomaly,
    },

    #[error("no observations for {ticker}")]
    NoObservations { ticker: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TosQuoteError> for std::process::ExitCode {
    fn from(err: &TosQuoteError) -> Self {
        let code: u8 = match err {
            TosQuoteError::Io(_) | TosQuoteError::Csv(_) => 1,
            TosQuoteError::ConfigParse { .. }
            | TosQuoteError::ConfigMissing { .. }
            | TosQuoteError::ConfigInvalid { .. } => 2,
            TosQuoteError::DataFolderMissing { .. }
            | TosQuoteError::NoReports { .. }
            | TosQuoteError::UnknownTicker { .. } => 3,
            TosQuoteError::ReportParse { .. } | TosQuoteError::Pairing { .. } => 4,
            TosQuoteError::NoObservations { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
