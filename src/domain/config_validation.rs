//! Configuration validation.
//!
//! Validates the optional config file before any report is read.

use crate::domain::error::TosQuoteError;
use crate::ports::config_port::ConfigPort;
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use std::fmt::Write as _;

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), TosQuoteError> {
    validate_parser_config(config)?;
    validate_output_config(config)?;
    validate_logging_config(config)?;
    Ok(())
}

pub fn validate_parser_config(config: &dyn ConfigPort) -> Result<(), TosQuoteError> {
    let Some(raw) = config.get_string("parser", "century_pivot") else {
        return Ok(());
    };
    match raw.trim().parse::<i64>() {
        Ok(pivot) if (0..=99).contains(&pivot) => Ok(()),
        _ => Err(TosQuoteError::ConfigInvalid {
            section: "parser".to_string(),
            key: "century_pivot".to_string(),
            reason: "century_pivot must be an integer between 0 and 99".to_string(),
        }),
    }
}

pub fn validate_output_config(config: &dyn ConfigPort) -> Result<(), TosQuoteError> {
    let Some(format) = config.get_string("output", "date_format") else {
        return Ok(());
    };
    validate_date_format(&format).map_err(|reason| TosQuoteError::ConfigInvalid {
        section: "output".to_string(),
        key: "date_format".to_string(),
        reason,
    })
}

pub fn validate_logging_config(config: &dyn ConfigPort) -> Result<(), TosQuoteError> {
    let Some(level) = config.get_string("logging", "level") else {
        return Ok(());
    };
    if LOG_LEVELS.contains(&level.trim().to_lowercase().as_str()) {
        return Ok(());
    }
    Err(TosQuoteError::ConfigInvalid {
        section: "logging".to_string(),
        key: "level".to_string(),
        reason: format!("level must be one of {}", LOG_LEVELS.join(", ")),
    })
}

/// A date format must be a non-empty strftime pattern that renders a bare date.
///
/// Time, zone and timestamp specifiers are rejected since observations carry
/// no time of day.
pub fn validate_date_format(format: &str) -> Result<(), String> {
    if format.trim().is_empty() {
        return Err("date_format must not be empty".to_string());
    }
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(format!("invalid strftime pattern '{format}'"));
    }
    let mut rendered = String::new();
    if write!(rendered, "{}", NaiveDate::default().format(format)).is_err() {
        return Err(format!("'{format}' needs more than a date to render"));
    }
    Ok(())
}
