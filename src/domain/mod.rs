//! Core domain types and logic.

pub mod ohlc;
pub mod report_row;
pub mod report_parser;
pub mod report_name;
pub mod summary;
pub mod indicator;
pub mod config_validation;
pub mod error;
