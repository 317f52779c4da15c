//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod folder_report_adapter;
pub mod table_adapter;
