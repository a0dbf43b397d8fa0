//! Application layer for driver-checker

pub mod config;
pub mod report;

pub use config::Config;
pub use report::{parse_reference_date, ComplianceReport};
