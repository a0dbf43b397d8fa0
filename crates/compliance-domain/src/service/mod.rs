//! Domain services

pub mod compliance_checker;

pub use compliance_checker::{
    check_drivers, evaluate, evaluate_all, generate_compliance_report, ComplianceSummary,
    DriverCheckResult, RuleFailureCount,
};
