//! Domain model types

pub mod driver_record;
pub mod evaluation;
pub mod rule;

pub use driver_record::DriverRecord;
pub use evaluation::{EvaluationResult, Verdict};
pub use rule::ComplianceRule;
