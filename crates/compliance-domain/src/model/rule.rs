//! The fixed compliance rule set

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::DriverRecord;

/// Average year length used for age and the one-year window
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Six months, as half an average year
pub const SIX_MONTHS_DAYS: f64 = DAYS_PER_YEAR / 2.0;

/// Drivers must be strictly older than this
pub const MINIMUM_AGE_YEARS: f64 = 21.0;

/// A single compliance predicate. Variants are declared in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceRule {
    MinimumAge,
    DriversLicenseValid,
    DotValid,
    DrugTestRecent,
    BackgroundCheckRecent,
    PucFingerprintsValid,
    MvrRecent,
    TrainingRecent,
}

impl ComplianceRule {
    pub const ALL: [ComplianceRule; 8] = [
        ComplianceRule::MinimumAge,
        ComplianceRule::DriversLicenseValid,
        ComplianceRule::DotValid,
        ComplianceRule::DrugTestRecent,
        ComplianceRule::BackgroundCheckRecent,
        ComplianceRule::PucFingerprintsValid,
        ComplianceRule::MvrRecent,
        ComplianceRule::TrainingRecent,
    ];

    /// Failure message appended to a driver's reasons
    pub fn message(&self) -> &'static str {
        match self {
            ComplianceRule::MinimumAge => "Age below 21;",
            ComplianceRule::DriversLicenseValid => "Driver's License expired;",
            ComplianceRule::DotValid => "DOT expired;",
            ComplianceRule::DrugTestRecent => "Drug test not within last year;",
            ComplianceRule::BackgroundCheckRecent => "Background check not within last 6 months;",
            ComplianceRule::PucFingerprintsValid => "PUC Fingerprints expired;",
            ComplianceRule::MvrRecent => "MVR not run within last 6 months;",
            ComplianceRule::TrainingRecent => "Training not done within last 6 months;",
        }
    }

    /// Short label for report tables
    pub fn label(&self) -> &'static str {
        match self {
            ComplianceRule::MinimumAge => "Age 21+",
            ComplianceRule::DriversLicenseValid => "Driver's License",
            ComplianceRule::DotValid => "DOT",
            ComplianceRule::DrugTestRecent => "Drug test (1y)",
            ComplianceRule::BackgroundCheckRecent => "Background check (6m)",
            ComplianceRule::PucFingerprintsValid => "PUC Fingerprints",
            ComplianceRule::MvrRecent => "MVR (6m)",
            ComplianceRule::TrainingRecent => "Training (6m)",
        }
    }

    /// Whether `record` satisfies this rule as of `today`. Absent dates fail.
    pub fn is_satisfied(&self, record: &DriverRecord, today: NaiveDate) -> bool {
        match self {
            ComplianceRule::MinimumAge => record
                .date_of_birth
                .map(|dob| elapsed_days(dob, today) / DAYS_PER_YEAR > MINIMUM_AGE_YEARS)
                .unwrap_or(false),
            ComplianceRule::DriversLicenseValid => not_expired(record.dl_expiration_date, today),
            ComplianceRule::DotValid => not_expired(record.dot_expiration_date, today),
            ComplianceRule::DrugTestRecent => within(record.last_drug_test, today, DAYS_PER_YEAR),
            ComplianceRule::BackgroundCheckRecent => {
                within(record.background_check, today, SIX_MONTHS_DAYS)
            }
            ComplianceRule::PucFingerprintsValid => not_expired(record.puc_fingerprints, today),
            ComplianceRule::MvrRecent => within(record.mvr_last_ran, today, SIX_MONTHS_DAYS),
            ComplianceRule::TrainingRecent => within(record.last_trained, today, SIX_MONTHS_DAYS),
        }
    }
}

impl std::fmt::Display for ComplianceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

fn elapsed_days(from: NaiveDate, today: NaiveDate) -> f64 {
    (today - from).num_days() as f64
}

// date > today
fn not_expired(date: Option<NaiveDate>, today: NaiveDate) -> bool {
    date.map(|d| d > today).unwrap_or(false)
}

// date > today - window_days, i.e. fewer than window_days have elapsed
fn within(date: Option<NaiveDate>, today: NaiveDate, window_days: f64) -> bool {
    date.map(|d| elapsed_days(d, today) < window_days).unwrap_or(false)
}
