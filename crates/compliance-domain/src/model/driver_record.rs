use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the driver roster.
///
/// Date fields are `None` when the source cell was empty or unparsable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverRecord {
    pub driver_id: String,                        // DriverId
    pub driver_name: String,                      // driverName
    pub date_of_birth: Option<NaiveDate>,         // DateofBirth
    pub dl_expiration_date: Option<NaiveDate>,    // DLExpirationDate
    pub dot_expiration_date: Option<NaiveDate>,   // DOTExpirationDate
    pub last_drug_test: Option<NaiveDate>,        // LastDrugTest
    pub background_check: Option<NaiveDate>,      // BackgroundCheck
    pub puc_fingerprints: Option<NaiveDate>,      // PUCFingerPrints
    pub mvr_last_ran: Option<NaiveDate>,          // MVRLastRan
    pub last_trained: Option<NaiveDate>,          // LastTrained
}

impl DriverRecord {
    /// Record with the given id and name and every date absent.
    pub fn new(driver_id: impl Into<String>, driver_name: impl Into<String>) -> Self {
        Self {
            driver_id: driver_id.into(),
            driver_name: driver_name.into(),
            date_of_birth: None,
            dl_expiration_date: None,
            dot_expiration_date: None,
            last_drug_test: None,
            background_check: None,
            puc_fingerprints: None,
            mvr_last_ran: None,
            last_trained: None,
        }
    }
}
