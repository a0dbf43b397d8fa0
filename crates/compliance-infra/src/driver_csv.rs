//! CSV loader for the driver roster
//!
//! Accepts UTF-8 (with or without BOM). Files that are not valid UTF-8 are
//! decoded as Windows-1252, which is what spreadsheet exports usually produce.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use encoding_rs::{UTF_8, WINDOWS_1252};
use tracing::{debug, warn};

use compliance_domain::model::DriverRecord;
use compliance_types::LoaderError;

pub const COL_DRIVER_ID: &str = "DriverId";
pub const COL_DRIVER_NAME: &str = "driverName";
pub const COL_DATE_OF_BIRTH: &str = "DateofBirth";
pub const COL_DL_EXPIRATION: &str = "DLExpirationDate";
pub const COL_DOT_EXPIRATION: &str = "DOTExpirationDate";
pub const COL_LAST_DRUG_TEST: &str = "LastDrugTest";
pub const COL_BACKGROUND_CHECK: &str = "BackgroundCheck";
pub const COL_PUC_FINGERPRINTS: &str = "PUCFingerPrints";
pub const COL_MVR_LAST_RAN: &str = "MVRLastRan";
pub const COL_LAST_TRAINED: &str = "LastTrained";

pub const REQUIRED_COLUMNS: [&str; 10] = [
    COL_DRIVER_ID,
    COL_DRIVER_NAME,
    COL_DATE_OF_BIRTH,
    COL_DL_EXPIRATION,
    COL_DOT_EXPIRATION,
    COL_LAST_DRUG_TEST,
    COL_BACKGROUND_CHECK,
    COL_PUC_FINGERPRINTS,
    COL_MVR_LAST_RAN,
    COL_LAST_TRAINED,
];

// (format, separator, position of the year part)
const DATE_FORMATS: [(&str, char, usize); 2] = [("%Y-%m-%d", '-', 0), ("%m/%d/%Y", '/', 2)];

/// One input row: the original cells plus the parsed record
#[derive(Debug, Clone)]
pub struct DriverRow {
    /// Cells as read, padded or cut to the header width
    pub fields: Vec<String>,
    pub record: DriverRecord,
}

/// The uploaded roster, kept verbatim so results can be written back alongside it
#[derive(Debug, Clone, Default)]
pub struct DriverTable {
    pub headers: Vec<String>,
    pub rows: Vec<DriverRow>,
}

impl DriverTable {
    pub fn records(&self) -> Vec<DriverRecord> {
        self.rows.iter().map(|row| row.record.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Positions of the required columns within the header row, keyed by `COL_*` name
struct ColumnIndex(HashMap<&'static str, usize>);

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, LoaderError> {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        let mut positions = HashMap::with_capacity(REQUIRED_COLUMNS.len());
        for name in REQUIRED_COLUMNS {
            let wanted = normalize_header(name);
            let position = normalized
                .iter()
                .position(|h| *h == wanted)
                .ok_or_else(|| LoaderError::MissingColumn(name.to_string()))?;
            positions.insert(name, position);
        }
        Ok(Self(positions))
    }

    fn get<'r>(&self, record: &'r csv::StringRecord, column: &str) -> &'r str {
        self.0
            .get(column)
            .and_then(|&i| record.get(i))
            .unwrap_or("")
            .trim()
    }
}

fn normalize_header(h: &str) -> String {
    h.trim_start_matches('\u{feff}').trim().to_ascii_lowercase()
}

/// Load the driver roster from a CSV file
pub fn load_drivers<P: AsRef<Path>>(path: P) -> Result<DriverTable, LoaderError> {
    let path = path.as_ref();
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), "read driver CSV");

    let (decoded, had_errors) = UTF_8.decode_with_bom_removal(&bytes);
    let text = if had_errors {
        warn!("input is not valid UTF-8, decoding as Windows-1252");
        WINDOWS_1252.decode(&bytes).0
    } else {
        decoded
    };

    load_drivers_from_reader(text.as_bytes())
}

/// Load the driver roster from any CSV source. Column order is free; headers
/// are matched by name, ignoring case and surrounding whitespace.
pub fn load_drivers_from_reader<R: Read>(input: R) -> Result<DriverTable, LoaderError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(LoaderError::Empty);
    }
    let columns = ColumnIndex::from_headers(&headers)?;
    let width = headers.len();

    let mut rows = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        let row_num = row_idx + 2; // header is row 1
        let driver = parse_record(&record, &columns, row_num)?;

        let mut fields: Vec<String> = record.iter().map(str::to_string).collect();
        if fields.iter().skip(width).any(|f| !f.trim().is_empty()) {
            warn!(row = row_num, "cells beyond the header width dropped");
        }
        fields.resize(width, String::new());
        rows.push(DriverRow {
            fields,
            record: driver,
        });
    }

    debug!(rows = rows.len(), "parsed driver roster");
    Ok(DriverTable {
        headers: headers.iter().map(|h| h.trim_start_matches('\u{feff}').to_string()).collect(),
        rows,
    })
}

fn parse_record(
    record: &csv::StringRecord,
    columns: &ColumnIndex,
    row_num: usize,
) -> Result<DriverRecord, LoaderError> {
    let driver_id = columns.get(record, COL_DRIVER_ID);
    if driver_id.is_empty() {
        return Err(LoaderError::MissingDriverId { row: row_num });
    }

    let date = |column: &'static str| {
        let value = columns.get(record, column);
        let parsed = parse_date(value);
        if parsed.is_none() && !value.is_empty() {
            warn!(
                row = row_num,
                column,
                value,
                "unparsable date treated as missing"
            );
        }
        parsed
    };

    Ok(DriverRecord {
        driver_id: driver_id.to_string(),
        driver_name: columns.get(record, COL_DRIVER_NAME).to_string(),
        date_of_birth: date(COL_DATE_OF_BIRTH),
        dl_expiration_date: date(COL_DL_EXPIRATION),
        dot_expiration_date: date(COL_DOT_EXPIRATION),
        last_drug_test: date(COL_LAST_DRUG_TEST),
        background_check: date(COL_BACKGROUND_CHECK),
        puc_fingerprints: date(COL_PUC_FINGERPRINTS),
        mvr_last_ran: date(COL_MVR_LAST_RAN),
        last_trained: date(COL_LAST_TRAINED),
    })
}

/// Parse `YYYY-MM-DD` or `MM/DD/YYYY`; anything else is `None`.
///
/// The year must be exactly four digits. chrono's `%Y` alone would read
/// `01/15/24` as the year 24.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS.iter().find_map(|&(fmt, sep, year_pos)| {
        let year = s.split(sep).nth(year_pos)?;
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        NaiveDate::parse_from_str(s, fmt).ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use compliance_domain::model::ComplianceRule;
    use std::io::Write;

    const HEADER: &str = "DriverId,driverName,DateofBirth,DLExpirationDate,DOTExpirationDate,LastDrugTest,BackgroundCheck,PUCFingerPrints,MVRLastRan,LastTrained";

    #[test]
    fn test_parse_date_iso() {
        assert_eq!(parse_date("2024-01-15"), NaiveDate::from_ymd_opt(2024, 1, 15));
    }

    #[test]
    fn test_parse_date_us() {
        assert_eq!(parse_date("01/15/2024"), NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(parse_date(" 1/5/2024 "), NaiveDate::from_ymd_opt(2024, 1, 5));
    }

    #[test]
    fn test_parse_date_rejects_other_formats() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2024/01/15"), None);
        assert_eq!(parse_date("15.01.2024"), None);
        assert_eq!(parse_date("02/30/2024"), None);
        assert_eq!(parse_date("n/a"), None);
        assert_eq!(parse_date("01/15/24"), None);
        assert_eq!(parse_date("24-01-15"), None);
        assert_eq!(parse_date("1/1/05"), None);
        assert_eq!(parse_date("+2024-01-15"), None);
        assert_eq!(parse_date("02024-01-15"), None);
    }

    #[test]
    fn test_two_digit_year_birth_date_fails_age_rule() {
        let csv = format!("{}\n8,Young,1/1/05,,,,,,,\n", HEADER);
        let table = load_drivers_from_reader(csv.as_bytes()).unwrap();
        let record = &table.rows[0].record;
        assert_eq!(record.date_of_birth, None);
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert!(!ComplianceRule::MinimumAge.is_satisfied(record, today));
    }

    #[test]
    fn test_trailing_comma_row_cut_to_header_width() {
        let csv = format!("{}\n1,Ann,1980-01-01,,,,,,,2024-06-01,\n", HEADER);
        let table = load_drivers_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.rows[0].fields.len(), table.headers.len());
        assert_eq!(table.rows[0].fields[9], "2024-06-01");
    }

    #[test]
    fn test_load_from_reader() {
        let csv = format!(
            "{}\n7,Ada Lovelace,1990-03-01,12/31/2030,2030-01-01,2024-05-01,2024-05-01,2030-01-01,2024-05-01,garbage\n",
            HEADER
        );
        let table = load_drivers_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.headers.len(), 10);
        let record = &table.rows[0].record;
        assert_eq!(record.driver_id, "7");
        assert_eq!(record.driver_name, "Ada Lovelace");
        assert_eq!(record.dl_expiration_date, NaiveDate::from_ymd_opt(2030, 12, 31));
        assert_eq!(record.last_trained, None);
        assert_eq!(table.rows[0].fields[9], "garbage");
    }

    #[test]
    fn test_columns_matched_by_name() {
        let csv = "lasttrained,Extra,DRIVERID,driverName,DateofBirth,DLExpirationDate,DOTExpirationDate,LastDrugTest,BackgroundCheck,PUCFingerPrints,MVRLastRan\n\
                   2024-01-01,x,42,Bob,1980-01-01,,,,,,\n";
        let table = load_drivers_from_reader(csv.as_bytes()).unwrap();
        let record = &table.rows[0].record;
        assert_eq!(record.driver_id, "42");
        assert_eq!(record.last_trained, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(record.date_of_birth, NaiveDate::from_ymd_opt(1980, 1, 1));
        assert_eq!(table.headers[1], "Extra");
    }

    #[test]
    fn test_missing_column() {
        let csv = "DriverId,driverName,DateofBirth\n1,a,2000-01-01\n";
        let err = load_drivers_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn(ref c) if c == "DLExpirationDate"));
    }

    #[test]
    fn test_missing_driver_id_reports_row() {
        let csv = format!("{}\n1,a,,,,,,,,\n,b,,,,,,,,\n", HEADER);
        let err = load_drivers_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoaderError::MissingDriverId { row: 3 }));
    }

    #[test]
    fn test_empty_input() {
        let err = load_drivers_from_reader("".as_bytes()).unwrap_err();
        assert!(matches!(err, LoaderError::Empty));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let csv = format!("{}\n5,Short,1990-01-01\n", HEADER);
        let table = load_drivers_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.rows[0].fields.len(), 10);
        assert_eq!(table.rows[0].record.mvr_last_ran, None);
    }

    #[test]
    fn test_load_file_with_bom() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "\u{feff}{}\n3,Cara,1985-07-04,,,,,,,\n", HEADER).unwrap();
        let table = load_drivers(file.path()).unwrap();
        assert_eq!(table.headers[0], "DriverId");
        assert_eq!(table.rows[0].record.driver_id, "3");
    }

    #[test]
    fn test_load_file_windows_1252() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let mut bytes = format!("{}\n4,Jos", HEADER).into_bytes();
        bytes.push(0xE9); // é in Windows-1252
        bytes.extend_from_slice(b",1985-07-04,,,,,,,\n");
        file.write_all(&bytes).unwrap();
        let table = load_drivers(file.path()).unwrap();
        assert_eq!(table.rows[0].record.driver_name, "Jos\u{e9}");
    }
}
