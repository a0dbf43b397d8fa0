//! Annotated results CSV: the input table plus `Is_Pass` and `Result` columns

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use compliance_domain::model::EvaluationResult;
use compliance_types::ExportError;

use crate::driver_csv::DriverTable;

pub const COL_IS_PASS: &str = "Is_Pass";
pub const COL_RESULT: &str = "Result";

/// Default download name, e.g. `driver_results_2024-06-15.csv`
pub fn results_file_name(today: NaiveDate) -> String {
    format!("driver_results_{}.csv", today.format("%Y-%m-%d"))
}

/// Write the annotated table. `results` must be in the same order as `table.rows`.
pub fn write_results_csv<W: Write>(
    writer: W,
    table: &DriverTable,
    results: &[EvaluationResult],
) -> Result<(), ExportError> {
    // rows are cut to the header width on load, so every record has the same length
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);

    let mut header: Vec<&str> = table.headers.iter().map(String::as_str).collect();
    header.push(COL_IS_PASS);
    header.push(COL_RESULT);
    csv_writer.write_record(&header)?;

    for (row, result) in table.rows.iter().zip(results) {
        let result_text = result.result_text();
        let mut fields: Vec<&str> = row.fields.iter().map(String::as_str).collect();
        fields.push(result.verdict().as_str());
        fields.push(&result_text);
        csv_writer.write_record(&fields)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write the annotated table to `path`
pub fn save_results_csv(
    path: &Path,
    table: &DriverTable,
    results: &[EvaluationResult],
) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    write_results_csv(file, table, results)?;
    info!(path = %path.display(), rows = table.len(), "wrote results CSV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver_csv::load_drivers_from_reader;
    use compliance_domain::model::ComplianceRule;

    fn sample_table() -> DriverTable {
        let csv = "DriverId,driverName,DateofBirth,DLExpirationDate,DOTExpirationDate,LastDrugTest,BackgroundCheck,PUCFingerPrints,MVRLastRan,LastTrained,Depot\n\
                   1,Ann,1980-01-01,2030-01-01,2030-01-01,2024-06-01,2024-06-01,2030-01-01,2024-06-01,2024-06-01,North\n\
                   2,\"Lee, Jr\",01/02/1990,,,,,,,,South\n";
        load_drivers_from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_results_file_name() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(results_file_name(today), "driver_results_2024-06-15.csv");
    }

    #[test]
    fn test_write_results_appends_columns() {
        let table = sample_table();
        let results = vec![
            EvaluationResult::from_failures(vec![]),
            EvaluationResult::from_failures(vec![
                ComplianceRule::DriversLicenseValid,
                ComplianceRule::DotValid,
            ]),
        ];
        let mut out = Vec::new();
        write_results_csv(&mut out, &table, &results).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("LastTrained,Depot,Is_Pass,Result"));
        assert!(lines[1].starts_with("1,Ann,1980-01-01,"));
        assert!(lines[1].ends_with(",North,Pass,Pass"));
        // original cell text is kept as-is, including the US date format
        assert!(lines[2].starts_with("2,\"Lee, Jr\",01/02/1990,"));
        assert!(lines[2].ends_with(",South,Fail,Driver's License expired; DOT expired;"));
    }

    #[test]
    fn test_trailing_comma_keeps_result_columns_aligned() {
        let csv = "DriverId,driverName,DateofBirth,DLExpirationDate,DOTExpirationDate,LastDrugTest,BackgroundCheck,PUCFingerPrints,MVRLastRan,LastTrained\n\
                   1,Ann,1980-01-01,2030-01-01,2030-01-01,2024-06-01,2024-06-01,2030-01-01,2024-06-01,2024-06-01,\n";
        let table = load_drivers_from_reader(csv.as_bytes()).unwrap();
        let results = vec![EvaluationResult::from_failures(vec![])];
        let mut out = Vec::new();
        write_results_csv(&mut out, &table, &results).unwrap();

        let mut reader = csv::ReaderBuilder::new().from_reader(out.as_slice());
        let header = reader.headers().unwrap().clone();
        assert_eq!(&header[10], "Is_Pass");
        assert_eq!(&header[11], "Result");
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(row.len(), header.len());
        assert_eq!(&row[9], "2024-06-01");
        assert_eq!(&row[10], "Pass");
        assert_eq!(&row[11], "Pass");
    }

    #[test]
    fn test_save_results_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("out.csv");
        let table = sample_table();
        let results = vec![
            EvaluationResult::from_failures(vec![]),
            EvaluationResult::from_failures(vec![ComplianceRule::MinimumAge]),
        ];
        save_results_csv(&path, &table, &results).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Age below 21;"));
    }
}
