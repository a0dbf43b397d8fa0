//! Excel export: summary sheet with a pass/fail chart, and the annotated results

use std::path::Path;

use chrono::NaiveDate;
use rust_xlsxwriter::{Chart, ChartType, Color, Format, Workbook, Worksheet, XlsxError};
use tracing::info;

use compliance_domain::model::EvaluationResult;
use compliance_domain::service::ComplianceSummary;
use compliance_types::ExportError;

use crate::driver_csv::DriverTable;
use crate::results_csv::{COL_IS_PASS, COL_RESULT};

const SUMMARY_SHEET: &str = "Summary";
const RESULTS_SHEET: &str = "Results";

// Rows of the verdict/count block the chart reads from
const DISTRIBUTION_FIRST_ROW: u32 = 9;

fn xlsx_err(e: XlsxError) -> ExportError {
    ExportError::Excel(e.to_string())
}

/// Export the evaluated roster to an Excel workbook
pub fn export_to_excel(
    output_path: &Path,
    table: &DriverTable,
    results: &[EvaluationResult],
    summary: &ComplianceSummary,
    today: NaiveDate,
) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();

    let summary_sheet = workbook.add_worksheet();
    write_summary_sheet(summary_sheet, summary, today)?;

    let results_sheet = workbook.add_worksheet();
    write_results_sheet(results_sheet, table, results)?;

    workbook.save(output_path).map_err(xlsx_err)?;
    info!(path = %output_path.display(), "wrote Excel workbook");
    Ok(())
}

fn write_summary_sheet(
    sheet: &mut Worksheet,
    summary: &ComplianceSummary,
    today: NaiveDate,
) -> Result<(), ExportError> {
    sheet.set_name(SUMMARY_SHEET).map_err(xlsx_err)?;

    let header_format = Format::new().set_bold();

    sheet
        .write_string_with_format(0, 0, "Driver Compliance Report", &header_format)
        .map_err(xlsx_err)?;

    sheet.write_string(2, 0, "Reference date:").map_err(xlsx_err)?;
    sheet
        .write_string(2, 1, today.format("%Y-%m-%d").to_string())
        .map_err(xlsx_err)?;

    sheet.write_string(3, 0, "Total drivers:").map_err(xlsx_err)?;
    sheet.write_number(3, 1, summary.total as f64).map_err(xlsx_err)?;

    sheet.write_string(4, 0, "Pass:").map_err(xlsx_err)?;
    sheet.write_number(4, 1, summary.passed as f64).map_err(xlsx_err)?;

    sheet.write_string(5, 0, "Fail:").map_err(xlsx_err)?;
    sheet.write_number(5, 1, summary.failed as f64).map_err(xlsx_err)?;

    sheet.write_string(6, 0, "Pass rate (%):").map_err(xlsx_err)?;
    sheet.write_number(6, 1, summary.pass_rate()).map_err(xlsx_err)?;

    // Verdict distribution, the chart's data source
    sheet
        .write_string_with_format(DISTRIBUTION_FIRST_ROW - 1, 0, "Is_Pass", &header_format)
        .map_err(xlsx_err)?;
    sheet
        .write_string_with_format(DISTRIBUTION_FIRST_ROW - 1, 1, "Count", &header_format)
        .map_err(xlsx_err)?;
    let mut row = DISTRIBUTION_FIRST_ROW;
    for (verdict, count) in summary.distribution() {
        sheet.write_string(row, 0, verdict.as_str()).map_err(xlsx_err)?;
        sheet.write_number(row, 1, count as f64).map_err(xlsx_err)?;
        row += 1;
    }
    let distribution_last_row = row - 1;

    // Failures by rule
    row += 1;
    sheet
        .write_string_with_format(row, 0, "Rule", &header_format)
        .map_err(xlsx_err)?;
    sheet
        .write_string_with_format(row, 1, "Failures", &header_format)
        .map_err(xlsx_err)?;
    for count in &summary.by_rule {
        row += 1;
        sheet.write_string(row, 0, count.rule.label()).map_err(xlsx_err)?;
        sheet.write_number(row, 1, count.failed as f64).map_err(xlsx_err)?;
    }

    let mut chart = Chart::new(ChartType::Column);
    chart
        .add_series()
        .set_name("Drivers")
        .set_categories((
            SUMMARY_SHEET,
            DISTRIBUTION_FIRST_ROW,
            0,
            distribution_last_row,
            0,
        ))
        .set_values((
            SUMMARY_SHEET,
            DISTRIBUTION_FIRST_ROW,
            1,
            distribution_last_row,
            1,
        ));
    chart.title().set_name("Driver Pass/Fail Distribution");
    chart.legend().set_hidden();
    sheet.insert_chart(1, 3, &chart).map_err(xlsx_err)?;

    sheet.set_column_width(0, 24).map_err(xlsx_err)?;
    sheet.set_column_width(1, 12).map_err(xlsx_err)?;

    Ok(())
}

fn write_results_sheet(
    sheet: &mut Worksheet,
    table: &DriverTable,
    results: &[EvaluationResult],
) -> Result<(), ExportError> {
    sheet.set_name(RESULTS_SHEET).map_err(xlsx_err)?;

    let header_format = Format::new().set_bold();
    let fail_format = Format::new().set_font_color(Color::Red);

    let is_pass_col = table.headers.len() as u16;
    let result_col = is_pass_col + 1;

    for (col, header) in table.headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, header, &header_format)
            .map_err(xlsx_err)?;
    }
    sheet
        .write_string_with_format(0, is_pass_col, COL_IS_PASS, &header_format)
        .map_err(xlsx_err)?;
    sheet
        .write_string_with_format(0, result_col, COL_RESULT, &header_format)
        .map_err(xlsx_err)?;

    for (row_idx, (row, result)) in table.rows.iter().zip(results).enumerate() {
        let xl_row = (row_idx + 1) as u32;
        for (col, value) in row.fields.iter().enumerate().take(table.headers.len()) {
            sheet.write_string(xl_row, col as u16, value).map_err(xlsx_err)?;
        }
        if result.is_pass {
            sheet
                .write_string(xl_row, is_pass_col, result.verdict().as_str())
                .map_err(xlsx_err)?;
            sheet
                .write_string(xl_row, result_col, result.result_text())
                .map_err(xlsx_err)?;
        } else {
            sheet
                .write_string_with_format(xl_row, is_pass_col, result.verdict().as_str(), &fail_format)
                .map_err(xlsx_err)?;
            sheet
                .write_string_with_format(xl_row, result_col, result.result_text(), &fail_format)
                .map_err(xlsx_err)?;
        }
    }

    sheet.set_column_width(result_col, 60).map_err(xlsx_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver_csv::load_drivers_from_reader;
    use compliance_domain::service::evaluate_all;

    #[test]
    fn test_export_writes_workbook() {
        let csv = "DriverId,driverName,DateofBirth,DLExpirationDate,DOTExpirationDate,LastDrugTest,BackgroundCheck,PUCFingerPrints,MVRLastRan,LastTrained\n\
                   1,Ann,1980-01-01,2030-01-01,2030-01-01,2024-06-01,2024-06-01,2030-01-01,2024-06-01,2024-06-01\n\
                   2,Ben,2010-01-01,2030-01-01,2030-01-01,2024-06-01,2024-06-01,2030-01-01,2024-06-01,2024-06-01\n";
        let table = load_drivers_from_reader(csv.as_bytes()).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let results = evaluate_all(&table.records(), today);
        let summary = ComplianceSummary::from_evaluations(&results);
        assert_eq!(summary.passed, 1);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        export_to_excel(&path, &table, &results, &summary, today).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        // xlsx is a zip archive
        assert!(bytes.starts_with(b"PK"));
    }
}
