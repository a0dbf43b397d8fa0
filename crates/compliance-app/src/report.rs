//! Compliance report use case: load a roster, evaluate it, write results

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{info, warn};

use compliance_domain::model::EvaluationResult;
use compliance_domain::service::{
    check_drivers, generate_compliance_report, ComplianceSummary, DriverCheckResult,
};
use compliance_infra::{export_to_excel, load_drivers, results_file_name, save_results_csv, DriverTable};
use compliance_types::{Error, Result};

/// Parse a `--as-of` style reference date (`YYYY-MM-DD`)
pub fn parse_reference_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidReferenceDate(s.to_string()))
}

/// One evaluated roster. Rebuilt from scratch for every input file.
#[derive(Debug, Clone)]
pub struct ComplianceReport {
    pub reference_date: NaiveDate,
    pub table: DriverTable,
    pub results: Vec<DriverCheckResult>,
    pub summary: ComplianceSummary,
}

impl ComplianceReport {
    pub fn from_table(table: DriverTable, reference_date: NaiveDate) -> Self {
        let results = check_drivers(&table.records(), reference_date);
        let summary = ComplianceSummary::from_results(&results);
        info!(
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            %reference_date,
            "evaluated driver roster"
        );
        if summary.failed > 0 {
            warn!("{} of {} drivers failed compliance", summary.failed, summary.total);
        }
        Self {
            reference_date,
            table,
            results,
            summary,
        }
    }

    /// Load and evaluate a roster CSV
    pub fn load(path: &Path, reference_date: NaiveDate) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }
        let table = load_drivers(path)?;
        Ok(Self::from_table(table, reference_date))
    }

    pub fn evaluations(&self) -> Vec<EvaluationResult> {
        self.results.iter().map(|r| r.evaluation.clone()).collect()
    }

    /// `<dir>/driver_results_<reference date>.csv`
    pub fn default_results_path(&self, dir: &Path) -> PathBuf {
        dir.join(results_file_name(self.reference_date))
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        save_results_csv(path, &self.table, &self.evaluations())?;
        Ok(())
    }

    pub fn write_excel(&self, path: &Path) -> Result<()> {
        export_to_excel(
            path,
            &self.table,
            &self.evaluations(),
            &self.summary,
            self.reference_date,
        )?;
        Ok(())
    }

    pub fn text_report(&self) -> String {
        generate_compliance_report(&self.results, &self.summary, self.reference_date)
    }
}
