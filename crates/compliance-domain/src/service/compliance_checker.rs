//! Compliance checking service

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{ComplianceRule, DriverRecord, EvaluationResult, Verdict};

/// Evaluate one driver against every rule as of `today`.
///
/// All rules are checked even after the first failure so the full set of
/// reasons is collected.
pub fn evaluate(record: &DriverRecord, today: NaiveDate) -> EvaluationResult {
    let failed: Vec<ComplianceRule> = ComplianceRule::ALL
        .into_iter()
        .filter(|rule| !rule.is_satisfied(record, today))
        .collect();
    EvaluationResult::from_failures(failed)
}

/// Evaluate every record, preserving input order.
pub fn evaluate_all(records: &[DriverRecord], today: NaiveDate) -> Vec<EvaluationResult> {
    records.iter().map(|record| evaluate(record, today)).collect()
}

/// Result of the compliance check for a single driver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverCheckResult {
    pub record: DriverRecord,
    pub evaluation: EvaluationResult,
}

impl DriverCheckResult {
    pub fn verdict(&self) -> Verdict {
        self.evaluation.verdict()
    }
}

pub fn check_drivers(records: &[DriverRecord], today: NaiveDate) -> Vec<DriverCheckResult> {
    debug!(count = records.len(), %today, "evaluating drivers");
    records
        .iter()
        .map(|record| DriverCheckResult {
            record: record.clone(),
            evaluation: evaluate(record, today),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFailureCount {
    pub rule: ComplianceRule,
    pub message: String,
    pub failed: usize,
}

/// Aggregate counts over a set of evaluations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// One entry per rule, in rule order
    pub by_rule: Vec<RuleFailureCount>,
}

impl ComplianceSummary {
    pub fn from_evaluations<'a, I>(evaluations: I) -> Self
    where
        I: IntoIterator<Item = &'a EvaluationResult>,
    {
        let mut total = 0;
        let mut passed = 0;
        let mut per_rule = [0usize; ComplianceRule::ALL.len()];
        for evaluation in evaluations {
            total += 1;
            if evaluation.is_pass {
                passed += 1;
            }
            for rule in &evaluation.failed_rules {
                per_rule[*rule as usize] += 1;
            }
        }
        let by_rule = ComplianceRule::ALL
            .into_iter()
            .zip(per_rule)
            .map(|(rule, failed)| RuleFailureCount {
                rule,
                message: rule.message().to_string(),
                failed,
            })
            .collect();
        Self {
            total,
            passed,
            failed: total - passed,
            by_rule,
        }
    }

    pub fn from_results(results: &[DriverCheckResult]) -> Self {
        Self::from_evaluations(results.iter().map(|r| &r.evaluation))
    }

    /// Pass rate in percent; 0 for an empty roster
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    /// Pass/fail counts as chart categories
    pub fn distribution(&self) -> [(Verdict, usize); 2] {
        [(Verdict::Pass, self.passed), (Verdict::Fail, self.failed)]
    }
}

pub fn generate_compliance_report(
    results: &[DriverCheckResult],
    summary: &ComplianceSummary,
    today: NaiveDate,
) -> String {
    let mut report = String::new();
    report.push_str("==================================================\n");
    report.push_str("            Driver Compliance Report              \n");
    report.push_str("==================================================\n\n");
    report.push_str(&format!("  Reference date:   {}\n\n", today));
    report.push_str("[Summary]\n");
    report.push_str(&format!("  Total drivers:    {}\n", summary.total));
    report.push_str(&format!("  Pass:             {}\n", summary.passed));
    report.push_str(&format!("  Fail:             {}\n", summary.failed));
    if summary.total > 0 {
        report.push_str(&format!("  Pass rate:        {:.1}%\n", summary.pass_rate()));
    }
    report.push('\n');

    report.push_str("[Failures by rule]\n");
    for count in &summary.by_rule {
        report.push_str(&format!("  {:<24} {:>5}\n", count.rule.label(), count.failed));
    }
    report.push('\n');

    if summary.failed > 0 {
        report.push_str("[Failing drivers]\n");
        report.push_str("-".repeat(70).as_str());
        report.push('\n');
        report.push_str(&format!("{:<10} {:<20} {}\n", "DriverId", "Name", "Reasons"));
        report.push_str("-".repeat(70).as_str());
        report.push('\n');
        for result in results.iter().filter(|r| !r.evaluation.is_pass) {
            report.push_str(&format!(
                "{:<10} {:<20} {}\n",
                truncate_str(&result.record.driver_id, 10),
                truncate_str(&result.record.driver_name, 20),
                result.evaluation.result_text()
            ));
        }
        report.push('\n');
    } else {
        report.push_str("[No failing drivers]\n");
        report.push_str("  All drivers meet every compliance rule.\n\n");
    }

    report.push_str("==================================================\n");
    report
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let truncated: String = s.chars().take(max_len.saturating_sub(2)).collect();
        format!("{}..", truncated)
    } else {
        s.to_string()
    }
}
