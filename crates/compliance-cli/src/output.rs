//! Output formatting module

use std::path::Path;

use chrono::NaiveDate;
use compliance_app::ComplianceReport;
use compliance_domain::service::{ComplianceSummary, DriverCheckResult};
use compliance_types::{OutputFormat, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct DriverOutput<'a> {
    driver_id: &'a str,
    driver_name: &'a str,
    is_pass: &'static str,
    result: String,
    reasons: &'a [String],
}

impl<'a> From<&'a DriverCheckResult> for DriverOutput<'a> {
    fn from(r: &'a DriverCheckResult) -> Self {
        Self {
            driver_id: &r.record.driver_id,
            driver_name: &r.record.driver_name,
            is_pass: r.verdict().as_str(),
            result: r.evaluation.result_text(),
            reasons: &r.evaluation.reasons,
        }
    }
}

#[derive(Debug, Serialize)]
struct ReportOutput<'a> {
    reference_date: NaiveDate,
    summary: &'a ComplianceSummary,
    pass_rate: f64,
    results_file: Option<String>,
    drivers: Vec<DriverOutput<'a>>,
}

pub fn output_report(
    output_format: OutputFormat,
    report: &ComplianceReport,
    results_path: Option<&Path>,
    failed_only: bool,
    chart_width: usize,
) -> Result<()> {
    let listed = report
        .results
        .iter()
        .filter(|r| !failed_only || !r.evaluation.is_pass);

    if output_format == OutputFormat::Json {
        let out = ReportOutput {
            reference_date: report.reference_date,
            summary: &report.summary,
            pass_rate: report.summary.pass_rate(),
            results_file: results_path.map(|p| p.display().to_string()),
            drivers: listed.map(DriverOutput::from).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", report.text_report());
    println!("{}", render_bar_chart(&report.summary, chart_width));

    println!("{:<10} {:<22} {:<6} Result", "DriverId", "Name", "Status");
    println!("{}", "-".repeat(78));
    for r in listed {
        println!(
            "{:<10} {:<22} {:<6} {}",
            truncate(&r.record.driver_id, 10),
            truncate(&r.record.driver_name, 22),
            r.verdict(),
            r.evaluation.result_text()
        );
    }

    if let Some(path) = results_path {
        println!("\nResults written to: {}", path.display());
    }

    Ok(())
}

/// Horizontal pass/fail bar chart, bars scaled so the larger count spans `width`.
pub fn render_bar_chart(summary: &ComplianceSummary, width: usize) -> String {
    let distribution = summary.distribution();
    let max = distribution.iter().map(|(_, n)| *n).max().unwrap_or(0);

    let mut chart = String::new();
    for (verdict, count) in distribution {
        let bar_len = if max == 0 {
            0
        } else {
            ((count as f64 / max as f64) * width as f64).round() as usize
        };
        chart.push_str(&format!(
            "{:<4} | {} {}\n",
            verdict.as_str(),
            "█".repeat(bar_len),
            count
        ));
    }
    chart
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let truncated: String = s.chars().take(max_len.saturating_sub(2)).collect();
        format!("{}..", truncated)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compliance_domain::model::{ComplianceRule, EvaluationResult};

    fn summary(passed: usize, failed: usize) -> ComplianceSummary {
        let mut evaluations = vec![EvaluationResult::from_failures(vec![]); passed];
        evaluations.extend(vec![
            EvaluationResult::from_failures(vec![ComplianceRule::DotValid]);
            failed
        ]);
        ComplianceSummary::from_evaluations(&evaluations)
    }

    #[test]
    fn test_bar_chart_scales_to_width() {
        let chart = render_bar_chart(&summary(8, 2), 20);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], format!("Pass | {} 8", "█".repeat(20)));
        assert_eq!(lines[1], format!("Fail | {} 2", "█".repeat(5)));
    }

    #[test]
    fn test_bar_chart_empty_roster() {
        let chart = render_bar_chart(&summary(0, 0), 20);
        assert_eq!(chart, "Pass |  0\nFail |  0\n");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Short", 10), "Short");
        assert_eq!(truncate("A very long driver name", 10), "A very l..");
    }
}
