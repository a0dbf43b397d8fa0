//! Command handlers

use crate::cli::{Cli, Commands};
use crate::output::output_report;
use chrono::{Local, NaiveDate};
use compliance_app::{parse_reference_date, ComplianceReport, Config};
use compliance_types::{OutputFormat, Result};
use std::path::PathBuf;
use tracing::info;

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let output_format = cli.format.unwrap_or(config.output_format);

    match cli.command {
        Commands::Check {
            csv,
            as_of,
            output,
            no_write,
            failed_only,
            xlsx,
        } => {
            let options = CheckOptions {
                csv,
                reference_date: resolve_reference_date(as_of.as_deref())?,
                output,
                no_write,
                failed_only,
                xlsx,
            };
            cmd_check(&config, options, output_format)
        }

        Commands::Export { csv, output, as_of } => {
            let reference_date = resolve_reference_date(as_of.as_deref())?;
            cmd_export(csv, output, reference_date)
        }

        Commands::Config {
            show,
            set_output,
            set_output_dir,
            set_chart_width,
            reset,
        } => cmd_config(show, set_output, set_output_dir, set_chart_width, reset),
    }
}

/// `--as-of` if given, otherwise the local calendar date
fn resolve_reference_date(as_of: Option<&str>) -> Result<NaiveDate> {
    match as_of {
        Some(s) => parse_reference_date(s),
        None => Ok(Local::now().date_naive()),
    }
}

/// Arguments of the `check` subcommand after reference date resolution
struct CheckOptions {
    csv: PathBuf,
    reference_date: NaiveDate,
    /// Explicit results CSV path; `None` means the dated file in the output dir
    output: Option<PathBuf>,
    no_write: bool,
    failed_only: bool,
    xlsx: Option<PathBuf>,
}

impl CheckOptions {
    /// Where the annotated CSV goes, or `None` with `--no-write`
    fn results_path(&self, report: &ComplianceReport, config: &Config) -> Option<PathBuf> {
        if self.no_write {
            return None;
        }
        Some(
            self.output
                .clone()
                .unwrap_or_else(|| report.default_results_path(&config.output_dir())),
        )
    }
}

fn cmd_check(config: &Config, options: CheckOptions, output_format: OutputFormat) -> Result<()> {
    info!(path = %options.csv.display(), "loading driver roster");
    let report = ComplianceReport::load(&options.csv, options.reference_date)?;

    let results_path = options.results_path(&report, config);
    if let Some(ref path) = results_path {
        report.write_csv(path)?;
    }
    if let Some(ref path) = options.xlsx {
        report.write_excel(path)?;
    }

    output_report(
        output_format,
        &report,
        results_path.as_deref(),
        options.failed_only,
        config.chart_width,
    )
}

fn cmd_export(csv_path: PathBuf, output: PathBuf, reference_date: NaiveDate) -> Result<()> {
    info!(path = %csv_path.display(), "loading driver roster");
    let report = ComplianceReport::load(&csv_path, reference_date)?;
    report.write_excel(&output)?;
    println!("Exported to: {}", output.display());
    Ok(())
}

fn cmd_config(
    show: bool,
    set_output: Option<OutputFormat>,
    set_output_dir: Option<PathBuf>,
    set_chart_width: Option<usize>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(dir) = set_output_dir {
        config.output_dir = Some(dir);
        modified = true;
    }

    if let Some(width) = set_chart_width {
        config.chart_width = width.max(1);
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
