//! CLI definition using clap

use clap::{Parser, Subcommand};
use compliance_types::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "driver-checker")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Check a driver roster CSV against compliance rules")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a driver roster and write the annotated results CSV
    Check {
        /// Path to the driver CSV
        csv: PathBuf,

        /// Reference date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        as_of: Option<String>,

        /// Results CSV path. Defaults to <output_dir>/driver_results_<date>.csv
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Do not write the results CSV
        #[arg(long, conflicts_with = "output")]
        no_write: bool,

        /// List only failing drivers
        #[arg(long)]
        failed_only: bool,

        /// Also write an Excel workbook with a pass/fail chart
        #[arg(long)]
        xlsx: Option<PathBuf>,
    },

    /// Evaluate a driver roster and export it to Excel
    Export {
        /// Path to the driver CSV
        csv: PathBuf,

        /// Output Excel file path
        #[arg(long, short = 'o')]
        output: PathBuf,

        /// Reference date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set directory for results CSVs
        #[arg(long)]
        set_output_dir: Option<PathBuf>,

        /// Set terminal bar chart width
        #[arg(long)]
        set_chart_width: Option<usize>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}
