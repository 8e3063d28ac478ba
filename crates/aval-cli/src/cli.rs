//! CLI argument definitions for the report generator.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "aval-studio",
    version,
    about = "Assessment Report Studio - Build the sixth-grade results report",
    long_about = "Build a self-contained HTML report from the Catalan sixth-grade\n\
                  basic-competences assessment results CSV.\n\n\
                  The report bundles headline statistics and four interactive charts,\n\
                  with every territory slice precomputed."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate the HTML report from a results CSV.
    Report(ReportArgs),

    /// List the dataset columns the loader expects.
    Schema,
}

#[derive(Parser)]
pub struct ReportArgs {
    /// Path to the assessment results CSV file.
    #[arg(value_name = "RESULTS_CSV")]
    pub input: PathBuf,

    /// Output HTML path (default: the input path with an .html extension).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Color-scale step for the comparison heatmaps.
    ///
    /// The shared scale is expanded outward to multiples of this step so the
    /// two heatmaps stay comparable across territory selections.
    #[arg(long = "scale-step", value_name = "STEP", default_value_t = 5.0)]
    pub scale_step: f64,

    /// Fail when records fall outside the declared category domains.
    ///
    /// By default such records are excluded from aggregation, counted, and
    /// reported in the summary. Use this flag to treat any exclusion as an
    /// error, e.g. to catch unexpected categories in a data refresh.
    #[arg(long = "strict-domains")]
    pub strict_domains: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
