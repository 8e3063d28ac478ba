use std::path::PathBuf;

use aval_core::{ExclusionReport, HeadlineStats};
use aval_ingest::CleanReport;

/// Everything the terminal summary needs about a finished run.
#[derive(Debug)]
pub struct ReportResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub clean: CleanReport,
    pub stats: HeadlineStats,
    pub excluded: ExclusionReport,
}
