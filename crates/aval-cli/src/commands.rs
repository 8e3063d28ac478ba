//! Subcommand entry points.

use anyhow::{Result, bail};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use aval_model::{ColumnType, ResultsSchema};

use crate::cli::ReportArgs;
use crate::types::ReportResult;
use aval_cli::pipeline;

/// Run the full report pipeline for one results CSV.
pub fn run_report(args: &ReportArgs) -> Result<ReportResult> {
    let schema = ResultsSchema::default();
    let ingested = pipeline::ingest(&args.input, &schema)?;
    let aggregated = pipeline::aggregate(&ingested.frame, &schema, args.scale_step)?;
    if args.strict_domains && !aggregated.excluded.is_empty() {
        bail!(
            "{} records fall outside the declared category domains (rerun without --strict-domains to exclude them)",
            aggregated.excluded.total()
        );
    }
    let html = pipeline::render(&aggregated, &schema)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("html"));
    pipeline::write(&output, &html)?;
    Ok(ReportResult {
        input: args.input.clone(),
        output,
        clean: ingested.clean,
        stats: aggregated.stats,
        excluded: aggregated.excluded,
    })
}

/// Print the columns the loader expects in the results CSV.
pub fn run_schema() -> Result<()> {
    let schema = ResultsSchema::default();
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Column", "Type", "Description"]);
    for column in schema.columns() {
        let data_type = match column.data_type {
            ColumnType::Categorical => "categorical",
            ColumnType::Numeric => "numeric",
        };
        table.add_row(vec![column.name, data_type.to_string(), column.description]);
    }
    println!("{table}");
    Ok(())
}
