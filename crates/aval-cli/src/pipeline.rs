//! Report generation pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: read the results CSV, normalize cells, drop incomplete records
//! 2. **Aggregate**: headline stats, grouped series, selector views, bounds
//! 3. **Render**: build the four chart specs and the HTML page
//! 4. **Write**: save the page next to the input (or at the requested path)
//!
//! Each stage takes the output of the previous stage and returns typed results.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{info, info_span};

use aval_core::{
    DistributionViews, ExclusionReport, HeadlineStats, SelectorViews, SeriesPoint, ViewRequest,
    attainment_distribution, build_views, distinct_values, headline_stats, mean_series_by_group,
    shared_bounds,
};
use aval_ingest::{CleanReport, build_clean_frame, read_results_table};
use aval_model::{AttainmentLevel, Dimension, Gender, ResultsSchema, SchoolSector};
use aval_report::{
    ReportCharts, attainment_chart, balance_chart, comparison_heatmaps, render_report,
    territory_age_chart,
};

/// Label of the synthetic selector entry aggregating every territory.
pub const ALL_TERRITORIES_LABEL: &str = "Tots";

/// Result of the ingest stage.
#[derive(Debug)]
pub struct IngestResult {
    /// Cleaned, typed record frame.
    pub frame: DataFrame,
    /// Cleaning counts for the summary.
    pub clean: CleanReport,
}

/// Read and clean the results CSV.
pub fn ingest(path: &Path, schema: &ResultsSchema) -> Result<IngestResult> {
    let ingest_span = info_span!("ingest", input = %path.display());
    let _ingest_guard = ingest_span.enter();
    let start = Instant::now();

    let table = read_results_table(path).with_context(|| format!("read {}", path.display()))?;
    let (frame, clean) = build_clean_frame(&table, schema)
        .with_context(|| format!("build frame from {}", path.display()))?;
    info!(
        total = clean.total,
        kept = clean.kept,
        dropped = clean.dropped,
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok(IngestResult { frame, clean })
}

/// Result of the aggregate stage.
#[derive(Debug)]
pub struct AggregateResult {
    pub stats: HeadlineStats,
    /// Balance (languages minus maths) mean by year, per gender.
    pub balance_series: BTreeMap<String, Vec<SeriesPoint>>,
    /// Overall mean by relative age, per territory.
    pub territory_series: BTreeMap<String, Vec<SeriesPoint>>,
    /// Sector × gender mean views per territory, for both score measures.
    pub comparison: SelectorViews,
    /// Shared color-scale bounds across both measures and every territory.
    pub bounds: (f64, f64),
    /// Attainment-band shares per territory.
    pub distribution: DistributionViews,
    /// Records excluded across all aggregations, by dimension and value.
    pub excluded: ExclusionReport,
}

/// Compute every aggregation the report needs, eagerly, in one pass over the
/// cleaned frame per aggregation.
pub fn aggregate(
    frame: &DataFrame,
    schema: &ResultsSchema,
    scale_step: f64,
) -> Result<AggregateResult> {
    let aggregate_span = info_span!("aggregate", records = frame.height());
    let _aggregate_guard = aggregate_span.enter();
    let start = Instant::now();

    let stats = headline_stats(frame, &schema.territory, &schema.year, &schema.overall)
        .context("headline statistics")?;

    let balance_series =
        mean_series_by_group(frame, &schema.gender, &schema.year, &schema.balance)
            .context("balance series")?;
    let territory_series = mean_series_by_group(
        frame,
        &schema.territory,
        &schema.relative_age,
        &schema.overall,
    )
    .context("territory series")?;

    // The territory domain is data-derived: sorted distinct values, so every
    // record's territory is inside it by construction.
    let territories = distinct_values(frame, &schema.territory)?;
    let territory_dim = Dimension::new(&schema.territory, territories);

    let request = ViewRequest {
        selector: territory_dim.clone(),
        rows: SchoolSector::dimension(&schema.sector),
        cols: Gender::dimension(&schema.gender),
        measures: vec![schema.languages.clone(), schema.maths.clone()],
        all_label: ALL_TERRITORIES_LABEL.to_string(),
    };
    let comparison = build_views(frame, &request).context("comparison views")?;

    let mut pool = comparison.views_for_measure(&schema.languages);
    pool.extend(comparison.views_for_measure(&schema.maths));
    let bounds = shared_bounds(&pool, scale_step).context("shared color bounds")?;

    let distribution = attainment_distribution(
        frame,
        &territory_dim,
        &schema.year,
        &AttainmentLevel::dimension(&schema.attainment),
        ALL_TERRITORIES_LABEL,
    )
    .context("attainment distribution")?;

    let mut excluded = comparison.excluded.clone();
    excluded.merge(&distribution.excluded);

    info!(
        territories = territory_dim.len(),
        excluded = excluded.total(),
        duration_ms = start.elapsed().as_millis(),
        "aggregate complete"
    );
    Ok(AggregateResult {
        stats,
        balance_series,
        territory_series,
        comparison,
        bounds,
        distribution,
        excluded,
    })
}

/// Build the chart specs and render the report page.
pub fn render(aggregated: &AggregateResult, schema: &ResultsSchema) -> Result<String> {
    let render_span = info_span!("render");
    let _render_guard = render_span.enter();
    let start = Instant::now();

    let balance = balance_chart(&aggregated.balance_series);
    let territory_age = territory_age_chart(&aggregated.territory_series);
    let comparison = comparison_heatmaps(
        &aggregated.comparison,
        &schema.languages,
        &schema.maths,
        aggregated.bounds,
    );
    let attainment = attainment_chart(&aggregated.distribution);

    let html = render_report(
        &aggregated.stats,
        &ReportCharts {
            balance: &balance,
            territory_age: &territory_age,
            comparison: &comparison,
            attainment: &attainment,
        },
    )?;
    info!(
        bytes = html.len(),
        duration_ms = start.elapsed().as_millis(),
        "render complete"
    );
    Ok(html)
}

/// Write the rendered page to disk.
pub fn write(path: &Path, html: &str) -> Result<()> {
    let write_span = info_span!("write", output = %path.display());
    let _write_guard = write_span.enter();
    aval_report::write_report(path, html)?;
    info!(output = %path.display(), "report written");
    Ok(())
}
