//! Report document rendering.
//!
//! The page template ships with the crate; rendering substitutes the stat-box
//! values and the four chart JSON payloads into it.

use std::path::Path;

use anyhow::{Context, Result};

use aval_core::HeadlineStats;

use crate::charts::ChartSpec;
use crate::common::{fmt1, fmt_signed_pct, fmt_thousands};

const TEMPLATE: &str = include_str!("../templates/report.html");

/// The four chart specifications, in page order.
pub struct ReportCharts<'a> {
    pub balance: &'a ChartSpec,
    pub territory_age: &'a ChartSpec,
    pub comparison: &'a ChartSpec,
    pub attainment: &'a ChartSpec,
}

/// Render the self-contained report page.
pub fn render_report(stats: &HeadlineStats, charts: &ReportCharts<'_>) -> Result<String> {
    let (growth_class, growth_value) = match stats.growth_pct {
        Some(pct) if pct > 0.0 => ("positive", fmt_signed_pct(pct)),
        Some(pct) => ("negative", fmt_signed_pct(pct)),
        None => ("", "–".to_string()),
    };
    let html = TEMPLATE
        .replace("__TOTAL_STUDENTS__", &fmt_thousands(stats.students))
        .replace("__NUM_TERRITORIES__", &stats.territories.to_string())
        .replace("__OVERALL_MEAN__", &fmt1(stats.overall_mean))
        .replace("__GROWTH_CLASS__", growth_class)
        .replace("__GROWTH_VALUE__", &growth_value)
        .replace(
            "__CHART1__",
            &charts.balance.to_json().context("serialize balance chart")?,
        )
        .replace(
            "__CHART2__",
            &charts
                .territory_age
                .to_json()
                .context("serialize territory chart")?,
        )
        .replace(
            "__CHART3__",
            &charts
                .comparison
                .to_json()
                .context("serialize comparison chart")?,
        )
        .replace(
            "__CHART4__",
            &charts
                .attainment
                .to_json()
                .context("serialize attainment chart")?,
        );
    Ok(html)
}

/// Write the rendered page to disk.
pub fn write_report(path: &Path, html: &str) -> Result<()> {
    std::fs::write(path, html).with_context(|| format!("write report: {}", path.display()))?;
    Ok(())
}
