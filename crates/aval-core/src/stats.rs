//! Headline statistics and grouped series for the report charts.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::{AnyValue, DataFrame};
use serde::Serialize;
use tracing::warn;

use aval_ingest::{any_to_f64, any_to_string};
use aval_model::{AvalError, Dimension, Result};

use crate::builder::ExclusionReport;

/// Numbers shown in the report's stat boxes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlineStats {
    /// Records surviving the cleaning pass.
    pub students: usize,
    /// Distinct territory values in the data.
    pub territories: usize,
    /// Mean of the overall score across all records.
    pub overall_mean: f64,
    /// Percent change of the yearly mean between the two most recent years;
    /// `None` when the data holds fewer than two years.
    pub growth_pct: Option<f64>,
}

/// One point of a grouped mean series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub x: f64,
    pub y: f64,
}

/// Headline stats over the cleaned frame.
pub fn headline_stats(
    frame: &DataFrame,
    territory_col: &str,
    year_col: &str,
    overall_col: &str,
) -> Result<HeadlineStats> {
    if frame.height() == 0 {
        return Err(AvalError::EmptyInput);
    }
    let territories = distinct_values(frame, territory_col)?.len();
    let overall = measure_column(frame, overall_col)?;
    let mut sum = 0.0;
    let mut count = 0usize;
    for idx in 0..frame.height() {
        if let Some(value) = any_to_f64(overall.get(idx).unwrap_or(AnyValue::Null)) {
            sum += value;
            count += 1;
        }
    }
    if count == 0 {
        return Err(AvalError::EmptyInput);
    }
    let yearly = yearly_means(frame, year_col, overall_col)?;
    let growth_pct = match yearly.as_slice() {
        [.., (_, previous), (_, current)] if *previous != 0.0 => {
            Some((current - previous) / previous * 100.0)
        }
        _ => None,
    };
    Ok(HeadlineStats {
        students: frame.height(),
        territories,
        overall_mean: sum / count as f64,
        growth_pct,
    })
}

/// Mean of the overall score per year, sorted by year ascending.
pub fn yearly_means(frame: &DataFrame, year_col: &str, measure: &str) -> Result<Vec<(i64, f64)>> {
    let years = measure_column(frame, year_col)?;
    let values = measure_column(frame, measure)?;
    let mut grouped: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
    for idx in 0..frame.height() {
        let Some(year) = any_to_f64(years.get(idx).unwrap_or(AnyValue::Null)) else {
            continue;
        };
        let Some(value) = any_to_f64(values.get(idx).unwrap_or(AnyValue::Null)) else {
            continue;
        };
        let entry = grouped.entry(year as i64).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }
    Ok(grouped
        .into_iter()
        .map(|(year, (sum, count))| (year, sum / count as f64))
        .collect())
}

/// Mean of `measure` grouped by a categorical column and a numeric x column.
///
/// Returns group → points sorted by x ascending. Records with a missing group
/// value, x, or measure are skipped.
pub fn mean_series_by_group(
    frame: &DataFrame,
    group_col: &str,
    x_col: &str,
    measure: &str,
) -> Result<BTreeMap<String, Vec<SeriesPoint>>> {
    if frame.height() == 0 {
        return Err(AvalError::EmptyInput);
    }
    let groups = frame
        .column(group_col)
        .map_err(|_| AvalError::Message(format!("group column not found: {group_col}")))?;
    let xs = measure_column(frame, x_col)?;
    let values = measure_column(frame, measure)?;

    let mut raw: BTreeMap<String, Vec<(f64, f64)>> = BTreeMap::new();
    for idx in 0..frame.height() {
        let group = any_to_string(groups.get(idx).unwrap_or(AnyValue::Null));
        if group.is_empty() {
            continue;
        }
        let Some(x) = any_to_f64(xs.get(idx).unwrap_or(AnyValue::Null)) else {
            continue;
        };
        let Some(value) = any_to_f64(values.get(idx).unwrap_or(AnyValue::Null)) else {
            continue;
        };
        raw.entry(group).or_default().push((x, value));
    }

    let mut series = BTreeMap::new();
    for (group, mut samples) in raw {
        samples.sort_by(|a, b| a.0.total_cmp(&b.0));
        let mut points = Vec::new();
        let mut idx = 0;
        while idx < samples.len() {
            let x = samples[idx].0;
            let mut sum = 0.0;
            let mut count = 0usize;
            while idx < samples.len() && samples[idx].0 == x {
                sum += samples[idx].1;
                count += 1;
                idx += 1;
            }
            points.push(SeriesPoint {
                x,
                y: sum / count as f64,
            });
        }
        series.insert(group, points);
    }
    Ok(series)
}

/// Sorted distinct non-empty values of a categorical column.
pub fn distinct_values(frame: &DataFrame, column: &str) -> Result<Vec<String>> {
    let series = frame
        .column(column)
        .map_err(|_| AvalError::Message(format!("column not found: {column}")))?;
    let mut values = BTreeSet::new();
    for idx in 0..frame.height() {
        let value = any_to_string(series.get(idx).unwrap_or(AnyValue::Null));
        if !value.is_empty() {
            values.insert(value);
        }
    }
    Ok(values.into_iter().collect())
}

/// Attainment shares per selector value: level × year → percentage of records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionTable {
    /// Years shared by every table, ascending.
    pub years: Vec<i64>,
    /// Level display labels in canonical order.
    pub level_labels: Vec<String>,
    /// `shares[level][year_idx]` as percentages in 0..=100; a year with no
    /// records for this selector value holds 0 for every level.
    pub shares: Vec<Vec<f64>>,
}

/// Distribution views for every selector value plus the synthetic aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionViews {
    /// Display order: the synthetic aggregate first, then the selector domain.
    pub order: Vec<String>,
    pub tables: BTreeMap<String, DistributionTable>,
    pub excluded: ExclusionReport,
}

/// Share of records per attainment level and year, per selector value.
///
/// Shares derive from record counts, so an absent (level, year) combination is
/// a true 0% — unlike mean views, where absence must stay null. The year axis
/// is shared across all selector values so a dropdown can swap y-series only.
pub fn attainment_distribution(
    frame: &DataFrame,
    selector: &Dimension,
    year_col: &str,
    levels: &Dimension,
    all_label: &str,
) -> Result<DistributionViews> {
    if frame.height() == 0 {
        return Err(AvalError::EmptyInput);
    }
    let selector_series = frame
        .column(&selector.name)
        .map_err(|_| AvalError::Message(format!("dimension column not found: {}", selector.name)))?;
    let level_series = frame
        .column(&levels.name)
        .map_err(|_| AvalError::Message(format!("dimension column not found: {}", levels.name)))?;
    let years_series = measure_column(frame, year_col)?;

    let mut year_set = BTreeSet::new();
    for idx in 0..frame.height() {
        if let Some(year) = any_to_f64(years_series.get(idx).unwrap_or(AnyValue::Null)) {
            year_set.insert(year as i64);
        }
    }
    let years: Vec<i64> = year_set.into_iter().collect();
    let year_index: BTreeMap<i64, usize> = years
        .iter()
        .enumerate()
        .map(|(idx, year)| (*year, idx))
        .collect();

    // Slot 0 is the synthetic aggregate; selector value i lives in slot i + 1.
    let n_slots = selector.len() + 1;
    let mut counts = vec![vec![vec![0usize; years.len()]; levels.len()]; n_slots];
    let mut excluded = ExclusionReport::default();

    for idx in 0..frame.height() {
        let selector_value = any_to_string(selector_series.get(idx).unwrap_or(AnyValue::Null));
        let Some(selector_idx) = selector.index_of(&selector_value) else {
            excluded.record(&selector.name, &selector_value);
            continue;
        };
        let level_value = any_to_string(level_series.get(idx).unwrap_or(AnyValue::Null));
        let Some(level_idx) = levels.index_of(&level_value) else {
            excluded.record(&levels.name, &level_value);
            continue;
        };
        let Some(year) = any_to_f64(years_series.get(idx).unwrap_or(AnyValue::Null)) else {
            continue;
        };
        let Some(&year_idx) = year_index.get(&(year as i64)) else {
            continue;
        };
        for slot in [0, selector_idx + 1] {
            counts[slot][level_idx][year_idx] += 1;
        }
    }

    if !excluded.is_empty() {
        warn!(
            excluded = excluded.total(),
            "records outside declared domains were excluded from the distribution"
        );
    }

    let level_labels: Vec<String> = levels.labels().iter().map(ToString::to_string).collect();
    let mut order = Vec::with_capacity(n_slots);
    order.push(all_label.to_string());
    for entry in &selector.values {
        order.push(entry.value.clone());
    }

    let mut tables = BTreeMap::new();
    for (slot, selector_value) in order.iter().enumerate() {
        let mut shares = vec![vec![0.0f64; years.len()]; levels.len()];
        for year_idx in 0..years.len() {
            let year_total: usize = (0..levels.len())
                .map(|level_idx| counts[slot][level_idx][year_idx])
                .sum();
            if year_total == 0 {
                continue;
            }
            for level_idx in 0..levels.len() {
                shares[level_idx][year_idx] =
                    counts[slot][level_idx][year_idx] as f64 / year_total as f64 * 100.0;
            }
        }
        tables.insert(
            selector_value.clone(),
            DistributionTable {
                years: years.clone(),
                level_labels: level_labels.clone(),
                shares,
            },
        );
    }

    Ok(DistributionViews {
        order,
        tables,
        excluded,
    })
}

fn measure_column<'a>(
    frame: &'a DataFrame,
    name: &str,
) -> Result<&'a polars::prelude::Column> {
    frame
        .column(name)
        .map_err(|_| AvalError::MeasureNotFound(name.to_string()))
}
