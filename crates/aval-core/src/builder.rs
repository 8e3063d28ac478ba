//! Selector-keyed aggregation views.
//!
//! For a selector dimension (territory in the report) and two cross-tabulation
//! dimensions, [`build_views`] precomputes one 2-D mean table per selector
//! value and per measure, plus a synthetic entry aggregating the whole record
//! set. A static report ships every view up front so a dropdown can swap the
//! displayed slice without recomputation.

use std::collections::BTreeMap;

use polars::prelude::{AnyValue, DataFrame};
use serde::Serialize;
use tracing::warn;

use aval_ingest::{any_to_f64, any_to_string};
use aval_model::{AvalError, Dimension, Result};

/// What to aggregate: a selector dimension, the two cross-tabulation
/// dimensions, and the measures reduced by mean within each group.
#[derive(Debug, Clone)]
pub struct ViewRequest {
    pub selector: Dimension,
    pub rows: Dimension,
    pub cols: Dimension,
    pub measures: Vec<String>,
    /// Label of the synthetic entry aggregating all selector values.
    pub all_label: String,
}

/// One measure's 2-D table for one selector value.
///
/// Cell layout follows the canonical domain orders of the request; a `None`
/// cell means the combination had no records. Zero is a valid score, so
/// renderers must show nulls as blanks, never as 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub measure: String,
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    /// `cells[row][col]`, rows × cols.
    pub cells: Vec<Vec<Option<f64>>>,
}

impl View {
    pub fn cell(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get(row).and_then(|cells| cells.get(col)).copied().flatten()
    }

    /// All non-null cell values, row-major.
    pub fn non_null_values(&self) -> Vec<f64> {
        self.cells
            .iter()
            .flat_map(|row| row.iter().filter_map(|cell| *cell))
            .collect()
    }
}

/// Records excluded because a categorical value fell outside its declared
/// canonical domain, counted per dimension and offending value.
///
/// Exclusion is a recoverable data-quality diagnostic, not an error: callers
/// inspect it to detect domain drift between data refreshes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExclusionReport {
    pub counts: BTreeMap<String, BTreeMap<String, usize>>,
}

impl ExclusionReport {
    pub fn record(&mut self, dimension: &str, value: &str) {
        *self
            .counts
            .entry(dimension.to_string())
            .or_default()
            .entry(value.to_string())
            .or_insert(0) += 1;
    }

    /// Total excluded record count across all dimensions.
    pub fn total(&self) -> usize {
        self.counts
            .values()
            .flat_map(|values| values.values())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn merge(&mut self, other: &ExclusionReport) {
        for (dimension, values) in &other.counts {
            for (value, count) in values {
                *self
                    .counts
                    .entry(dimension.clone())
                    .or_default()
                    .entry(value.clone())
                    .or_insert(0) += count;
            }
        }
    }
}

/// The full precomputed mapping: selector value → measure → [`View`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectorViews {
    /// Display order: the synthetic aggregate first, then the selector domain.
    pub order: Vec<String>,
    pub views: BTreeMap<String, BTreeMap<String, View>>,
    pub excluded: ExclusionReport,
}

impl SelectorViews {
    pub fn view(&self, selector: &str, measure: &str) -> Option<&View> {
        self.views
            .get(selector)
            .and_then(|measures| measures.get(measure))
    }

    /// Every view of one measure, in display order.
    pub fn views_for_measure(&self, measure: &str) -> Vec<&View> {
        self.order
            .iter()
            .filter_map(|selector| self.view(selector, measure))
            .collect()
    }
}

/// Build the mean table for every selector value plus the synthetic aggregate.
///
/// A record whose selector/row/col value is outside the declared domain is
/// excluded from every view (the aggregate included) and counted in the
/// exclusion report. Measure cells that do not parse as finite numbers simply
/// do not contribute to their group's mean.
///
/// # Errors
///
/// [`AvalError::MeasureNotFound`] when a requested measure column is absent
/// (caller mistake, fails fast); [`AvalError::EmptyInput`] when the frame has
/// no records at all.
pub fn build_views(frame: &DataFrame, request: &ViewRequest) -> Result<SelectorViews> {
    if frame.height() == 0 {
        return Err(AvalError::EmptyInput);
    }
    let selector_col = dimension_column(frame, &request.selector)?;
    let row_col = dimension_column(frame, &request.rows)?;
    let col_col = dimension_column(frame, &request.cols)?;
    let mut measure_cols = Vec::with_capacity(request.measures.len());
    for measure in &request.measures {
        let column = frame
            .column(measure)
            .map_err(|_| AvalError::MeasureNotFound(measure.clone()))?;
        measure_cols.push(column);
    }

    // Slot 0 is the synthetic aggregate; selector value i lives in slot i + 1.
    let n_slots = request.selector.len() + 1;
    let n_rows = request.rows.len();
    let n_cols = request.cols.len();
    let cells_per_slot = n_rows * n_cols;
    let slot_index = |slot: usize, row: usize, col: usize| {
        slot * cells_per_slot + row * n_cols + col
    };

    let mut sums = vec![vec![0.0f64; n_slots * cells_per_slot]; request.measures.len()];
    let mut counts = vec![vec![0usize; n_slots * cells_per_slot]; request.measures.len()];
    let mut excluded = ExclusionReport::default();

    for idx in 0..frame.height() {
        let selector_value = any_to_string(selector_col.get(idx).unwrap_or(AnyValue::Null));
        let Some(selector_idx) = request.selector.index_of(&selector_value) else {
            excluded.record(&request.selector.name, &selector_value);
            continue;
        };
        let row_value = any_to_string(row_col.get(idx).unwrap_or(AnyValue::Null));
        let Some(row_idx) = request.rows.index_of(&row_value) else {
            excluded.record(&request.rows.name, &row_value);
            continue;
        };
        let col_value = any_to_string(col_col.get(idx).unwrap_or(AnyValue::Null));
        let Some(col_idx) = request.cols.index_of(&col_value) else {
            excluded.record(&request.cols.name, &col_value);
            continue;
        };
        for (measure_idx, column) in measure_cols.iter().enumerate() {
            let Some(value) = any_to_f64(column.get(idx).unwrap_or(AnyValue::Null)) else {
                continue;
            };
            if !value.is_finite() {
                continue;
            }
            for slot in [0, selector_idx + 1] {
                let cell = slot_index(slot, row_idx, col_idx);
                sums[measure_idx][cell] += value;
                counts[measure_idx][cell] += 1;
            }
        }
    }

    if !excluded.is_empty() {
        warn!(
            excluded = excluded.total(),
            "records outside declared domains were excluded from aggregation"
        );
    }

    let row_labels: Vec<String> = request.rows.labels().iter().map(ToString::to_string).collect();
    let col_labels: Vec<String> = request.cols.labels().iter().map(ToString::to_string).collect();

    let mut order = Vec::with_capacity(n_slots);
    order.push(request.all_label.clone());
    for entry in &request.selector.values {
        order.push(entry.value.clone());
    }

    let mut views: BTreeMap<String, BTreeMap<String, View>> = BTreeMap::new();
    for (slot, selector_value) in order.iter().enumerate() {
        let mut per_measure = BTreeMap::new();
        for (measure_idx, measure) in request.measures.iter().enumerate() {
            let mut cells = vec![vec![None; n_cols]; n_rows];
            for row in 0..n_rows {
                for col in 0..n_cols {
                    let cell = slot_index(slot, row, col);
                    if counts[measure_idx][cell] > 0 {
                        cells[row][col] =
                            Some(sums[measure_idx][cell] / counts[measure_idx][cell] as f64);
                    }
                }
            }
            per_measure.insert(
                measure.clone(),
                View {
                    measure: measure.clone(),
                    row_labels: row_labels.clone(),
                    col_labels: col_labels.clone(),
                    cells,
                },
            );
        }
        views.insert(selector_value.clone(), per_measure);
    }

    Ok(SelectorViews {
        order,
        views,
        excluded,
    })
}

fn dimension_column<'a>(
    frame: &'a DataFrame,
    dimension: &Dimension,
) -> Result<&'a polars::prelude::Column> {
    frame
        .column(&dimension.name)
        .map_err(|_| AvalError::Message(format!("dimension column not found: {}", dimension.name)))
}
