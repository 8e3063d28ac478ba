//! Typed frame construction with the cleaning pass.

use anyhow::{Context, Result, bail};
use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use serde::{Deserialize, Serialize};
use tracing::debug;

use aval_model::{ColumnType, ResultsSchema};

use crate::csv_table::CsvTable;
use crate::values::parse_f64;

/// Outcome of the cleaning pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanReport {
    /// Records in the source table.
    pub total: usize,
    /// Records kept after cleaning.
    pub kept: usize,
    /// Records dropped for missing a required measure.
    pub dropped: usize,
}

/// Build a typed frame from the raw table, dropping records that are missing
/// any required measure.
///
/// A record survives only when every column in
/// [`ResultsSchema::required_measures`] parses as a number; everything else
/// (including optional numeric columns) may be null in the output frame.
pub fn build_clean_frame(
    table: &CsvTable,
    schema: &ResultsSchema,
) -> Result<(DataFrame, CleanReport)> {
    let specs = schema.columns();
    let mut indices = Vec::with_capacity(specs.len());
    for spec in &specs {
        match table.column_index(&spec.name) {
            Some(idx) => indices.push(idx),
            None => bail!("missing column in input: {}", spec.name),
        }
    }
    let mut required = Vec::new();
    for name in schema.required_measures() {
        let idx = table
            .column_index(name)
            .with_context(|| format!("missing required measure column: {name}"))?;
        required.push(idx);
    }

    let kept: Vec<&Vec<String>> = table
        .rows
        .iter()
        .filter(|row| {
            required.iter().all(|&idx| {
                parse_f64(row.get(idx).map(String::as_str).unwrap_or("")).is_some()
            })
        })
        .collect();
    let report = CleanReport {
        total: table.rows.len(),
        kept: kept.len(),
        dropped: table.rows.len() - kept.len(),
    };
    debug!(
        total = report.total,
        kept = report.kept,
        dropped = report.dropped,
        "cleaned input records"
    );

    let mut columns: Vec<Column> = Vec::with_capacity(specs.len());
    for (spec, &idx) in specs.iter().zip(indices.iter()) {
        match spec.data_type {
            ColumnType::Numeric => {
                let values: Vec<Option<f64>> = kept
                    .iter()
                    .map(|row| parse_f64(row.get(idx).map(String::as_str).unwrap_or("")))
                    .collect();
                columns.push(Series::new(spec.name.as_str().into(), values).into());
            }
            ColumnType::Categorical => {
                let values: Vec<String> = kept
                    .iter()
                    .map(|row| row.get(idx).cloned().unwrap_or_default())
                    .collect();
                columns.push(Series::new(spec.name.as_str().into(), values).into());
            }
        }
    }
    let frame = DataFrame::new(columns).context("build results frame")?;
    Ok((frame, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: Vec<Vec<&str>>) -> CsvTable {
        let schema = ResultsSchema::default();
        let headers: Vec<String> = schema
            .columns()
            .iter()
            .map(|spec| spec.name.clone())
            .collect();
        CsvTable {
            headers,
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(String::from).collect())
                .collect(),
        }
    }

    fn row<'a>(year: &'a str, scores: [&'a str; 4]) -> Vec<&'a str> {
        vec![
            year, "Barcelona", "Public", "Dona", "3", "Alt", scores[0], scores[1], scores[2],
            scores[3],
        ]
    }

    #[test]
    fn drops_records_missing_a_required_measure() {
        let schema = ResultsSchema::default();
        let table = table(vec![
            row("2023", ["70", "68", "69", "2"]),
            row("2023", ["", "68", "69", "2"]),
            row("2022", ["70", "68", "not-a-number", "2"]),
        ]);
        let (frame, report) = build_clean_frame(&table, &schema).unwrap();
        assert_eq!(report.total, 3);
        assert_eq!(report.kept, 1);
        assert_eq!(report.dropped, 2);
        assert_eq!(frame.height(), 1);
    }

    #[test]
    fn missing_column_is_an_error() {
        let schema = ResultsSchema::default();
        let table = CsvTable {
            headers: vec!["ANY".to_string()],
            rows: vec![vec!["2023".to_string()]],
        };
        let error = build_clean_frame(&table, &schema).unwrap_err();
        assert!(error.to_string().contains("missing column"));
    }

    #[test]
    fn frame_keeps_declared_column_set() {
        let schema = ResultsSchema::default();
        let table = table(vec![row("2023", ["70", "68", "69", "2"])]);
        let (frame, _) = build_clean_frame(&table, &schema).unwrap();
        assert_eq!(frame.width(), schema.columns().len());
        assert!(frame.column("Mitjana_Global").is_ok());
    }
}
