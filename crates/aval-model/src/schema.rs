//! Column schema for the sixth-grade assessment results dataset.
//!
//! The loader uses the declared types to build a typed frame; everything else
//! addresses columns through this struct instead of repeating string literals.

use serde::{Deserialize, Serialize};

/// Declared type of a dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    /// Categorical string values (territory, gender, ...).
    Categorical,
    /// Numeric values parsed to f64; unparsable cells become null.
    Numeric,
}

/// One column of the results dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub data_type: ColumnType,
    /// Human description shown by the `schema` command.
    pub description: String,
}

/// Column names of the assessment results CSV.
///
/// Defaults match the open-data export of the Catalan sixth-grade basic
/// competences assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsSchema {
    /// Assessment year.
    pub year: String,
    /// Territorial area of the school.
    pub territory: String,
    /// School ownership (public/private).
    pub sector: String,
    /// Student gender.
    pub gender: String,
    /// Months above the minimum age for the school year.
    pub relative_age: String,
    /// Attainment band (Alt/Mitja/Baix).
    pub attainment: String,
    /// Language competences score.
    pub languages: String,
    /// Mathematics competences score.
    pub maths: String,
    /// Overall mean score.
    pub overall: String,
    /// Languages minus mathematics score difference.
    pub balance: String,
}

impl Default for ResultsSchema {
    fn default() -> Self {
        Self {
            year: "ANY".to_string(),
            territory: "AREA_TERRITORIAL".to_string(),
            sector: "NATURALESA".to_string(),
            gender: "GENERE".to_string(),
            relative_age: "Edat_Relativa".to_string(),
            attainment: "Nivell_Assoliment".to_string(),
            languages: "PLING".to_string(),
            maths: "PMAT".to_string(),
            overall: "Mitjana_Global".to_string(),
            balance: "LING_MAT".to_string(),
        }
    }
}

impl ResultsSchema {
    /// All columns the loader materializes, with declared types.
    pub fn columns(&self) -> Vec<ColumnSpec> {
        vec![
            column(&self.year, ColumnType::Numeric, "Assessment year"),
            column(&self.territory, ColumnType::Categorical, "Territorial area"),
            column(&self.sector, ColumnType::Categorical, "School ownership"),
            column(&self.gender, ColumnType::Categorical, "Student gender"),
            column(
                &self.relative_age,
                ColumnType::Numeric,
                "Relative age in months",
            ),
            column(
                &self.attainment,
                ColumnType::Categorical,
                "Attainment band (Alt/Mitja/Baix)",
            ),
            column(&self.languages, ColumnType::Numeric, "Languages score"),
            column(&self.maths, ColumnType::Numeric, "Mathematics score"),
            column(&self.overall, ColumnType::Numeric, "Overall mean score"),
            column(
                &self.balance,
                ColumnType::Numeric,
                "Languages minus mathematics difference",
            ),
        ]
    }

    /// Measures a record must carry to survive cleaning.
    ///
    /// Matches the published report: records missing any principal score are
    /// dropped before aggregation.
    pub fn required_measures(&self) -> Vec<&str> {
        vec![&self.languages, &self.maths, &self.overall, &self.balance]
    }
}

fn column(name: &str, data_type: ColumnType, description: &str) -> ColumnSpec {
    ColumnSpec {
        name: name.to_string(),
        data_type,
        description: description.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schema_names_match_dataset_export() {
        let schema = ResultsSchema::default();
        assert_eq!(schema.year, "ANY");
        assert_eq!(schema.overall, "Mitjana_Global");
        assert_eq!(schema.columns().len(), 10);
    }

    #[test]
    fn required_measures_are_numeric_columns() {
        let schema = ResultsSchema::default();
        let columns = schema.columns();
        for measure in schema.required_measures() {
            let spec = columns
                .iter()
                .find(|column| column.name == measure)
                .expect("measure declared in schema");
            assert_eq!(spec.data_type, ColumnType::Numeric);
        }
    }
}
