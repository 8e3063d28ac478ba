//! Categorical dimensions with fixed canonical domain orderings.
//!
//! A dimension's domain order is a display contract: every view built from it
//! keeps rows/columns in this order no matter how the input records arrive.

use serde::{Deserialize, Serialize};

/// One admissible value of a dimension, with the label shown in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionValue {
    /// Value as it appears in the source data.
    pub value: String,
    /// Display label (defaults to the raw value).
    pub label: String,
}

/// A named categorical attribute with a finite, ordered domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    /// Column name in the record set.
    pub name: String,
    /// Canonical domain, in display order.
    pub values: Vec<DimensionValue>,
}

impl Dimension {
    /// Build a dimension whose labels equal the raw values.
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values
            .into_iter()
            .map(|value| {
                let value = value.into();
                DimensionValue {
                    label: value.clone(),
                    value,
                }
            })
            .collect();
        Self {
            name: name.into(),
            values,
        }
    }

    /// Build a dimension from (raw value, display label) pairs.
    pub fn with_labels(name: impl Into<String>, pairs: &[(&str, &str)]) -> Self {
        let values = pairs
            .iter()
            .map(|(value, label)| DimensionValue {
                value: (*value).to_string(),
                label: (*label).to_string(),
            })
            .collect();
        Self {
            name: name.into(),
            values,
        }
    }

    /// Position of a raw value inside the canonical domain, if declared.
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.values.iter().position(|entry| entry.value == value)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.index_of(value).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw values in canonical order.
    pub fn raw_values(&self) -> Vec<&str> {
        self.values.iter().map(|entry| entry.value.as_str()).collect()
    }

    /// Display labels in canonical order.
    pub fn labels(&self) -> Vec<&str> {
        self.values.iter().map(|entry| entry.label.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_follows_declaration_order_not_lexical() {
        let dim = Dimension::new("GENERE", ["Dona", "Home"]);
        assert_eq!(dim.index_of("Dona"), Some(0));
        assert_eq!(dim.index_of("Home"), Some(1));
        assert_eq!(dim.index_of("Altres"), None);
    }

    #[test]
    fn labels_can_differ_from_values() {
        let dim = Dimension::with_labels("NATURALESA", &[("Public", "Públic"), ("Privat", "Privat")]);
        assert_eq!(dim.raw_values(), vec!["Public", "Privat"]);
        assert_eq!(dim.labels(), vec!["Públic", "Privat"]);
        assert!(dim.contains("Public"));
        assert!(!dim.contains("Públic"));
    }
}
