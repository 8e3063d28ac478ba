//! Type-safe enumerations for the dataset's fixed vocabularies.
//!
//! The source CSV stores these as Catalan strings; the enums pin down the
//! admissible values and their canonical display order so aggregation views
//! stay comparable across report runs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dimension::Dimension;

/// Student gender as recorded in the `GENERE` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    /// Canonical display order (female first, matching the published report).
    pub const ALL: [Gender; 2] = [Gender::Female, Gender::Male];

    /// Raw value as it appears in the source data.
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "Dona",
            Gender::Male => "Home",
        }
    }

    /// Build the cross-tabulation dimension for the given column name.
    pub fn dimension(column: &str) -> Dimension {
        Dimension::new(column, Self::ALL.iter().map(Gender::as_str))
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Dona" => Ok(Gender::Female),
            "Home" => Ok(Gender::Male),
            _ => Err(format!("unknown gender value: {s}")),
        }
    }
}

/// School ownership as recorded in the `NATURALESA` column.
///
/// The raw data uses "Public" (no accent); the report label carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchoolSector {
    Public,
    Private,
}

impl SchoolSector {
    pub const ALL: [SchoolSector; 2] = [SchoolSector::Public, SchoolSector::Private];

    /// Raw value as it appears in the source data.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchoolSector::Public => "Public",
            SchoolSector::Private => "Privat",
        }
    }

    /// Display label for report text.
    pub fn label(&self) -> &'static str {
        match self {
            SchoolSector::Public => "Públic",
            SchoolSector::Private => "Privat",
        }
    }

    pub fn dimension(column: &str) -> Dimension {
        let pairs: Vec<(&str, &str)> = Self::ALL
            .iter()
            .map(|sector| (sector.as_str(), sector.label()))
            .collect();
        Dimension::with_labels(column, &pairs)
    }
}

impl fmt::Display for SchoolSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for SchoolSector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Public" => Ok(SchoolSector::Public),
            "Privat" => Ok(SchoolSector::Private),
            _ => Err(format!("unknown school sector value: {s}")),
        }
    }
}

/// Attainment band as recorded in the `Nivell_Assoliment` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttainmentLevel {
    High,
    Medium,
    Low,
}

impl AttainmentLevel {
    /// Canonical stacking order, best band first.
    pub const ALL: [AttainmentLevel; 3] = [
        AttainmentLevel::High,
        AttainmentLevel::Medium,
        AttainmentLevel::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttainmentLevel::High => "Alt",
            AttainmentLevel::Medium => "Mitja",
            AttainmentLevel::Low => "Baix",
        }
    }

    /// Sort rank for the stacked display, best band first.
    pub fn sort_order(&self) -> u8 {
        match self {
            AttainmentLevel::High => 1,
            AttainmentLevel::Medium => 2,
            AttainmentLevel::Low => 3,
        }
    }

    pub fn dimension(column: &str) -> Dimension {
        Dimension::new(column, Self::ALL.iter().map(AttainmentLevel::as_str))
    }
}

impl fmt::Display for AttainmentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AttainmentLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Alt" => Ok(AttainmentLevel::High),
            "Mitja" => Ok(AttainmentLevel::Medium),
            "Baix" => Ok(AttainmentLevel::Low),
            _ => Err(format!("unknown attainment level: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_round_trip() {
        assert_eq!("Dona".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!(" Home ".parse::<Gender>().unwrap(), Gender::Male);
        assert!("D".parse::<Gender>().is_err());
    }

    #[test]
    fn sector_label_differs_from_raw_value() {
        assert_eq!(SchoolSector::Public.as_str(), "Public");
        assert_eq!(SchoolSector::Public.label(), "Públic");
        let dim = SchoolSector::dimension("NATURALESA");
        assert_eq!(dim.raw_values(), vec!["Public", "Privat"]);
        assert_eq!(dim.labels(), vec!["Públic", "Privat"]);
    }

    #[test]
    fn attainment_sort_order() {
        assert!(AttainmentLevel::High.sort_order() < AttainmentLevel::Medium.sort_order());
        assert!(AttainmentLevel::Medium.sort_order() < AttainmentLevel::Low.sort_order());
    }

    #[test]
    fn attainment_dimension_order() {
        let dim = AttainmentLevel::dimension("Nivell_Assoliment");
        assert_eq!(dim.raw_values(), vec!["Alt", "Mitja", "Baix"]);
    }
}
