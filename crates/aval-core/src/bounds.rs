//! Shared color-scale bounds across a set of views.
//!
//! Two heatmaps that swap slices through a dropdown must keep one scale,
//! otherwise changing the selector silently rescales color intensity and
//! misleads a reader comparing two slices.

use aval_model::{AvalError, Result};

use crate::builder::View;

/// Compute one (min, max) pair bracketing every non-null cell of `views`,
/// expanded outward to multiples of `step` (floor for min, ceil for max).
///
/// # Errors
///
/// [`AvalError::EmptyInput`] when no view holds a non-null cell, and
/// [`AvalError::Message`] for a non-positive step.
pub fn shared_bounds(views: &[&View], step: f64) -> Result<(f64, f64)> {
    if !step.is_finite() || step <= 0.0 {
        return Err(AvalError::Message(format!(
            "color scale step must be positive, got {step}"
        )));
    }
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut seen = false;
    for view in views {
        for row in &view.cells {
            for cell in row.iter().flatten() {
                seen = true;
                min = min.min(*cell);
                max = max.max(*cell);
            }
        }
    }
    if !seen {
        return Err(AvalError::EmptyInput);
    }
    Ok(((min / step).floor() * step, (max / step).ceil() * step))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(cells: Vec<Vec<Option<f64>>>) -> View {
        View {
            measure: "PLING".to_string(),
            row_labels: vec!["Públic".to_string(), "Privat".to_string()],
            col_labels: vec!["Dona".to_string(), "Home".to_string()],
            cells,
        }
    }

    #[test]
    fn bounds_are_step_multiples_and_bracket_cells() {
        let a = view(vec![
            vec![Some(71.2), Some(68.9)],
            vec![Some(74.0), None],
        ]);
        let b = view(vec![
            vec![Some(66.1), Some(82.4)],
            vec![None, Some(77.7)],
        ]);
        let (min, max) = shared_bounds(&[&a, &b], 5.0).unwrap();
        assert_eq!(min, 65.0);
        assert_eq!(max, 85.0);
        for v in a.non_null_values().into_iter().chain(b.non_null_values()) {
            assert!(min <= v && v <= max);
        }
        assert_eq!(min % 5.0, 0.0);
        assert_eq!(max % 5.0, 0.0);
    }

    #[test]
    fn exact_multiples_are_not_widened() {
        let a = view(vec![vec![Some(65.0), Some(85.0)]]);
        let (min, max) = shared_bounds(&[&a], 5.0).unwrap();
        assert_eq!((min, max), (65.0, 85.0));
    }

    #[test]
    fn all_null_views_are_empty_input() {
        let a = view(vec![vec![None, None], vec![None, None]]);
        assert!(matches!(
            shared_bounds(&[&a], 5.0),
            Err(AvalError::EmptyInput)
        ));
    }

    #[test]
    fn non_positive_step_is_rejected() {
        let a = view(vec![vec![Some(70.0)]]);
        assert!(shared_bounds(&[&a], 0.0).is_err());
    }

    #[test]
    fn negative_values_floor_away_from_zero() {
        let a = view(vec![vec![Some(-3.2), Some(4.1)]]);
        let (min, max) = shared_bounds(&[&a], 5.0).unwrap();
        assert_eq!((min, max), (-5.0, 5.0));
    }
}
