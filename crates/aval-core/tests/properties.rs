//! Property tests: ordering invariance, reconciliation, bounds.

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use proptest::prelude::{Just, Strategy, prop, prop_assert, prop_assert_eq, proptest};

use aval_core::{ViewRequest, build_views, shared_bounds};
use aval_model::Dimension;

const TERRITORIES: [&str; 3] = ["Barcelona", "Girona", "Lleida"];
const SECTORS: [&str; 2] = ["Public", "Privat"];
const GENDERS: [&str; 2] = ["Dona", "Home"];

type Record = (usize, usize, usize, f64);

fn frame_from(records: &[Record]) -> DataFrame {
    let territory: Vec<String> = records
        .iter()
        .map(|r| TERRITORIES[r.0].to_string())
        .collect();
    let sector: Vec<String> = records.iter().map(|r| SECTORS[r.1].to_string()).collect();
    let gender: Vec<String> = records.iter().map(|r| GENDERS[r.2].to_string()).collect();
    let score: Vec<Option<f64>> = records.iter().map(|r| Some(r.3)).collect();
    let cols: Vec<Column> = vec![
        Series::new("AREA_TERRITORIAL".into(), territory).into_column(),
        Series::new("NATURALESA".into(), sector).into_column(),
        Series::new("GENERE".into(), gender).into_column(),
        Series::new("PLING".into(), score).into_column(),
    ];
    DataFrame::new(cols).unwrap()
}

fn request() -> ViewRequest {
    ViewRequest {
        selector: Dimension::new("AREA_TERRITORIAL", TERRITORIES),
        rows: Dimension::new("NATURALESA", SECTORS),
        cols: Dimension::new("GENERE", GENDERS),
        measures: vec!["PLING".to_string()],
        all_label: "Tots".to_string(),
    }
}

fn records_strategy() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(
        (0..TERRITORIES.len(), 0..SECTORS.len(), 0..GENDERS.len(), 0.0..100.0f64),
        1..40,
    )
}

fn approx_eq(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => (a - b).abs() < 1e-9,
        _ => false,
    }
}

proptest! {
    #[test]
    fn views_are_invariant_under_record_order(
        (original, shuffled) in records_strategy().prop_flat_map(|records| {
            (Just(records.clone()), Just(records).prop_shuffle())
        })
    ) {
        let req = request();
        let a = build_views(&frame_from(&original), &req).unwrap();
        let b = build_views(&frame_from(&shuffled), &req).unwrap();
        prop_assert_eq!(&a.order, &b.order);
        for selector in &a.order {
            let va = a.view(selector, "PLING").unwrap();
            let vb = b.view(selector, "PLING").unwrap();
            prop_assert_eq!(&va.row_labels, &vb.row_labels);
            prop_assert_eq!(&va.col_labels, &vb.col_labels);
            for row in 0..va.cells.len() {
                for col in 0..va.cells[row].len() {
                    prop_assert!(approx_eq(va.cell(row, col), vb.cell(row, col)));
                }
            }
        }
    }

    #[test]
    fn aggregate_view_reconciles_with_weighted_selector_means(records in records_strategy()) {
        let req = request();
        let views = build_views(&frame_from(&records), &req).unwrap();
        let all = views.view("Tots", "PLING").unwrap();
        for row in 0..SECTORS.len() {
            for col in 0..GENDERS.len() {
                let matching: Vec<f64> = records
                    .iter()
                    .filter(|r| r.1 == row && r.2 == col)
                    .map(|r| r.3)
                    .collect();
                let expected = if matching.is_empty() {
                    None
                } else {
                    Some(matching.iter().sum::<f64>() / matching.len() as f64)
                };
                prop_assert!(approx_eq(all.cell(row, col), expected));
            }
        }
    }

    #[test]
    fn bounds_bracket_every_cell_and_are_step_multiples(records in records_strategy()) {
        let req = request();
        let views = build_views(&frame_from(&records), &req).unwrap();
        let pool = views.views_for_measure("PLING");
        let (min, max) = shared_bounds(&pool, 5.0).unwrap();
        prop_assert_eq!(min % 5.0, 0.0);
        prop_assert_eq!(max % 5.0, 0.0);
        for view in pool {
            for value in view.non_null_values() {
                prop_assert!(min <= value && value <= max);
            }
        }
    }

    #[test]
    fn same_input_gives_identical_output(records in records_strategy()) {
        let req = request();
        let frame = frame_from(&records);
        let first = build_views(&frame, &req).unwrap();
        let second = build_views(&frame, &req).unwrap();
        prop_assert_eq!(first, second);
    }
}
