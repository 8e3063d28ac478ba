//! Integration tests for the selector-keyed view builder.

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};

use aval_core::{ViewRequest, build_views, shared_bounds};
use aval_model::{AvalError, Dimension};

fn test_frame(cats: Vec<(&str, Vec<&str>)>, nums: Vec<(&str, Vec<Option<f64>>)>) -> DataFrame {
    let mut cols: Vec<Column> = Vec::new();
    for (name, values) in cats {
        cols.push(
            Series::new(
                name.into(),
                values.iter().copied().map(String::from).collect::<Vec<_>>(),
            )
            .into_column(),
        );
    }
    for (name, values) in nums {
        cols.push(Series::new(name.into(), values).into_column());
    }
    DataFrame::new(cols).unwrap()
}

fn request() -> ViewRequest {
    ViewRequest {
        selector: Dimension::new("AREA_TERRITORIAL", ["Barcelona", "Girona"]),
        rows: Dimension::with_labels("NATURALESA", &[("Public", "Públic"), ("Privat", "Privat")]),
        cols: Dimension::new("GENERE", ["Dona", "Home"]),
        measures: vec!["PLING".to_string()],
        all_label: "Tots".to_string(),
    }
}

fn three_record_frame() -> DataFrame {
    test_frame(
        vec![
            ("AREA_TERRITORIAL", vec!["Barcelona", "Barcelona", "Girona"]),
            ("NATURALESA", vec!["Public", "Public", "Public"]),
            ("GENERE", vec!["Dona", "Home", "Dona"]),
        ],
        vec![("PLING", vec![Some(70.0), Some(80.0), Some(60.0)])],
    )
}

#[test]
fn means_per_selector_and_null_for_missing_combinations() {
    let frame = three_record_frame();
    let views = build_views(&frame, &request()).unwrap();

    let barcelona = views.view("Barcelona", "PLING").unwrap();
    assert_eq!(barcelona.cell(0, 0), Some(70.0));
    assert_eq!(barcelona.cell(0, 1), Some(80.0));
    assert_eq!(barcelona.cell(1, 0), None);
    assert_eq!(barcelona.cell(1, 1), None);

    let all = views.view("Tots", "PLING").unwrap();
    assert_eq!(all.cell(0, 0), Some(65.0));
    assert_eq!(all.cell(0, 1), Some(80.0));
}

#[test]
fn every_view_has_full_cell_grid_with_finite_or_null_cells() {
    let frame = three_record_frame();
    let req = request();
    let views = build_views(&frame, &req).unwrap();
    assert_eq!(views.order, vec!["Tots", "Barcelona", "Girona"]);
    for selector in &views.order {
        let view = views.view(selector, "PLING").unwrap();
        assert_eq!(view.cells.len(), req.rows.len());
        for row in &view.cells {
            assert_eq!(row.len(), req.cols.len());
            for cell in row.iter().flatten() {
                assert!(cell.is_finite());
            }
        }
    }
}

#[test]
fn out_of_domain_selector_is_excluded_everywhere_and_counted() {
    let frame = test_frame(
        vec![
            (
                "AREA_TERRITORIAL",
                vec!["Barcelona", "Barcelona", "Girona", "Ceuta"],
            ),
            ("NATURALESA", vec!["Public", "Public", "Public", "Public"]),
            ("GENERE", vec!["Dona", "Home", "Dona", "Dona"]),
        ],
        vec![("PLING", vec![Some(70.0), Some(80.0), Some(60.0), Some(10.0)])],
    );
    let views = build_views(&frame, &request()).unwrap();

    assert_eq!(views.excluded.total(), 1);
    let by_value = views.excluded.counts.get("AREA_TERRITORIAL").unwrap();
    assert_eq!(by_value.get("Ceuta"), Some(&1));

    // The aggregate view must not see the excluded record.
    let all = views.view("Tots", "PLING").unwrap();
    assert_eq!(all.cell(0, 0), Some(65.0));
}

#[test]
fn out_of_domain_row_value_is_counted_under_its_dimension() {
    let frame = test_frame(
        vec![
            ("AREA_TERRITORIAL", vec!["Barcelona", "Barcelona"]),
            ("NATURALESA", vec!["Public", "Concertat"]),
            ("GENERE", vec!["Dona", "Dona"]),
        ],
        vec![("PLING", vec![Some(70.0), Some(50.0)])],
    );
    let views = build_views(&frame, &request()).unwrap();
    assert_eq!(views.excluded.total(), 1);
    assert!(views.excluded.counts.contains_key("NATURALESA"));
    assert_eq!(views.view("Barcelona", "PLING").unwrap().cell(0, 0), Some(70.0));
}

#[test]
fn null_measure_cells_do_not_contribute() {
    let frame = test_frame(
        vec![
            ("AREA_TERRITORIAL", vec!["Barcelona", "Barcelona"]),
            ("NATURALESA", vec!["Public", "Public"]),
            ("GENERE", vec!["Dona", "Dona"]),
        ],
        vec![("PLING", vec![Some(70.0), None])],
    );
    let views = build_views(&frame, &request()).unwrap();
    assert_eq!(views.view("Barcelona", "PLING").unwrap().cell(0, 0), Some(70.0));
}

#[test]
fn missing_measure_column_fails_fast() {
    let frame = three_record_frame();
    let mut req = request();
    req.measures = vec!["PMAT".to_string()];
    match build_views(&frame, &req) {
        Err(AvalError::MeasureNotFound(name)) => assert_eq!(name, "PMAT"),
        other => panic!("expected MeasureNotFound, got {other:?}"),
    }
}

#[test]
fn empty_frame_is_empty_input() {
    let frame = test_frame(
        vec![
            ("AREA_TERRITORIAL", vec![]),
            ("NATURALESA", vec![]),
            ("GENERE", vec![]),
        ],
        vec![("PLING", vec![])],
    );
    assert!(matches!(
        build_views(&frame, &request()),
        Err(AvalError::EmptyInput)
    ));
}

#[test]
fn row_and_column_order_follow_the_declared_domains() {
    // Records arrive private-first and male-first; the view must not care.
    let frame = test_frame(
        vec![
            ("AREA_TERRITORIAL", vec!["Girona", "Girona", "Girona", "Girona"]),
            ("NATURALESA", vec!["Privat", "Privat", "Public", "Public"]),
            ("GENERE", vec!["Home", "Dona", "Home", "Dona"]),
        ],
        vec![("PLING", vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)])],
    );
    let views = build_views(&frame, &request()).unwrap();
    let view = views.view("Girona", "PLING").unwrap();
    assert_eq!(view.row_labels, vec!["Públic", "Privat"]);
    assert_eq!(view.col_labels, vec!["Dona", "Home"]);
    assert_eq!(view.cells[0], vec![Some(4.0), Some(3.0)]);
    assert_eq!(view.cells[1], vec![Some(2.0), Some(1.0)]);
}

#[test]
fn views_serialize_null_cells_not_zero() {
    let frame = three_record_frame();
    let views = build_views(&frame, &request()).unwrap();
    let json = serde_json::to_string(views.view("Barcelona", "PLING").unwrap()).unwrap();
    assert!(json.contains("null"));
    assert!(json.contains("[70.0,80.0]"));
}

#[test]
fn building_twice_yields_identical_output() {
    let frame = three_record_frame();
    let req = request();
    let first = build_views(&frame, &req).unwrap();
    let second = build_views(&frame, &req).unwrap();
    assert_eq!(first, second);
}

#[test]
fn two_measures_share_bounds_across_all_selector_values() {
    let frame = test_frame(
        vec![
            ("AREA_TERRITORIAL", vec!["Barcelona", "Girona"]),
            ("NATURALESA", vec!["Public", "Public"]),
            ("GENERE", vec!["Dona", "Home"]),
        ],
        vec![
            ("PLING", vec![Some(71.0), Some(58.0)]),
            ("PMAT", vec![Some(84.0), Some(66.0)]),
        ],
    );
    let mut req = request();
    req.measures = vec!["PLING".to_string(), "PMAT".to_string()];
    let views = build_views(&frame, &req).unwrap();

    let mut pool = views.views_for_measure("PLING");
    pool.extend(views.views_for_measure("PMAT"));
    let (min, max) = shared_bounds(&pool, 5.0).unwrap();
    assert_eq!((min, max), (55.0, 85.0));
}
