//! Plotly chart specifications.
//!
//! Each builder turns precomputed aggregation output into a `data` + `layout`
//! pair, serialized as JSON and handed to `Plotly.newPlot` by the report
//! template. Selector dropdowns carry every precomputed slice in their button
//! payloads, so switching never recomputes anything.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Value, json};

use aval_core::{DistributionViews, SelectorViews, SeriesPoint, View};

use crate::common::{fmt_cell, palette};

/// A renderable chart: Plotly traces plus layout.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub data: Vec<Value>,
    pub layout: Value,
}

impl ChartSpec {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Grouped bars of the languages-minus-maths balance by year, one trace per
/// gender, bar color keyed to the sign of the value.
pub fn balance_chart(series: &BTreeMap<String, Vec<SeriesPoint>>) -> ChartSpec {
    let traces = [
        ("Dona", "Dones", palette::FEMALE, palette::FEMALE_NEGATIVE),
        ("Home", "Homes", palette::MALE, palette::MALE_NEGATIVE),
    ];
    let mut data = Vec::new();
    for (key, name, positive, negative) in traces {
        let Some(points) = series.get(key) else {
            continue;
        };
        let x: Vec<i64> = points.iter().map(|p| p.x.round() as i64).collect();
        let y: Vec<f64> = points.iter().map(|p| p.y).collect();
        let colors: Vec<&str> = points
            .iter()
            .map(|p| if p.y >= 0.0 { positive } else { negative })
            .collect();
        data.push(json!({
            "type": "bar",
            "x": x,
            "y": y,
            "name": name,
            "marker": {"color": colors},
            "hovertemplate": format!(
                "<b>Any: %{{x}}</b><br>{name}<br>Diferència: %{{y:.2f}}<br><extra></extra>"
            ),
        }));
    }
    let layout = json!({
        "xaxis": {"title": "Any", "dtick": 1},
        "yaxis": {
            "title": "Diferència Llengües - Matemàtiques",
            "gridcolor": "rgba(200, 200, 200, 0.3)",
            "zeroline": true,
            "zerolinecolor": "gray",
        },
        "height": 550,
        "margin": {"l": 80, "r": 50, "t": 80, "b": 80},
        "paper_bgcolor": "rgba(0,0,0,0)",
        "plot_bgcolor": "rgba(0,0,0,0)",
        "barmode": "group",
        "legend": {
            "orientation": "h",
            "yanchor": "bottom",
            "y": 1.02,
            "xanchor": "right",
            "x": 1,
            "bgcolor": "rgba(255, 255, 255, 0.9)",
            "bordercolor": "gray",
            "borderwidth": 1,
        },
        "annotations": [
            zone_label("Millor en llengües", 0.98),
            zone_label("Millor en matemàtiques", 0.02),
        ],
        "shapes": [{
            "type": "line",
            "xref": "paper",
            "x0": 0,
            "x1": 1,
            "yref": "y",
            "y0": 0,
            "y1": 0,
            "line": {"dash": "dash", "color": "gray"},
        }],
    });
    ChartSpec { data, layout }
}

fn zone_label(text: &str, y: f64) -> Value {
    json!({
        "xref": "paper",
        "yref": "paper",
        "x": 0.5,
        "y": y,
        "text": text,
        "showarrow": false,
        "bgcolor": palette::ANNOTATION_BG,
        "font": {"color": "white", "size": 11, "family": "Arial"},
        "bordercolor": palette::ANNOTATION_BG,
        "borderwidth": 2,
        "borderpad": 6,
        "opacity": 0.9,
    })
}

/// One line+markers trace per territory: overall mean against relative age.
pub fn territory_age_chart(series: &BTreeMap<String, Vec<SeriesPoint>>) -> ChartSpec {
    let mut data = Vec::new();
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for (idx, (territory, points)) in series.iter().enumerate() {
        let color = palette::TERRITORY_LINES[idx % palette::TERRITORY_LINES.len()];
        let x: Vec<f64> = points.iter().map(|p| p.x).collect();
        let y: Vec<f64> = points.iter().map(|p| p.y).collect();
        for value in &y {
            y_min = y_min.min(*value);
            y_max = y_max.max(*value);
        }
        data.push(json!({
            "type": "scatter",
            "x": x,
            "y": y,
            "name": territory,
            "mode": "lines+markers",
            "line": {"width": 2.5, "color": color},
            "marker": {"size": 6},
            "hovertemplate": "<b>%{fullData.name}</b><br>Edat Relativa: %{x}<br>Mitjana Global: %{y:.2f}<br><extra></extra>",
        }));
    }
    let y_range = if y_min.is_finite() {
        vec![(y_min / 5.0).floor() * 5.0, (y_max / 5.0).ceil() * 5.0]
    } else {
        vec![0.0, 1.0]
    };
    let layout = json!({
        "xaxis": {"title": "Edat Relativa", "gridcolor": "rgba(200, 200, 200, 0.3)", "dtick": 1},
        "yaxis": {
            "title": "Mitjana Global",
            "gridcolor": "rgba(200, 200, 200, 0.3)",
            "range": y_range,
        },
        "height": 550,
        "margin": {"l": 80, "r": 50, "t": 30, "b": 80},
        "legend": {
            "orientation": "v",
            "yanchor": "middle",
            "y": 0.5,
            "xanchor": "left",
            "x": 1.02,
            "bgcolor": "rgba(255, 255, 255, 0.9)",
            "bordercolor": "gray",
            "borderwidth": 1,
        },
        "paper_bgcolor": "rgba(0,0,0,0)",
        "plot_bgcolor": "rgba(0,0,0,0)",
    });
    ChartSpec { data, layout }
}

/// Side-by-side languages/maths heatmaps with a shared color scale and a
/// selector dropdown swapping in each precomputed slice.
pub fn comparison_heatmaps(
    views: &SelectorViews,
    languages: &str,
    maths: &str,
    bounds: (f64, f64),
) -> ChartSpec {
    let default = views.order.first().cloned().unwrap_or_default();
    let (zmin, zmax) = bounds;

    let mut data = Vec::new();
    if let (Some(lang), Some(math)) = (
        views.view(&default, languages),
        views.view(&default, maths),
    ) {
        data.push(json!({
            "type": "heatmap",
            "z": lang.cells.clone(),
            "x": lang.col_labels.clone(),
            "y": lang.row_labels.clone(),
            "colorscale": palette::HEATMAP_SCALE,
            "text": text_matrix(lang),
            "texttemplate": "%{text}",
            "textfont": {"size": 16, "color": "black"},
            "showscale": false,
            "zmin": zmin,
            "zmax": zmax,
            "name": languages,
            "xaxis": "x",
            "yaxis": "y",
        }));
        data.push(json!({
            "type": "heatmap",
            "z": math.cells.clone(),
            "x": math.col_labels.clone(),
            "y": math.row_labels.clone(),
            "colorscale": palette::HEATMAP_SCALE,
            "text": text_matrix(math),
            "texttemplate": "%{text}",
            "textfont": {"size": 16, "color": "black"},
            "colorbar": {"title": "Puntuació", "x": 1.05},
            "zmin": zmin,
            "zmax": zmax,
            "name": maths,
            "xaxis": "x2",
            "yaxis": "y2",
        }));
    }

    let buttons: Vec<Value> = views
        .order
        .iter()
        .filter_map(|selector| {
            let lang = views.view(selector, languages)?;
            let math = views.view(selector, maths)?;
            Some(json!({
                "label": selector,
                "method": "update",
                "args": [
                    {
                        "z": [lang.cells.clone(), math.cells.clone()],
                        "text": [text_matrix(lang), text_matrix(math)],
                    },
                    {"title": heatmap_title(selector)},
                ],
            }))
        })
        .collect();

    let layout = json!({
        "updatemenus": dropdown(buttons),
        "title": heatmap_title(&default),
        "height": 500,
        "margin": {"l": 100, "r": 150, "t": 120, "b": 80},
        "paper_bgcolor": "rgba(0,0,0,0)",
        "plot_bgcolor": "rgba(0,0,0,0)",
        "xaxis": {"domain": [0.0, 0.425], "title": "Gènere"},
        "xaxis2": {"domain": [0.575, 1.0], "title": "Gènere", "anchor": "y2"},
        "yaxis": {"title": "Naturalesa Centre"},
        "yaxis2": {"anchor": "x2"},
        "annotations": [
            subplot_title("Puntuació en Llengües", 0.2125),
            subplot_title("Puntuació en Matemàtiques", 0.7875),
        ],
    });
    ChartSpec { data, layout }
}

fn heatmap_title(selector: &str) -> String {
    format!("Comparativa Llengües vs Matemàtiques - {selector}")
}

fn text_matrix(view: &View) -> Vec<Vec<String>> {
    view.cells
        .iter()
        .map(|row| row.iter().map(|cell| fmt_cell(*cell)).collect())
        .collect()
}

fn subplot_title(text: &str, x: f64) -> Value {
    json!({
        "text": text,
        "x": x,
        "y": 1.0,
        "xref": "paper",
        "yref": "paper",
        "xanchor": "center",
        "yanchor": "bottom",
        "showarrow": false,
        "font": {"size": 16},
    })
}

/// Stacked share-of-students bars per attainment band and year, with a
/// selector dropdown swapping the precomputed y-series.
pub fn attainment_chart(views: &DistributionViews) -> ChartSpec {
    let band_colors = [
        palette::ATTAINMENT_HIGH,
        palette::ATTAINMENT_MEDIUM,
        palette::ATTAINMENT_LOW,
    ];
    let default = views.order.first().cloned().unwrap_or_default();

    let mut data = Vec::new();
    if let Some(table) = views.tables.get(&default) {
        for (idx, label) in table.level_labels.iter().enumerate() {
            data.push(json!({
                "type": "bar",
                "x": table.years.clone(),
                "y": table.shares[idx].clone(),
                "name": label,
                "marker": {"color": band_colors[idx % band_colors.len()]},
                "hovertemplate": format!(
                    "<b>Any: %{{x}}</b><br>{label}: %{{y:.1f}}%<br><extra></extra>"
                ),
            }));
        }
    }

    let buttons: Vec<Value> = views
        .order
        .iter()
        .filter_map(|selector| {
            let table = views.tables.get(selector)?;
            Some(json!({
                "label": selector,
                "method": "update",
                "args": [
                    {"y": table.shares.clone()},
                    {"title": attainment_title(selector)},
                ],
            }))
        })
        .collect();

    let layout = json!({
        "updatemenus": dropdown(buttons),
        "title": attainment_title(&default),
        "barmode": "stack",
        "xaxis": {"title": "Any", "dtick": 1},
        "yaxis": {
            "title": "Percentatge d'alumnes (%)",
            "gridcolor": "rgba(200, 200, 200, 0.3)",
            "range": [0, 100],
        },
        "height": 500,
        "margin": {"l": 80, "r": 50, "t": 120, "b": 80},
        "legend": {
            "title": "Nivell Assoliment",
            "orientation": "v",
            "yanchor": "top",
            "y": 0.99,
            "xanchor": "right",
            "x": 0.99,
            "bgcolor": "rgba(255, 255, 255, 0.9)",
            "bordercolor": "gray",
            "borderwidth": 1,
        },
        "paper_bgcolor": "rgba(0,0,0,0)",
        "plot_bgcolor": "rgba(0,0,0,0)",
    });
    ChartSpec { data, layout }
}

fn attainment_title(selector: &str) -> String {
    format!("Distribució per Nivell d'Assoliment - {selector}")
}

fn dropdown(buttons: Vec<Value>) -> Value {
    json!([{
        "buttons": buttons,
        "direction": "down",
        "pad": {"r": 10, "t": 10},
        "showactive": true,
        "x": 0.5,
        "xanchor": "center",
        "y": 1.20,
        "yanchor": "top",
        "bgcolor": "white",
        "bordercolor": "gray",
        "borderwidth": 2,
    }])
}
