use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};

use aval_report::{fmt1, fmt_signed_pct, fmt_thousands};

use crate::types::ReportResult;

pub fn print_summary(result: &ReportResult) {
    println!("Input: {}", result.input.display());
    println!("Report: {}", result.output.display());

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.apply_modifier(UTF8_ROUND_CORNERS);
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new("Students analysed"),
        Cell::new(fmt_thousands(result.stats.students)),
    ]);
    table.add_row(vec![
        Cell::new("Records dropped (cleaning)"),
        Cell::new(fmt_thousands(result.clean.dropped)),
    ]);
    table.add_row(vec![
        Cell::new("Records excluded (domain)"),
        count_cell(result.excluded.total()),
    ]);
    table.add_row(vec![
        Cell::new("Territorial areas"),
        Cell::new(result.stats.territories),
    ]);
    table.add_row(vec![
        Cell::new("Overall mean"),
        Cell::new(fmt1(result.stats.overall_mean)),
    ]);
    table.add_row(vec![
        Cell::new("Growth vs previous year"),
        match result.stats.growth_pct {
            Some(pct) => Cell::new(fmt_signed_pct(pct)),
            None => Cell::new("-").fg(Color::DarkGrey),
        },
    ]);
    println!("{table}");

    print_exclusion_table(result);
}

fn print_exclusion_table(result: &ReportResult) {
    if result.excluded.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.apply_modifier(UTF8_ROUND_CORNERS);
    table.set_header(vec![
        header_cell("Dimension"),
        header_cell("Unexpected value"),
        header_cell("Records"),
    ]);
    if let Some(column) = table.column_mut(2) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    for (dimension, values) in &result.excluded.counts {
        for (value, count) in values {
            table.add_row(vec![
                Cell::new(dimension),
                Cell::new(value).fg(Color::Yellow),
                Cell::new(count),
            ]);
        }
    }
    println!("Excluded records by unexpected category:");
    println!("{table}");
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize) -> Cell {
    if count == 0 {
        Cell::new(count).fg(Color::DarkGrey)
    } else {
        Cell::new(count).fg(Color::Yellow)
    }
}
