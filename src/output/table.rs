use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ContentArrangement, Table,
    modifiers::UTF8_SOLID_INNER_BORDERS, presets::UTF8_FULL,
};

use crate::cost::TokenUsage;
use crate::pricing::ModelPricing;

fn header_cell(text: &str, use_color: bool) -> Cell {
    let mut cell = Cell::new(text).add_attribute(Attribute::Bold);
    if use_color {
        cell = cell.fg(Color::Cyan);
    }
    cell
}

fn right_cell(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Per-million rate with trailing zeros trimmed: "$1.25", "$0.125", "$10".
pub(super) fn format_rate(value: f64) -> String {
    let text = format!("{value:.4}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("${text}")
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn rate_cells(pricing: &ModelPricing) -> Vec<Cell> {
    vec![
        right_cell(format_rate(pricing.input)),
        right_cell(format_rate(pricing.cached_input)),
        right_cell(format_rate(pricing.output)),
    ]
}

pub(crate) fn print_pricing_table(rows: &[(String, ModelPricing)], use_color: bool) {
    let mut table = new_table();
    table.set_header(vec![
        header_cell("Model", use_color),
        header_cell("Input $/M", use_color),
        header_cell("Cached $/M", use_color),
        header_cell("Output $/M", use_color),
    ]);

    for (model, pricing) in rows {
        let mut cells = vec![Cell::new(model)];
        cells.extend(rate_cells(pricing));
        table.add_row(cells);
    }

    println!("{table}");
}

pub(crate) fn print_cost_table(model: &str, usage: &TokenUsage, cost: f64, use_color: bool) {
    let mut table = new_table();
    table.set_header(vec![
        header_cell("Model", use_color),
        header_cell("Input", use_color),
        header_cell("Cached", use_color),
        header_cell("Output", use_color),
        header_cell("Cost", use_color),
    ]);

    let mut cost_cell = right_cell(format!("${cost:.4}")).add_attribute(Attribute::Bold);
    if use_color {
        cost_cell = cost_cell.fg(Color::Green);
    }

    table.add_row(vec![
        Cell::new(model),
        right_cell(usage.input_tokens.to_string()),
        right_cell(usage.cached_input_tokens.to_string()),
        right_cell(usage.output_tokens.to_string()),
        cost_cell,
    ]);

    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_rate_trims_trailing_zeros() {
        assert_eq!(format_rate(1.25), "$1.25");
        assert_eq!(format_rate(0.125), "$0.125");
        assert_eq!(format_rate(10.0), "$10");
        assert_eq!(format_rate(0.0), "$0");
    }
}
