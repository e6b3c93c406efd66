//! Table formatting for pseudo-localization previews.

use comfy_table::{ContentArrangement, Table, presets};

/// One pseudo-localized string.
pub struct PseudoRow {
    pub source: String,
    pub pseudo: String,
}

/// Formats source/pseudo pairs with their character counts.
pub fn format_pseudo_table(rows: &[PseudoRow]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Source", "Pseudo", "Growth"]);

    for row in rows {
        let source_len = row.source.chars().count();
        let pseudo_len = row.pseudo.chars().count();
        table.add_row(vec![
            row.source.clone(),
            row.pseudo.clone(),
            format!("{source_len} -> {pseudo_len}"),
        ]);
    }

    table
}
