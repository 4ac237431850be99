// src/clean/report.rs
use crate::table::Table;
use tracing::info;

/// Widest a preview cell gets before it is cut.
const MAX_CELL_WIDTH: usize = 24;

/// Log column types, null counts and the first `preview_rows` rows of `table`.
/// Purely observational.
pub fn log_diagnostics(label: &str, table: &Table, preview_rows: usize) {
    info!("data types in {}:", label);
    for col in &table.columns {
        info!("  {:<20} {}", col.name, col.ty);
    }

    info!("missing values in {} after cleaning:", label);
    for (col, nulls) in table.columns.iter().zip(table.null_counts()) {
        info!("  {:<20} {}", col.name, nulls);
    }

    info!("first few rows of {} after cleaning:", label);
    for line in preview_lines(table, preview_rows) {
        info!("  {}", line);
    }
}

/// Fixed-width text rendering of the header plus the first `n` rows.
pub fn preview_lines(table: &Table, n: usize) -> Vec<String> {
    let shown = &table.rows[..n.min(table.rows.len())];

    let cells: Vec<Vec<String>> = shown
        .iter()
        .map(|row| row.iter().map(|v| truncate(&v.to_string())).collect())
        .collect();

    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(truncate(&c.name).chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render = |vals: Vec<String>| -> String {
        vals.iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<width$}", v, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(shown.len() + 1);
    lines.push(render(table.columns.iter().map(|c| truncate(&c.name)).collect()));
    for row in cells {
        lines.push(render(row));
    }
    lines
}

fn truncate(s: &str) -> String {
    if s.chars().count() <= MAX_CELL_WIDTH {
        s.to_string()
    } else {
        let cut: String = s.chars().take(MAX_CELL_WIDTH - 3).collect();
        format!("{}...", cut)
    }
}
