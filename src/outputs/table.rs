//! Plain-text table rendering for the terminal.

use crate::models::Lead;

const MAX_TITLE_WIDTH: usize = 48;
const MAX_SOURCE_WIDTH: usize = 64;

/// Render leads as an aligned table with a numbered first column.
pub fn render_table(leads: &[Lead]) -> String {
    let rows: Vec<[String; 4]> = leads
        .iter()
        .enumerate()
        .map(|(i, lead)| {
            [
                i.to_string(),
                clip(&lead.title, MAX_TITLE_WIDTH),
                lead.phone.clone(),
                clip(&lead.source, MAX_SOURCE_WIDTH),
            ]
        })
        .collect();

    let header = ["#", "Title", "Phone", "Source"].map(str::to_string);
    let mut widths = header.clone().map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &header, &widths);
    let rule = widths.map(|w| "─".repeat(w));
    push_row(&mut out, &rule, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 4], widths: &[usize; 4]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Shorten to `max` characters, marking the cut with an ellipsis.
fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
