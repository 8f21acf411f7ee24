//! Plain-text rendering of a [`ViewSurface`].

use std::fmt::Write as _;

use client_core::{Cell, Table, ViewSurface};
use shared::domain::Axis;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    Unicode,
    Markup,
}

impl CellStyle {
    fn render(self, cell: &Cell) -> String {
        match self {
            CellStyle::Unicode => cell.to_unicode(),
            CellStyle::Markup => cell.to_markup(),
        }
    }
}

pub fn render_surface(surface: &ViewSurface, max_rows: usize, style: CellStyle) -> String {
    let mut out = String::new();

    match &surface.summary {
        Some(summary) => {
            let counts: Vec<String> = Axis::ALL
                .iter()
                .map(|axis| format!("{axis}={}", summary.axis(*axis)))
                .collect();
            let _ = writeln!(
                out,
                "combinations: {}  total={}",
                counts.join(" "),
                summary.total
            );
        }
        None => out.push_str("combinations: -\n"),
    }

    out.push('\n');
    render_table(&mut out, &surface.rows, max_rows, style);
    out.push('\n');
    render_table(&mut out, &surface.terms, usize::MAX, style);
    out.push('\n');

    let controls = &surface.controls;
    let _ = writeln!(
        out,
        "page {}  [{}prev] [{}next] [{}{}]",
        surface.page_label,
        enabled_mark(controls.prev_enabled),
        enabled_mark(controls.next_enabled),
        enabled_mark(controls.submit_enabled),
        controls.submit_label
    );
    out
}

fn enabled_mark(enabled: bool) -> &'static str {
    if enabled {
        ""
    } else {
        "x "
    }
}

fn render_table(out: &mut String, table: &Table, max_rows: usize, style: CellStyle) {
    let body = table.body();
    let shown = body.len().min(max_rows);
    let lines: Vec<Vec<String>> = table
        .header()
        .iter()
        .chain(body[..shown].iter())
        .map(|row| row.iter().map(|cell| style.render(cell)).collect())
        .collect();

    let columns = lines.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for line in &lines {
        for (index, text) in line.iter().enumerate() {
            widths[index] = widths[index].max(text.chars().count());
        }
    }

    for (index, line) in lines.iter().enumerate() {
        let cells: Vec<String> = line
            .iter()
            .enumerate()
            .map(|(column, text)| {
                let pad = widths[column].saturating_sub(text.chars().count());
                format!("{text}{}", " ".repeat(pad))
            })
            .collect();
        let _ = writeln!(out, "{}", cells.join(" | ").trim_end());
        if index + 1 == table.header_rows() {
            let rule: usize = widths.iter().sum::<usize>() + 3 * columns.saturating_sub(1);
            let _ = writeln!(out, "{}", "-".repeat(rule));
        }
    }

    if body.len() > shown {
        let _ = writeln!(out, "... {} more rows on this page", body.len() - shown);
    }
}

#[cfg(test)]
mod tests {
    use client_core::{ControlState, NavigationState};
    use shared::domain::SimulationParameters;

    use super::*;

    #[test]
    fn truncates_long_bodies() {
        let mut surface = ViewSurface::new(SimulationParameters::default());
        for i in 0..5 {
            surface
                .rows
                .push_row(vec![Cell::text((i + 1).to_string()), Cell::text("x")]);
        }
        let text = render_surface(&surface, 2, CellStyle::Unicode);
        assert!(text.contains("... 3 more rows on this page"));
        assert!(text.contains("combinations: -"));
    }

    #[test]
    fn marks_disabled_controls() {
        let mut surface = ViewSurface::new(SimulationParameters::default());
        surface.controls = ControlState::idle(NavigationState {
            prev_enabled: false,
            next_enabled: true,
        });
        let text = render_surface(&surface, 10, CellStyle::Markup);
        assert!(text.ends_with("page 1  [x prev] [next] [Simulate]\n"));
    }
}
