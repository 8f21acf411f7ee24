use client_core::{Cell, Table};
use eframe::egui;

const ROW_COL_WIDTH: f32 = 34.0;

/// Rows table: fixed header, virtualised body so a full page stays cheap to draw.
pub fn show_rows_table(ui: &mut egui::Ui, table: &Table) {
    let row_height = ui.text_style_height(&egui::TextStyle::Body) + ui.spacing().item_spacing.y;

    egui::Grid::new("rows_table_header")
        .min_col_width(ROW_COL_WIDTH)
        .max_col_width(ROW_COL_WIDTH)
        .show(ui, |ui| {
            for row in table.header() {
                for cell in row {
                    ui.strong(cell.to_unicode());
                }
                ui.end_row();
            }
        });
    ui.separator();

    let body = table.body();
    egui::ScrollArea::vertical()
        .id_salt("rows_table_body")
        .auto_shrink([false; 2])
        .show_rows(ui, row_height, body.len(), |ui, visible| {
            egui::Grid::new("rows_table_rows")
                .striped(true)
                .min_col_width(ROW_COL_WIDTH)
                .max_col_width(ROW_COL_WIDTH)
                .show(ui, |ui| {
                    for row in &body[visible] {
                        for cell in row {
                            ui.label(cell.to_unicode());
                        }
                        ui.end_row();
                    }
                });
        });
}

pub fn show_terms_table(ui: &mut egui::Ui, table: &Table) {
    egui::ScrollArea::vertical()
        .id_salt("terms_table")
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            egui::Grid::new("terms_table_grid")
                .striped(true)
                .show(ui, |ui| {
                    for row in table.header() {
                        for cell in row {
                            ui.strong(cell.to_unicode());
                        }
                        ui.end_row();
                    }
                    for row in table.body() {
                        for cell in row {
                            match cell {
                                Cell::SubTerms(_) => {
                                    ui.label(egui::RichText::new(cell.to_unicode()).monospace())
                                }
                                Cell::Text(text) => ui.label(text.as_str()),
                            };
                        }
                        ui.end_row();
                    }
                });
        });
}
