use std::collections::HashMap;

use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::grid::{ColumnFilter, GridColumn, GridFilters, GridRow, SortDirection};

// ---------------------------------------------------------------------------
// Filterable data grid
// ---------------------------------------------------------------------------

/// Grid-local UI state: column filters, sort and the raw text of the filter
/// inputs.
#[derive(Debug, Default)]
pub struct GridView {
    pub filters: GridFilters,
    /// Text filter for string columns, `(min, max)` text for numeric ones.
    inputs: HashMap<GridColumn, (String, String)>,
}

impl GridView {
    /// Render the filter row and the table for `rows`.
    pub fn show(&mut self, ui: &mut Ui, rows: &[GridRow]) {
        self.filter_inputs(ui);
        let shown = self.filters.apply(rows);
        ui.label(format!("{} of {} rows", shown.len(), rows.len()));

        let sort = self.filters.sort;
        let mut clicked = None;

        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(Column::auto().at_least(72.0), GridColumn::ALL.len())
            .header(22.0, |mut header| {
                for column in GridColumn::ALL {
                    header.col(|ui| {
                        let arrow = match sort {
                            Some((c, SortDirection::Ascending)) if c == column => " ⏶",
                            Some((c, SortDirection::Descending)) if c == column => " ⏷",
                            _ => "",
                        };
                        if ui.button(format!("{}{arrow}", column.header())).clicked() {
                            clicked = Some(column);
                        }
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, shown.len(), |mut row| {
                    let record = &rows[shown[row.index()]];
                    for column in GridColumn::ALL {
                        row.col(|ui| {
                            ui.label(record.cell(column));
                        });
                    }
                });
            });

        if let Some(column) = clicked {
            self.filters.toggle_sort(column);
        }
    }

    fn filter_inputs(&mut self, ui: &mut Ui) {
        ui.horizontal_wrapped(|ui: &mut Ui| {
            for column in GridColumn::ALL {
                let (first, second) = self.inputs.entry(column).or_default();
                let changed = if column.is_numeric() {
                    ui.label(column.header());
                    let lo = ui.add(
                        egui::TextEdit::singleline(first)
                            .hint_text("min")
                            .desired_width(48.0),
                    );
                    let hi = ui.add(
                        egui::TextEdit::singleline(second)
                            .hint_text("max")
                            .desired_width(48.0),
                    );
                    lo.changed() || hi.changed()
                } else {
                    ui.add(
                        egui::TextEdit::singleline(first)
                            .hint_text(column.header())
                            .desired_width(90.0),
                    )
                    .changed()
                };

                if changed {
                    let filter = if column.is_numeric() {
                        ColumnFilter::Range {
                            min: parse_bound(first),
                            max: parse_bound(second),
                        }
                    } else {
                        ColumnFilter::Text(first.clone())
                    };
                    self.filters.set(column, filter);
                }
            }
            if self.filters.is_active() && ui.small_button("Clear").clicked() {
                self.filters.clear();
                self.inputs.clear();
            }
        });
    }
}

/// Unparseable bounds are treated as open.
fn parse_bound(text: &str) -> Option<f64> {
    text.trim().parse().ok()
}
