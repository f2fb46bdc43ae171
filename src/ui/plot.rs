use eframe::egui::Ui;
use egui_plot::{Legend, MarkerShape, Plot, Points};

use crate::color::SpeciesPalette;
use crate::state::Session;

// ---------------------------------------------------------------------------
// Bill length vs. bill depth scatter plot
// ---------------------------------------------------------------------------

/// Render the bill scatter plot, one coloured series per species.
pub fn bill_scatter_plot(ui: &mut Ui, session: &Session, palette: &SpeciesPalette) {
    if session.scatter().is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No penguins match the current filters.");
        });
        return;
    }

    Plot::new("bill_scatter")
        .legend(Legend::default())
        .x_axis_label("bill_length_mm")
        .y_axis_label("bill_depth_mm")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in session.scatter() {
                let points = Points::new(series.points.clone())
                    .name(series.species.as_str())
                    .color(palette.color_for(series.species))
                    .shape(MarkerShape::Circle)
                    .filled(true)
                    .radius(3.0);
                plot_ui.points(points);
            }
        });
}
