use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::Session;

const BOX_FILL: Color32 = Color32::from_rgb(0x4a, 0x3f, 0x9e);

// ---------------------------------------------------------------------------
// Value boxes and cards
// ---------------------------------------------------------------------------

/// The three summary boxes: count and the two bill means.
pub fn value_boxes(ui: &mut Ui, session: &Session) {
    let entries = [
        ("Number of penguins", session.count().to_string()),
        (
            "Average bill length",
            session.mean_bill_length().display_with_unit("mm"),
        ),
        (
            "Average bill depth",
            session.mean_bill_depth().display_with_unit("mm"),
        ),
    ];

    ui.columns(entries.len(), |cols| {
        for (ui, (title, value)) in cols.iter_mut().zip(entries) {
            value_box(ui, title, &value);
        }
    });
}

fn value_box(ui: &mut Ui, title: &str, value: &str) {
    egui::Frame::group(ui.style())
        .fill(BOX_FILL)
        .inner_margin(12.0)
        .show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(title).color(Color32::WHITE));
            ui.label(RichText::new(value).color(Color32::WHITE).size(28.0).strong());
        });
}

/// A titled frame filling its column.
pub fn card(ui: &mut Ui, title: &str, add_contents: impl FnOnce(&mut Ui)) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.strong(title);
        ui.separator();
        add_contents(ui);
    });
}
