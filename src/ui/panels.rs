use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::app::PenguinsApp;
use crate::data::model::Species;

// ---------------------------------------------------------------------------
// Left side panel – filter controls
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, app: &mut PenguinsApp) {
    ui.heading("Filter controls");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Mass slider ----
            let settings = app.session.settings().clone();
            let mut mass = app.session.filter().mass_max;
            ui.strong("Mass");
            let slider = egui::Slider::new(&mut mass, settings.mass_min..=settings.mass_max)
                .suffix(" g")
                .step_by(1.0);
            if ui.add(slider).changed() {
                let result = app.session.set_mass_max(mass);
                app.report(result);
            }
            ui.add_space(6.0);

            // ---- Species checkboxes ----
            ui.horizontal(|ui: &mut Ui| {
                ui.strong("Species");
                if ui.small_button("All").clicked() {
                    let result = app.session.select_all_species();
                    app.report(result);
                }
                if ui.small_button("None").clicked() {
                    let result = app.session.select_no_species();
                    app.report(result);
                }
            });
            for species in Species::ALL {
                let mut checked = app.session.filter().species.contains(&species);
                let text = RichText::new(species.as_str()).color(app.palette.color_for(species));
                if ui.checkbox(&mut checked, text).changed() {
                    let result = app.session.set_species_selected(species, checked);
                    app.report(result);
                }
            }

            ui.separator();

            // ---- Links ----
            if !app.links.is_empty() {
                ui.label(RichText::new("Links").small().strong());
                for link in &app.links {
                    ui.hyperlink_to(link.label.as_str(), &link.url);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, app: &mut PenguinsApp) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(app);
                ui.close_menu();
            }
            if ui.button("Use built-in sample").clicked() {
                app.reset_dataset();
                ui.close_menu();
            }
        });

        ui.separator();

        let ds = app.session.dataset();
        ui.label(format!(
            "{}: {} penguins loaded, {} visible",
            app.source_label,
            ds.len(),
            app.session.count()
        ));

        if let Some(msg) = &app.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(app: &mut PenguinsApp) {
    let file = rfd::FileDialog::new()
        .set_title("Open penguins data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        app.open_file(&path);
    }
}
