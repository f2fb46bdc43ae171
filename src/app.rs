use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use eframe::egui;

use crate::color::SpeciesPalette;
use crate::config::{DashboardConfig, Link};
use crate::data::loader;
use crate::data::sample;
use crate::state::{Session, SessionError};
use crate::ui::{cards, panels, plot, table::GridView};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PenguinsApp {
    pub session: Session,
    pub palette: SpeciesPalette,
    pub grid: GridView,
    pub links: Vec<Link>,
    /// Where the current dataset came from, for the top bar.
    pub source_label: String,
    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl PenguinsApp {
    /// Build the app from configuration: palette, filter defaults and the
    /// initial dataset (built-in unless `dataset_path` is set).
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        let palette = SpeciesPalette::from_config(&config.species_colors)?;
        let (dataset, source_label) = match &config.dataset_path {
            Some(path) => {
                let ds = loader::load_file(path)
                    .with_context(|| format!("loading {}", path.display()))?;
                (Arc::new(ds), file_label(path))
            }
            None => (sample::load_penguins()?, BUILT_IN.to_string()),
        };
        log::info!("Starting with {} records from {source_label}", dataset.len());

        let session = Session::new(dataset, config.filters.clone())?;
        Ok(Self {
            session,
            palette,
            grid: GridView::default(),
            links: config.links.clone(),
            source_label,
            status_message: None,
        })
    }

    /// Load a file and make it the session's dataset. On failure the
    /// current dataset stays and the error is shown in the top bar.
    pub fn open_file(&mut self, path: &Path) {
        match loader::load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} records ({} species) from {}",
                    dataset.len(),
                    dataset.species_present.len(),
                    path.display()
                );
                let result = self.session.replace_dataset(Arc::new(dataset));
                self.finish_swap(file_label(path), result);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    pub fn reset_dataset(&mut self) {
        match sample::load_penguins() {
            Ok(dataset) => {
                let result = self.session.replace_dataset(dataset);
                self.finish_swap(BUILT_IN.to_string(), result);
            }
            Err(e) => {
                log::error!("Failed to load built-in table: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Record the new source and clear the previous status. A failure from
    /// the swap itself stays visible.
    fn finish_swap(&mut self, source_label: String, result: Result<(), SessionError>) {
        self.source_label = source_label;
        self.status_message = None;
        self.report(result);
    }

    /// Surface a session update failure instead of dropping it.
    pub fn report(&mut self, result: Result<(), SessionError>) {
        if let Err(e) = result {
            log::error!("Session update failed: {e}");
            self.status_message = Some(format!("Error: {e}"));
        }
    }
}

const BUILT_IN: &str = "built-in sample";

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl eframe::App for PenguinsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, self);
        });

        // ---- Left side panel: filter controls ----
        egui::SidePanel::left("filter_panel")
            .default_width(230.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, self);
            });

        // ---- Central panel: value boxes, plot and grid ----
        egui::CentralPanel::default().show(ctx, |ui| {
            cards::value_boxes(ui, &self.session);
            ui.add_space(8.0);
            ui.columns(2, |cols| {
                cards::card(&mut cols[0], "Bill length and depth", |ui| {
                    plot::bill_scatter_plot(ui, &self.session, &self.palette);
                });
                cards::card(&mut cols[1], "Penguin Data", |ui| {
                    self.grid.show(ui, self.session.grid_rows());
                });
            });
        });
    }
}
