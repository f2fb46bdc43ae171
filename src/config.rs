//! Dashboard configuration.
//!
//! Every field has a default, so an absent or partial JSON file is fine. The
//! file is named by the `PENGUINS_DASHBOARD_CONFIG` environment variable.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::color::parse_hex;
use crate::data::filter::FilterState;
use crate::data::model::Species;

pub const CONFIG_ENV: &str = "PENGUINS_DASHBOARD_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Window title.
    pub title: String,
    /// Initial inner window size in points.
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
    pub filters: FilterSettings,
    pub species_colors: SpeciesColors,
    /// Load this file instead of the built-in dataset.
    pub dataset_path: Option<PathBuf>,
    /// Hyperlinks listed under the filter controls.
    pub links: Vec<Link>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Penguins dashboard".to_string(),
            window_size: [1280.0, 860.0],
            min_window_size: [720.0, 480.0],
            filters: FilterSettings::default(),
            species_colors: SpeciesColors::default(),
            dataset_path: None,
            links: Link::defaults(),
        }
    }
}

impl DashboardConfig {
    /// Load from the file named by [`CONFIG_ENV`], or fall back to defaults.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                log::info!("Loading configuration from {}", path.display());
                Self::load_from(&path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: DashboardConfig = serde_json::from_str(text).context("parsing config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.filters.validate()?;
        for sp in Species::ALL {
            parse_hex(self.species_colors.hex_for(sp))
                .with_context(|| format!("species_colors.{sp}"))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Filter control settings
// ---------------------------------------------------------------------------

/// Bounds and defaults of the two filter controls.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Slider lower bound in grams.
    pub mass_min: f64,
    /// Slider upper bound in grams.
    pub mass_max: f64,
    /// Slider position at startup.
    pub mass_default: f64,
    /// Species checked at startup.
    pub species: BTreeSet<Species>,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            mass_min: 2000.0,
            mass_max: 6000.0,
            mass_default: 6000.0,
            species: Species::ALL.into_iter().collect(),
        }
    }
}

impl FilterSettings {
    pub fn validate(&self) -> Result<()> {
        if !(self.mass_min.is_finite() && self.mass_max.is_finite()) {
            bail!("mass bounds must be finite");
        }
        if self.mass_min >= self.mass_max {
            bail!(
                "mass_min ({}) must be below mass_max ({})",
                self.mass_min,
                self.mass_max
            );
        }
        if !(self.mass_min..=self.mass_max).contains(&self.mass_default) {
            bail!(
                "mass_default ({}) is outside {}..={}",
                self.mass_default,
                self.mass_min,
                self.mass_max
            );
        }
        Ok(())
    }

    /// Keep a threshold inside the slider bounds.
    pub fn clamp_mass(&self, mass: f64) -> f64 {
        mass.clamp(self.mass_min, self.mass_max)
    }

    pub fn initial_state(&self) -> FilterState {
        FilterState {
            mass_max: self.clamp_mass(self.mass_default),
            species: self.species.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Species colours
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpeciesColors {
    #[serde(rename = "Adelie")]
    pub adelie: String,
    #[serde(rename = "Chinstrap")]
    pub chinstrap: String,
    #[serde(rename = "Gentoo")]
    pub gentoo: String,
}

impl Default for SpeciesColors {
    fn default() -> Self {
        Self {
            adelie: "#858ae3".to_string(),
            chinstrap: "#023e8a".to_string(),
            gentoo: "#83c5be".to_string(),
        }
    }
}

impl SpeciesColors {
    pub fn hex_for(&self, species: Species) -> &str {
        match species {
            Species::Adelie => &self.adelie,
            Species::Chinstrap => &self.chinstrap,
            Species::Gentoo => &self.gentoo,
        }
    }
}

// ---------------------------------------------------------------------------
// Sidebar links
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

impl Link {
    fn defaults() -> Vec<Link> {
        [
            ("Palmer penguins data", "https://allisonhorst.github.io/palmerpenguins/"),
            ("egui", "https://github.com/emilk/egui"),
            ("egui_plot", "https://github.com/emilk/egui_plot"),
        ]
        .into_iter()
        .map(|(label, url)| Link {
            label: label.to_string(),
            url: url.to_string(),
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_dashboard_controls() {
        let config = DashboardConfig::default();
        config.validate().unwrap();
        let state = config.filters.initial_state();
        assert_eq!(state, FilterState::default());
        assert_eq!(config.filters.mass_min, 2000.0);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = DashboardConfig::from_json(
            r##"{ "filters": { "mass_default": 4500, "species": ["Gentoo"] },
                  "species_colors": { "Gentoo": "#000000" } }"##,
        )
        .unwrap();
        assert_eq!(config.title, "Penguins dashboard");
        assert_eq!(config.filters.mass_max, 6000.0);
        assert_eq!(config.filters.mass_default, 4500.0);
        assert_eq!(
            config.filters.species,
            BTreeSet::from([Species::Gentoo])
        );
        assert_eq!(config.species_colors.hex_for(Species::Gentoo), "#000000");
        assert_eq!(config.species_colors.hex_for(Species::Adelie), "#858ae3");
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let err = DashboardConfig::from_json(r#"{ "filters": { "mass_min": 7000 } }"#).unwrap_err();
        assert!(format!("{err:#}").contains("mass_min"));
    }

    #[test]
    fn default_outside_bounds_is_rejected() {
        assert!(DashboardConfig::from_json(r#"{ "filters": { "mass_default": 9000 } }"#).is_err());
    }

    #[test]
    fn bad_colour_is_rejected() {
        let err = DashboardConfig::from_json(r#"{ "species_colors": { "Adelie": "blue" } }"#)
            .unwrap_err();
        assert!(format!("{err:#}").contains("Adelie"));
    }

    #[test]
    fn clamp_keeps_threshold_in_bounds() {
        let settings = FilterSettings::default();
        assert_eq!(settings.clamp_mass(100.0), 2000.0);
        assert_eq!(settings.clamp_mass(7000.0), 6000.0);
        assert_eq!(settings.clamp_mass(4321.0), 4321.0);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "title": "Colony view", "window_size": [800, 600] }}"#).unwrap();
        let config = DashboardConfig::load_from(file.path()).unwrap();
        assert_eq!(config.title, "Colony view");
        assert_eq!(config.window_size, [800.0, 600.0]);
        assert_eq!(config.links.len(), 3);
    }

    #[test]
    fn links_can_be_replaced() {
        let config = DashboardConfig::from_json(
            r#"{ "links": [{ "label": "Field notes", "url": "https://example.org/notes" }] }"#,
        )
        .unwrap();
        assert_eq!(
            config.links,
            vec![Link {
                label: "Field notes".into(),
                url: "https://example.org/notes".into()
            }]
        );
    }
}
