use std::collections::BTreeMap;
use std::str::FromStr;

use anyhow::{Context, Result};
use eframe::egui::Color32;
use palette::Srgb;

use crate::config::SpeciesColors;
use crate::data::model::Species;

// ---------------------------------------------------------------------------
// Hex colour parsing
// ---------------------------------------------------------------------------

/// Parse `#rrggbb` (or `rrggbb`, or the 3-digit short form) into a colour.
pub fn parse_hex(hex: &str) -> Result<Color32> {
    let rgb = Srgb::<u8>::from_str(hex.trim())
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("invalid hex colour '{hex}'"))?;
    Ok(Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
}

// ---------------------------------------------------------------------------
// Colour mapping: species → Color32
// ---------------------------------------------------------------------------

/// Fixed species → colour mapping used by the scatter plot and the
/// species checkboxes.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesPalette {
    mapping: BTreeMap<Species, Color32>,
}

impl SpeciesPalette {
    /// Build the palette from configured hex strings.
    pub fn from_config(colors: &SpeciesColors) -> Result<Self> {
        let mapping = Species::ALL
            .into_iter()
            .map(|sp| {
                let hex = colors.hex_for(sp);
                parse_hex(hex)
                    .with_context(|| format!("colour for {sp}"))
                    .map(|c| (sp, c))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;
        Ok(SpeciesPalette { mapping })
    }

    pub fn color_for(&self, species: Species) -> Color32 {
        self.mapping
            .get(&species)
            .copied()
            .unwrap_or(Color32::GRAY)
    }
}

impl Default for SpeciesPalette {
    fn default() -> Self {
        let mapping = [
            (Species::Adelie, Color32::from_rgb(0x85, 0x8a, 0xe3)),
            (Species::Chinstrap, Color32::from_rgb(0x02, 0x3e, 0x8a)),
            (Species::Gentoo, Color32::from_rgb(0x83, 0xc5, 0xbe)),
        ]
        .into_iter()
        .collect();
        SpeciesPalette { mapping }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(parse_hex("#858ae3").unwrap(), Color32::from_rgb(0x85, 0x8a, 0xe3));
        assert_eq!(parse_hex("023e8a").unwrap(), Color32::from_rgb(0x02, 0x3e, 0x8a));
        assert_eq!(parse_hex("#fff").unwrap(), Color32::from_rgb(0xff, 0xff, 0xff));
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_hex("#zzzzzz").unwrap_err();
        assert!(format!("{err:#}").contains("#zzzzzz"));
    }

    #[test]
    fn default_config_matches_default_palette() {
        let palette = SpeciesPalette::from_config(&SpeciesColors::default()).unwrap();
        assert_eq!(palette, SpeciesPalette::default());
        assert_eq!(
            palette.color_for(Species::Gentoo),
            Color32::from_rgb(0x83, 0xc5, 0xbe)
        );
    }
}
