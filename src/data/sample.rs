use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result};

use super::loader;
use super::model::PenguinDataset;

// ---------------------------------------------------------------------------
// Built-in Palmer penguins table
// ---------------------------------------------------------------------------

/// Palmer Station LTER penguin observations, 2007–2009 (CC0).
const PENGUINS_CSV: &str = include_str!("../../data/penguins.csv");

/// Return the built-in penguins table.
///
/// The bundled CSV is parsed on first use and shared afterwards, so every
/// call in a process returns the same `Arc`.
pub fn load_penguins() -> Result<Arc<PenguinDataset>> {
    static DATASET: OnceLock<Arc<PenguinDataset>> = OnceLock::new();
    if let Some(ds) = DATASET.get() {
        return Ok(ds.clone());
    }
    let parsed = loader::parse_csv(PENGUINS_CSV).context("parsing built-in penguins table")?;
    log::info!("Loaded built-in penguins table ({} records)", parsed.len());
    Ok(DATASET.get_or_init(|| Arc::new(parsed)).clone())
}
