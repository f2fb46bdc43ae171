//! Write the built-in penguins table to disk in every format the dashboard
//! can open.
//!
//! Usage: `generate_sample [OUTPUT_DIR]` (defaults to the current directory).

use std::path::PathBuf;

use anyhow::{Context, Result};
use penguins_dashboard::data::export;
use penguins_dashboard::data::model::Species;
use penguins_dashboard::data::sample::load_penguins;

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let dataset = load_penguins()?;

    let parquet = out_dir.join("penguins.parquet");
    export::write_parquet(&dataset, &parquet)?;
    let csv = out_dir.join("penguins.csv");
    export::write_csv(&dataset, &csv)?;
    let json = out_dir.join("penguins.json");
    export::write_json(&dataset, &json)?;

    let per_species: Vec<String> = Species::ALL
        .into_iter()
        .map(|sp| format!("{sp}: {}", dataset.species_count(sp)))
        .collect();
    println!(
        "Wrote {} penguins ({}) to {}, {} and {}",
        dataset.len(),
        per_species.join(", "),
        parquet.display(),
        csv.display(),
        json.display()
    );

    let batch = export::to_record_batch(&dataset.records)?;
    let head = arrow::util::pretty::pretty_format_batches(&[batch.slice(0, batch.num_rows().min(5))])
        .context("formatting preview")?;
    println!("{head}");
    Ok(())
}
