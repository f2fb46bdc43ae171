use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use super::model::{PenguinDataset, PenguinRecord};

// ---------------------------------------------------------------------------
// Writers for the formats `loader::load_file` reads
// ---------------------------------------------------------------------------

/// Write a header row and one line per record; missing values are empty cells.
pub fn write_csv(dataset: &PenguinDataset, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for rec in &dataset.records {
        writer.serialize(rec).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

/// Records-oriented JSON array; missing values are `null`.
pub fn write_json(dataset: &PenguinDataset, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, &dataset.records).context("writing JSON records")?;
    out.flush().context("flushing JSON")?;
    Ok(())
}

/// Single record batch with one nullable column per attribute.
pub fn write_parquet(dataset: &PenguinDataset, path: &Path) -> Result<()> {
    let batch = to_record_batch(&dataset.records)?;
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("finalising parquet file")?;
    Ok(())
}

/// Arrow view of the records, one nullable column per attribute.
pub fn to_record_batch(records: &[PenguinRecord]) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("species", DataType::Utf8, false),
        Field::new("island", DataType::Utf8, false),
        Field::new("bill_length_mm", DataType::Float64, true),
        Field::new("bill_depth_mm", DataType::Float64, true),
        Field::new("flipper_length_mm", DataType::Float64, true),
        Field::new("body_mass_g", DataType::Float64, true),
        Field::new("sex", DataType::Utf8, true),
        Field::new("year", DataType::Int64, true),
    ]));

    let floats = |f: fn(&PenguinRecord) -> Option<f64>| -> ArrayRef {
        Arc::new(records.iter().map(f).collect::<Float64Array>())
    };

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.species.as_str()),
        )),
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.island.as_str()),
        )),
        floats(|r| r.bill_length_mm),
        floats(|r| r.bill_depth_mm),
        floats(|r| r.flipper_length_mm),
        floats(|r| r.body_mass_g),
        Arc::new(
            records
                .iter()
                .map(|r| r.sex.map(|s| s.as_str()))
                .collect::<StringArray>(),
        ),
        Arc::new(
            records
                .iter()
                .map(|r| r.year.map(i64::from))
                .collect::<Int64Array>(),
        ),
    ];

    RecordBatch::try_new(schema, columns).context("assembling record batch")
}
