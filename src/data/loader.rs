use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray, StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{PenguinDataset, PenguinRecord, Sex, Species};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a penguins table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row; `NA` or an empty cell marks a missing value
/// * `.json`    – `[{ "species": "Adelie", "island": "Dream", ... }, ...]`
/// * `.parquet` – one column per attribute, as written by Pandas or Polars
///
/// Required columns: `species`, `island`, `bill_length_mm`, `bill_depth_mm`,
/// `body_mass_g`. `flipper_length_mm`, `sex` and `year` are optional.
pub fn load_file(path: &Path) -> Result<PenguinDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    into_dataset(rows).with_context(|| format!("in {}", path.display()))
}

/// Parse CSV text that is already in memory, such as the bundled table.
pub fn parse_csv(text: &str) -> Result<PenguinDataset> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    into_dataset(read_csv_rows(reader)?)
}

fn into_dataset(rows: Vec<RawRow>) -> Result<PenguinDataset> {
    let records = rows
        .into_iter()
        .enumerate()
        .map(|(i, raw)| raw.into_record().with_context(|| format!("Row {i}")))
        .collect::<Result<Vec<_>>>()?;

    if records.is_empty() {
        bail!("no records");
    }
    Ok(PenguinDataset::from_records(records))
}

/// Format-neutral row before species parsing and validation.
#[derive(Debug, Default)]
struct RawRow {
    species: String,
    island: String,
    bill_length_mm: Option<f64>,
    bill_depth_mm: Option<f64>,
    flipper_length_mm: Option<f64>,
    body_mass_g: Option<f64>,
    sex: Option<String>,
    year: Option<i32>,
}

impl RawRow {
    fn into_record(self) -> Result<PenguinRecord> {
        let species: Species = self.species.trim().parse()?;
        Ok(PenguinRecord {
            species,
            island: self.island.trim().to_string(),
            bill_length_mm: finite(self.bill_length_mm),
            bill_depth_mm: finite(self.bill_depth_mm),
            flipper_length_mm: finite(self.flipper_length_mm),
            body_mass_g: finite(self.body_mass_g),
            sex: self.sex.as_deref().and_then(Sex::parse_lenient),
            year: self.year,
        })
    }
}

/// NaN is how Pandas spells "missing" in float columns.
fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    species: String,
    island: String,
    bill_length_mm: String,
    bill_depth_mm: String,
    #[serde(default)]
    flipper_length_mm: String,
    body_mass_g: String,
    #[serde(default)]
    sex: String,
    #[serde(default)]
    year: String,
}

fn load_csv(path: &Path) -> Result<Vec<RawRow>> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening CSV")?;
    read_csv_rows(reader)
}

fn read_csv_rows<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<RawRow>> {
    let mut rows = Vec::new();
    for (row_no, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(RawRow {
            bill_length_mm: parse_measure(&row.bill_length_mm, row_no, "bill_length_mm")?,
            bill_depth_mm: parse_measure(&row.bill_depth_mm, row_no, "bill_depth_mm")?,
            flipper_length_mm: parse_measure(&row.flipper_length_mm, row_no, "flipper_length_mm")?,
            body_mass_g: parse_measure(&row.body_mass_g, row_no, "body_mass_g")?,
            sex: (!is_missing(&row.sex)).then_some(row.sex),
            year: parse_year(parse_measure(&row.year, row_no, "year")?)
                .with_context(|| format!("Row {row_no}, year"))?,
            species: row.species,
            island: row.island,
        });
    }
    Ok(rows)
}

fn is_missing(s: &str) -> bool {
    matches!(s.trim(), "" | "NA" | "na" | "NaN" | "nan" | ".")
}

fn parse_measure(s: &str, row: usize, col: &str) -> Result<Option<f64>> {
    if is_missing(s) {
        return Ok(None);
    }
    s.trim()
        .parse::<f64>()
        .map(Some)
        .with_context(|| format!("Row {row}, {col}: '{s}' is not a number"))
}

/// Years arrive as floats from CSV text and from Pandas float columns.
fn parse_year(value: Option<f64>) -> Result<Option<i32>> {
    let Some(y) = finite(value) else {
        return Ok(None);
    };
    if y.fract() != 0.0 || y < i32::MIN as f64 || y > i32::MAX as f64 {
        bail!("'{y}' is not a whole year");
    }
    Ok(Some(y as i32))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
#[derive(Debug, Deserialize)]
struct JsonRow {
    species: String,
    island: String,
    bill_length_mm: Option<f64>,
    bill_depth_mm: Option<f64>,
    #[serde(default)]
    flipper_length_mm: Option<f64>,
    body_mass_g: Option<f64>,
    #[serde(default)]
    sex: Option<String>,
    #[serde(default)]
    year: Option<i32>,
}

fn load_json(path: &Path) -> Result<Vec<RawRow>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let rows: Vec<JsonRow> = serde_json::from_str(&text).context("parsing JSON records")?;
    Ok(rows
        .into_iter()
        .map(|r| RawRow {
            species: r.species,
            island: r.island,
            bill_length_mm: r.bill_length_mm,
            bill_depth_mm: r.bill_depth_mm,
            flipper_length_mm: r.flipper_length_mm,
            body_mass_g: r.body_mass_g,
            sex: r.sex,
            year: r.year,
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per attribute.
///
/// Text columns may be Utf8 or LargeUtf8; numeric columns Float64, Float32,
/// Int64 or Int32. Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let species = required(&batch, "species")?;
        let island = required(&batch, "island")?;
        let bill_length = required(&batch, "bill_length_mm")?;
        let bill_depth = required(&batch, "bill_depth_mm")?;
        let body_mass = required(&batch, "body_mass_g")?;
        let flipper = batch.column_by_name("flipper_length_mm");
        let sex = batch.column_by_name("sex");
        let year = batch.column_by_name("year");

        for row in 0..batch.num_rows() {
            let optional_f64 = |col: Option<&Arc<dyn Array>>| -> Result<Option<f64>> {
                col.map_or(Ok(None), |c| extract_f64(c, row))
            };
            rows.push(RawRow {
                species: extract_string(species, row)?.unwrap_or_default(),
                island: extract_string(island, row)?.unwrap_or_default(),
                bill_length_mm: extract_f64(bill_length, row).context("bill_length_mm")?,
                bill_depth_mm: extract_f64(bill_depth, row).context("bill_depth_mm")?,
                flipper_length_mm: optional_f64(flipper).context("flipper_length_mm")?,
                body_mass_g: extract_f64(body_mass, row).context("body_mass_g")?,
                sex: sex.map_or(Ok(None), |c| extract_string(c, row))?,
                year: parse_year(optional_f64(year).context("year")?).context("year")?,
            });
        }
    }
    Ok(rows)
}

// -- Parquet / Arrow helpers --

fn required<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Arc<dyn Array>> {
    batch
        .column_by_name(name)
        .with_context(|| format!("Parquet file missing '{name}' column"))
}

/// Extract a string cell; nulls become `None`.
fn extract_string(col: &Arc<dyn Array>, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .context("expected StringArray")?
            .value(row),
        DataType::LargeUtf8 => col
            .as_any()
            .downcast_ref::<LargeStringArray>()
            .context("expected LargeStringArray")?
            .value(row),
        other => bail!("Expected a string column, got {other:?}"),
    };
    Ok(Some(value.to_string()))
}

/// Extract a numeric cell as `f64`; nulls become `None`.
fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .context("expected Float64Array")?
            .value(row),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .context("expected Float32Array")?
            .value(row) as f64,
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .context("expected Int64Array")?
            .value(row) as f64,
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .context("expected Int32Array")?
            .value(row) as f64,
        other => bail!("Expected a numeric column, got {other:?}"),
    };
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::export;
    use crate::data::sample::load_penguins;
    use std::io::Write;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn csv_with_na_cells() {
        let file = write_temp(
            ".csv",
            "species,island,bill_length_mm,bill_depth_mm,flipper_length_mm,body_mass_g,sex,year\n\
             Adelie,Torgersen,39.1,18.7,181,3750,male,2007\n\
             Adelie,Torgersen,NA,NA,NA,NA,NA,2007\n\
             Gentoo,Biscoe,46.1,13.2,211,4500,female,2007\n",
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records[0].bill_length_mm, Some(39.1));
        assert_eq!(ds.records[0].sex, Some(Sex::Male));
        assert_eq!(ds.records[1].body_mass_g, None);
        assert_eq!(ds.records[1].sex, None);
        assert_eq!(ds.records[2].species, Species::Gentoo);
        assert_eq!(ds.records[2].year, Some(2007));
    }

    #[test]
    fn csv_optional_columns_may_be_absent() {
        let file = write_temp(
            ".csv",
            "species,island,bill_length_mm,bill_depth_mm,body_mass_g\n\
             Chinstrap,Dream,46.5,17.9,3500\n",
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.records[0].flipper_length_mm, None);
        assert_eq!(ds.records[0].year, None);
    }

    #[test]
    fn csv_bad_number_reports_column() {
        let file = write_temp(
            ".csv",
            "species,island,bill_length_mm,bill_depth_mm,body_mass_g\n\
             Adelie,Dream,long,17.9,3500\n",
        );
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("bill_length_mm"));
    }

    #[test]
    fn unknown_species_is_an_error() {
        let file = write_temp(
            ".json",
            r#"[{"species":"Emperor","island":"Ross","bill_length_mm":null,
                 "bill_depth_mm":null,"body_mass_g":23000}]"#,
        );
        let err = load_file(file.path()).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("Row 0"), "{msg}");
        assert!(msg.contains("Emperor"), "{msg}");
    }

    #[test]
    fn json_nulls_are_missing() {
        let file = write_temp(
            ".json",
            r#"[{"species":"Adelie","island":"Dream","bill_length_mm":39.5,
                 "bill_depth_mm":null,"body_mass_g":3650,"sex":"female"}]"#,
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.records[0].bill_depth_mm, None);
        assert_eq!(ds.records[0].body_mass_g, Some(3650.0));
        assert_eq!(ds.records[0].sex, Some(Sex::Female));
    }

    #[test]
    fn empty_file_is_rejected() {
        let file = write_temp(".json", "[]");
        assert!(load_file(file.path()).is_err());
    }

    #[test]
    fn unsupported_extension() {
        let err = load_file(Path::new("penguins.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }

    #[test]
    fn fractional_year_is_rejected() {
        let file = write_temp(
            ".csv",
            "species,island,bill_length_mm,bill_depth_mm,body_mass_g,year\n\
             Adelie,Dream,39.5,17.8,3300,2007\n\
             Adelie,Dream,40.9,18.9,3900,2007.5\n",
        );
        let msg = format!("{:#}", load_file(file.path()).unwrap_err());
        assert!(msg.contains("year"), "{msg}");
        assert!(msg.contains("2007.5"), "{msg}");
    }

    #[test]
    fn parquet_year_out_of_range_is_rejected() {
        use arrow::datatypes::{Field, Schema};
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("species", DataType::Utf8, false),
            Field::new("island", DataType::Utf8, false),
            Field::new("bill_length_mm", DataType::Float64, true),
            Field::new("bill_depth_mm", DataType::Float64, true),
            Field::new("body_mass_g", DataType::Float64, true),
            Field::new("year", DataType::Float64, true),
        ]));
        let columns: Vec<Arc<dyn Array>> = vec![
            Arc::new(StringArray::from(vec!["Gentoo"])),
            Arc::new(StringArray::from(vec!["Biscoe"])),
            Arc::new(Float64Array::from(vec![46.1])),
            Arc::new(Float64Array::from(vec![13.2])),
            Arc::new(Float64Array::from(vec![4500.0])),
            Arc::new(Float64Array::from(vec![1e12])),
        ];
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("years.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let msg = format!("{:#}", load_file(&path).unwrap_err());
        assert!(msg.contains("year"), "{msg}");
    }

    #[test]
    fn csv_text_parses_without_a_file() {
        let ds = parse_csv(
            "species,island,bill_length_mm,bill_depth_mm,body_mass_g,year\n\
             Chinstrap,Dream,46.5,17.9,3500,2007\n",
        )
        .unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].year, Some(2007));
    }

    #[test]
    fn exported_sample_loads_back_in_every_format() {
        let dir = tempfile::tempdir().unwrap();
        let sample = load_penguins().unwrap();

        let csv = dir.path().join("penguins.csv");
        export::write_csv(&sample, &csv).unwrap();
        let json = dir.path().join("penguins.json");
        export::write_json(&sample, &json).unwrap();
        let parquet = dir.path().join("penguins.parquet");
        export::write_parquet(&sample, &parquet).unwrap();

        for path in [csv, json, parquet] {
            let loaded = load_file(&path).unwrap();
            assert_eq!(loaded, *sample, "{}", path.display());
        }
    }

    #[test]
    fn parquet_missing_column_is_reported() {
        use arrow::datatypes::{Field, Schema};
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![Field::new("species", DataType::Utf8, false)]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(StringArray::from(vec!["Adelie"]))],
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let err = load_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("island"));
    }
}
