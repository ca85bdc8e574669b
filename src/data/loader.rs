use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Column, DataSource, Dataset};
use super::reference;
use crate::error::ReportError;

/// Tokens read as missing values in delimited files.
const NA_TOKENS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "NULL"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the table at `path`, or the bundled reference table when the file
/// does not exist. Every other failure propagates.
pub fn load_or_reference(path: &Path) -> Result<(Dataset, DataSource)> {
    match File::open(path) {
        Ok(file) => {
            let dataset = read_table(file, path)?;
            log::info!(
                "Successfully loaded dataset from {} ({} rows, {} columns)",
                path.display(),
                dataset.n_rows(),
                dataset.n_cols()
            );
            Ok((dataset, DataSource::File(path.to_path_buf())))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::warn!(
                "File not found: {}. Loading the bundled iris dataset instead",
                path.display()
            );
            let dataset = reference::load().context("loading bundled iris dataset")?;
            Ok((
                dataset,
                DataSource::Reference {
                    missing: path.to_path_buf(),
                },
            ))
        }
        Err(e) => Err(e).with_context(|| format!("opening {}", path.display())),
    }
}

/// Load a table from a file that must exist.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – comma-separated with a header row
/// * `.tsv`          – tab-separated with a header row
/// * `.json`         – `[{ "col": value, ... }, ...]`
/// * `.parquet`      – flat scalar columns
pub fn load_file(path: &Path) -> Result<Dataset> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_table(file, path)
}

fn read_table(file: File, path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" | "txt" => read_delimited(BufReader::new(file), b','),
        "tsv" => read_delimited(BufReader::new(file), b'\t'),
        "json" => read_json(BufReader::new(file)),
        "parquet" | "pq" => read_parquet(file),
        other => Err(ReportError::UnsupportedFormat(other.to_string()).into()),
    };
    dataset.with_context(|| format!("reading {}", path.display()))
}

// ---------------------------------------------------------------------------
// Delimited loader
// ---------------------------------------------------------------------------

/// Header row with column names, one record per row.
/// Short rows are padded with missing cells; rows longer than the header are an error.
pub fn read_delimited<R: Read>(reader: R, delimiter: u8) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(String::is_empty) {
        bail!("CSV has no header row");
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Ok(Dataset::from_rows(headers, rows)?)
}

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() || NA_TOKENS.contains(&s) {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    match s {
        "true" | "True" | "TRUE" => CellValue::Bool(true),
        "false" | "False" | "FALSE" => CellValue::Bool(false),
        _ => CellValue::Text(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "sepal_length": 5.1, "sepal_width": 3.5, "species": "setosa" },
///   ...
/// ]
/// ```
///
/// Column order follows the first record; keys that only appear later are
/// appended. A key missing from a record is a null cell.
fn read_json<R: Read>(reader: R) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_reader(reader).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map_or(CellValue::Null, json_to_cell))
                .collect()
        })
        .collect();

    Ok(Dataset::from_rows(headers, rows)?)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat scalar columns (integers, floats, booleans,
/// strings). Other column types are kept as their display text.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn read_parquet(file: File) -> Result<Dataset> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); names.len()];

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, out) in cells.iter_mut().enumerate() {
            let col = batch.column(col_idx);
            for row in 0..batch.num_rows() {
                out.push(
                    extract_cell(col, row)
                        .with_context(|| format!("Row {row}: failed to read '{}'", names[col_idx]))?,
                );
            }
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    Ok(Dataset::from_columns(columns)?)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => CellValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int8 => CellValue::Integer(col.as_primitive::<Int8Type>().value(row).into()),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row).into()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row).into()),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => CellValue::Integer(col.as_primitive::<UInt8Type>().value(row).into()),
        DataType::UInt16 => CellValue::Integer(col.as_primitive::<UInt16Type>().value(row).into()),
        DataType::UInt32 => CellValue::Integer(col.as_primitive::<UInt32Type>().value(row).into()),
        DataType::UInt64 => {
            let v = col.as_primitive::<UInt64Type>().value(row);
            i64::try_from(v).map_or(CellValue::Float(v as f64), CellValue::Integer)
        }
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row).into()),
        DataType::Float64 => {
            let v = col.as_primitive::<Float64Type>().value(row);
            if v.is_nan() {
                CellValue::Null
            } else {
                CellValue::Float(v)
            }
        }
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        _ => CellValue::Text(array_value_to_string(col, row)?),
    };
    Ok(cell)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::model::ColumnType;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn csv_shape_matches_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "data.csv",
            "a,b,c,species\n1,2.5,3,x\n4,,6,y\n7,8.5,NA,\n",
        );
        let (ds, source) = load_or_reference(&path).unwrap();
        assert_eq!(source, DataSource::File(path.clone()));
        assert_eq!(ds.n_rows(), 3);
        assert_eq!(ds.n_cols(), 4);
        assert_eq!(ds.column("a").unwrap().dtype, ColumnType::Integer);
        assert_eq!(ds.column("b").unwrap().dtype, ColumnType::Float);
        assert_eq!(ds.column("b").unwrap().null_count(), 1);
        assert_eq!(ds.column("c").unwrap().null_count(), 1);
        assert_eq!(ds.column("species").unwrap().dtype, ColumnType::Text);
    }

    #[test]
    fn tsv_uses_tab_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "data.tsv", "a\tb\tc\n1\t2\t3\n");
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.column_names(), vec!["a", "b", "c"]);
        assert_eq!(ds.n_rows(), 1);
    }

    #[test]
    fn missing_file_falls_back_to_reference() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("iris.csv");
        let (ds, source) = load_or_reference(&path).unwrap();
        assert!(matches!(source, DataSource::Reference { .. }));
        assert_eq!(ds.n_rows(), 150);
        assert_eq!(ds.unique_values("species").unwrap().len(), 3);
    }

    #[test]
    fn row_longer_than_header_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bad.csv", "a,b,c\n1,2,3\n4,5,6,7\n");
        let err = load_or_reference(&path).unwrap_err();
        assert!(err.chain().any(|e| matches!(
            e.downcast_ref::<ReportError>(),
            Some(ReportError::RowTooLong { row: 1, found: 4, expected: 3 })
        )));
    }

    #[test]
    fn short_rows_are_padded_with_missing_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "short.csv", "a,b,c\n1,2,3\n4,5\n7,8,9\n");
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.n_rows(), 3);
        let c = ds.column("c").unwrap();
        assert_eq!(c.dtype, ColumnType::Integer);
        assert_eq!(c.values[1], CellValue::Null);
    }

    #[test]
    fn unsupported_extension_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "data.xlsx", "not a table");
        let err = load_or_reference(&path).unwrap_err();
        assert!(err.chain().any(|e| e.downcast_ref::<ReportError>().is_some()));
    }

    #[test]
    fn json_records_preserve_first_key_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "data.json",
            r#"[{"z": 1, "a": 2.5, "species": "x"}, {"z": 3, "species": "y", "extra": true}]"#,
        );
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.column_names(), vec!["z", "a", "species", "extra"]);
        assert_eq!(ds.column("a").unwrap().null_count(), 1);
        assert_eq!(ds.column("extra").unwrap().dtype, ColumnType::Bool);
    }

    #[test]
    fn json_rejects_non_object_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "data.json", "[1, 2, 3]");
        assert!(load_file(&path).is_err());
    }

    #[test]
    fn parquet_flat_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("id", arrow::datatypes::DataType::Int64, false),
            Field::new("value", arrow::datatypes::DataType::Float64, true),
            Field::new("species", arrow::datatypes::DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![1, 2, 3])),
                Arc::new(Float64Array::from(vec![Some(1.5), None, Some(3.5)])),
                Arc::new(StringArray::from(vec![Some("a"), Some("b"), None])),
            ],
        )
        .unwrap();
        let file = File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.n_rows(), 3);
        assert_eq!(ds.column("id").unwrap().dtype, ColumnType::Integer);
        assert_eq!(ds.column("value").unwrap().null_count(), 1);
        assert_eq!(ds.column("species").unwrap().values[2], CellValue::Null);
    }
}
