//! The bundled reference table: Fisher's iris measurements, 150 samples of
//! three species with four numeric features.

use anyhow::Result;

use super::loader::read_delimited;
use super::model::{CellValue, Column, Dataset};

const IRIS_CSV: &str = include_str!("../../assets/iris.csv");

/// Class names indexed by the integer `target` code.
pub const TARGET_NAMES: [&str; 3] = ["setosa", "versicolor", "virginica"];

pub const TARGET_COLUMN: &str = "target";
pub const SPECIES_COLUMN: &str = "species";

/// Parse the bundled table and derive the `species` column from `target`.
pub fn load() -> Result<Dataset> {
    let mut dataset = read_delimited(IRIS_CSV.as_bytes(), b',')?;

    let species: Vec<CellValue> = dataset
        .column(TARGET_COLUMN)
        .map(|target| target.values.iter().map(species_for).collect())
        .unwrap_or_default();
    dataset.push_column(Column::new(SPECIES_COLUMN, species))?;

    Ok(dataset)
}

fn species_for(code: &CellValue) -> CellValue {
    match code {
        CellValue::Integer(i) => usize::try_from(*i)
            .ok()
            .and_then(|i| TARGET_NAMES.get(i))
            .map_or(CellValue::Null, |name| CellValue::Text(name.to_string())),
        _ => CellValue::Null,
    }
}
