use super::model::{CellValue, ColumnType, Dataset};

/// Missing cells per column, in column order.
pub fn missing_counts(dataset: &Dataset) -> Vec<(String, usize)> {
    dataset
        .columns()
        .iter()
        .map(|c| (c.name.clone(), c.null_count()))
        .collect()
}

/// One numeric column that had missing cells replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct Imputation {
    pub column: String,
    pub filled: usize,
    pub mean: f64,
}

/// Replace missing numeric cells with the mean of their column's non-missing
/// values. Non-numeric columns and numeric columns without any value are left
/// as they are. Filled columns become `Float`.
pub fn fill_missing_with_mean(dataset: &mut Dataset) -> Vec<Imputation> {
    let mut imputations = Vec::new();

    for column in dataset.columns_mut() {
        if !column.is_numeric() {
            continue;
        }
        let missing = column.null_count();
        if missing == 0 {
            continue;
        }
        let values = column.numeric_values();
        if values.is_empty() {
            continue;
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;

        for cell in column.values.iter_mut() {
            *cell = match &*cell {
                CellValue::Null => CellValue::Float(mean),
                CellValue::Integer(i) => CellValue::Float(*i as f64),
                other => other.clone(),
            };
        }
        column.dtype = ColumnType::Float;

        log::info!("Filled {missing} missing value(s) in '{}' with mean {mean:.4}", column.name);
        imputations.push(Imputation {
            column: column.name.clone(),
            filled: missing,
            mean,
        });
    }

    imputations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn sample() -> Dataset {
        Dataset::from_columns(vec![
            Column::new(
                "a",
                vec![CellValue::Integer(1), CellValue::Null, CellValue::Integer(4)],
            ),
            Column::new(
                "b",
                vec![CellValue::Float(0.5), CellValue::Float(1.5), CellValue::Null],
            ),
            Column::new(
                "c",
                vec![CellValue::Float(1.0), CellValue::Float(2.0), CellValue::Float(3.0)],
            ),
            Column::new(
                "species",
                vec![CellValue::Text("x".into()), CellValue::Null, CellValue::Text("y".into())],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn counts_missing_per_column() {
        let counts = missing_counts(&sample());
        assert_eq!(
            counts,
            vec![
                ("a".to_string(), 1),
                ("b".to_string(), 1),
                ("c".to_string(), 0),
                ("species".to_string(), 1),
            ]
        );
    }

    #[test]
    fn fills_numeric_cells_with_column_mean() {
        let mut ds = sample();
        let imputations = fill_missing_with_mean(&mut ds);

        assert_eq!(imputations.len(), 2);
        let a = ds.column("a").unwrap();
        assert_eq!(a.dtype, ColumnType::Float);
        assert!((a.values[1].as_f64().unwrap() - 2.5).abs() < 1e-12);
        let b = ds.column("b").unwrap();
        assert!((b.values[2].as_f64().unwrap() - 1.0).abs() < 1e-12);

        assert!(ds.numeric_columns().all(|c| c.null_count() == 0));
    }

    #[test]
    fn leaves_text_and_complete_columns_alone() {
        let mut ds = sample();
        fill_missing_with_mean(&mut ds);
        assert_eq!(ds.column("species").unwrap().null_count(), 1);
        assert_eq!(ds.column("c").unwrap().values[0], CellValue::Float(1.0));
    }

    #[test]
    fn all_null_numeric_column_is_untouched() {
        let mut ds = Dataset::from_columns(vec![Column::new(
            "a",
            vec![CellValue::Null, CellValue::Null],
        )])
        .unwrap();
        assert!(fill_missing_with_mean(&mut ds).is_empty());
        assert_eq!(ds.column("a").unwrap().null_count(), 2);
    }
}
