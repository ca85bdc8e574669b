//! Console rendering of the report tables.
//!
//! Every table is assembled as an Arrow record batch and formatted with
//! arrow's pretty printer.

use std::sync::Arc;

use anyhow::Result;
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray, UInt64Array};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use crate::data::clean::Imputation;
use crate::data::model::{CellValue, Column, ColumnType, DataSource, Dataset};
use crate::stats::{DESCRIBE_STATS, Describe, GroupMeans};

fn render(columns: Vec<(String, ArrayRef)>) -> Result<String> {
    let batch = RecordBatch::try_from_iter(columns)?;
    Ok(pretty_format_batches(&[batch])?.to_string())
}

fn index_column(n: usize) -> (String, ArrayRef) {
    (String::new(), counts(0..n as u64))
}

fn text<I, S>(values: I) -> ArrayRef
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Arc::new(StringArray::from_iter_values(values))
}

fn counts(values: impl IntoIterator<Item = u64>) -> ArrayRef {
    Arc::new(UInt64Array::from_iter_values(values))
}

/// Six decimals like a dataframe summary, `NaN` where undefined.
fn fmt_stat(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.6}")
    }
}

fn column_to_array(column: &Column) -> ArrayRef {
    match column.dtype {
        ColumnType::Integer => Arc::new(Int64Array::from(
            column
                .values
                .iter()
                .map(|v| match v {
                    CellValue::Integer(i) => Some(*i),
                    _ => None,
                })
                .collect::<Vec<_>>(),
        )),
        ColumnType::Float => Arc::new(Float64Array::from(
            column.values.iter().map(CellValue::as_f64).collect::<Vec<_>>(),
        )),
        ColumnType::Bool => Arc::new(BooleanArray::from(
            column
                .values
                .iter()
                .map(|v| match v {
                    CellValue::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect::<Vec<_>>(),
        )),
        ColumnType::Text | ColumnType::Empty => Arc::new(StringArray::from(
            column
                .values
                .iter()
                .map(|v| match v {
                    CellValue::Null => None,
                    other => Some(other.to_string()),
                })
                .collect::<Vec<_>>(),
        )),
    }
}

/// The first `n` rows with a leading row index.
pub fn format_head(dataset: &Dataset, n: usize) -> Result<String> {
    let head = dataset.head(n);
    let mut columns = vec![index_column(head.n_rows())];
    columns.extend(
        head.columns()
            .iter()
            .map(|c| (c.name.clone(), column_to_array(c))),
    );
    render(columns)
}

/// Shape, source, and per-column non-null counts and types.
pub fn format_info(dataset: &Dataset, source: &DataSource) -> Result<String> {
    let cols = dataset.columns();
    let rows = dataset.n_rows();
    let table = render(vec![
        index_column(cols.len()),
        ("Column".to_string(), text(cols.iter().map(|c| c.name.as_str()))),
        (
            "Non-Null Count".to_string(),
            counts(cols.iter().map(|c| (c.len() - c.null_count()) as u64)),
        ),
        ("Dtype".to_string(), text(cols.iter().map(|c| c.dtype.to_string()))),
    ])?;

    let range = if rows == 0 {
        "0 entries".to_string()
    } else {
        format!("{rows} entries, 0 to {}", rows - 1)
    };
    Ok(format!(
        "Source: {source}\nRangeIndex: {range}\nData columns (total {} columns):\n{table}",
        cols.len()
    ))
}

pub fn format_missing(missing: &[(String, usize)]) -> Result<String> {
    render(vec![
        ("Column".to_string(), text(missing.iter().map(|(n, _)| n.as_str()))),
        ("Missing".to_string(), counts(missing.iter().map(|(_, c)| *c as u64))),
    ])
}

/// Cells filled per column and the mean written into them.
pub fn format_imputations(imputations: &[Imputation]) -> Result<String> {
    render(vec![
        ("Column".to_string(), text(imputations.iter().map(|i| i.column.as_str()))),
        ("Filled".to_string(), counts(imputations.iter().map(|i| i.filled as u64))),
        ("Mean".to_string(), text(imputations.iter().map(|i| fmt_stat(i.mean)))),
    ])
}

pub fn format_describe(describe: &Describe) -> Result<String> {
    let mut columns = vec![(String::new(), text(DESCRIBE_STATS))];
    for (name, summary) in &describe.columns {
        columns.push((name.clone(), text(summary.as_row().map(fmt_stat))));
    }
    render(columns)
}

pub fn format_group_means(groups: &GroupMeans) -> Result<String> {
    let mut columns = vec![(
        groups.category.clone(),
        text(groups.rows.iter().map(|(key, _)| key.to_string())),
    )];
    for (idx, name) in groups.columns.iter().enumerate() {
        columns.push((
            name.clone(),
            text(groups.rows.iter().map(|(_, means)| fmt_stat(means[idx]))),
        ));
    }
    render(columns)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::data::clean::missing_counts;
    use crate::data::reference;

    #[test]
    fn head_shows_requested_rows() {
        let ds = reference::load().unwrap();
        let text = format_head(&ds, 5).unwrap();
        assert!(text.contains("sepal length (cm)"));
        assert!(text.contains("setosa"));
        // header, 5 rows and 3 border lines
        assert_eq!(text.lines().count(), 9);
    }

    #[test]
    fn info_lists_every_column() {
        let ds = reference::load().unwrap();
        let source = DataSource::Reference {
            missing: PathBuf::from("iris.csv"),
        };
        let text = format_info(&ds, &source).unwrap();
        assert!(text.contains("RangeIndex: 150 entries, 0 to 149"));
        assert!(text.contains("total 6 columns"));
        assert!(text.contains("float64"));
        assert!(text.contains("object"));
    }

    #[test]
    fn missing_table_lists_counts() {
        let ds = reference::load().unwrap();
        let text = format_missing(&missing_counts(&ds)).unwrap();
        assert!(text.contains("Missing"));
        assert!(text.contains("species"));
    }

    #[test]
    fn imputation_table_shows_fill_value() {
        let text = format_imputations(&[Imputation {
            column: "petal width (cm)".to_string(),
            filled: 2,
            mean: 1.25,
        }])
        .unwrap();
        assert!(text.contains("petal width (cm)"));
        assert!(text.contains("1.250000"));
        assert!(text.contains("| 2 "));
    }

    #[test]
    fn describe_has_a_row_per_statistic() {
        let ds = reference::load().unwrap();
        let text = format_describe(&Describe::compute(&ds)).unwrap();
        for stat in DESCRIBE_STATS {
            assert!(text.contains(stat), "missing {stat}");
        }
        assert!(text.contains("5.843333"));
        // header, 8 stats and 3 border lines
        assert_eq!(text.lines().count(), 12);
    }

    #[test]
    fn group_means_table() {
        let ds = reference::load().unwrap();
        let groups = GroupMeans::compute(&ds, "species").unwrap();
        let text = format_group_means(&groups).unwrap();
        assert!(text.contains("virginica"));
        assert!(text.contains("5.006000"));
    }
}
