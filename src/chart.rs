//! Chart models built from a cleaned dataset.
//!
//! Columns are picked by position in the current column order, the way the
//! report has always done it: position 0 for the line chart, 1 for the bar
//! chart, 2 for the histogram, 0 against 2 for the scatter plot. Every used
//! position is checked to be numeric before anything is drawn.

use crate::data::model::{CellValue, Column, Dataset};
use crate::error::ReportError;
use crate::stats::mean;

pub const DEFAULT_BINS: usize = 15;
pub const MAX_BINS: usize = 10_000;

/// Positions 0, 1 and 2 must exist.
const REQUIRED_COLUMNS: usize = 3;
const REQUIRED_NUMERIC_COLUMNS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
    Histogram,
    Scatter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterGroup {
    pub label: CellValue,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartBody {
    Line { series: String, points: Vec<[f64; 2]> },
    Bar { bars: Vec<(CellValue, f64)> },
    Histogram { bins: Vec<HistogramBin> },
    Scatter { groups: Vec<ScatterGroup> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub body: ChartBody,
}

impl Chart {
    pub fn kind(&self) -> ChartKind {
        match self.body {
            ChartBody::Line { .. } => ChartKind::Line,
            ChartBody::Bar { .. } => ChartKind::Bar,
            ChartBody::Histogram { .. } => ChartKind::Histogram,
            ChartBody::Scatter { .. } => ChartKind::Scatter,
        }
    }
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// Build the report charts. Bar and scatter charts are only produced when
/// the dataset has a `category` column.
pub fn build_charts(dataset: &Dataset, category: &str, bins: usize) -> Result<Vec<Chart>, ReportError> {
    if dataset.n_cols() < REQUIRED_COLUMNS {
        return Err(ReportError::TooFewColumns {
            needed: REQUIRED_COLUMNS,
            found: dataset.n_cols(),
        });
    }
    let numeric = dataset.numeric_columns().count();
    if numeric < REQUIRED_NUMERIC_COLUMNS {
        return Err(ReportError::TooFewNumericColumns {
            needed: REQUIRED_NUMERIC_COLUMNS,
            found: numeric,
        });
    }
    let groups = dataset.column(category);

    let mut charts = Vec::with_capacity(4);
    charts.push(line_chart(numeric_at(dataset, 0)?));
    if let Some(groups) = groups {
        charts.push(bar_chart(numeric_at(dataset, 1)?, groups));
    }
    charts.push(histogram(numeric_at(dataset, 2)?, bins)?);
    if let Some(groups) = groups {
        charts.push(scatter(numeric_at(dataset, 0)?, numeric_at(dataset, 2)?, groups));
    }

    log::debug!(
        "Built {} chart(s): {:?}",
        charts.len(),
        charts.iter().map(Chart::kind).collect::<Vec<_>>()
    );
    Ok(charts)
}

fn numeric_at(dataset: &Dataset, position: usize) -> Result<&Column, ReportError> {
    let column = dataset
        .column_at(position)
        .ok_or(ReportError::TooFewColumns {
            needed: position + 1,
            found: dataset.n_cols(),
        })?;
    if !column.is_numeric() {
        return Err(ReportError::NonNumericColumn {
            position,
            name: column.name.clone(),
            dtype: column.dtype.to_string(),
        });
    }
    log::debug!("Column {position} -> '{}'", column.name);
    Ok(column)
}

pub fn line_chart(column: &Column) -> Chart {
    let points = column
        .values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.as_f64().map(|y| [i as f64, y]))
        .collect();
    Chart {
        title: "Line Chart - First Numerical Feature Across Samples".to_string(),
        x_label: "Sample Index".to_string(),
        y_label: column.name.clone(),
        body: ChartBody::Line {
            series: column.name.clone(),
            points,
        },
    }
}

/// Mean of `column` per category, categories in order of first appearance.
pub fn bar_chart(column: &Column, groups: &Column) -> Chart {
    let mut order: Vec<(CellValue, Vec<f64>)> = Vec::new();
    for (key, value) in groups.values.iter().zip(&column.values) {
        if key.is_null() {
            continue;
        }
        let idx = match order.iter().position(|(k, _)| k == key) {
            Some(idx) => idx,
            None => {
                order.push((key.clone(), Vec::new()));
                order.len() - 1
            }
        };
        if let Some(v) = value.as_f64() {
            order[idx].1.push(v);
        }
    }
    let bars = order
        .into_iter()
        .map(|(key, values)| (key, mean(&values)))
        .collect();

    Chart {
        title: format!("Bar Chart - Average {} per Species", column.name),
        x_label: "Species".to_string(),
        y_label: format!("Avg {}", column.name),
        body: ChartBody::Bar { bars },
    }
}

pub fn histogram(column: &Column, bins: usize) -> Result<Chart, ReportError> {
    Ok(Chart {
        title: format!("Histogram - {} Distribution", column.name),
        x_label: column.name.clone(),
        y_label: "Frequency".to_string(),
        body: ChartBody::Histogram {
            bins: histogram_bins(&column.numeric_values(), bins)?,
        },
    })
}

/// Equal-width bins over `[min, max]`; the last bin includes `max`.
/// A constant series is spread over `[v - 0.5, v + 0.5]`.
pub fn histogram_bins(values: &[f64], bins: usize) -> Result<Vec<HistogramBin>, ReportError> {
    if bins == 0 || bins > MAX_BINS {
        return Err(ReportError::InvalidBins { max: MAX_BINS });
    }
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();

    let (mut lo, mut hi) = finite
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if finite.is_empty() {
        (lo, hi) = (0.0, 1.0);
    } else if lo == hi {
        (lo, hi) = (lo - 0.5, hi + 0.5);
    }

    let width = (hi - lo) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: lo + width * i as f64,
            end: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for v in finite {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    Ok(out)
}

/// `x` against `y`, one point group per category in order of first appearance.
pub fn scatter(x: &Column, y: &Column, groups: &Column) -> Chart {
    let mut out: Vec<ScatterGroup> = Vec::new();
    for ((key, xv), yv) in groups.values.iter().zip(&x.values).zip(&y.values) {
        let (Some(xv), Some(yv)) = (xv.as_f64(), yv.as_f64()) else {
            continue;
        };
        if key.is_null() {
            continue;
        }
        match out.iter_mut().find(|g| &g.label == key) {
            Some(group) => group.points.push([xv, yv]),
            None => out.push(ScatterGroup {
                label: key.clone(),
                points: vec![[xv, yv]],
            }),
        }
    }

    Chart {
        title: format!("Scatter Plot - {} vs {}", x.name, y.name),
        x_label: x.name.clone(),
        y_label: y.name.clone(),
        body: ChartBody::Scatter { groups: out },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::reference;

    fn kinds(charts: &[Chart]) -> Vec<ChartKind> {
        charts.iter().map(Chart::kind).collect()
    }

    #[test]
    fn reference_produces_four_charts() {
        let ds = reference::load().unwrap();
        let charts = build_charts(&ds, "species", DEFAULT_BINS).unwrap();
        assert_eq!(
            kinds(&charts),
            vec![ChartKind::Line, ChartKind::Bar, ChartKind::Histogram, ChartKind::Scatter]
        );
        assert_eq!(charts[1].title, "Bar Chart - Average sepal width (cm) per Species");
        assert_eq!(charts[2].title, "Histogram - petal length (cm) Distribution");
        assert_eq!(charts[3].title, "Scatter Plot - sepal length (cm) vs petal length (cm)");
    }

    #[test]
    fn without_category_only_line_and_histogram() {
        let ds = Dataset::from_columns(vec![
            Column::new("a", vec![CellValue::Float(1.0), CellValue::Float(2.0)]),
            Column::new("b", vec![CellValue::Float(0.5), CellValue::Float(1.5)]),
            Column::new("c", vec![CellValue::Integer(3), CellValue::Integer(4)]),
        ])
        .unwrap();
        let charts = build_charts(&ds, "species", DEFAULT_BINS).unwrap();
        assert_eq!(kinds(&charts), vec![ChartKind::Line, ChartKind::Histogram]);
    }

    #[test]
    fn two_numeric_columns_are_rejected() {
        let ds = Dataset::from_columns(vec![
            Column::new("a", vec![CellValue::Float(1.0), CellValue::Float(2.0)]),
            Column::new("label", vec![CellValue::Text("x".into()), CellValue::Text("y".into())]),
            Column::new("c", vec![CellValue::Integer(3), CellValue::Integer(4)]),
        ])
        .unwrap();
        let err = build_charts(&ds, "species", DEFAULT_BINS).unwrap_err();
        assert!(matches!(err, ReportError::TooFewNumericColumns { needed: 3, found: 2 }));
    }

    #[test]
    fn too_few_columns_is_an_error() {
        let ds = Dataset::from_columns(vec![
            Column::new("a", vec![CellValue::Float(1.0)]),
            Column::new("b", vec![CellValue::Float(2.0)]),
        ])
        .unwrap();
        let err = build_charts(&ds, "species", DEFAULT_BINS).unwrap_err();
        assert!(matches!(err, ReportError::TooFewColumns { needed: 3, found: 2 }));
    }

    #[test]
    fn non_numeric_position_is_an_error() {
        let ds = Dataset::from_columns(vec![
            Column::new("a", vec![CellValue::Float(1.0)]),
            Column::new("b", vec![CellValue::Float(2.0)]),
            Column::new("species", vec![CellValue::Text("x".into())]),
            Column::new("d", vec![CellValue::Float(3.0)]),
        ])
        .unwrap();
        let err = build_charts(&ds, "species", DEFAULT_BINS).unwrap_err();
        match err {
            ReportError::NonNumericColumn { position, name, .. } => {
                assert_eq!(position, 2);
                assert_eq!(name, "species");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn histogram_counts_every_value() {
        let ds = reference::load().unwrap();
        let column = ds.column_at(2).unwrap();
        let bins = histogram_bins(&column.numeric_values(), 15).unwrap();
        assert_eq!(bins.len(), 15);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 150);
        assert!((bins[0].start - 1.0).abs() < 1e-12);
        assert!((bins[14].end - 6.9).abs() < 1e-12);
    }

    #[test]
    fn histogram_max_lands_in_last_bin() {
        let bins = histogram_bins(&[0.0, 1.0, 2.0, 3.0], 3).unwrap();
        let counts: Vec<usize> = bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 2]);
    }

    #[test]
    fn constant_histogram_is_centred() {
        let bins = histogram_bins(&[2.0, 2.0], 2).unwrap();
        assert!((bins[0].start - 1.5).abs() < 1e-12);
        assert!((bins[1].end - 2.5).abs() < 1e-12);
        assert_eq!(bins[1].count, 2);
    }

    #[test]
    fn bin_count_out_of_range_rejected() {
        assert!(matches!(histogram_bins(&[1.0], 0), Err(ReportError::InvalidBins { .. })));
        assert!(matches!(
            histogram_bins(&[1.0], MAX_BINS + 1),
            Err(ReportError::InvalidBins { max: MAX_BINS })
        ));
        assert_eq!(histogram_bins(&[1.0], MAX_BINS).unwrap().len(), MAX_BINS);
    }

    #[test]
    fn bar_and_scatter_group_by_first_appearance() {
        let ds = reference::load().unwrap();
        let charts = build_charts(&ds, "species", DEFAULT_BINS).unwrap();

        let ChartBody::Bar { bars } = &charts[1].body else {
            panic!("expected bar chart");
        };
        let labels: Vec<String> = bars.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(labels, vec!["setosa", "versicolor", "virginica"]);
        assert!((bars[0].1 - 3.428).abs() < 1e-9);

        let ChartBody::Scatter { groups } = &charts[3].body else {
            panic!("expected scatter plot");
        };
        assert_eq!(groups.len(), 3);
        assert!(groups.iter().all(|g| g.points.len() == 50));
    }

    #[test]
    fn line_chart_indexes_rows() {
        let column = Column::new(
            "a",
            vec![CellValue::Float(3.0), CellValue::Null, CellValue::Float(5.0)],
        );
        let ChartBody::Line { points, .. } = line_chart(&column).body else {
            panic!("expected line chart");
        };
        assert_eq!(points, vec![[0.0, 3.0], [2.0, 5.0]]);
    }
}
