use std::collections::BTreeMap;

use crate::data::model::{CellValue, Dataset};

/// Row labels of the describe table, in output order.
pub const DESCRIBE_STATS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

// ---------------------------------------------------------------------------
// Per-column summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1).
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    /// Summarise the non-NaN values of a slice; infinities are counted.
    /// NaN fills statistics that cannot be computed.
    pub fn compute(values: &[f64]) -> Self {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        let count = sorted.len();
        if count == 0 {
            return ColumnSummary {
                count,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                q25: f64::NAN,
                q50: f64::NAN,
                q75: f64::NAN,
                max: f64::NAN,
            };
        }
        sorted.sort_by(|a, b| a.total_cmp(b));

        let mean = mean(&sorted);
        let std = if count > 1 {
            let var = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            var.sqrt()
        } else {
            f64::NAN
        };

        ColumnSummary {
            count,
            mean,
            std,
            min: sorted[0],
            q25: quantile_sorted(&sorted, 0.25),
            q50: quantile_sorted(&sorted, 0.50),
            q75: quantile_sorted(&sorted, 0.75),
            max: sorted[count - 1],
        }
    }

    /// Values in [`DESCRIBE_STATS`] order.
    pub fn as_row(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.q50,
            self.q75,
            self.max,
        ]
    }
}

/// Arithmetic mean; NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Quantile `q` in `[0, 1]` of sorted values, interpolating linearly
/// between the closest ranks.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lower = pos.floor() as usize;
            let upper = pos.ceil() as usize;
            let frac = pos - lower as f64;
            if frac == 0.0 {
                return sorted[lower];
            }
            sorted[lower] * (1.0 - frac) + sorted[upper] * frac
        }
    }
}

// ---------------------------------------------------------------------------
// Describe table
// ---------------------------------------------------------------------------

/// Descriptive statistics: one column per numeric column of the dataset.
#[derive(Debug, Clone)]
pub struct Describe {
    pub columns: Vec<(String, ColumnSummary)>,
}

impl Describe {
    pub fn compute(dataset: &Dataset) -> Self {
        let columns = dataset
            .numeric_columns()
            .map(|c| (c.name.clone(), ColumnSummary::compute(&c.numeric_values())))
            .collect();
        Describe { columns }
    }

    #[cfg(test)]
    pub fn get(&self, column: &str) -> Option<&ColumnSummary> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, summary)| summary)
    }
}

// ---------------------------------------------------------------------------
// Grouped means
// ---------------------------------------------------------------------------

/// Mean of every numeric column per category value, rows sorted by category.
#[derive(Debug, Clone)]
pub struct GroupMeans {
    pub category: String,
    pub columns: Vec<String>,
    pub rows: Vec<(CellValue, Vec<f64>)>,
}

impl GroupMeans {
    /// `None` when the dataset has no column named `category`.
    pub fn compute(dataset: &Dataset, category: &str) -> Option<Self> {
        let group_col = dataset.column(category)?;

        let numeric: Vec<_> = dataset
            .numeric_columns()
            .filter(|c| c.name != category)
            .collect();

        let mut groups: BTreeMap<&CellValue, Vec<Vec<f64>>> = BTreeMap::new();
        for (row, key) in group_col.values.iter().enumerate() {
            if key.is_null() {
                continue;
            }
            let acc = groups
                .entry(key)
                .or_insert_with(|| vec![Vec::new(); numeric.len()]);
            for (slot, col) in acc.iter_mut().zip(&numeric) {
                if let Some(v) = col.values[row].as_f64() {
                    slot.push(v);
                }
            }
        }

        let rows = groups
            .into_iter()
            .map(|(key, per_col)| (key.clone(), per_col.iter().map(|v| mean(v)).collect()))
            .collect();

        Some(GroupMeans {
            category: category.to_string(),
            columns: numeric.iter().map(|c| c.name.clone()).collect(),
            rows,
        })
    }

    #[cfg(test)]
    pub fn mean_of(&self, group: &CellValue, column: &str) -> Option<f64> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows
            .iter()
            .find(|(key, _)| key == group)
            .map(|(_, means)| means[idx])
    }
}
