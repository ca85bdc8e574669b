use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use crate::error::ReportError;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the common dataframe dtypes.
/// Category values key `BTreeMap` / `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.4}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64`; only numeric cells convert.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// ColumnType – inferred dtype of a column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Bool,
    Text,
    /// Every cell is null, so nothing could be inferred.
    Empty,
}

impl ColumnType {
    /// Infer the narrowest type that holds every non-null cell.
    pub fn infer(values: &[CellValue]) -> Self {
        let mut inferred: Option<ColumnType> = None;
        for v in values {
            let cell = match v {
                CellValue::Null => continue,
                CellValue::Integer(_) => ColumnType::Integer,
                CellValue::Float(_) => ColumnType::Float,
                CellValue::Bool(_) => ColumnType::Bool,
                CellValue::Text(_) => ColumnType::Text,
            };
            inferred = Some(match (inferred, cell) {
                (None, c) => c,
                (Some(a), b) if a == b => a,
                (Some(ColumnType::Integer), ColumnType::Float)
                | (Some(ColumnType::Float), ColumnType::Integer) => ColumnType::Float,
                _ => return ColumnType::Text,
            });
        }
        inferred.unwrap_or(ColumnType::Empty)
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Integer => "int64",
            ColumnType::Float => "float64",
            ColumnType::Bool => "bool",
            ColumnType::Text => "object",
            ColumnType::Empty => "empty",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Column – one named column of the table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub dtype: ColumnType,
    pub values: Vec<CellValue>,
}

impl Column {
    /// Build a column, inferring its type and normalising every cell to it.
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        let dtype = ColumnType::infer(&values);
        let values = values
            .into_iter()
            .map(|v| normalise(v, dtype))
            .collect();
        Column {
            name: name.into(),
            dtype,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_numeric(&self) -> bool {
        self.dtype.is_numeric()
    }

    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Non-null values as `f64`, in row order.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values.iter().filter_map(CellValue::as_f64).collect()
    }
}

fn normalise(value: CellValue, dtype: ColumnType) -> CellValue {
    match (value, dtype) {
        (CellValue::Null, _) => CellValue::Null,
        (CellValue::Integer(i), ColumnType::Float) => CellValue::Float(i as f64),
        (CellValue::Text(s), ColumnType::Text) => CellValue::Text(s),
        (other, ColumnType::Text) => CellValue::Text(other.to_string()),
        (other, _) => other,
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// Where the loaded table came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    /// The configured file was absent; the bundled reference table was used.
    Reference { missing: PathBuf },
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Reference { missing } => {
                write!(f, "bundled iris dataset ({} not found)", missing.display())
            }
        }
    }
}

/// Column-oriented table with a fixed column order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    /// Assemble a dataset from columns that must all have the same length.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, ReportError> {
        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
                return Err(ReportError::RaggedColumns {
                    column: bad.name.clone(),
                    found: bad.len(),
                    expected,
                });
            }
        }
        Ok(Dataset { columns })
    }

    /// Build a dataset from a header and row-major cells.
    /// Short rows are padded with nulls; extra cells are an error.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self, ReportError> {
        let mut cells: Vec<Vec<CellValue>> = vec![Vec::with_capacity(rows.len()); headers.len()];
        for (row_no, row) in rows.into_iter().enumerate() {
            if row.len() > headers.len() {
                return Err(ReportError::RowTooLong {
                    row: row_no,
                    found: row.len(),
                    expected: headers.len(),
                });
            }
            let mut row = row.into_iter();
            for column in cells.iter_mut() {
                column.push(row.next().unwrap_or(CellValue::Null));
            }
        }
        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, values)| Column::new(name, values))
            .collect();
        Dataset::from_columns(columns)
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_at(&self, position: usize) -> Option<&Column> {
        self.columns.get(position)
    }

    pub fn push_column(&mut self, column: Column) -> Result<(), ReportError> {
        let expected = self.n_rows();
        if !self.columns.is_empty() && column.len() != expected {
            return Err(ReportError::RaggedColumns {
                found: column.len(),
                column: column.name,
                expected,
            });
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_numeric())
    }

    /// Sorted set of distinct non-null values of a column.
    pub fn unique_values(&self, name: &str) -> Option<BTreeSet<CellValue>> {
        self.column(name).map(|c| {
            c.values
                .iter()
                .filter(|v| !v.is_null())
                .cloned()
                .collect()
        })
    }

    /// The first `n` rows as a new dataset.
    pub fn head(&self, n: usize) -> Dataset {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                dtype: c.dtype,
                values: c.values.iter().take(n).cloned().collect(),
            })
            .collect();
        Dataset { columns }
    }
}
