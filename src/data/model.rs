use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::error::DataError;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value.
/// Using `BTreeMap` / `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
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
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
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
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64`.
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
// Columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

/// A column proven to hold only numbers (or nulls).
///
/// Only [`Table::numeric`] hands these out, so every aggregation that takes a
/// `NumericColumn` is guaranteed a numeric target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericColumn {
    name: String,
    index: usize,
}

impl NumericColumn {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed column domains.
#[derive(Debug, Clone)]
pub struct Table {
    /// Ordered columns.
    pub columns: Vec<Column>,
    /// Rows; every row holds exactly one cell per column.
    pub rows: Vec<Vec<CellValue>>,
    /// For each categorical column the sorted set of distinct values.
    pub unique_values: BTreeMap<String, BTreeSet<CellValue>>,
    /// For each numeric column the observed `(min, max)`.
    pub numeric_ranges: BTreeMap<String, (f64, f64)>,
}

impl Table {
    /// Build a table from column names and rows, inferring column kinds and
    /// domains. Rows must already be rectangular.
    pub fn new(names: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let mut columns = Vec::with_capacity(names.len());
        let mut unique_values = BTreeMap::new();
        let mut numeric_ranges = BTreeMap::new();

        for (idx, name) in names.into_iter().enumerate() {
            let mut any_value = false;
            let mut all_numeric = true;
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            for row in &rows {
                let cell = &row[idx];
                if cell.is_null() {
                    continue;
                }
                any_value = true;
                match cell.as_f64() {
                    Some(v) => {
                        min = min.min(v);
                        max = max.max(v);
                    }
                    None => all_numeric = false,
                }
            }

            let kind = if any_value && all_numeric {
                numeric_ranges.insert(name.clone(), (min, max));
                ColumnKind::Numeric
            } else {
                let distinct: BTreeSet<CellValue> =
                    rows.iter().map(|row| row[idx].clone()).collect();
                unique_values.insert(name.clone(), distinct);
                ColumnKind::Categorical
            };
            columns.push(Column { name, kind });
        }

        Table {
            columns,
            rows,
            unique_values,
            numeric_ranges,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn kind(&self, name: &str) -> Option<ColumnKind> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.kind)
    }

    /// Resolve a column that aggregation can average over.
    pub fn numeric(&self, name: &str) -> Result<NumericColumn, DataError> {
        let index = self
            .column_index(name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))?;
        match self.columns[index].kind {
            ColumnKind::Numeric => Ok(NumericColumn {
                name: name.to_string(),
                index,
            }),
            ColumnKind::Categorical => Err(DataError::NotNumeric(name.to_string())),
        }
    }

    /// Names of columns of the given kind, in table order.
    pub fn columns_of_kind(&self, kind: ColumnKind) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.name.clone())
            .collect()
    }
}
