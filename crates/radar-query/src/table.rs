//! Flat tabular results handed to the presentation layer.

use duckdb::types::Value;
use duckdb::{Params, Statement};
use serde::Serialize;
use serde_json::{Map, Number};

use crate::QueryError;

/// One typed cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view of the cell; integers widen to `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str(""),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<Value> for Cell {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Boolean(v) => Self::Bool(v),
            Value::TinyInt(v) => Self::Int(i64::from(v)),
            Value::SmallInt(v) => Self::Int(i64::from(v)),
            Value::Int(v) => Self::Int(i64::from(v)),
            Value::BigInt(v) => Self::Int(v),
            Value::HugeInt(v) => i64::try_from(v).map_or(Self::Float(v as f64), Self::Int),
            Value::UTinyInt(v) => Self::Int(i64::from(v)),
            Value::USmallInt(v) => Self::Int(i64::from(v)),
            Value::UInt(v) => Self::Int(i64::from(v)),
            Value::UBigInt(v) => i64::try_from(v).map_or(Self::Float(v as f64), Self::Int),
            Value::Float(v) => Self::Float(f64::from(v)),
            Value::Double(v) => Self::Float(v),
            // Parsed from the exact decimal text, so 0.892 reads back as 0.892.
            Value::Decimal(v) => {
                let text = v.to_string();
                text.parse().map_or(Self::Text(text), Self::Float)
            }
            Value::Text(v) | Value::Enum(v) => Self::Text(v),
            other => Self::Text(format!("{other:?}")),
        }
    }
}

/// Ordered rows with named columns.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Run a prepared statement and collect every row.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::DuckDb`] if execution or row decoding fails.
    pub fn collect<P: Params>(stmt: &mut Statement<'_>, params: P) -> Result<Self, QueryError> {
        let mut rows = stmt.query(params)?;
        let columns = rows
            .as_ref()
            .map(Statement::column_names)
            .unwrap_or_default();

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(columns.len());
            for index in 0..columns.len() {
                cells.push(Cell::from(row.get::<_, Value>(index)?));
            }
            out.push(cells);
        }

        Ok(Self { columns, rows: out })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cells of one column, top to bottom. Empty if the column does not exist.
    #[must_use]
    pub fn column(&self, name: &str) -> Vec<&Cell> {
        self.column_index(name)
            .map(|index| self.rows.iter().filter_map(|row| row.get(index)).collect())
            .unwrap_or_default()
    }

    /// Integer values of one column, skipping nulls.
    #[must_use]
    pub fn i64_column(&self, name: &str) -> Vec<i64> {
        self.column(name).into_iter().filter_map(Cell::as_i64).collect()
    }

    /// Numeric values of one column, skipping nulls.
    #[must_use]
    pub fn f64_column(&self, name: &str) -> Vec<f64> {
        self.column(name).into_iter().filter_map(Cell::as_f64).collect()
    }

    /// Rows as JSON objects keyed by column name, for record-style output.
    #[must_use]
    pub fn to_records(&self) -> Vec<Map<String, serde_json::Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row)
                    .map(|(column, cell)| (column.clone(), cell_to_json(cell)))
                    .collect()
            })
            .collect()
    }
}

fn cell_to_json(cell: &Cell) -> serde_json::Value {
    match cell {
        Cell::Null => serde_json::Value::Null,
        Cell::Bool(v) => serde_json::Value::Bool(*v),
        Cell::Int(v) => serde_json::Value::from(*v),
        Cell::Float(v) => {
            Number::from_f64(*v).map_or(serde_json::Value::Null, serde_json::Value::Number)
        }
        Cell::Text(v) => serde_json::Value::String(v.clone()),
    }
}
