use anyhow::{anyhow, Result};
use serde::Serialize;
use serde_json::Value;

use crate::error::LayoutError;
use crate::ticks::format_value;

/// Rows may carry at most this many fields (X, Y, value).
pub const MAX_ARITY: usize = 3;

/// A single cell of the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Field {
    Numeric(f64),
    Category(String),
}

impl Field {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Field::Numeric(v) => Some(*v),
            Field::Category(_) => None,
        }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Field::Numeric(_) => ColumnType::Numeric,
            Field::Category(_) => ColumnType::Categorical,
        }
    }

    /// Display text: categories verbatim, numbers in their shortest exact form.
    pub fn label(&self) -> String {
        match self {
            Field::Numeric(v) => format_value(*v),
            Field::Category(s) => s.clone(),
        }
    }
}

impl From<f64> for Field {
    fn from(v: f64) -> Self {
        Field::Numeric(v)
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        Field::Category(s.to_string())
    }
}

impl From<String> for Field {
    fn from(s: String) -> Self {
        Field::Category(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnType {
    Numeric,
    Categorical,
}

/// Validated, read-only dataset. All rows share one arity (1 to 3) and each
/// column holds a single field type.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    headers: Option<Vec<String>>,
    rows: Vec<Vec<Field>>,
    column_types: Vec<ColumnType>,
}

impl DataTable {
    pub fn new(rows: Vec<Vec<Field>>) -> crate::error::Result<Self> {
        if rows.is_empty() {
            return Ok(Self { headers: None, rows, column_types: Vec::new() });
        }

        let arity = rows[0].len();
        let column_types: Vec<ColumnType> = rows[0].iter().map(Field::column_type).collect();

        for (row_idx, row) in rows.iter().enumerate() {
            if row.is_empty() || row.len() > MAX_ARITY {
                return Err(LayoutError::UnsupportedArity { row: row_idx, found: row.len() });
            }
            if row.len() != arity {
                return Err(LayoutError::Shape { row: row_idx, expected: arity, found: row.len() });
            }
            for (col, field) in row.iter().enumerate() {
                if field.column_type() != column_types[col] {
                    return Err(LayoutError::TypeMismatch { column: col, row: row_idx });
                }
                if let Field::Numeric(v) = field {
                    if !v.is_finite() {
                        return Err(LayoutError::NonFiniteValue { row: row_idx, column: col });
                    }
                }
            }
        }

        Ok(Self { headers: None, rows, column_types })
    }

    /// Attach column names. They become default axis titles.
    pub fn with_headers(mut self, headers: Vec<String>) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Fields per row; zero for an empty table.
    pub fn arity(&self) -> usize {
        self.column_types.len()
    }

    pub fn column_type(&self, column: usize) -> Option<ColumnType> {
        self.column_types.get(column).copied()
    }

    pub fn is_categorical(&self, column: usize) -> bool {
        self.column_type(column) == Some(ColumnType::Categorical)
    }

    pub fn header(&self, column: usize) -> Option<&str> {
        self.headers.as_ref()?.get(column).map(String::as_str)
    }

    pub fn row(&self, index: usize) -> Option<&[Field]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Field]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Numeric value at `(row, column)`.
    pub fn value(&self, row: usize, column: usize) -> crate::error::Result<f64> {
        self.check_numeric(column)?;
        self.rows
            .get(row)
            .and_then(|r| r[column].as_f64())
            .ok_or(LayoutError::Type { column })
    }

    /// Extract one column as numbers.
    pub fn numeric_column(&self, column: usize) -> crate::error::Result<Vec<f64>> {
        self.check_numeric(column)?;
        Ok(self.rows.iter().filter_map(|r| r[column].as_f64()).collect())
    }

    /// Extract one column as display labels, in row order.
    pub fn labels(&self, column: usize) -> crate::error::Result<Vec<String>> {
        self.check_column(column)?;
        Ok(self.rows.iter().map(|r| r[column].label()).collect())
    }

    fn check_column(&self, column: usize) -> crate::error::Result<()> {
        if column >= self.arity() {
            return Err(LayoutError::ColumnOutOfBounds { column, arity: self.arity() });
        }
        Ok(())
    }

    fn check_numeric(&self, column: usize) -> crate::error::Result<()> {
        self.check_column(column)?;
        if self.is_categorical(column) {
            return Err(LayoutError::Type { column });
        }
        Ok(())
    }

    /// Build a table from JSON: either an array of row arrays, or an object
    /// `{"headers": [...], "rows": [[...], ...]}`.
    pub fn from_json(value: &Value) -> Result<Self> {
        let (headers, rows_value) = match value {
            Value::Array(_) => (None, value),
            Value::Object(obj) => {
                let rows = obj.get("rows").ok_or_else(||
                    anyhow!("Input object must have a \"rows\" array")
                )?;
                let headers = match obj.get("headers") {
                    Some(Value::Array(items)) => Some(
                        items
                            .iter()
                            .map(|h| h.as_str().map(String::from).ok_or_else(||
                                anyhow!("Headers must be strings")
                            ))
                            .collect::<Result<Vec<_>>>()?,
                    ),
                    Some(_) => return Err(anyhow!("\"headers\" must be an array of strings")),
                    None => None,
                };
                (headers, rows)
            }
            _ => return Err(anyhow!("Input data must be a JSON array of rows")),
        };

        let array = rows_value.as_array().ok_or_else(||
            anyhow!("Input rows must be a JSON array of arrays")
        )?;

        let mut rows = Vec::with_capacity(array.len());
        for (idx, item) in array.iter().enumerate() {
            let cells = item.as_array().ok_or_else(||
                anyhow!("Row {} must be an array", idx)
            )?;

            let mut row = Vec::with_capacity(cells.len());
            for cell in cells {
                let field = match cell {
                    Value::Number(n) => Field::Numeric(n.as_f64().ok_or_else(||
                        anyhow!("Row {} holds a number that does not fit in f64", idx)
                    )?),
                    Value::String(s) => Field::Category(s.clone()),
                    Value::Bool(b) => Field::Category(b.to_string()),
                    _ => return Err(anyhow!("Unsupported value in row {}: {}", idx, cell)),
                };
                row.push(field);
            }
            rows.push(row);
        }

        let table = DataTable::new(rows)?;
        Ok(match headers {
            Some(h) => table.with_headers(h),
            None => table,
        })
    }
}
