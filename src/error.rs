//! Error taxonomy for the layout engine.
//!
//! Every variant is a deterministic function of the input table and the
//! request: building again with the same arguments yields the same error.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LayoutError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// A row's arity differs from the first row's
    #[error("row {row} has {found} fields, expected {expected}")]
    Shape {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Rows must carry between one and three fields
    #[error("row {row} has {found} fields, rows must have between 1 and 3 fields")]
    UnsupportedArity { row: usize, found: usize },

    /// A column mixes numeric and categorical fields
    #[error("column {column} mixes numeric and categorical values (first mismatch at row {row})")]
    TypeMismatch { column: usize, row: usize },

    /// Numeric access to a categorical column
    #[error("column {column} is categorical and cannot be read as numbers")]
    Type { column: usize },

    #[error("row {row}, column {column} holds a non-finite number")]
    NonFiniteValue { row: usize, column: usize },

    #[error("column {column} does not exist in rows with {arity} fields")]
    ColumnOutOfBounds { column: usize, arity: usize },

    /// Explicit range with max < min or non-finite bounds
    #[error("invalid range: min {min} must not exceed max {max}")]
    InvalidRange { min: f64, max: f64 },

    #[error("no data rows to chart")]
    EmptyData,

    #[error("no data rows fall inside the requested axis ranges")]
    NoDataInRange,

    #[error("{requested}D chart requested but the data has {available} column(s)")]
    DimensionMismatch { requested: usize, available: usize },

    /// Zero-span range reaching the tick planner
    #[error("range collapses to the single value {value}")]
    DegenerateRange { value: f64 },

    #[error("pie value at row {row} is negative ({value})")]
    NegativeValue { row: usize, value: f64 },

    #[error("pie values sum to zero")]
    ZeroTotal,

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
