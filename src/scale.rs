//! Axis range resolution.
//!
//! Explicit ranges are taken verbatim. Auto ranges come from a single min/max
//! pass over the data, then get degenerate expansion and optional padding.

use crate::data::{ColumnType, DataTable};
use crate::error::{LayoutError, Result};
use crate::ir::{AxisRange, RangeSource};

/// Half of the synthetic span given to a range whose min equals its max.
pub const DEGENERATE_HALF_SPAN: f64 = 0.5;

/// Resolve the range of `column`, or validate `explicit` if given.
///
/// Categorical columns resolve to the row-index range `[0, n - 1]` and are
/// never padded.
pub fn resolve(
    table: &DataTable,
    column: usize,
    explicit: Option<(f64, f64)>,
    padding: f64,
) -> Result<AxisRange> {
    if let Some((min, max)) = explicit {
        return explicit_range(min, max);
    }
    if table.is_empty() {
        return Err(LayoutError::EmptyData);
    }

    match table.column_type(column) {
        None => Err(LayoutError::ColumnOutOfBounds { column, arity: table.arity() }),
        Some(ColumnType::Categorical) => category_range(table.len()),
        Some(ColumnType::Numeric) => {
            let values = table.rows().filter_map(|row| row[column].as_f64());
            resolve_values(values, padding)
        }
    }
}

/// Auto range over an arbitrary value sequence.
pub fn resolve_values<I>(values: I, padding: f64) -> Result<AxisRange>
where
    I: IntoIterator<Item = f64>,
{
    check_padding(padding)?;

    let (min, max) = values.into_iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(min, max), v| (min.min(v), max.max(v)),
    );
    if min > max {
        return Err(LayoutError::EmptyData);
    }

    let (min, max) = expand_degenerate(min, max);
    let (min, max) = pad_range(min, max, padding);
    Ok(AxisRange { min, max, source: RangeSource::Auto })
}

/// Range spanning `count` category slots.
pub fn category_range(count: usize) -> Result<AxisRange> {
    if count == 0 {
        return Err(LayoutError::EmptyData);
    }
    let (min, max) = expand_degenerate(0.0, (count - 1) as f64);
    Ok(AxisRange { min, max, source: RangeSource::Auto })
}

/// Validate a user-supplied range. No padding is applied.
pub fn explicit_range(min: f64, max: f64) -> Result<AxisRange> {
    if !(min.is_finite() && max.is_finite()) || min > max {
        return Err(LayoutError::InvalidRange { min, max });
    }
    let (min, max) = expand_degenerate(min, max);
    Ok(AxisRange { min, max, source: RangeSource::Explicit })
}

pub(crate) fn check_padding(padding: f64) -> Result<()> {
    if !padding.is_finite() || padding < 0.0 {
        return Err(LayoutError::InvalidRequest(format!(
            "padding must be a non-negative number, got {}",
            padding
        )));
    }
    Ok(())
}

fn expand_degenerate(min: f64, max: f64) -> (f64, f64) {
    if min == max {
        (min - DEGENERATE_HALF_SPAN, max + DEGENERATE_HALF_SPAN)
    } else {
        (min, max)
    }
}

fn pad_range(min: f64, max: f64, padding: f64) -> (f64, f64) {
    let margin = (max - min) * padding;
    (min - margin, max + margin)
}
