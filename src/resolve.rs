use tracing::debug;

use crate::data::DataTable;
use crate::error::{LayoutError, Result};
use crate::ir::{CartesianFrame, ChartFamily, ChartRequest, Dimensions, PieFrame};
use crate::scale::check_padding;
use crate::ticks::MAX_TICKS;

/// Check a bar, point or line request against the table.
///
/// Categorical data forces a 2D layout whatever the request asks for.
pub fn resolve_cartesian(table: &DataTable, request: &ChartRequest) -> Result<CartesianFrame> {
    // 1. Request parameters and data presence
    check_request(request)?;
    if table.is_empty() {
        return Err(LayoutError::EmptyData);
    }

    // 2. Only X may be categorical
    let arity = table.arity();
    if let Some(column) = (1..arity).find(|&c| table.is_categorical(c)) {
        return Err(LayoutError::Type { column });
    }
    let categorical = table.is_categorical(0);

    // 3. Dimensionality
    let mut dimensions = request.dimensions;
    if categorical && dimensions.is_3d() {
        debug!("categorical data forces a 2D {} chart", request.family.name());
        dimensions = Dimensions::Two;
    }
    if arity < dimensions.count() {
        return Err(LayoutError::DimensionMismatch {
            requested: dimensions.count(),
            available: arity,
        });
    }

    let (y_col, value_col) = if dimensions.is_3d() { (Some(1), 2) } else { (None, 1) };
    Ok(CartesianFrame {
        family: request.family,
        dimensions,
        categorical,
        x_col: 0,
        y_col,
        value_col,
    })
}

/// Surfaces are always 3D over three numeric columns.
pub fn resolve_surface(table: &DataTable, request: &ChartRequest) -> Result<CartesianFrame> {
    check_request(request)?;
    if table.is_empty() {
        return Err(LayoutError::EmptyData);
    }

    let arity = table.arity();
    if arity < 3 {
        return Err(LayoutError::DimensionMismatch { requested: 3, available: arity });
    }
    if let Some(column) = (0..arity).find(|&c| table.is_categorical(c)) {
        return Err(LayoutError::Type { column });
    }

    Ok(CartesianFrame {
        family: ChartFamily::Surface,
        dimensions: Dimensions::Three,
        categorical: false,
        x_col: 0,
        y_col: Some(1),
        value_col: 2,
    })
}

/// Pie charts read a value column, optionally preceded by a label column.
pub fn resolve_pie(table: &DataTable, request: &ChartRequest) -> Result<PieFrame> {
    check_request(request)?;
    if table.is_empty() {
        return Err(LayoutError::EmptyData);
    }

    let frame = match table.arity() {
        1 => PieFrame { label_col: None, value_col: 0 },
        2 => PieFrame { label_col: Some(0), value_col: 1 },
        n => {
            return Err(LayoutError::InvalidRequest(format!(
                "pie charts take a value column and an optional label column, got {} columns",
                n
            )))
        }
    };
    if table.is_categorical(frame.value_col) {
        return Err(LayoutError::Type { column: frame.value_col });
    }
    Ok(frame)
}

fn check_request(request: &ChartRequest) -> Result<()> {
    check_padding(request.padding)?;

    if request.tick_target == 0 || request.tick_target > MAX_TICKS {
        return Err(LayoutError::InvalidRequest(format!(
            "tick target must be between 1 and {}, got {}",
            MAX_TICKS, request.tick_target
        )));
    }
    let (width, depth) = request.bar_size;
    for (name, size) in [("bar width", width), ("bar depth", depth), ("point size", request.point_size)] {
        if !size.is_finite() || size <= 0.0 {
            return Err(LayoutError::InvalidRequest(format!(
                "{} must be a positive number, got {}",
                name, size
            )));
        }
    }
    Ok(())
}
