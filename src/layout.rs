//! Chart layout builder.
//!
//! Each family has its own builder; all of them share range resolution,
//! normalization and tick planning. A build never mutates the table and
//! returns either a complete layout or the first error hit.

use tracing::debug;

use crate::data::DataTable;
use crate::error::{LayoutError, Result};
use crate::ir::{
    Axis, AxisRange, AxisSpec, CartesianFrame, ChartFamily, ChartLayout, ChartRequest,
    Dimensions, Placement, PlacementRecord,
};
use crate::normalize::{clamp_unit, normalize, plotted_magnitude};
use crate::resolve;
use crate::scale;
use crate::ticks::{format_value, TickPlanner};

/// Build the layout for `request` over `table`.
pub fn build_layout(table: &DataTable, request: &ChartRequest) -> Result<ChartLayout> {
    debug!(
        "building {} chart over {} rows x {} columns",
        request.family.name(),
        table.len(),
        table.arity()
    );

    match request.family {
        ChartFamily::Bar => build_bar(table, request),
        ChartFamily::Point => build_point(table, request),
        ChartFamily::Line => build_line(table, request),
        ChartFamily::Surface => build_surface(table, request),
        ChartFamily::Pie => build_pie(table, request),
    }
}

/// Bars rise from the floor to `z`; the scale hint is the half-extent of a
/// cube primitive: `(width, depth, z / 2)`.
fn build_bar(table: &DataTable, request: &ChartRequest) -> Result<ChartLayout> {
    let frame = resolve::resolve_cartesian(table, request)?;
    let (width, depth) = request.bar_size;
    build_cartesian(table, request, &frame, |z| Some([width, depth, z * 0.5]))
}

fn build_point(table: &DataTable, request: &ChartRequest) -> Result<ChartLayout> {
    let frame = resolve::resolve_cartesian(table, request)?;
    let size = request.point_size;
    build_cartesian(table, request, &frame, |_| Some([size, size, size]))
}

/// Line vertices are ordered along X so the renderer can connect them in turn.
fn build_line(table: &DataTable, request: &ChartRequest) -> Result<ChartLayout> {
    let frame = resolve::resolve_cartesian(table, request)?;
    let mut layout = build_cartesian(table, request, &frame, |_| None)?;
    layout.placements.sort_by(|a, b| {
        let ax = a.position().map_or(0.0, |p| p[0]);
        let bx = b.position().map_or(0.0, |p| p[0]);
        ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(layout)
}

fn build_surface(table: &DataTable, request: &ChartRequest) -> Result<ChartLayout> {
    let frame = resolve::resolve_surface(table, request)?;
    build_cartesian(table, request, &frame, |_| None)
}

/// Resolved ranges of the axes in use.
struct AxisRanges {
    x: AxisRange,
    y: Option<AxisRange>,
    z: AxisRange,
}

impl AxisRanges {
    fn get(&self, axis: Axis) -> Option<AxisRange> {
        match axis {
            Axis::X => Some(self.x),
            Axis::Y => self.y,
            Axis::Z => Some(self.z),
        }
    }
}

fn build_cartesian<F>(
    table: &DataTable,
    request: &ChartRequest,
    frame: &CartesianFrame,
    scale_hint: F,
) -> Result<ChartLayout>
where
    F: Fn(f64) -> Option<[f64; 3]>,
{
    // Columns are read once; categorical X uses the row index as its value
    let xs = if frame.categorical {
        (0..table.len()).map(|i| i as f64).collect()
    } else {
        table.numeric_column(frame.x_col)?
    };
    let ys = match frame.y_col {
        Some(col) => Some(table.numeric_column(col)?),
        None => None,
    };
    let values = table.numeric_column(frame.value_col)?;

    // 1. Positional ranges
    let x_range = if frame.categorical {
        if request.x.range.is_some() {
            debug!("ignoring explicit X range for categorical data");
        }
        scale::category_range(table.len())?
    } else {
        scale::resolve(table, frame.x_col, request.x.range, request.padding)?
    };
    let y_range = match frame.y_col {
        Some(col) => Some(scale::resolve(table, col, request.y.range, request.padding)?),
        None => None,
    };

    // 2. Bounds filter
    let filter = request.family.filters_bounds() && request.bounds_filter;
    let retained: Vec<usize> = (0..table.len())
        .filter(|&i| {
            !filter
                || (x_range.contains(xs[i])
                    && match (&ys, &y_range) {
                        (Some(ys), Some(range)) => range.contains(ys[i]),
                        _ => true,
                    })
        })
        .collect();
    if retained.is_empty() {
        return Err(LayoutError::NoDataInRange);
    }
    if retained.len() < table.len() {
        debug!(
            "bounds filter dropped {} of {} rows",
            table.len() - retained.len(),
            table.len()
        );
    }

    // 3. Value range
    let z_range = if frame.categorical {
        if request.z.range.is_some() {
            debug!("ignoring explicit value range for categorical data");
        }
        scale::resolve_values(values.iter().copied(), request.padding)?
    } else if let Some((min, max)) = request.z.range {
        scale::explicit_range(min, max)?
    } else {
        scale::resolve_values(retained.iter().map(|&i| values[i]), request.padding)?
    };

    let ranges = AxisRanges { x: x_range, y: y_range, z: z_range };

    // 4. Placements
    let categories = if frame.categorical {
        Some(table.labels(frame.x_col)?)
    } else {
        None
    };

    let placements = retained
        .iter()
        .map(|&i| {
            let x = clamp_unit(normalize(xs[i], &ranges.x));
            let y = match (&ys, &ranges.y) {
                (Some(ys), Some(range)) => clamp_unit(normalize(ys[i], range)),
                _ => 0.0,
            };
            let z = plotted_magnitude(values[i], &ranges.z);

            PlacementRecord {
                raw_value_index: i,
                category_label: categories.as_ref().map(|c| c[i].clone()),
                value: values[i],
                value_label: format_value(values[i]),
                geometry: Placement::Position {
                    normalized_position: [x, y, z],
                    scale: scale_hint(z),
                },
            }
        })
        .collect();

    // 5. Axes
    let mut axes = Vec::new();
    for (axis, column, is_categorical) in frame.compatible_axes() {
        let Some(range) = ranges.get(axis) else {
            continue;
        };
        let labels = if is_categorical { categories.as_deref() } else { None };
        axes.push(plan_axis(table, request, axis, column, range, labels)?);
    }

    Ok(ChartLayout {
        family: frame.family,
        title: request.title.clone(),
        dimensions: frame.dimensions,
        axes,
        placements,
    })
}

fn plan_axis(
    table: &DataTable,
    request: &ChartRequest,
    axis: Axis,
    column: usize,
    range: AxisRange,
    categories: Option<&[String]>,
) -> Result<AxisSpec> {
    let axis_request = request.axis(axis);
    let planned = TickPlanner::new(request.tick_target)
        .with_decimals(axis_request.decimals)
        .plan(&range, axis_request.step, categories)?;

    Ok(AxisSpec {
        axis,
        title: axis_request
            .title
            .clone()
            .or_else(|| table.header(column).map(String::from)),
        range,
        step: planned.step,
        ticks: planned.ticks,
        is_categorical: categories.is_some(),
    })
}

/// Slices cover consecutive fractions of a full turn in data order.
fn build_pie(table: &DataTable, request: &ChartRequest) -> Result<ChartLayout> {
    let frame = resolve::resolve_pie(table, request)?;
    let values = table.numeric_column(frame.value_col)?;
    let labels = match frame.label_col {
        Some(col) => Some(table.labels(col)?),
        None => None,
    };

    if let Some((row, &value)) = values.iter().enumerate().find(|(_, v)| **v < 0.0) {
        return Err(LayoutError::NegativeValue { row, value });
    }
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return Err(LayoutError::ZeroTotal);
    }

    let last = values.len() - 1;
    let mut placements = Vec::with_capacity(values.len());
    let mut start = 0.0;
    let mut cumulative = 0.0;
    for (i, &value) in values.iter().enumerate() {
        cumulative += value;
        let end = if i == last { 1.0 } else { (cumulative / total).min(1.0) };
        placements.push(PlacementRecord {
            raw_value_index: i,
            category_label: labels.as_ref().map(|l| l[i].clone()),
            value,
            value_label: format_value(value),
            geometry: Placement::Slice {
                start,
                end,
                fraction: value / total,
            },
        });
        start = end;
    }

    Ok(ChartLayout {
        family: ChartFamily::Pie,
        title: request.title.clone(),
        dimensions: Dimensions::Two,
        axes: Vec::new(),
        placements,
    })
}
