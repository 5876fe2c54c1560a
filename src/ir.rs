use serde::{Deserialize, Serialize};

use crate::ticks::DEFAULT_TICK_TARGET;

// =============================================================================
// Request
// =============================================================================

/// The chart families the layout engine knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartFamily {
    Bar,
    Point,
    Line,
    Surface,
    Pie,
}

impl ChartFamily {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "bar" => Some(ChartFamily::Bar),
            "point" => Some(ChartFamily::Point),
            "line" => Some(ChartFamily::Line),
            "surface" => Some(ChartFamily::Surface),
            "pie" => Some(ChartFamily::Pie),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChartFamily::Bar => "bar",
            ChartFamily::Point => "point",
            ChartFamily::Line => "line",
            ChartFamily::Surface => "surface",
            ChartFamily::Pie => "pie",
        }
    }

    /// Whether rows outside the positional axis ranges are dropped.
    pub fn filters_bounds(&self) -> bool {
        matches!(self, ChartFamily::Bar | ChartFamily::Point)
    }
}

/// Spatial dimensionality of a chart. Serialized as the number 2 or 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Dimensions {
    #[default]
    Two,
    Three,
}

impl Dimensions {
    pub fn count(&self) -> usize {
        match self {
            Dimensions::Two => 2,
            Dimensions::Three => 3,
        }
    }

    pub fn is_3d(&self) -> bool {
        matches!(self, Dimensions::Three)
    }
}

impl TryFrom<u8> for Dimensions {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Dimensions::Two),
            3 => Ok(Dimensions::Three),
            other => Err(format!("dimensions must be 2 or 3, got {}", other)),
        }
    }
}

impl From<Dimensions> for u8 {
    fn from(dims: Dimensions) -> u8 {
        dims.count() as u8
    }
}

/// A chart axis. `Z` is always the value (magnitude) axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "x" | "X" => Some(Axis::X),
            "y" | "Y" => Some(Axis::Y),
            "z" | "Z" => Some(Axis::Z),
            _ => None,
        }
    }
}

/// Per-axis overrides of a chart request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisRequest {
    /// Explicit `(min, max)`; `None` means derive from data
    #[serde(default)]
    pub range: Option<(f64, f64)>,
    /// Tick step; `None` picks a nice step automatically
    #[serde(default)]
    pub step: Option<f64>,
    /// Fixed number of decimals for tick labels
    #[serde(default)]
    pub decimals: Option<usize>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Everything the builder needs to know about the chart besides the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub family: ChartFamily,
    /// Chart heading
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub dimensions: Dimensions,
    #[serde(default)]
    pub x: AxisRequest,
    #[serde(default)]
    pub y: AxisRequest,
    #[serde(default)]
    pub z: AxisRequest,
    /// Fractional margin added on each side of auto ranges
    #[serde(default)]
    pub padding: f64,
    #[serde(default = "default_bounds_filter")]
    pub bounds_filter: bool,
    #[serde(default = "default_tick_target")]
    pub tick_target: usize,
    #[serde(default = "default_bar_size")]
    pub bar_size: (f64, f64),
    #[serde(default = "default_point_size")]
    pub point_size: f64,
}

fn default_bounds_filter() -> bool { true }
fn default_tick_target() -> usize { DEFAULT_TICK_TARGET }
fn default_bar_size() -> (f64, f64) { (0.05, 0.05) }
fn default_point_size() -> f64 { 0.05 }

impl ChartRequest {
    pub fn new(family: ChartFamily) -> Self {
        Self {
            family,
            title: None,
            dimensions: Dimensions::default(),
            x: AxisRequest::default(),
            y: AxisRequest::default(),
            z: AxisRequest::default(),
            padding: 0.0,
            bounds_filter: default_bounds_filter(),
            tick_target: default_tick_target(),
            bar_size: default_bar_size(),
            point_size: default_point_size(),
        }
    }

    pub fn with_chart_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn with_range(mut self, axis: Axis, min: f64, max: f64) -> Self {
        self.axis_mut(axis).range = Some((min, max));
        self
    }

    pub fn with_step(mut self, axis: Axis, step: f64) -> Self {
        self.axis_mut(axis).step = Some(step);
        self
    }

    pub fn with_title(mut self, axis: Axis, title: impl Into<String>) -> Self {
        self.axis_mut(axis).title = Some(title.into());
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_bounds_filter(mut self, enabled: bool) -> Self {
        self.bounds_filter = enabled;
        self
    }

    pub fn axis(&self, axis: Axis) -> &AxisRequest {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    pub fn axis_mut(&mut self, axis: Axis) -> &mut AxisRequest {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// A cartesian request checked against a table: which column feeds which axis.
#[derive(Debug, Clone, PartialEq)]
pub struct CartesianFrame {
    pub family: ChartFamily,
    /// Effective dimensionality after overrides
    pub dimensions: Dimensions,
    /// X holds categories rather than numbers
    pub categorical: bool,
    pub x_col: usize,
    pub y_col: Option<usize>,
    pub value_col: usize,
}

impl CartesianFrame {
    /// Axes the chart supports as `(axis, column, is_categorical)`: X always,
    /// Y only in 3D, and the value axis Z always.
    pub fn compatible_axes(&self) -> Vec<(Axis, usize, bool)> {
        let mut axes = vec![(Axis::X, self.x_col, self.categorical)];
        if let Some(y_col) = self.y_col {
            axes.push((Axis::Y, y_col, false));
        }
        axes.push((Axis::Z, self.value_col, false));
        axes
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieFrame {
    pub label_col: Option<usize>,
    pub value_col: usize,
}

// =============================================================================
// Scaling
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeSource {
    Auto,
    Explicit,
}

/// Interval a value is normalized against. Ranges produced by the resolver
/// always satisfy `min < max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
    pub source: RangeSource,
}

impl AxisRange {
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

// =============================================================================
// Layout output
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    /// Normalized position along the axis
    pub position: f64,
    /// Raw tick value (row index for categorical axes)
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSpec {
    pub axis: Axis,
    pub title: Option<String>,
    pub range: AxisRange,
    pub step: f64,
    pub ticks: Vec<Tick>,
    pub is_categorical: bool,
}

/// Geometry of one placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Placement {
    /// A primitive anchored at a normalized `(x, y, z)`; `z` is the plotted
    /// magnitude. `scale` is the primitive's half-extent hint when the family
    /// draws a solid (bar, point).
    Position {
        normalized_position: [f64; 3],
        #[serde(skip_serializing_if = "Option::is_none")]
        scale: Option<[f64; 3]>,
    },
    /// A pie slice spanning `[start, end]` as fractions of a full turn.
    Slice { start: f64, end: f64, fraction: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementRecord {
    /// Index of the source row in the data table
    pub raw_value_index: usize,
    pub category_label: Option<String>,
    /// Raw plotted value
    pub value: f64,
    pub value_label: String,
    #[serde(flatten)]
    pub geometry: Placement,
}

impl PlacementRecord {
    pub fn position(&self) -> Option<[f64; 3]> {
        match self.geometry {
            Placement::Position { normalized_position, .. } => Some(normalized_position),
            Placement::Slice { .. } => None,
        }
    }
}

/// Output of one chart build.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    pub family: ChartFamily,
    pub title: Option<String>,
    pub dimensions: Dimensions,
    pub axes: Vec<AxisSpec>,
    pub placements: Vec<PlacementRecord>,
}

impl ChartLayout {
    pub fn axis(&self, axis: Axis) -> Option<&AxisSpec> {
        self.axes.iter().find(|spec| spec.axis == axis)
    }
}
