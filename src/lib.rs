// Library exports for vislayout

pub mod csv_reader;
pub mod data;
pub mod error;
pub mod parser;
pub mod runtime;

// Layout engine
pub mod ir;
pub mod resolve;
pub mod scale;
pub mod normalize;
pub mod ticks;
pub mod layout;

pub use data::{ColumnType, DataTable, Field};
pub use error::{LayoutError, Result};
pub use ir::{
    Axis, AxisRange, AxisRequest, AxisSpec, ChartFamily, ChartLayout, ChartRequest, Dimensions,
    Placement, PlacementRecord, RangeSource, Tick,
};
pub use layout::build_layout;
