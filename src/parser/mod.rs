// Chart request DSL parser module

pub mod lexer;
pub mod request;

// Public API re-exports
pub use request::{parse_chart_call, parse_chart_request, ArgValue, ChartCall};
