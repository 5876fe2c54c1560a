// Runtime: request + data in, layout JSON out

use crate::data::DataTable;
use crate::ir::{ChartLayout, ChartRequest};
use crate::layout;
use crate::parser;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

/// Where the chart request comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestSource {
    /// Inline DSL, e.g. `bar(dims: 3)`
    Dsl(String),
    /// Path to a JSON request file
    File(String),
}

/// Load a chart request from its source.
pub fn load_request(source: &RequestSource) -> Result<ChartRequest> {
    match source {
        RequestSource::Dsl(dsl) => parser::parse_chart_request(dsl),
        RequestSource::File(path) => {
            let text = fs::read_to_string(Path::new(path))
                .with_context(|| format!("Failed to read request file '{}'", path))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse request file '{}'", path))
        }
    }
}

/// Read a JSON dataset (see `DataTable::from_json`).
pub fn parse_json_table(text: &str) -> Result<DataTable> {
    if text.trim().is_empty() {
        bail!("No JSON data on input");
    }
    let value: serde_json::Value = serde_json::from_str(text).context("Failed to parse JSON data")?;
    DataTable::from_json(&value)
}

/// Build the chart layout for `request` over `table`.
pub fn build(table: &DataTable, request: &ChartRequest) -> Result<ChartLayout> {
    let layout = layout::build_layout(table, request).context("Failed to build chart layout")?;

    info!(
        family = layout.family.name(),
        dimensions = layout.dimensions.count(),
        axes = layout.axes.len(),
        placements = layout.placements.len(),
        "built chart layout"
    );
    Ok(layout)
}

pub fn layout_to_json(layout: &ChartLayout, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(layout)
    } else {
        serde_json::to_string(layout)
    };
    json.context("Failed to serialize chart layout")
}

/// Full pipeline: load the request, build, serialize.
pub fn render_layout(source: &RequestSource, table: &DataTable, pretty: bool) -> Result<String> {
    let request = load_request(source)?;
    let layout = build(table, &request)?;
    layout_to_json(&layout, pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_reader::read_table;
    use crate::ir::ChartFamily;

    fn sales_table() -> DataTable {
        read_table("month,sales\nJan,3\nFeb,0\nMar,6\n".as_bytes(), true).unwrap()
    }

    #[test]
    fn test_load_dsl_request() {
        let request = load_request(&RequestSource::Dsl("pie()".to_string())).unwrap();
        assert_eq!(request.family, ChartFamily::Pie);
    }

    #[test]
    fn test_load_missing_request_file() {
        let err = load_request(&RequestSource::File("no/such/request.json".to_string())).unwrap_err();
        assert!(err.to_string().contains("Failed to read request file"));
    }

    #[test]
    fn test_render_layout_json() {
        let json = render_layout(&RequestSource::Dsl("bar()".to_string()), &sales_table(), false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["family"], "bar");
        assert_eq!(value["dimensions"], 2);
        assert_eq!(value["axes"][0]["axis"], "X");
        assert_eq!(value["axes"][0]["ticks"][2]["label"], "Mar");
        assert_eq!(value["placements"][2]["kind"], "position");
        assert_eq!(value["placements"][2]["normalized_position"][0], 1.0);
        assert_eq!(value["placements"][1]["category_label"], "Feb");
    }

    #[test]
    fn test_build_error_has_context() {
        let table = read_table("x\n1\n2\n".as_bytes(), true).unwrap();
        let request = ChartRequest::new(ChartFamily::Bar);
        let err = build(&table, &request).unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.starts_with("Failed to build chart layout"));
        assert!(chain.contains("2D chart requested but the data has 1 column(s)"));
    }

    #[test]
    fn test_parse_json_table() {
        let table = parse_json_table(r#"[[1, 2], [3, 4]]"#).unwrap();
        assert_eq!(table.len(), 2);
        assert!(parse_json_table("   ").is_err());
        assert!(parse_json_table("{not json").is_err());
    }
}
