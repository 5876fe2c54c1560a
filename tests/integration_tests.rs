use serde_json::Value;
use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

/// Helper function to run vislayout with arguments and stdin input
fn run_vislayout(args: &[&str], input: &str) -> Result<String, String> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_vislayout"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    // Write data to stdin
    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(input.as_bytes())
            .map_err(|e| format!("Failed to write to stdin: {}", e))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| format!("Failed to wait for process: {}", e))?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

fn run_json(args: &[&str], input: &str) -> Value {
    let result = run_vislayout(args, input);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    serde_json::from_str(&result.unwrap()).expect("Output is not valid JSON")
}

#[test]
fn test_end_to_end_categorical_bar() {
    let csv = fs::read_to_string("test/sales.csv").expect("Failed to read test CSV");
    let layout = run_json(&["bar()"], &csv);

    assert_eq!(layout["family"], "bar");
    assert_eq!(layout["dimensions"], 2);

    let axes = layout["axes"].as_array().unwrap();
    assert_eq!(axes.len(), 2);
    assert_eq!(axes[0]["is_categorical"], true);
    assert_eq!(axes[0]["title"], "month");
    let labels: Vec<&str> = axes[0]["ticks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["Jan", "Feb", "Mar", "Apr"]);

    let placements = layout["placements"].as_array().unwrap();
    assert_eq!(placements.len(), 4);
    // Zero-valued bar keeps the minimum height
    assert_eq!(placements[1]["normalized_position"][2], 0.0001);
    assert_eq!(placements[2]["normalized_position"][2], 1.0);
    assert_eq!(placements[2]["value_label"], "30");
}

#[test]
fn test_end_to_end_categorical_forces_2d() {
    let csv = fs::read_to_string("test/sales.csv").expect("Failed to read test CSV");
    let layout = run_json(&["bar(dims: 3)"], &csv);
    assert_eq!(layout["dimensions"], 2);
    assert_eq!(layout["axes"].as_array().unwrap().len(), 2);
}

#[test]
fn test_end_to_end_bounds_filter() {
    let csv = fs::read_to_string("test/filter.csv").expect("Failed to read test CSV");
    let layout = run_json(&["point(x_range: (2, 8))"], &csv);
    let indices: Vec<u64> = layout["placements"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["raw_value_index"].as_u64().unwrap())
        .collect();
    assert_eq!(indices, vec![1, 2]);

    let layout = run_json(&["point(x_range: (2, 8), filter: false)"], &csv);
    assert_eq!(layout["placements"].as_array().unwrap().len(), 4);
}

#[test]
fn test_end_to_end_explicit_step() {
    let csv = "x,y\n0,1\n10,2\n";
    let layout = run_json(&["line(x_step: 2)"], csv);
    let values: Vec<f64> = layout["axes"][0]["ticks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["value"].as_f64().unwrap())
        .collect();
    assert_eq!(values, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
}

#[test]
fn test_end_to_end_surface() {
    let csv = fs::read_to_string("test/grid.csv").expect("Failed to read test CSV");
    let layout = run_json(&["surface()", "--pretty"], &csv);
    assert_eq!(layout["dimensions"], 3);
    assert_eq!(layout["axes"].as_array().unwrap().len(), 3);
    assert!(layout["placements"][0].get("scale").is_none());
}

#[test]
fn test_end_to_end_pie() {
    let csv = fs::read_to_string("test/shares.csv").expect("Failed to read test CSV");
    let layout = run_json(&[r#"pie(title: "Regions")"#], &csv);
    assert_eq!(layout["title"], "Regions");
    assert!(layout["axes"].as_array().unwrap().is_empty());
    let slices = layout["placements"].as_array().unwrap();
    assert_eq!(slices[0]["kind"], "slice");
    assert_eq!(slices[0]["end"], 0.25);
    assert_eq!(slices[1]["end"], 1.0);
    assert_eq!(slices[1]["category_label"], "South");
}

#[test]
fn test_end_to_end_request_file() {
    let csv = fs::read_to_string("test/grid.csv").expect("Failed to read test CSV");
    let layout = run_json(&["--request-file", "test/point_request.json"], &csv);
    assert_eq!(layout["family"], "point");
    assert_eq!(layout["axes"][2]["title"], "Height");
    assert_eq!(layout["axes"][0]["ticks"].as_array().unwrap().len(), 3);
}

#[test]
fn test_end_to_end_json_input() {
    let data = r#"{"headers": ["k", "v"], "rows": [["a", 1], ["b", 2]]}"#;
    let layout = run_json(&["bar()", "--json"], data);
    assert_eq!(layout["axes"][1]["title"], "v");
    assert_eq!(layout["placements"].as_array().unwrap().len(), 2);
}

#[test]
fn test_end_to_end_no_header() {
    let layout = run_json(&["point()", "--no-header"], "1,10\n2,20\n");
    assert_eq!(layout["placements"].as_array().unwrap().len(), 2);
    assert!(layout["axes"][0]["title"].is_null());
}

#[test]
fn test_end_to_end_invalid_syntax() {
    let csv = "x,y\n1,10\n2,20\n";
    let result = run_vislayout(&["invalid syntax here"], csv);
    assert!(result.is_err(), "Should have failed with parse error");
    assert!(result.unwrap_err().contains("Parse error"));
}

#[test]
fn test_end_to_end_dimension_mismatch() {
    let csv = "x,y\n1,10\n2,20\n";
    let result = run_vislayout(&["point(dims: 3)"], csv);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("3D chart requested"));
}

#[test]
fn test_end_to_end_too_many_ticks() {
    let csv = "x,y\n0,1\n100,2\n";
    let result = run_vislayout(&["point(ticks: 5000)"], csv);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("tick target"));
}

#[test]
fn test_end_to_end_empty_csv() {
    let csv = "x,y\n";
    let result = run_vislayout(&["line()"], csv);
    assert!(result.is_err(), "Should have failed with empty data error");
    assert!(result.unwrap_err().contains("no data rows"));
}

#[test]
fn test_end_to_end_ragged_csv() {
    let csv = "x,y\n1,10\n2\n";
    let result = run_vislayout(&["line()"], csv);
    assert!(result.is_err());
}
