// Chart request parser
// Format: family(key: value, ...), e.g. bar(dims: 3, x_range: (2, 8), filter: false)

use super::lexer::{bool_literal, identifier, number_literal, string_literal, ws};
use crate::ir::{Axis, ChartFamily, ChartRequest, Dimensions};
use anyhow::{anyhow, bail, Result};
use nom::{
    branch::alt,
    character::complete::char,
    combinator::map,
    multi::separated_list0,
    sequence::{delimited, separated_pair},
    IResult,
};

/// A literal argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Number(f64),
    Pair(f64, f64),
    Bool(bool),
    Text(String),
}

impl ArgValue {
    fn kind(&self) -> &'static str {
        match self {
            ArgValue::Number(_) => "number",
            ArgValue::Pair(..) => "pair",
            ArgValue::Bool(_) => "boolean",
            ArgValue::Text(_) => "string",
        }
    }
}

/// A parsed call before the family name and arguments are checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartCall {
    pub family: String,
    pub args: Vec<(String, ArgValue)>,
}

fn pair_literal(input: &str) -> IResult<&str, (f64, f64)> {
    delimited(
        ws(char('(')),
        separated_pair(ws(number_literal), char(','), ws(number_literal)),
        ws(char(')')),
    )(input)
}

fn arg_value(input: &str) -> IResult<&str, ArgValue> {
    alt((
        map(bool_literal, ArgValue::Bool),
        map(pair_literal, |(a, b)| ArgValue::Pair(a, b)),
        map(number_literal, ArgValue::Number),
        map(string_literal, ArgValue::Text),
    ))(input)
}

fn argument(input: &str) -> IResult<&str, (String, ArgValue)> {
    separated_pair(ws(identifier), ws(char(':')), ws(arg_value))(input)
}

/// Parse `family(arg, ...)` without interpreting it.
pub fn parse_chart_call(input: &str) -> IResult<&str, ChartCall> {
    let (input, family) = ws(identifier)(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, args) = separated_list0(ws(char(',')), argument)(input)?;
    let (input, _) = ws(char(')'))(input)?;

    Ok((input, ChartCall { family, args }))
}

/// Parse a complete chart request.
pub fn parse_chart_request(input: &str) -> Result<ChartRequest> {
    let (rest, call) = parse_chart_call(input).map_err(|e| anyhow!("Parse error: {:?}", e))?;
    if !rest.trim().is_empty() {
        bail!("Parse error: unparsed input: '{}'", rest);
    }

    let family = ChartFamily::from_name(&call.family)
        .ok_or_else(|| anyhow!("Parse error: unknown chart family '{}'", call.family))?;

    let mut request = ChartRequest::new(family);
    for (key, value) in call.args {
        apply_argument(&mut request, &key, value)?;
    }
    Ok(request)
}

fn apply_argument(request: &mut ChartRequest, key: &str, value: ArgValue) -> Result<()> {
    match key {
        "dims" | "dimensions" => {
            let n = expect_integer(key, value)?;
            request.dimensions = u8::try_from(n)
                .ok()
                .and_then(|n| Dimensions::try_from(n).ok())
                .ok_or_else(|| anyhow!("Parse error: '{}' must be 2 or 3, got {}", key, n))?;
        }
        "padding" => request.padding = expect_number(key, value)?,
        "filter" => request.bounds_filter = expect_bool(key, value)?,
        "ticks" => {
            let n = expect_integer(key, value)?;
            if n == 0 {
                bail!("Parse error: 'ticks' must be at least 1");
            }
            request.tick_target = n;
        }
        "bar_size" => {
            let (w, d) = expect_pair(key, value)?;
            request.bar_size = (w, d);
        }
        "point_size" => request.point_size = expect_number(key, value)?,
        "title" => request.title = Some(expect_text(key, value)?),
        _ => {
            let (axis, property) = key
                .split_once('_')
                .and_then(|(a, p)| Axis::from_name(a).map(|axis| (axis, p)))
                .ok_or_else(|| anyhow!("Parse error: unknown argument '{}'", key))?;
            let axis_request = request.axis_mut(axis);
            match property {
                "range" => axis_request.range = Some(expect_pair(key, value)?),
                "step" => axis_request.step = Some(expect_number(key, value)?),
                "title" => axis_request.title = Some(expect_text(key, value)?),
                "decimals" => axis_request.decimals = Some(expect_integer(key, value)?),
                _ => bail!("Parse error: unknown argument '{}'", key),
            }
        }
    }
    Ok(())
}

fn type_error(key: &str, expected: &str, found: &ArgValue) -> anyhow::Error {
    anyhow!("Parse error: '{}' expects a {}, got a {}", key, expected, found.kind())
}

fn expect_number(key: &str, value: ArgValue) -> Result<f64> {
    match value {
        ArgValue::Number(n) => Ok(n),
        other => Err(type_error(key, "number", &other)),
    }
}

fn expect_integer(key: &str, value: ArgValue) -> Result<usize> {
    match value {
        ArgValue::Number(n) if n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => Ok(n as usize),
        other => Err(type_error(key, "non-negative integer", &other)),
    }
}

fn expect_pair(key: &str, value: ArgValue) -> Result<(f64, f64)> {
    match value {
        ArgValue::Pair(a, b) => Ok((a, b)),
        other => Err(type_error(key, "pair", &other)),
    }
}

fn expect_bool(key: &str, value: ArgValue) -> Result<bool> {
    match value {
        ArgValue::Bool(b) => Ok(b),
        other => Err(type_error(key, "boolean", &other)),
    }
}

fn expect_text(key: &str, value: ArgValue) -> Result<String> {
    match value {
        ArgValue::Text(s) => Ok(s),
        other => Err(type_error(key, "string", &other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chart_call() {
        let (rest, call) = parse_chart_call(r#"bar(dims: 3, x_range: (2, 8), z_title: "Sales")"#).unwrap();
        assert_eq!(rest, "");
        assert_eq!(call.family, "bar");
        assert_eq!(
            call.args,
            vec![
                ("dims".to_string(), ArgValue::Number(3.0)),
                ("x_range".to_string(), ArgValue::Pair(2.0, 8.0)),
                ("z_title".to_string(), ArgValue::Text("Sales".to_string())),
            ]
        );
    }

    #[test]
    fn test_parse_empty_call() {
        let request = parse_chart_request("  line( )  ").unwrap();
        assert_eq!(request, ChartRequest::new(ChartFamily::Line));
    }

    #[test]
    fn test_parse_full_request() {
        let request = parse_chart_request(
            r#"point(title: "Heights", dimensions: 3, padding: 0.05, filter: false, ticks: 8,
                     point_size: 0.1, y_step: 2.5, z_decimals: 1, x_title: "Year")"#,
        )
        .unwrap();
        assert_eq!(request.family, ChartFamily::Point);
        assert_eq!(request.title.as_deref(), Some("Heights"));
        assert_eq!(request.dimensions, Dimensions::Three);
        assert_eq!(request.padding, 0.05);
        assert!(!request.bounds_filter);
        assert_eq!(request.tick_target, 8);
        assert_eq!(request.point_size, 0.1);
        assert_eq!(request.y.step, Some(2.5));
        assert_eq!(request.z.decimals, Some(1));
        assert_eq!(request.x.title.as_deref(), Some("Year"));
    }

    #[test]
    fn test_dsl_matches_json() {
        let from_dsl = parse_chart_request("bar(dims: 3, x_range: (2, 8), x_step: 2, padding: 0.05)").unwrap();
        let from_json: ChartRequest = serde_json::from_str(
            r#"{"family": "bar", "dimensions": 3, "x": {"range": [2, 8], "step": 2}, "padding": 0.05}"#,
        )
        .unwrap();
        assert_eq!(from_dsl, from_json);
    }

    #[test]
    fn test_parse_errors() {
        for input in [
            "invalid syntax here",
            "histogram()",
            "bar(colour: 3)",
            "bar(dims: 4)",
            "bar(dims: 2.5)",
            "bar(filter: 1)",
            "bar(x_range: 3)",
            "bar(w_range: (1, 2))",
            "bar(ticks: 0)",
            "bar() | line()",
        ] {
            let err = parse_chart_request(input).unwrap_err();
            assert!(err.to_string().starts_with("Parse error"), "{}: {}", input, err);
        }
    }
}
