//! Tick planning for numeric and categorical axes.

use crate::error::{LayoutError, Result};
use crate::ir::{AxisRange, Tick};
use crate::normalize::normalize;

/// Tick count the auto step aims for.
pub const DEFAULT_TICK_TARGET: usize = 5;
/// Upper bound on ticks per axis.
pub const MAX_TICKS: usize = 1000;
/// Upper bound on decimals picked for labels automatically.
pub const MAX_DECIMALS: usize = 4;

/// Labels never print more decimals than an f64 holds significant digits.
const MAX_LEADING_DECIMALS: usize = 15;

const NICE_FACTORS: [f64; 4] = [1.0, 2.0, 5.0, 10.0];

/// Ticks for one axis together with the step that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedTicks {
    pub step: f64,
    pub ticks: Vec<Tick>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickPlanner {
    target_count: usize,
    decimals: Option<usize>,
}

impl Default for TickPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_TARGET)
    }
}

impl TickPlanner {
    pub fn new(target_count: usize) -> Self {
        Self {
            target_count: target_count.max(1),
            decimals: None,
        }
    }

    /// Fix the number of decimals in numeric labels.
    pub fn with_decimals(mut self, decimals: Option<usize>) -> Self {
        self.decimals = decimals;
        self
    }

    /// Plan ticks over `range`.
    ///
    /// With `categories`, one tick per category is produced in the order
    /// given and `step` is ignored. Otherwise ticks follow `step`, or a nice
    /// step when `step` is `None`.
    pub fn plan(
        &self,
        range: &AxisRange,
        step: Option<f64>,
        categories: Option<&[String]>,
    ) -> Result<PlannedTicks> {
        if range.span() <= 0.0 || range.span().is_nan() {
            return Err(LayoutError::DegenerateRange { value: range.min });
        }

        if let Some(categories) = categories {
            return Ok(plan_categorical(range, categories));
        }

        match step {
            Some(step) => self.plan_fixed(range, step),
            None => self.plan_auto(range),
        }
    }

    fn plan_fixed(&self, range: &AxisRange, step: f64) -> Result<PlannedTicks> {
        if !step.is_finite() || step <= 0.0 {
            return Err(LayoutError::InvalidRequest(format!(
                "tick step must be a positive number, got {}",
                step
            )));
        }

        let tolerance = range.span() * 1e-9;
        let last = ((range.span() + tolerance) / step).floor();
        if last >= MAX_TICKS as f64 {
            return Err(LayoutError::InvalidRequest(format!(
                "tick step {} yields more than {} ticks",
                step, MAX_TICKS
            )));
        }

        let decimals = self
            .decimals
            .unwrap_or_else(|| label_decimals(&[range.min, step]));

        let ticks = (0..=last as usize)
            .map(|i| {
                let mut value = range.min + i as f64 * step;
                if (value - range.max).abs() <= tolerance {
                    value = range.max;
                }
                make_tick(value, range, decimals)
            })
            .collect();

        Ok(PlannedTicks { step, ticks })
    }

    fn plan_auto(&self, range: &AxisRange) -> Result<PlannedTicks> {
        let step = nice_step(range.span(), self.target_count);
        let tolerance = range.span() * 1e-9;
        let decimals = self.decimals.unwrap_or_else(|| label_decimals(&[step]));

        let first = (range.min / step - 1e-9).ceil();
        let last = ((range.max + tolerance) / step).floor();
        if last - first + 1.0 > MAX_TICKS as f64 {
            return Err(LayoutError::InvalidRequest(format!(
                "tick target {} yields more than {} ticks",
                self.target_count, MAX_TICKS
            )));
        }

        let mut ticks = Vec::new();
        let mut k = first;
        loop {
            let value = k * step;
            if value > range.max + tolerance {
                break;
            }
            ticks.push(make_tick(value, range, decimals));
            k += 1.0;
        }

        Ok(PlannedTicks { step, ticks })
    }
}

fn plan_categorical(range: &AxisRange, categories: &[String]) -> PlannedTicks {
    let ticks = categories
        .iter()
        .enumerate()
        .map(|(i, label)| Tick {
            position: normalize(i as f64, range),
            value: i as f64,
            label: label.clone(),
        })
        .collect();
    PlannedTicks { step: 1.0, ticks }
}

fn make_tick(value: f64, range: &AxisRange, decimals: usize) -> Tick {
    Tick {
        position: normalize(value, range),
        value,
        label: format_tick(value, decimals),
    }
}

/// Step from {1, 2, 5} x 10^k closest to `span / target_count`, never wider
/// than `span` so at least one tick lands in range.
pub fn nice_step(span: f64, target_count: usize) -> f64 {
    let raw = span / target_count.max(1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());

    NICE_FACTORS
        .iter()
        .map(|f| f * magnitude)
        .filter(|&step| step <= span)
        .min_by(|a, b| {
            (a - raw)
                .abs()
                .partial_cmp(&(b - raw).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(raw)
}

/// Fewest decimals (up to `MAX_DECIMALS`) that show every value exactly,
/// widened to the leading digit of values smaller than `10^-MAX_DECIMALS`.
pub fn label_decimals(values: &[f64]) -> usize {
    values
        .iter()
        .map(|&v| decimals_for(v).max(leading_decimals(v)))
        .max()
        .unwrap_or(0)
}

/// Decimals needed to reach the first significant digit of `value`.
fn leading_decimals(value: f64) -> usize {
    if value == 0.0 || !value.is_finite() {
        return 0;
    }
    let exponent = value.abs().log10().floor();
    if exponent >= 0.0 {
        0
    } else {
        (-exponent as usize).min(MAX_LEADING_DECIMALS)
    }
}

fn decimals_for(value: f64) -> usize {
    for d in 0..=MAX_DECIMALS {
        let scaled = value * 10f64.powi(d as i32);
        if (scaled - scaled.round()).abs() <= 1e-9 * scaled.abs().max(1.0) {
            return d;
        }
    }
    MAX_DECIMALS
}

/// Fixed-precision label; never renders negative zero.
pub fn format_tick(value: f64, decimals: usize) -> String {
    let factor = 10f64.powi(decimals as i32);
    let mut rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        rounded = 0.0;
    }
    format!("{:.*}", decimals, rounded)
}

/// Label for a single raw value.
pub fn format_value(value: f64) -> String {
    format_tick(value, decimals_for(value))
}
