use crate::ir::AxisRange;

/// Smallest normalized magnitude a plotted value may take. Zero-valued bars
/// and points keep this height so they stay visible.
pub const MAGNITUDE_EPSILON: f64 = 1e-4;

/// Linear map of `value` onto `[0, 1]` over `range`.
///
/// Values outside the range map outside `[0, 1]`. A zero-span range maps
/// everything to 0.
pub fn normalize(value: f64, range: &AxisRange) -> f64 {
    let span = range.span();
    if span <= 0.0 {
        return 0.0;
    }
    (value - range.min) / span
}

/// Normalize a plotted magnitude, raising results in `[0, ε]` to `ε`.
pub fn normalize_magnitude(value: f64, range: &AxisRange) -> f64 {
    let n = normalize(value, range);
    if (0.0..=MAGNITUDE_EPSILON).contains(&n) {
        MAGNITUDE_EPSILON
    } else {
        n
    }
}

/// Magnitude coordinate for a placement, kept within `[ε, 1]`.
pub fn plotted_magnitude(value: f64, range: &AxisRange) -> f64 {
    normalize_magnitude(value, range).clamp(MAGNITUDE_EPSILON, 1.0)
}

pub fn clamp_unit(n: f64) -> f64 {
    n.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::RangeSource;

    fn range(min: f64, max: f64) -> AxisRange {
        AxisRange { min, max, source: RangeSource::Auto }
    }

    #[test]
    fn test_normalize_endpoints() {
        let r = range(-4.0, 12.0);
        assert_eq!(normalize(-4.0, &r), 0.0);
        assert_eq!(normalize(12.0, &r), 1.0);
        assert_eq!(normalize(4.0, &r), 0.5);
    }

    #[test]
    fn test_normalize_out_of_range() {
        let r = range(0.0, 10.0);
        assert_eq!(normalize(20.0, &r), 2.0);
        assert_eq!(clamp_unit(normalize(20.0, &r)), 1.0);
        assert_eq!(clamp_unit(normalize(-5.0, &r)), 0.0);
    }

    #[test]
    fn test_zero_span() {
        assert_eq!(normalize(3.0, &range(3.0, 3.0)), 0.0);
    }

    #[test]
    fn test_magnitude_clamp() {
        let r = range(0.0, 100.0);
        assert_eq!(normalize_magnitude(0.0, &r), MAGNITUDE_EPSILON);
        assert_eq!(normalize_magnitude(0.005, &r), MAGNITUDE_EPSILON);
        assert_eq!(normalize_magnitude(50.0, &r), 0.5);
        // Below-range values are not part of the clamp band
        assert!(normalize_magnitude(-10.0, &r) < 0.0);
    }

    #[test]
    fn test_plotted_magnitude_bounds() {
        let r = range(10.0, 20.0);
        assert_eq!(plotted_magnitude(0.0, &r), MAGNITUDE_EPSILON);
        assert_eq!(plotted_magnitude(30.0, &r), 1.0);
        assert_eq!(plotted_magnitude(15.0, &r), 0.5);
    }
}
