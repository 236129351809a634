//! Possibly-unbounded engineering quantities.

use std::fmt;

/// A computed value that may be unconstrained.
///
/// Recommendations divide by user tolerances and ripple divides by the
/// passive values; when such a denominator is zero or negative the result is
/// [`Quantity::Infinite`] rather than a NaN or a panic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quantity {
    /// An ordinary finite value
    Finite(f64),
    /// Unbounded; rendered as `∞`
    Infinite,
}

impl Quantity {
    /// Guarded division: `num / den`, or `Infinite` when `den <= 0`.
    pub fn ratio(num: f64, den: f64) -> Self {
        if den > 0.0 {
            Self::from_value(num / den)
        } else {
            Self::Infinite
        }
    }

    /// Wrap a raw value. Overflow and indeterminate forms such as
    /// `inf / inf` both map to `Infinite`.
    pub fn from_value(value: f64) -> Self {
        if value.is_finite() {
            Self::Finite(value)
        } else {
            Self::Infinite
        }
    }

    /// The finite value, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Finite(v) => Some(*v),
            Self::Infinite => None,
        }
    }

    /// The value as an `f64`, with `Infinite` mapped to `f64::INFINITY`.
    pub fn to_f64(&self) -> f64 {
        self.value().unwrap_or(f64::INFINITY)
    }

    /// Apply `f` to a finite value; `Infinite` stays `Infinite`.
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Self::Finite(v) => Self::from_value(f(v)),
            Self::Infinite => Self::Infinite,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Forward so that width/precision flags apply
            Self::Finite(v) => fmt::Display::fmt(v, f),
            Self::Infinite => f.pad("∞"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_guards_zero_denominator() {
        assert_eq!(Quantity::ratio(1.0, 0.0), Quantity::Infinite);
        assert_eq!(Quantity::ratio(1.0, -2.0), Quantity::Infinite);
        assert_eq!(Quantity::ratio(0.0, 0.0), Quantity::Infinite);
        assert_eq!(Quantity::ratio(3.0, 2.0), Quantity::Finite(1.5));
    }

    #[test]
    fn test_overflow_becomes_infinite() {
        assert_eq!(Quantity::ratio(f64::MAX, 1e-300), Quantity::Infinite);
    }

    #[test]
    fn test_indeterminate_becomes_infinite() {
        assert_eq!(Quantity::ratio(f64::INFINITY, f64::INFINITY), Quantity::Infinite);
        assert_eq!(Quantity::from_value(f64::NAN), Quantity::Infinite);
        assert_eq!(Quantity::Finite(f64::MAX).map(|v| v * 2.0 - v * 2.0), Quantity::Infinite);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{:.2}", Quantity::Finite(1.23456)), "1.23");
        assert_eq!(format!("{}", Quantity::Infinite), "∞");
        assert_eq!(format!("{:>3}", Quantity::Infinite), "  ∞");
    }

    #[test]
    fn test_map_keeps_infinite() {
        assert_eq!(Quantity::Infinite.map(|v| v * 2.0), Quantity::Infinite);
        assert_eq!(Quantity::Finite(2.0).map(|v| v * 2.0), Quantity::Finite(4.0));
    }
}
