//! Triangle wave generators.
//!
//! Two interchangeable strategies produce the same symmetric triangle in
//! [-1, 1], starting at -1 at `t = 0` and peaking at +1 half a period later:
//!
//! - [`PiecewiseTriangle`]: direct piecewise-linear definition on the phase
//! - `SymmetricSawtooth` (feature `libm`): a sawtooth of width 0.5 on the
//!   angle `θ = 2π·f·t`, read off the wrapped phase `atan2(sin θ, cos θ)`
//!
//! [`detected`] picks one once per process.

#[cfg(feature = "libm")]
use std::f64::consts::{FRAC_2_PI, TAU};
use std::fmt;
use std::sync::OnceLock;

/// A periodic triangle signal source.
pub trait TriangleWave: Send + Sync + fmt::Debug {
    /// Short strategy name, for logs.
    fn name(&self) -> &'static str;

    /// Value at time `t` (seconds) for a wave of `frequency` Hz.
    ///
    /// Returns 0.0 when `frequency` is not a positive finite number.
    fn sample(&self, frequency: f64, t: f64) -> f64;

    /// Evaluate at every time instant.
    fn samples(&self, frequency: f64, times: &[f64]) -> Vec<f64> {
        times.iter().map(|&t| self.sample(frequency, t)).collect()
    }
}

fn valid_frequency(frequency: f64) -> bool {
    frequency.is_finite() && frequency > 0.0
}

/// Piecewise-linear triangle.
#[derive(Debug, Clone, Copy, Default)]
pub struct PiecewiseTriangle;

impl TriangleWave for PiecewiseTriangle {
    fn name(&self) -> &'static str {
        "piecewise"
    }

    fn sample(&self, frequency: f64, t: f64) -> f64 {
        if !valid_frequency(frequency) {
            return 0.0;
        }
        let period = 1.0 / frequency;
        let phase = t.rem_euclid(period) / period;
        if phase < 0.5 {
            4.0 * phase - 1.0
        } else {
            3.0 - 4.0 * phase
        }
    }
}

/// Triangle built from the trigonometric sawtooth with 50% symmetry.
#[cfg(feature = "libm")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SymmetricSawtooth;

#[cfg(feature = "libm")]
impl TriangleWave for SymmetricSawtooth {
    fn name(&self) -> &'static str {
        "sawtooth"
    }

    fn sample(&self, frequency: f64, t: f64) -> f64 {
        if !valid_frequency(frequency) {
            return 0.0;
        }
        symmetric_sawtooth(TAU * frequency * t)
    }
}

/// Sawtooth of period 2π and width 0.5: -1 at `angle = 0`, +1 at `π`.
///
/// `atan2(sin θ, cos θ)` is θ wrapped into (-π, π]; its magnitude is the
/// distance to the nearest trough, linear on both slopes.
#[cfg(feature = "libm")]
pub fn symmetric_sawtooth(angle: f64) -> f64 {
    let wrapped = libm::atan2(libm::sin(angle), libm::cos(angle));
    (FRAC_2_PI * libm::fabs(wrapped) - 1.0).clamp(-1.0, 1.0)
}

static DETECTED: OnceLock<&'static dyn TriangleWave> = OnceLock::new();

/// The process-wide triangle strategy.
///
/// Uses the sawtooth primitive when the `libm` feature is compiled in and
/// falls back to the piecewise form otherwise. Resolved on first use.
pub fn detected() -> &'static dyn TriangleWave {
    *DETECTED.get_or_init(|| {
        #[cfg(feature = "libm")]
        let generator: &'static dyn TriangleWave = &SymmetricSawtooth;
        #[cfg(not(feature = "libm"))]
        let generator: &'static dyn TriangleWave = &PiecewiseTriangle;

        tracing::debug!(strategy = generator.name(), "triangle generator selected");
        generator
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piecewise_shape() {
        let tri = PiecewiseTriangle;
        // 1 Hz: -1 at 0, 0 at 1/4, +1 at 1/2, 0 at 3/4
        assert!((tri.sample(1.0, 0.0) + 1.0).abs() < 1e-12);
        assert!(tri.sample(1.0, 0.25).abs() < 1e-12);
        assert!((tri.sample(1.0, 0.5) - 1.0).abs() < 1e-12);
        assert!(tri.sample(1.0, 0.75).abs() < 1e-12);
        assert!((tri.sample(1.0, 1.0) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_piecewise_negative_time_is_periodic() {
        let tri = PiecewiseTriangle;
        assert!((tri.sample(2.0, -0.1) - tri.sample(2.0, 0.4)).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_frequency_is_flat() {
        assert_eq!(PiecewiseTriangle.sample(0.0, 1.0), 0.0);
        assert_eq!(PiecewiseTriangle.sample(f64::NAN, 1.0), 0.0);
    }

    #[test]
    fn test_range() {
        let tri = PiecewiseTriangle;
        let times: Vec<f64> = (0..1000).map(|i| i as f64 * 1.3e-6).collect();
        for v in tri.samples(8e3, &times) {
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[cfg(feature = "libm")]
    #[test]
    fn test_strategies_agree() {
        let f = 8e3;
        let times: Vec<f64> = (0..800).map(|i| 4.0 / f * i as f64 / 799.0).collect();
        let a = PiecewiseTriangle.samples(f, &times);
        let b = SymmetricSawtooth.samples(f, &times);
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-9, "{x} vs {y}");
        }
    }

    #[cfg(feature = "libm")]
    #[test]
    fn test_strategies_agree_over_long_runs() {
        // 50 kHz, a quarter second in, stepping off-grid
        let f = 50e3;
        let times: Vec<f64> = (0..5000).map(|i| 0.25 + i as f64 * 1.37e-7).collect();
        let a = PiecewiseTriangle.samples(f, &times);
        let b = SymmetricSawtooth.samples(f, &times);
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-9, "{x} vs {y}");
        }
    }

    #[cfg(feature = "libm")]
    #[test]
    fn test_symmetric_sawtooth_shape() {
        use std::f64::consts::{FRAC_PI_2, PI};

        assert!((symmetric_sawtooth(0.0) + 1.0).abs() < 1e-12);
        assert!(symmetric_sawtooth(FRAC_PI_2).abs() < 1e-12);
        assert!((symmetric_sawtooth(PI) - 1.0).abs() < 1e-12);
        assert!(symmetric_sawtooth(3.0 * FRAC_PI_2).abs() < 1e-12);
        assert!((symmetric_sawtooth(-FRAC_PI_2) - symmetric_sawtooth(FRAC_PI_2)).abs() < 1e-12);
    }

    #[test]
    fn test_detected_is_stable() {
        let a = detected();
        let b = detected();
        assert_eq!(a.name(), b.name());
        #[cfg(feature = "libm")]
        assert_eq!(a.name(), "sawtooth");
        #[cfg(not(feature = "libm"))]
        assert_eq!(a.name(), "piecewise");
    }
}
