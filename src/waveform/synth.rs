//! Ripple waveform synthesis.

use crate::converter::{ConverterResult, Quantity, Topology};
use crate::{DEFAULT_PERIODS, DEFAULT_SAMPLES, MAX_SAMPLES, MIN_SAMPLES};

use super::triangle::{self, TriangleWave};

/// Configuration for the waveform synthesizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthesizerConfig {
    periods: usize,
    samples: usize,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            periods: DEFAULT_PERIODS,
            samples: DEFAULT_SAMPLES,
        }
    }
}

impl SynthesizerConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of switching periods shown (at least 1).
    pub fn with_periods(mut self, periods: usize) -> Self {
        self.periods = periods.max(1);
        self
    }

    /// Set the number of sample points.
    ///
    /// Clamped to `MIN_SAMPLES..=MAX_SAMPLES`.
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples.clamp(MIN_SAMPLES, MAX_SAMPLES);
        self
    }

    /// Number of switching periods.
    pub fn periods(&self) -> usize {
        self.periods
    }

    /// Number of sample points.
    pub fn samples(&self) -> usize {
        self.samples
    }
}

/// One point of a synthesized waveform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformSample {
    /// Time in seconds
    pub time: f64,
    /// Inductor (or primary) current in A
    pub primary: f64,
    /// Output (or secondary) voltage in V
    pub secondary: f64,
}

/// A fully materialized ripple waveform.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformSeries {
    pub topology: Topology,
    /// Switching frequency in Hz
    pub frequency: f64,
    /// Number of switching periods spanned
    pub periods: usize,
    pub samples: Vec<WaveformSample>,
    /// False when the primary ripple was unbounded and drawn flat
    pub primary_bounded: bool,
    /// False when the secondary ripple was unbounded and drawn flat
    pub secondary_bounded: bool,
}

impl WaveformSeries {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the series holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample times in microseconds, for display.
    pub fn time_micros(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.time * 1e6).collect()
    }

    /// Primary signal values.
    pub fn primary(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.primary).collect()
    }

    /// Secondary signal values.
    pub fn secondary(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.secondary).collect()
    }
}

/// A signal oscillating around `average` with a given peak-to-peak ripple.
struct RippleSignal {
    average: f64,
    half_ripple: f64,
    bounded: bool,
}

impl RippleSignal {
    fn new(average: f64, ripple: Quantity) -> Self {
        match ripple {
            Quantity::Finite(r) => Self {
                average,
                half_ripple: r / 2.0,
                bounded: true,
            },
            Quantity::Infinite => Self {
                average,
                half_ripple: 0.0,
                bounded: false,
            },
        }
    }

    fn at(&self, tri: f64) -> f64 {
        self.average + self.half_ripple * tri
    }
}

/// Synthesize the ripple waveform of a design with the process-wide
/// triangle generator.
pub fn synthesize_waveform(result: &ConverterResult, config: &SynthesizerConfig) -> WaveformSeries {
    synthesize_waveform_with(result, config, triangle::detected())
}

/// Synthesize the ripple waveform with an explicit triangle generator.
///
/// Both signals follow `average + (ripple / 2) · triangle(f, t)`. An
/// unbounded ripple is drawn flat at the average.
pub fn synthesize_waveform_with(
    result: &ConverterResult,
    config: &SynthesizerConfig,
    generator: &dyn TriangleWave,
) -> WaveformSeries {
    let frequency = result.frequency;
    let n = config.samples();
    let span = if frequency.is_finite() && frequency > 0.0 {
        config.periods() as f64 / frequency
    } else {
        0.0
    };

    let times: Vec<f64> = (0..n)
        .map(|i| span * i as f64 / (n - 1) as f64)
        .collect();
    let tri = generator.samples(frequency, &times);

    let primary = RippleSignal::new(result.average_current, result.ripple_current);
    // Flyback reports zero secondary ripple, so its output stays at Vout
    let secondary = RippleSignal::new(result.output_voltage, result.secondary_ripple());

    if !primary.bounded || !secondary.bounded {
        tracing::warn!(
            topology = %result.topology,
            primary_bounded = primary.bounded,
            secondary_bounded = secondary.bounded,
            "unbounded ripple drawn flat"
        );
    }

    let samples = times
        .iter()
        .zip(&tri)
        .map(|(&time, &t)| WaveformSample {
            time,
            primary: primary.at(t),
            secondary: secondary.at(t),
        })
        .collect();

    WaveformSeries {
        topology: result.topology,
        frequency,
        periods: config.periods(),
        samples,
        primary_bounded: primary.bounded,
        secondary_bounded: secondary.bounded,
    }
}
