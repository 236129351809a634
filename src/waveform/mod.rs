//! Illustrative ripple waveforms.
//!
//! The synthesizer turns a [`ConverterResult`](crate::ConverterResult) into
//! two time series over a few switching periods: the inductor (or primary)
//! current and the output (or secondary) voltage, each a triangle around
//! its average with the computed peak-to-peak ripple.

mod synth;
pub mod triangle;

pub use synth::{
    synthesize_waveform, synthesize_waveform_with, SynthesizerConfig, WaveformSample,
    WaveformSeries,
};
#[cfg(feature = "libm")]
pub use triangle::SymmetricSawtooth;
pub use triangle::{PiecewiseTriangle, TriangleWave};
