//! # SMPS Core
//!
//! A design calculator for switched-mode DC-DC converters.
//!
//! This library provides:
//! - Steady-state design equations for boost, buck and flyback converters
//! - PWM timer register quantization (prescaler / auto-reload)
//! - Illustrative ripple waveforms over a few switching periods
//! - A small text format for describing a design
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`converter`] - Topology solvers and the shared calculation pipeline
//! - [`timer`] - Timer divider quantization
//! - [`waveform`] - Triangle generators and the waveform synthesizer
//! - [`dsl`] - Parser for the design file language
//! - [`output`] - Text report and CSV writers
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! smps boost.smps --csv waveform.csv
//! smps --preset buck --clock 16M --psc 7
//! ```
//!
//! ### Library
//!
//! ```no_run
//! use smps_core::{calculate, synthesize_waveform, ConverterInput, SynthesizerConfig, Topology};
//!
//! let result = calculate(&ConverterInput::preset(Topology::Boost))?;
//! println!("D = {:.4}, {}", result.duty_cycle, result.timer);
//!
//! let series = synthesize_waveform(&result, &SynthesizerConfig::default());
//! assert_eq!(series.len(), smps_core::DEFAULT_SAMPLES);
//! # Ok::<(), smps_core::SmpsError>(())
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmConverterCalc } from 'smps_core';
//!
//! const calc = new WasmConverterCalc(designText);
//! console.log(calc.report());
//! ```
//!
//! ## Calculation Method
//!
//! Every design runs the same pipeline:
//!
//! 1. Validate the parameters; contradictory inputs fail with no result
//! 2. Derive duty cycle, currents, ripple and component recommendations
//! 3. Quantize the PWM timer for the switching frequency
//!
//! Divisions by a zero inductance, capacitance or tolerance do not fail.
//! They yield [`Quantity::Infinite`], displayed as `∞`.

pub mod converter;
pub mod dsl;
pub mod error;
pub mod output;
pub mod timer;
pub mod waveform;

// Re-export main types for convenience
pub use converter::{calculate, ConverterInput, ConverterResult, Quantity, Topology};
pub use error::{Result, SmpsError};
pub use timer::{quantize_timer, TimerRequest, TimerResult};
pub use waveform::{synthesize_waveform, SynthesizerConfig, WaveformSeries};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmConverterCalc;

/// Default timer base clock in Hz
pub const DEFAULT_CLOCK_HZ: f64 = 72e6;

/// Default number of switching periods in a synthesized waveform
pub const DEFAULT_PERIODS: usize = 4;

/// Default number of waveform sample points
pub const DEFAULT_SAMPLES: usize = 800;

/// Lower bound on waveform sample points
pub const MIN_SAMPLES: usize = 600;

/// Upper bound on waveform sample points
pub const MAX_SAMPLES: usize = 800;

/// Assumed flyback conversion efficiency
pub const FLYBACK_EFFICIENCY: f64 = 0.9;
