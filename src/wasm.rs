//! WASM bindings for SMPS Core.
//!
//! This module provides JavaScript-friendly bindings for driving the design
//! calculator from a web page.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmConverterCalc } from 'smps_core';
//!
//! await init();
//!
//! const design = `
//!   .topology buck
//!   vin 12
//!   vout 5
//!   fsw 50k
//!   l 100u
//!   c 100u
//!   iout 0.5
//!   ripple_i 0.1
//!   ripple_v 0.1
//! `;
//!
//! const calc = new WasmConverterCalc(design);
//! plot(calc.waveform_time_us(), calc.waveform_primary());
//! ```

use wasm_bindgen::prelude::*;

use crate::converter::{calculate, ConverterInput, ConverterResult};
use crate::dsl;
use crate::output;
use crate::waveform::{synthesize_waveform, SynthesizerConfig, WaveformSeries};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WASM-compatible converter design calculation.
///
/// Holds one computed design and its default waveform.
#[wasm_bindgen]
pub struct WasmConverterCalc {
    result: ConverterResult,
    series: WaveformSeries,
}

#[wasm_bindgen]
impl WasmConverterCalc {
    /// Compute a design from design-file text.
    ///
    /// # Returns
    /// A new `WasmConverterCalc` or an error message if the design is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(design_text: &str) -> Result<WasmConverterCalc, JsValue> {
        Self::with_waveform(design_text, crate::DEFAULT_PERIODS, crate::DEFAULT_SAMPLES)
    }

    /// Compute a design with a custom waveform window.
    ///
    /// # Arguments
    /// * `design_text` - The design in design-file format
    /// * `periods` - Switching periods shown (default: 4)
    /// * `samples` - Sample points, clamped to 600..=800
    #[wasm_bindgen]
    pub fn with_waveform(
        design_text: &str,
        periods: usize,
        samples: usize,
    ) -> Result<WasmConverterCalc, JsValue> {
        let ast = dsl::parse(design_text).map_err(to_js)?;
        let input = ConverterInput::from_ast(&ast).map_err(to_js)?;
        let result = calculate(&input).map_err(to_js)?;

        let config = SynthesizerConfig::new()
            .with_periods(periods)
            .with_samples(samples);
        let series = synthesize_waveform(&result, &config);

        Ok(WasmConverterCalc { result, series })
    }

    /// The text report.
    #[wasm_bindgen]
    pub fn report(&self) -> Result<String, JsValue> {
        let mut buf = Vec::new();
        output::write_report(&self.result, &mut buf).map_err(to_js)?;
        String::from_utf8(buf).map_err(to_js)
    }

    /// Duty cycle in (0, 1).
    #[wasm_bindgen(getter)]
    pub fn duty_cycle(&self) -> f64 {
        self.result.duty_cycle
    }

    /// Prescaler register value.
    #[wasm_bindgen(getter)]
    pub fn prescaler(&self) -> u32 {
        self.result.timer.prescaler
    }

    /// Auto-reload register value.
    #[wasm_bindgen(getter)]
    pub fn reload(&self) -> u32 {
        self.result.timer.reload
    }

    /// Waveform sample times in microseconds.
    #[wasm_bindgen]
    pub fn waveform_time_us(&self) -> Vec<f64> {
        self.series.time_micros()
    }

    /// Inductor (or primary) current samples.
    #[wasm_bindgen]
    pub fn waveform_primary(&self) -> Vec<f64> {
        self.series.primary()
    }

    /// Output (or secondary) voltage samples.
    #[wasm_bindgen]
    pub fn waveform_secondary(&self) -> Vec<f64> {
        self.series.secondary()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
