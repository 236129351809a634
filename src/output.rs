//! Result formatting: text report, waveform CSV and design files.

use std::io::Write;

use crate::converter::{
    parameter_keys, ConverterInput, ConverterResult, Quantity, Recommendation, SecondaryMetric,
    TopologyParams,
};
use crate::error::Result;
use crate::timer::FixedDivider;
use crate::waveform::WaveformSeries;

/// Scale a quantity for display, keeping `∞` intact.
fn scaled(q: Quantity, factor: f64) -> Quantity {
    q.map(|v| v * factor)
}

/// Write a human-readable design report.
///
/// Format:
/// ```text
/// --- Boost ---
/// Vin = 28 V, Vout = 82 V, f = 8 kHz
///
/// Duty D            = 0.65854
/// I(avg)            = 29.286 A
/// ...
/// ```
pub fn write_report<W: Write>(result: &ConverterResult, writer: &mut W) -> Result<()> {
    writeln!(writer, "--- {} ---", result.topology)?;
    writeln!(
        writer,
        "Vin = {} V, Vout = {} V, f = {} kHz",
        result.input_voltage,
        result.output_voltage,
        result.frequency / 1e3
    )?;
    writeln!(writer)?;

    writeln!(writer, "Duty D            = {:.5}", result.duty_cycle)?;
    writeln!(writer, "I(avg)            = {:.3} A", result.average_current)?;
    writeln!(writer, "I(peak)           = {:.3} A", result.peak_current)?;
    writeln!(writer, "ΔI (p-p)          = {:.3} A", result.ripple_current)?;
    match result.secondary {
        SecondaryMetric::RippleVoltage(ripple) => {
            writeln!(writer, "ΔVout (approx)    = {:.5} V", ripple)?;
        }
        SecondaryMetric::OutputPower(power) => {
            writeln!(writer, "Pout              = {:.3} W", power)?;
        }
    }
    writeln!(writer, "Mode              = {}", result.mode)?;
    writeln!(writer)?;

    match result.recommendation {
        Recommendation::Passives {
            min_inductance,
            min_capacitance,
        } => {
            writeln!(writer, "Recommended L min = {:.2} µH", scaled(min_inductance, 1e6))?;
            writeln!(writer, "Recommended C min = {:.2} µF", scaled(min_capacitance, 1e6))?;
        }
        Recommendation::TurnsRatio {
            recommended,
            supplied,
        } => {
            writeln!(writer, "Ns/Np (supplied)  = {:.3}", supplied)?;
            writeln!(writer, "Ns/Np (derived)   = {:.4}", recommended)?;
        }
    }
    writeln!(writer)?;

    writeln!(
        writer,
        "Timer             = PSC {} / ARR {}",
        result.timer.prescaler, result.timer.reload
    )?;
    Ok(())
}

/// Write a waveform as CSV, time in microseconds.
///
/// Format:
/// ```csv
/// time_us,primary,secondary
/// 0,27.5,82.0
/// 0.6257,27.6,82.0
/// ```
pub fn write_waveform_csv<W: Write>(series: &WaveformSeries, writer: &mut W) -> Result<()> {
    writeln!(writer, "time_us,primary,secondary")?;
    for sample in &series.samples {
        writeln!(
            writer,
            "{},{},{}",
            sample.time * 1e6,
            sample.primary,
            sample.secondary
        )?;
    }
    Ok(())
}

/// Write an input back out as a design file that parses to the same value.
pub fn write_design<W: Write>(input: &ConverterInput, writer: &mut W) -> Result<()> {
    let topology = input.topology();
    writeln!(writer, ".topology {}", topology.to_string().to_lowercase())?;

    write!(writer, ".timer clock={}", input.timer.clock)?;
    match input.timer.fixed {
        FixedDivider::Prescaler(psc) => write!(writer, " psc={}", psc)?,
        FixedDivider::Reload(arr) => write!(writer, " arr={}", arr)?,
        FixedDivider::None => {}
    }
    writeln!(writer)?;

    let values: Vec<f64> = match input.params {
        TopologyParams::Boost(p) => vec![
            p.input_voltage,
            p.output_voltage,
            p.frequency,
            p.inductance,
            p.capacitance,
            p.load_current,
            p.ripple_current_percent,
            p.ripple_voltage_percent,
        ],
        TopologyParams::Buck(p) => vec![
            p.input_voltage,
            p.output_voltage,
            p.frequency,
            p.inductance,
            p.capacitance,
            p.load_current,
            p.ripple_current_max,
            p.ripple_voltage_max,
        ],
        TopologyParams::Flyback(p) => vec![
            p.input_voltage,
            p.output_voltage,
            p.frequency,
            p.magnetizing_inductance,
            p.turns_ratio,
            p.load_current,
        ],
    };

    for (key, value) in parameter_keys(topology).iter().zip(values) {
        writeln!(writer, "{:<9}{}", key, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::{calculate, ConductionMode, Topology};
    use crate::dsl;
    use crate::timer::TimerSettings;
    use crate::waveform::{synthesize_waveform, SynthesizerConfig};

    #[test]
    fn test_report_renders_infinity() {
        let mut input = ConverterInput::preset(Topology::Boost);
        if let TopologyParams::Boost(ref mut p) = input.params {
            p.ripple_voltage_percent = 0.0;
        }
        let result = calculate(&input).unwrap();

        let mut out = Vec::new();
        write_report(&result, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Recommended C min = ∞ µF"), "{text}");
        // ΔIL ≈ 69.8 A against IL(avg) ≈ 29.3 A
        assert_eq!(result.mode, ConductionMode::Dcm);
        assert!(text.contains("Mode              = DCM"));
        assert!(text.contains("PSC 0 / ARR 8999"));
        assert!(!text.contains("NaN"));
    }

    #[test]
    fn test_flyback_report() {
        let result = calculate(&ConverterInput::preset(Topology::Flyback)).unwrap();
        let mut out = Vec::new();
        write_report(&result, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Pout              = 820.000 W"));
        assert!(text.contains("Ns/Np (supplied)  = 1.000"));
    }

    #[test]
    fn test_waveform_csv() {
        let result = calculate(&ConverterInput::preset(Topology::Buck)).unwrap();
        let series = synthesize_waveform(&result, &SynthesizerConfig::default());
        let mut out = Vec::new();
        write_waveform_csv(&series, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "time_us,primary,secondary");
        assert_eq!(lines.len(), series.len() + 1);
        assert!(lines[1].starts_with("0,"));
    }

    #[test]
    fn test_design_round_trip() {
        for topology in Topology::ALL {
            let input = ConverterInput::preset(topology).with_timer(
                TimerSettings::new(16e6).with_fixed(FixedDivider::Reload(99)),
            );
            let mut out = Vec::new();
            write_design(&input, &mut out).unwrap();
            let text = String::from_utf8(out).unwrap();
            let parsed = ConverterInput::from_ast(&dsl::parse(&text).unwrap()).unwrap();
            assert_eq!(parsed, input, "{text}");
        }
    }
}
