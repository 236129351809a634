//! Flyback (isolated) converter.
//!
//! Ideal lossless transfer is assumed for the duty cycle; the primary
//! average current uses a fixed conversion efficiency of
//! [`FLYBACK_EFFICIENCY`](crate::FLYBACK_EFFICIENCY).

use super::validate::{require_finite, require_frequency, require_non_negative, require_positive};
use super::{Analysis, Quantity, Recommendation, SecondaryMetric, Topology, TopologySolver};
use crate::error::{Result, SmpsError};
use crate::FLYBACK_EFFICIENCY;

/// Duty cycle clamp bounds.
const MIN_DUTY: f64 = 1e-6;
const MAX_DUTY: f64 = 0.999999;

/// Flyback converter design parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlybackParams {
    /// Input voltage in V
    pub input_voltage: f64,
    /// Output voltage in V
    pub output_voltage: f64,
    /// Switching frequency in Hz
    pub frequency: f64,
    /// Primary magnetizing inductance in H
    pub magnetizing_inductance: f64,
    /// Turns ratio Ns/Np (secondary over primary)
    pub turns_ratio: f64,
    /// Load current in A
    pub load_current: f64,
}

impl TopologySolver for FlybackParams {
    const TOPOLOGY: Topology = Topology::Flyback;

    fn frequency(&self) -> f64 {
        self.frequency
    }

    fn input_voltage(&self) -> f64 {
        self.input_voltage
    }

    fn output_voltage(&self) -> f64 {
        self.output_voltage
    }

    fn validate(&self) -> Result<()> {
        require_positive("vin", self.input_voltage)?;
        require_finite("vout", self.output_voltage)?;
        require_frequency(self.frequency)?;
        require_non_negative("lm", self.magnetizing_inductance)?;
        require_finite("n", self.turns_ratio)?;
        require_non_negative("iout", self.load_current)?;

        if self.turns_ratio == 0.0 {
            return Err(SmpsError::ZeroTurnsRatio);
        }
        Ok(())
    }

    fn analyze(&self) -> Result<Analysis> {
        let vin = self.input_voltage;
        let vout = self.output_voltage;
        let f = self.frequency;
        let lm = self.magnetizing_inductance;

        // Volt-second balance with the input reflected through Ns/Np
        let denom = vout + vin / self.turns_ratio;
        if denom == 0.0 {
            return Err(SmpsError::ZeroDenominator {
                message: "Vout + Vin / (Ns/Np) is zero; check turns ratio and voltages"
                    .to_string(),
            });
        }
        let duty = (vout / denom).clamp(MIN_DUTY, MAX_DUTY);

        let output_power = vout * self.load_current;
        let peak_current = if lm > 0.0 {
            Quantity::from_value((2.0 * output_power / (lm * f)).max(0.0).sqrt())
        } else {
            Quantity::Infinite
        };
        let ripple_current = Quantity::ratio(vin * duty, lm * f);
        let average_current = output_power / (vin * FLYBACK_EFFICIENCY);

        // Independent cross-check of the supplied ratio
        let recommended = Quantity::ratio(vout * (1.0 - duty), vin * duty);

        tracing::debug!(duty, output_power, %peak_current, %ripple_current, average_current, "flyback analysis");

        Ok(Analysis {
            duty_cycle: duty,
            average_current,
            peak_current,
            ripple_current,
            secondary: SecondaryMetric::OutputPower(output_power),
            recommendation: Recommendation::TurnsRatio {
                recommended,
                supplied: self.turns_ratio,
            },
        })
    }
}
