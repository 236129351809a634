//! Buck (step-down) converter.

use super::validate::{require_finite, require_frequency, require_non_negative, require_positive};
use super::{ripple_voltage, Analysis, Quantity, Recommendation, SecondaryMetric, Topology, TopologySolver};
use crate::error::{Result, SmpsError};

/// Buck converter design parameters.
///
/// Unlike [`BoostParams`](super::BoostParams), ripple tolerances are
/// absolute: amperes for the inductor, volts for the output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuckParams {
    /// Input voltage in V, must exceed the output
    pub input_voltage: f64,
    /// Output voltage in V
    pub output_voltage: f64,
    /// Switching frequency in Hz
    pub frequency: f64,
    /// Inductance in H
    pub inductance: f64,
    /// Output capacitance in F
    pub capacitance: f64,
    /// Load current in A
    pub load_current: f64,
    /// Allowed inductor ripple in A
    pub ripple_current_max: f64,
    /// Allowed output ripple in V
    pub ripple_voltage_max: f64,
}

impl TopologySolver for BuckParams {
    const TOPOLOGY: Topology = Topology::Buck;

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
        require_non_negative("l", self.inductance)?;
        require_non_negative("c", self.capacitance)?;
        require_non_negative("iout", self.load_current)?;
        require_non_negative("ripple_i", self.ripple_current_max)?;
        require_non_negative("ripple_v", self.ripple_voltage_max)?;

        if self.output_voltage >= self.input_voltage {
            return Err(SmpsError::constraint(
                Topology::Buck,
                format!(
                    "Vout ({} V) must be less than Vin ({} V)",
                    self.output_voltage, self.input_voltage
                ),
            ));
        }
        Ok(())
    }

    fn analyze(&self) -> Result<Analysis> {
        let vin = self.input_voltage;
        let vout = self.output_voltage;
        let f = self.frequency;

        let duty = vout / vin;
        if duty <= 0.0 {
            return Err(SmpsError::NonPositiveDutyCycle { duty });
        }

        let ripple_current = Quantity::ratio((vin - vout) * duty, self.inductance * f);
        let ripple_v = ripple_voltage(ripple_current, f, self.capacitance);
        // The inductor carries the load current directly
        let average_current = self.load_current;
        let peak_current = ripple_current.map(|di| average_current + di / 2.0);

        let min_inductance = Quantity::ratio((vin - vout) * duty, self.ripple_current_max * f);
        let min_capacitance =
            Quantity::ratio(self.ripple_current_max, 8.0 * f * self.ripple_voltage_max);

        tracing::debug!(duty, %ripple_current, %ripple_v, average_current, "buck analysis");

        Ok(Analysis {
            duty_cycle: duty,
            average_current,
            peak_current,
            ripple_current,
            secondary: SecondaryMetric::RippleVoltage(ripple_v),
            recommendation: Recommendation::Passives {
                min_inductance,
                min_capacitance,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::converter::ConductionMode;

    fn reference() -> BuckParams {
        BuckParams {
            input_voltage: 12.0,
            output_voltage: 5.0,
            frequency: 50e3,
            inductance: 100e-6,
            capacitance: 100e-6,
            load_current: 0.5,
            ripple_current_max: 0.1,
            ripple_voltage_max: 0.1,
        }
    }

    #[test]
    fn test_reference_design() {
        let analysis = reference().analyze().unwrap();
        assert_eq!(analysis.duty_cycle, 5.0 / 12.0);
        assert_eq!(analysis.average_current, 0.5);

        // (12 - 5) * 5/12 / (100u * 50k) = 0.5833 A
        let ripple = analysis.ripple_current.value().unwrap();
        assert_relative_eq!(ripple, 7.0 * (5.0 / 12.0) / 5.0, epsilon = 1e-12);
        assert_eq!(
            ConductionMode::classify(analysis.average_current, analysis.ripple_current),
            ConductionMode::Ccm
        );
    }

    #[test]
    fn test_absolute_tolerances() {
        let analysis = reference().analyze().unwrap();
        let duty = 5.0 / 12.0;
        match analysis.recommendation {
            Recommendation::Passives {
                min_inductance,
                min_capacitance,
            } => {
                assert_relative_eq!(min_inductance.to_f64(), 7.0 * duty / (0.1 * 50e3), epsilon = 1e-12);
                assert_relative_eq!(min_capacitance.to_f64(), 0.1 / (8.0 * 50e3 * 0.1), epsilon = 1e-12);
            }
            other => panic!("unexpected recommendation {other:?}"),
        }
    }

    #[test]
    fn test_light_load_is_dcm() {
        let params = BuckParams {
            load_current: 0.2,
            ..reference()
        };
        let analysis = params.analyze().unwrap();
        assert_eq!(
            ConductionMode::classify(analysis.average_current, analysis.ripple_current),
            ConductionMode::Dcm
        );
    }

    #[test]
    fn test_rejects_step_up() {
        let params = BuckParams {
            output_voltage: 12.0,
            ..reference()
        };
        assert!(matches!(
            params.validate(),
            Err(SmpsError::TopologyConstraint { .. })
        ));
    }

    #[test]
    fn test_zero_output_has_no_duty() {
        let params = BuckParams {
            output_voltage: 0.0,
            ..reference()
        };
        assert!(params.validate().is_ok());
        assert!(matches!(
            params.analyze(),
            Err(SmpsError::NonPositiveDutyCycle { .. })
        ));
    }
}
