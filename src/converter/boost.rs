//! Boost (step-up) converter.

use super::validate::{require_frequency, require_non_negative, require_positive};
use super::{ripple_voltage, Analysis, Quantity, Recommendation, SecondaryMetric, Topology, TopologySolver};
use crate::error::{Result, SmpsError};

/// Boost converter design parameters.
///
/// Ripple tolerances are percentages: of the load current for the inductor
/// ripple, of the output voltage for the capacitor ripple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoostParams {
    /// Input voltage in V
    pub input_voltage: f64,
    /// Output voltage in V, must exceed the input
    pub output_voltage: f64,
    /// Switching frequency in Hz
    pub frequency: f64,
    /// Inductance in H
    pub inductance: f64,
    /// Output capacitance in F
    pub capacitance: f64,
    /// Load current in A
    pub load_current: f64,
    /// Allowed inductor ripple, % of load current
    pub ripple_current_percent: f64,
    /// Allowed output ripple, % of output voltage
    pub ripple_voltage_percent: f64,
}

impl TopologySolver for BoostParams {
    const TOPOLOGY: Topology = Topology::Boost;

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
        require_positive("vout", self.output_voltage)?;
        require_frequency(self.frequency)?;
        require_non_negative("l", self.inductance)?;
        require_non_negative("c", self.capacitance)?;
        require_non_negative("iout", self.load_current)?;
        require_non_negative("ripple_i", self.ripple_current_percent)?;
        require_non_negative("ripple_v", self.ripple_voltage_percent)?;

        if self.output_voltage <= self.input_voltage {
            return Err(SmpsError::constraint(
                Topology::Boost,
                format!(
                    "Vout ({} V) must be greater than Vin ({} V)",
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

        let duty = 1.0 - vin / vout;
        if duty <= 0.0 {
            return Err(SmpsError::NonPositiveDutyCycle { duty });
        }

        // Inductor sees Vin during the on-time
        let ripple_current = Quantity::ratio(vin * duty, self.inductance * f);
        let ripple_v = ripple_voltage(ripple_current, f, self.capacitance);
        let average_current = self.load_current / (1.0 - duty);
        let peak_current = ripple_current.map(|di| average_current + di / 2.0);

        let max_ripple_current = self.ripple_current_percent / 100.0 * self.load_current;
        let max_ripple_voltage = self.ripple_voltage_percent / 100.0 * vout;
        let min_inductance = Quantity::ratio(vin * duty, max_ripple_current * f);
        let min_capacitance = Quantity::ratio(max_ripple_current, 8.0 * f * max_ripple_voltage);

        tracing::debug!(duty, %ripple_current, %ripple_v, average_current, "boost analysis");

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

    fn reference() -> BoostParams {
        BoostParams {
            input_voltage: 28.0,
            output_voltage: 82.0,
            frequency: 8e3,
            inductance: 33e-6,
            capacitance: 470e-6,
            load_current: 10.0,
            ripple_current_percent: 20.0,
            ripple_voltage_percent: 1.0,
        }
    }

    #[test]
    fn test_reference_design() {
        let analysis = reference().analyze().unwrap();
        let duty = 1.0 - 28.0 / 82.0;
        assert_relative_eq!(analysis.duty_cycle, duty, epsilon = 1e-12);
        assert_relative_eq!(analysis.duty_cycle, 0.658537, epsilon = 1e-6);
        assert_relative_eq!(analysis.average_current, 29.2857, epsilon = 1e-3);

        let ripple = 28.0 * duty / (33e-6 * 8e3);
        assert_relative_eq!(analysis.ripple_current.value().unwrap(), ripple, epsilon = 1e-9);
        assert_eq!(
            analysis.secondary,
            SecondaryMetric::RippleVoltage(Quantity::Finite(ripple / (8.0 * 8e3 * 470e-6)))
        );
    }

    #[test]
    fn test_recommendations() {
        let analysis = reference().analyze().unwrap();
        let duty = analysis.duty_cycle;
        match analysis.recommendation {
            Recommendation::Passives {
                min_inductance,
                min_capacitance,
            } => {
                // ΔI_max = 2 A, ΔV_max = 0.82 V
                assert_relative_eq!(min_inductance.to_f64(), 28.0 * duty / (2.0 * 8e3), epsilon = 1e-12);
                assert_relative_eq!(min_capacitance.to_f64(), 2.0 / (8.0 * 8e3 * 0.82), epsilon = 1e-12);
            }
            other => panic!("unexpected recommendation {other:?}"),
        }
    }

    #[test]
    fn test_zero_voltage_tolerance_is_unbounded() {
        let params = BoostParams {
            ripple_voltage_percent: 0.0,
            ..reference()
        };
        let analysis = params.analyze().unwrap();
        assert!(matches!(
            analysis.recommendation,
            Recommendation::Passives {
                min_capacitance: Quantity::Infinite,
                ..
            }
        ));
    }

    #[test]
    fn test_overflowing_tolerances_stay_unbounded() {
        let params = BoostParams {
            output_voltage: 1e10,
            load_current: 1e300,
            ripple_current_percent: 1e300,
            ripple_voltage_percent: 1e300,
            ..reference()
        };
        params.validate().unwrap();
        let analysis = params.analyze().unwrap();
        match analysis.recommendation {
            Recommendation::Passives {
                min_inductance,
                min_capacitance,
            } => {
                // ΔI_max and 8·f·ΔV_max both overflow: inf / inf
                assert_eq!(min_capacitance, Quantity::Infinite);
                assert_eq!(min_inductance, Quantity::Finite(0.0));
            }
            other => panic!("unexpected recommendation {other:?}"),
        }
    }

    #[test]
    fn test_zero_capacitance_gives_unbounded_ripple() {
        let params = BoostParams {
            capacitance: 0.0,
            ..reference()
        };
        let analysis = params.analyze().unwrap();
        assert_eq!(analysis.secondary, SecondaryMetric::RippleVoltage(Quantity::Infinite));
    }

    #[test]
    fn test_rejects_step_down() {
        let params = BoostParams {
            output_voltage: 28.0,
            ..reference()
        };
        assert!(matches!(
            params.validate(),
            Err(SmpsError::TopologyConstraint { .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_frequency() {
        let params = BoostParams {
            frequency: 0.0,
            ..reference()
        };
        assert!(matches!(
            params.validate(),
            Err(SmpsError::NonPositiveFrequency { .. })
        ));
    }
}
