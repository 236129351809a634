//! Topology solvers for boost, buck and flyback converters.
//!
//! Every topology implements [`TopologySolver`]. [`calculate`] dispatches on
//! the tag carried by [`ConverterInput`] and runs the same pipeline for all
//! of them:
//!
//! 1. validate the parameters (fail fast, no partial result)
//! 2. derive duty cycle, currents, ripple and recommendations
//! 3. quantize the PWM timer registers for the switching frequency
//!
//! The ripple voltage approximation `ΔV = ΔI / (8·f·C)` is used for both
//! boost and buck output stages.

mod boost;
mod buck;
mod flyback;
mod input;
mod quantity;
mod validate;

use std::fmt;

pub use boost::BoostParams;
pub use buck::BuckParams;
pub use flyback::FlybackParams;
pub(crate) use input::parameter_keys;
pub use input::{ConverterInput, TopologyParams};
pub use quantity::Quantity;

use crate::error::Result;
use crate::timer::{quantize_timer, TimerResult, TimerSettings};

/// Converter circuit family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    /// Step-up
    Boost,
    /// Step-down
    Buck,
    /// Isolated, transformer coupled
    Flyback,
}

impl Topology {
    /// All supported topologies.
    pub const ALL: [Topology; 3] = [Topology::Boost, Topology::Buck, Topology::Flyback];

    /// Parse topology from string.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "boost" | "step-up" | "stepup" => Some(Self::Boost),
            "buck" | "step-down" | "stepdown" => Some(Self::Buck),
            "flyback" => Some(Self::Flyback),
            _ => None,
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Topology::Boost => "Boost",
            Topology::Buck => "Buck",
            Topology::Flyback => "Flyback",
        };
        f.write_str(name)
    }
}

/// Whether the inductor current stays above zero over the whole period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConductionMode {
    /// Continuous conduction
    Ccm,
    /// Discontinuous conduction
    Dcm,
}

impl ConductionMode {
    /// CCM iff `average - ripple / 2 > 0`; the zero boundary is DCM, as is
    /// an unbounded ripple.
    pub fn classify(average: f64, ripple: Quantity) -> Self {
        match ripple {
            Quantity::Finite(r) if average - r / 2.0 > 0.0 => Self::Ccm,
            _ => Self::Dcm,
        }
    }
}

impl fmt::Display for ConductionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConductionMode::Ccm => f.write_str("CCM"),
            ConductionMode::Dcm => f.write_str("DCM"),
        }
    }
}

/// The topology-specific second figure of merit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SecondaryMetric {
    /// Peak-to-peak output voltage ripple (boost, buck)
    RippleVoltage(Quantity),
    /// Output power `Vout·Iout` (flyback)
    OutputPower(f64),
}

/// Component sizing advice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Recommendation {
    /// Minimum passives meeting the ripple tolerances (boost, buck)
    Passives {
        min_inductance: Quantity,
        min_capacitance: Quantity,
    },
    /// Turns ratio implied by the duty cycle, next to the one supplied
    /// (flyback)
    TurnsRatio { recommended: Quantity, supplied: f64 },
}

/// Timer-independent outcome of a topology analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Analysis {
    pub duty_cycle: f64,
    pub average_current: f64,
    pub peak_current: Quantity,
    pub ripple_current: Quantity,
    pub secondary: SecondaryMetric,
    pub recommendation: Recommendation,
}

/// Full design result for one converter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConverterResult {
    pub topology: Topology,
    /// Switching frequency in Hz
    pub frequency: f64,
    pub input_voltage: f64,
    pub output_voltage: f64,
    /// Duty cycle, strictly inside (0, 1)
    pub duty_cycle: f64,
    /// Average inductor (or primary) current in A
    pub average_current: f64,
    pub peak_current: Quantity,
    /// Peak-to-peak inductor (or magnetizing) current ripple in A
    pub ripple_current: Quantity,
    pub secondary: SecondaryMetric,
    pub mode: ConductionMode,
    pub recommendation: Recommendation,
    pub timer: TimerResult,
}

impl ConverterResult {
    /// Peak-to-peak ripple of the secondary (output) signal.
    ///
    /// The flyback secondary is modelled ripple-free.
    pub fn secondary_ripple(&self) -> Quantity {
        match self.secondary {
            SecondaryMetric::RippleVoltage(ripple) => ripple,
            SecondaryMetric::OutputPower(_) => Quantity::Finite(0.0),
        }
    }
}

/// A converter topology that can be validated and analysed.
pub trait TopologySolver {
    /// The topology this solver implements.
    const TOPOLOGY: Topology;

    /// Switching frequency in Hz.
    fn frequency(&self) -> f64;

    /// Input voltage in V.
    fn input_voltage(&self) -> f64;

    /// Output voltage in V.
    fn output_voltage(&self) -> f64;

    /// Reject contradictory or malformed parameters.
    fn validate(&self) -> Result<()>;

    /// Derive the design figures. Only called after [`validate`](Self::validate)
    /// succeeded.
    fn analyze(&self) -> Result<Analysis>;
}

/// Compute the design parameters for one converter.
pub fn calculate(input: &ConverterInput) -> Result<ConverterResult> {
    let _span = tracing::info_span!("calculate", topology = %input.topology()).entered();

    match &input.params {
        TopologyParams::Boost(params) => solve(params, &input.timer),
        TopologyParams::Buck(params) => solve(params, &input.timer),
        TopologyParams::Flyback(params) => solve(params, &input.timer),
    }
}

/// Run the validate / analyze / quantize pipeline for one solver.
fn solve<S: TopologySolver>(solver: &S, timer: &TimerSettings) -> Result<ConverterResult> {
    solver.validate()?;
    let analysis = solver.analyze()?;
    let timer = quantize_timer(&timer.request(solver.frequency()))?;

    let mode = ConductionMode::classify(analysis.average_current, analysis.ripple_current);
    if mode == ConductionMode::Dcm {
        tracing::warn!(
            topology = %S::TOPOLOGY,
            average_current = analysis.average_current,
            ripple_current = %analysis.ripple_current,
            "converter runs in discontinuous conduction"
        );
    }

    tracing::debug!(
        topology = %S::TOPOLOGY,
        duty_cycle = analysis.duty_cycle,
        average_current = analysis.average_current,
        %timer,
        "design computed"
    );

    Ok(ConverterResult {
        topology: S::TOPOLOGY,
        frequency: solver.frequency(),
        input_voltage: solver.input_voltage(),
        output_voltage: solver.output_voltage(),
        duty_cycle: analysis.duty_cycle,
        average_current: analysis.average_current,
        peak_current: analysis.peak_current,
        ripple_current: analysis.ripple_current,
        secondary: analysis.secondary,
        mode,
        recommendation: analysis.recommendation,
        timer,
    })
}

/// Output ripple of a capacitor charged by a triangular current of
/// peak-to-peak `ripple_current`.
pub(crate) fn ripple_voltage(ripple_current: Quantity, frequency: f64, capacitance: f64) -> Quantity {
    match ripple_current {
        Quantity::Finite(di) => Quantity::ratio(di, 8.0 * frequency * capacitance),
        Quantity::Infinite => Quantity::Infinite,
    }
}
