//! Converter input values and their construction from design files.

use std::collections::HashMap;

use super::{BoostParams, BuckParams, FlybackParams, Topology};
use crate::dsl::{DesignAst, ParamDef};
use crate::error::{Result, SmpsError};
use crate::timer::{FixedDivider, TimerSettings};

/// Topology-tagged converter parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TopologyParams {
    Boost(BoostParams),
    Buck(BuckParams),
    Flyback(FlybackParams),
}

impl TopologyParams {
    /// The topology tag.
    pub fn topology(&self) -> Topology {
        match self {
            TopologyParams::Boost(_) => Topology::Boost,
            TopologyParams::Buck(_) => Topology::Buck,
            TopologyParams::Flyback(_) => Topology::Flyback,
        }
    }

    /// Switching frequency in Hz.
    pub fn frequency(&self) -> f64 {
        match self {
            TopologyParams::Boost(p) => p.frequency,
            TopologyParams::Buck(p) => p.frequency,
            TopologyParams::Flyback(p) => p.frequency,
        }
    }
}

impl From<BoostParams> for TopologyParams {
    fn from(params: BoostParams) -> Self {
        Self::Boost(params)
    }
}

impl From<BuckParams> for TopologyParams {
    fn from(params: BuckParams) -> Self {
        Self::Buck(params)
    }
}

impl From<FlybackParams> for TopologyParams {
    fn from(params: FlybackParams) -> Self {
        Self::Flyback(params)
    }
}

/// Everything one design calculation needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConverterInput {
    pub params: TopologyParams,
    pub timer: TimerSettings,
}

impl ConverterInput {
    /// Create an input with default timer settings.
    pub fn new(params: impl Into<TopologyParams>) -> Self {
        Self {
            params: params.into(),
            timer: TimerSettings::default(),
        }
    }

    /// Replace the timer settings.
    pub fn with_timer(mut self, timer: TimerSettings) -> Self {
        self.timer = timer;
        self
    }

    /// The topology tag.
    pub fn topology(&self) -> Topology {
        self.params.topology()
    }

    /// Reference design point for a topology.
    pub fn preset(topology: Topology) -> Self {
        let params: TopologyParams = match topology {
            Topology::Boost => BoostParams {
                input_voltage: 28.0,
                output_voltage: 82.0,
                frequency: 8e3,
                inductance: 33e-6,
                capacitance: 470e-6,
                load_current: 10.0,
                ripple_current_percent: 20.0,
                ripple_voltage_percent: 1.0,
            }
            .into(),
            Topology::Buck => BuckParams {
                input_voltage: 12.0,
                output_voltage: 5.0,
                frequency: 50e3,
                inductance: 100e-6,
                capacitance: 100e-6,
                load_current: 0.5,
                ripple_current_max: 0.1,
                ripple_voltage_max: 0.1,
            }
            .into(),
            Topology::Flyback => FlybackParams {
                input_voltage: 28.0,
                output_voltage: 82.0,
                frequency: 50e3,
                magnetizing_inductance: 100e-6,
                turns_ratio: 1.0,
                load_current: 10.0,
            }
            .into(),
        };
        Self::new(params)
    }

    /// Build an input from a parsed design file.
    pub fn from_ast(ast: &DesignAst) -> Result<Self> {
        let topology = ast.topology.ok_or(SmpsError::MissingTopology)?;
        let mut table = ParamTable::new(topology, &ast.params)?;

        let params: TopologyParams = match topology {
            Topology::Boost => BoostParams {
                input_voltage: table.take("vin")?,
                output_voltage: table.take("vout")?,
                frequency: table.take("fsw")?,
                inductance: table.take("l")?,
                capacitance: table.take("c")?,
                load_current: table.take("iout")?,
                ripple_current_percent: table.take("ripple_i")?,
                ripple_voltage_percent: table.take("ripple_v")?,
            }
            .into(),
            Topology::Buck => BuckParams {
                input_voltage: table.take("vin")?,
                output_voltage: table.take("vout")?,
                frequency: table.take("fsw")?,
                inductance: table.take("l")?,
                capacitance: table.take("c")?,
                load_current: table.take("iout")?,
                ripple_current_max: table.take("ripple_i")?,
                ripple_voltage_max: table.take("ripple_v")?,
            }
            .into(),
            Topology::Flyback => FlybackParams {
                input_voltage: table.take("vin")?,
                output_voltage: table.take("vout")?,
                frequency: table.take("fsw")?,
                magnetizing_inductance: table.take("lm")?,
                turns_ratio: table.take("n")?,
                load_current: table.take("iout")?,
            }
            .into(),
        };

        let mut timer = TimerSettings::default();
        if let Some(def) = &ast.timer {
            if let Some(clock) = def.clock {
                timer.clock = clock;
            }
            let prescaler = def
                .prescaler
                .map(|v| register_value("psc", v, def.line))
                .transpose()?;
            let reload = def
                .reload
                .map(|v| register_value("arr", v, def.line))
                .transpose()?;
            timer.fixed = FixedDivider::from_flags(prescaler, reload);
        }

        Ok(Self { params, timer })
    }
}

/// Parameter keys accepted for each topology, in canonical form.
pub(crate) fn parameter_keys(topology: Topology) -> &'static [&'static str] {
    match topology {
        Topology::Boost | Topology::Buck => {
            &["vin", "vout", "fsw", "l", "c", "iout", "ripple_i", "ripple_v"]
        }
        Topology::Flyback => &["vin", "vout", "fsw", "lm", "n", "iout"],
    }
}

/// Boost tolerances are relative (% of Iout and Vout); buck tolerances are
/// absolute amperes and volts.
fn accepts_percent(topology: Topology, key: &str) -> bool {
    topology == Topology::Boost && matches!(key, "ripple_i" | "ripple_v")
}

/// Map accepted aliases to their canonical key.
fn canonical_key(name: &str) -> String {
    let lower = name.to_lowercase();
    match lower.as_str() {
        "f" | "freq" => "fsw".to_string(),
        _ => lower,
    }
}

/// Design parameters keyed by canonical name, consumed as they are read.
struct ParamTable {
    topology: Topology,
    values: HashMap<String, f64>,
}

impl ParamTable {
    fn new(topology: Topology, defs: &[ParamDef]) -> Result<Self> {
        let allowed = parameter_keys(topology);
        let mut values = HashMap::with_capacity(defs.len());

        for def in defs {
            let key = canonical_key(&def.name);
            if !allowed.contains(&key.as_str()) {
                return Err(SmpsError::UnknownParameter {
                    param: def.name.clone(),
                    topology,
                    line: def.line,
                });
            }
            if def.percent && !accepts_percent(topology, &key) {
                return Err(SmpsError::parse(
                    def.line,
                    format!(
                        "'{}' cannot be a percentage for {}; only boost ripple tolerances are",
                        def.name, topology
                    ),
                ));
            }
            // Aliases can collide even when the raw names differ
            if values.insert(key, def.value).is_some() {
                return Err(SmpsError::DuplicateParameter {
                    param: def.name.clone(),
                    line: def.line,
                });
            }
        }

        Ok(Self { topology, values })
    }

    fn take(&mut self, key: &str) -> Result<f64> {
        self.values
            .remove(key)
            .ok_or_else(|| SmpsError::MissingParameter {
                param: key.to_string(),
                topology: self.topology,
            })
    }
}

/// Convert a register value from the design file, truncating fractions.
fn register_value(param: &str, value: f64, line: usize) -> Result<u32> {
    if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
        return Err(SmpsError::parse(
            line,
            format!(
                "timer register '{param}' must be an integer in 0..={} (got {value})",
                u32::MAX
            ),
        ));
    }
    Ok(value.trunc() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl;

    #[test]
    fn test_from_ast_boost() {
        let input = ConverterInput::from_ast(
            &dsl::parse(
                ".topology boost\n\
                 vin 28\nvout 82\nfsw 8k\nl 33u\nc 470u\niout 10\nripple_i 20\nripple_v 1\n",
            )
            .unwrap(),
        )
        .unwrap();
        assert_eq!(input.topology(), Topology::Boost);
        assert_eq!(input.timer, TimerSettings::default());
        match input.params {
            TopologyParams::Boost(p) => {
                assert_eq!(p.frequency, 8e3);
                assert!((p.inductance - 33e-6).abs() < 1e-18);
                assert_eq!(p.ripple_voltage_percent, 1.0);
            }
            other => panic!("expected boost, got {other:?}"),
        }
    }

    #[test]
    fn test_frequency_alias() {
        let ast = dsl::parse(".topology flyback\nvin 28\nvout 82\nf 50k\nlm 100u\nn 1\niout 10").unwrap();
        let input = ConverterInput::from_ast(&ast).unwrap();
        assert_eq!(input.params.frequency(), 50e3);
    }

    #[test]
    fn test_alias_collision_is_duplicate() {
        let ast = dsl::parse(".topology flyback\nf 50k\nfsw 50k").unwrap();
        assert!(matches!(
            ConverterInput::from_ast(&ast),
            Err(SmpsError::DuplicateParameter { line: 3, .. })
        ));
    }

    #[test]
    fn test_unknown_and_missing_parameters() {
        let ast = dsl::parse(".topology flyback\nvin 28\nc 1u").unwrap();
        assert!(matches!(
            ConverterInput::from_ast(&ast),
            Err(SmpsError::UnknownParameter { line: 3, .. })
        ));

        let ast = dsl::parse(".topology buck\nvin 12").unwrap();
        assert!(matches!(
            ConverterInput::from_ast(&ast),
            Err(SmpsError::MissingParameter { .. })
        ));

        let ast = dsl::parse("vin 12").unwrap();
        assert!(matches!(
            ConverterInput::from_ast(&ast),
            Err(SmpsError::MissingTopology)
        ));
    }

    #[test]
    fn test_timer_directive() {
        let ast = dsl::parse(
            ".topology buck\n.timer clock=16M arr=99 psc=3\n\
             vin 12\nvout 5\nfsw 50k\nl 100u\nc 100u\niout 0.5\nripple_i 0.1\nripple_v 0.1",
        )
        .unwrap();
        let input = ConverterInput::from_ast(&ast).unwrap();
        assert_eq!(input.timer.clock, 16e6);
        assert_eq!(input.timer.fixed, FixedDivider::Prescaler(3));
    }

    #[test]
    fn test_register_value_bounds() {
        assert_eq!(register_value("psc", 7.9, 1).unwrap(), 7);
        assert!(register_value("psc", -1.0, 1).is_err());
        assert!(matches!(
            register_value("arr", 1e12, 4),
            Err(SmpsError::ParseError { line: 4, .. })
        ));
    }

    #[test]
    fn test_timer_register_error_carries_line() {
        let ast = dsl::parse(
            ".topology flyback\n\n.timer arr=-3\n\
             vin 28\nvout 82\nfsw 50k\nlm 100u\nn 1\niout 10",
        )
        .unwrap();
        assert!(matches!(
            ConverterInput::from_ast(&ast),
            Err(SmpsError::ParseError { line: 3, .. })
        ));
    }

    #[test]
    fn test_percent_only_on_boost_tolerances() {
        let buck = ".topology buck\nvin 12\nvout 5\nfsw 50k\nl 100u\nc 100u\n\
                    iout 0.5\nripple_i 20%\nripple_v 0.1";
        assert!(matches!(
            ConverterInput::from_ast(&dsl::parse(buck).unwrap()),
            Err(SmpsError::ParseError { line: 8, .. })
        ));

        let boost = ".topology boost\nvin 28%\nvout 82\nfsw 8k\nl 33u\nc 470u\n\
                     iout 10\nripple_i 20%\nripple_v 1%";
        assert!(matches!(
            ConverterInput::from_ast(&dsl::parse(boost).unwrap()),
            Err(SmpsError::ParseError { line: 2, .. })
        ));

        let boost = boost.replace("vin 28%", "vin 28");
        let input = ConverterInput::from_ast(&dsl::parse(&boost).unwrap()).unwrap();
        match input.params {
            TopologyParams::Boost(p) => {
                assert_eq!(p.ripple_current_percent, 20.0);
                assert_eq!(p.ripple_voltage_percent, 1.0);
            }
            other => panic!("expected boost, got {other:?}"),
        }
    }
}
