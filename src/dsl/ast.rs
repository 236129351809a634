//! Syntax tree for design files.

use crate::converter::Topology;

/// Complete representation of a parsed design file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesignAst {
    /// Topology selected with `.topology`
    pub topology: Option<Topology>,
    /// Parameter assignments in file order
    pub params: Vec<ParamDef>,
    /// Timer settings from `.timer`
    pub timer: Option<TimerDef>,
}

impl DesignAst {
    /// Create a new empty design.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A `key value` assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDef {
    /// Key as written (lower-cased)
    pub name: String,
    /// Value in SI base units
    pub value: f64,
    /// Written with a trailing `%`
    pub percent: bool,
    /// Source line number for error reporting
    pub line: usize,
}

/// A `.timer clock=... psc=... arr=...` directive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimerDef {
    /// Base clock in Hz
    pub clock: Option<f64>,
    /// Fixed prescaler value
    pub prescaler: Option<f64>,
    /// Fixed auto-reload value
    pub reload: Option<f64>,
    /// Source line number for error reporting
    pub line: usize,
}
