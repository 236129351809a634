//! Error types for the converter design engine.
//!
//! This module provides a unified error type [`SmpsError`] that covers
//! all error conditions that can occur while parsing design files,
//! validating converter parameters and writing results.
//!
//! An unconstrained recommendation (zero ripple tolerance, zero capacitance)
//! is not an error; it is reported as [`Quantity::Infinite`](crate::Quantity).

use thiserror::Error;

use crate::converter::Topology;

/// Result type alias using [`SmpsError`].
pub type Result<T> = std::result::Result<T, SmpsError>;

/// Unified error type for all engine operations.
#[derive(Error, Debug)]
pub enum SmpsError {
    // ============ Validation Errors ============
    /// A parameter is non-numeric, negative or otherwise out of range
    #[error("Invalid parameter '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    /// A topology-specific voltage relation does not hold
    #[error("{topology} constraint violated: {message}")]
    TopologyConstraint { topology: Topology, message: String },

    /// Switching frequency must be strictly positive
    #[error("Switching frequency must be positive (got {value})")]
    NonPositiveFrequency { value: f64 },

    /// Derived duty cycle is zero or negative
    #[error("Derived duty cycle {duty} is not positive; check the voltages")]
    NonPositiveDutyCycle { duty: f64 },

    /// Flyback turns ratio of zero
    #[error("Turns ratio Ns/Np cannot be zero")]
    ZeroTurnsRatio,

    /// A formula denominator vanished
    #[error("Zero denominator: {message}")]
    ZeroDenominator { message: String },

    /// Timer clock or target frequency out of range
    #[error("Invalid timer request: {message}")]
    InvalidTimer { message: String },

    // ============ Design File Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Parameter key not known for the selected topology
    #[error("Unknown parameter '{param}' for {topology} at line {line}")]
    UnknownParameter {
        param: String,
        topology: Topology,
        line: usize,
    },

    /// Parameter assigned twice
    #[error("Duplicate parameter '{param}' at line {line}")]
    DuplicateParameter { param: String, line: usize },

    /// Required parameter absent from the design
    #[error("Missing parameter '{param}' for {topology}")]
    MissingParameter { param: String, topology: Topology },

    /// Design has no `.topology` directive
    #[error("No topology specified (use '.topology boost|buck|flyback')")]
    MissingTopology,

    /// Unrecognised topology name
    #[error("Unknown topology '{name}' at line {line}")]
    UnknownTopology { name: String, line: usize },

    // ============ I/O Errors ============
    /// Error reading a design file
    #[error("Failed to read design file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing a report or waveform
    #[error("Output error: {0}")]
    OutputError(#[from] std::io::Error),
}

impl SmpsError {
    /// Create an invalid parameter error
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create a topology constraint error
    pub fn constraint(topology: Topology, message: impl Into<String>) -> Self {
        Self::TopologyConstraint {
            topology,
            message: message.into(),
        }
    }

    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Whether this error rejects the numeric inputs themselves, as opposed
    /// to the text they were read from or the I/O around them.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter { .. }
                | Self::TopologyConstraint { .. }
                | Self::NonPositiveFrequency { .. }
                | Self::NonPositiveDutyCycle { .. }
                | Self::ZeroTurnsRatio
                | Self::ZeroDenominator { .. }
                | Self::InvalidTimer { .. }
        )
    }
}
