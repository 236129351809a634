//! PWM timer register quantization.
//!
//! A hardware counter derives its PWM frequency from the base clock through
//! two integer stages:
//!
//! ```text
//! f_pwm = f_clk / ((PSC + 1) * (ARR + 1))
//! ```
//!
//! [`quantize_timer`] picks the pair closest to a target frequency, holding
//! one of the two registers fixed when asked to.

use std::fmt;

use crate::error::{Result, SmpsError};

/// Which divider the caller holds fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FixedDivider {
    /// Neither register fixed; the prescaler is set to 0 for maximum
    /// reload resolution.
    #[default]
    None,
    /// Prescaler (first divider) fixed at the given value
    Prescaler(u32),
    /// Auto-reload (second divider) fixed at the given value
    Reload(u32),
}

impl FixedDivider {
    /// Build from two optional register values.
    ///
    /// When both are given the prescaler wins.
    pub fn from_flags(prescaler: Option<u32>, reload: Option<u32>) -> Self {
        match (prescaler, reload) {
            (Some(psc), _) => Self::Prescaler(psc),
            (None, Some(arr)) => Self::Reload(arr),
            (None, None) => Self::None,
        }
    }
}

/// Timer settings carried alongside the converter parameters.
///
/// The target frequency is the converter's switching frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerSettings {
    /// Timer base clock in Hz
    pub clock: f64,
    /// Register held fixed, if any
    pub fixed: FixedDivider,
}

impl TimerSettings {
    /// Settings with nothing fixed.
    pub fn new(clock: f64) -> Self {
        Self {
            clock,
            fixed: FixedDivider::None,
        }
    }

    /// Hold one of the registers fixed.
    pub fn with_fixed(mut self, fixed: FixedDivider) -> Self {
        self.fixed = fixed;
        self
    }

    /// Build the request for a given switching frequency.
    pub fn request(&self, target: f64) -> TimerRequest {
        TimerRequest {
            clock: self.clock,
            target,
            fixed: self.fixed,
        }
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self::new(crate::DEFAULT_CLOCK_HZ)
    }
}

/// A single quantization request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerRequest {
    /// Base clock in Hz
    pub clock: f64,
    /// Target PWM frequency in Hz
    pub target: f64,
    /// Register held fixed, if any
    pub fixed: FixedDivider,
}

/// Quantized divider pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerResult {
    /// Prescaler register (PSC)
    pub prescaler: u32,
    /// Auto-reload register (ARR)
    pub reload: u32,
}

impl TimerResult {
    /// Frequency the registers actually produce from `clock`.
    pub fn achieved_frequency(&self, clock: f64) -> f64 {
        let divider = (self.prescaler as f64 + 1.0) * (self.reload as f64 + 1.0);
        clock / divider
    }
}

impl fmt::Display for TimerResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PSC={} ARR={}", self.prescaler, self.reload)
    }
}

/// Derive the divider pair approximating `request.target`.
///
/// The free register is `round(clock / ((fixed + 1) * target) - 1)`,
/// floored at zero. Ties round half to even.
pub fn quantize_timer(request: &TimerRequest) -> Result<TimerResult> {
    if !request.clock.is_finite() || request.clock <= 0.0 {
        return Err(SmpsError::InvalidTimer {
            message: format!("clock must be positive (got {})", request.clock),
        });
    }
    if !request.target.is_finite() || request.target <= 0.0 {
        return Err(SmpsError::InvalidTimer {
            message: format!("PWM frequency must be positive (got {})", request.target),
        });
    }

    let result = match request.fixed {
        FixedDivider::Prescaler(prescaler) => TimerResult {
            prescaler,
            reload: free_divider(request.clock, request.target, prescaler),
        },
        FixedDivider::Reload(reload) => TimerResult {
            prescaler: free_divider(request.clock, request.target, reload),
            reload,
        },
        FixedDivider::None => TimerResult {
            prescaler: 0,
            reload: free_divider(request.clock, request.target, 0),
        },
    };

    tracing::debug!(
        clock = request.clock,
        target = request.target,
        prescaler = result.prescaler,
        reload = result.reload,
        "quantized timer"
    );

    Ok(result)
}

/// Solve for the register not held fixed.
fn free_divider(clock: f64, target: f64, fixed: u32) -> u32 {
    let raw = (clock / ((fixed as f64 + 1.0) * target) - 1.0).round_ties_even();
    // `as` saturates: negatives land on 0, overflow on u32::MAX
    raw.max(0.0) as u32
}
