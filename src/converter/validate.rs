//! Input validation shared by the topology solvers.

use crate::error::{Result, SmpsError};

/// Reject NaN and infinite inputs.
pub(crate) fn require_finite(param: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SmpsError::invalid_parameter(
            param,
            format!("value is not a finite number ({value})"),
        ))
    }
}

/// Value must be finite and `>= 0`.
pub(crate) fn require_non_negative(param: &str, value: f64) -> Result<()> {
    require_finite(param, value)?;
    if value < 0.0 {
        return Err(SmpsError::invalid_parameter(
            param,
            format!("must not be negative (got {value})"),
        ));
    }
    Ok(())
}

/// Value must be finite and `> 0`.
pub(crate) fn require_positive(param: &str, value: f64) -> Result<()> {
    require_finite(param, value)?;
    if value <= 0.0 {
        return Err(SmpsError::invalid_parameter(
            param,
            format!("must be positive (got {value})"),
        ));
    }
    Ok(())
}

/// Switching frequency must be finite and strictly positive.
pub(crate) fn require_frequency(value: f64) -> Result<()> {
    require_finite("frequency", value)?;
    if value <= 0.0 {
        return Err(SmpsError::NonPositiveFrequency { value });
    }
    Ok(())
}
