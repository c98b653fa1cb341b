//! Fluid property errors.

use cm_core::CmError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur during fluid property calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical values (negative density, pressure, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Value out of the backend's valid range.
    #[error("Value out of range for {what}")]
    OutOfRange { what: &'static str },

    /// Invalid argument (conflicting or missing specifiers).
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A flow-dependent quantity was requested from a state without flow.
    #[error("Flow rate not set: cannot compute {what}")]
    FlowNotSet { what: &'static str },

    /// Operation not supported by the backend or liquid.
    #[error("Not supported: {what}")]
    NotSupported { what: &'static str },

    /// Backend (CoolProp) error.
    #[error("Backend error: {message}")]
    Backend { message: String },

    /// Convergence failure (e.g., wet-bulb from humidity ratio).
    #[error("Convergence failed for {what}")]
    ConvergenceFailed { what: &'static str },
}

impl From<FluidError> for CmError {
    fn from(err: FluidError) -> Self {
        match err {
            FluidError::NonPhysical { what } | FluidError::ConvergenceFailed { what } => {
                CmError::Invariant { what }
            }
            FluidError::OutOfRange { what }
            | FluidError::InvalidArg { what }
            | FluidError::FlowNotSet { what }
            | FluidError::NotSupported { what } => CmError::InvalidArg { what },
            FluidError::Backend { .. } => CmError::Invariant {
                what: "fluid backend error",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FluidError::NonPhysical { what: "pressure" };
        assert!(err.to_string().contains("pressure"));

        let err = FluidError::FlowNotSet {
            what: "capacity rate",
        };
        assert!(err.to_string().contains("Flow rate not set"));
    }

    #[test]
    fn error_to_cm_error() {
        let fluid_err = FluidError::NotSupported { what: "glycol" };
        let cm_err: CmError = fluid_err.into();
        assert!(matches!(cm_err, CmError::InvalidArg { .. }));
    }
}
