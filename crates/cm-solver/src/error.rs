//! Error types for solver operations.

use cm_core::CmError;
use cm_fluids::FluidError;
use thiserror::Error;

/// Errors that can occur during a root solve.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),

    #[error("Numeric error: {what}")]
    Numeric { what: String },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for CmError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::ProblemSetup { what: _ } => CmError::InvalidArg {
                what: "problem setup",
            },
            SolverError::ConvergenceFailed { what: _ } => CmError::Invariant {
                what: "convergence",
            },
            SolverError::Fluid(err) => err.into(),
            SolverError::Numeric { what: _ } => CmError::Invariant { what: "numeric" },
        }
    }
}
