//! Error types for chiller model operations.
//!
//! Configuration errors are raised while a chiller is being built; the
//! remaining variants arise while evaluating it at an operating point.

use cm_core::CmError;
use cm_fluids::FluidError;
use cm_solver::SolverError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error(
        "Minimum unloading ratio ({minimum_unloading_ratio}) must not be less than minimum part-load ratio ({minimum_part_load_ratio})"
    )]
    InvalidStaging {
        minimum_part_load_ratio: f64,
        minimum_unloading_ratio: f64,
    },

    #[error("Loss fractions sum to {sum}, which exceeds 1.0")]
    LossFractions { sum: f64 },

    #[error("{stages} compressor stages given, at least {minimum} required")]
    StageCount { stages: usize, minimum: usize },

    #[error("{curve} curve requires {expected} coefficients, got {found}")]
    CurveArity {
        curve: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Curve set match failed: {what}")]
    CurveSetMatch { what: String },

    #[error("Configuration error: {what}")]
    Configuration { what: String },

    #[error("Compressor speed {speed} out of range for {stages} stages")]
    InvalidSpeed { speed: usize, stages: usize },

    #[error("Performance map shape error: {what}")]
    MapShape { what: String },

    #[error("Not supported: {what}")]
    NotSupported { what: &'static str },

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),
}

pub type ModelResult<T> = Result<T, ModelError>;

impl ModelError {
    pub(crate) fn configuration(what: impl Into<String>) -> Self {
        ModelError::Configuration { what: what.into() }
    }

    /// True for errors raised while building a chiller rather than evaluating it.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ModelError::InvalidStaging { .. }
                | ModelError::LossFractions { .. }
                | ModelError::StageCount { .. }
                | ModelError::CurveArity { .. }
                | ModelError::CurveSetMatch { .. }
                | ModelError::Configuration { .. }
        )
    }
}

impl From<ModelError> for CmError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Fluid(err) => err.into(),
            ModelError::Solver(err) => err.into(),
            ModelError::InvalidSpeed { .. } => CmError::InvalidArg {
                what: "compressor speed",
            },
            ModelError::NotSupported { what } => CmError::InvalidArg { what },
            _ => CmError::InvalidArg {
                what: "chiller configuration",
            },
        }
    }
}
