use crate::convert::UnitError;
use thiserror::Error;

pub type CmResult<T> = Result<T, CmError>;

#[derive(Error, Debug)]
pub enum CmError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },

    #[error("Unit conversion failed: {0}")]
    Unit(#[from] UnitError),
}
