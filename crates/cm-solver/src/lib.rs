//! Bounded one-dimensional root finding.
//!
//! The reformulated chiller model closes a condenser energy balance by
//! solving for the leaving condenser temperature. The iteration cap and
//! tolerances are explicit configuration, never library defaults.

pub mod error;
pub mod secant;

pub use error::{SolverError, SolverResult};
pub use secant::{Root, SecantConfig, secant};
