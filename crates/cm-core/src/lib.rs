//! cm-core: stable foundation for chiller performance mapping.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - convert (string-labelled unit conversion)
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod convert;
pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use convert::{UnitError, convert};
pub use error::{CmError, CmResult};
pub use numeric::*;
pub use units::*;
