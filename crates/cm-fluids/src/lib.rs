//! cm-fluids: stream states and property backends for chiller modeling.
//!
//! Provides:
//! - `FluidState`: liquid or moist-air stream with optional flow
//! - `LiquidModel` trait with a CoolProp backend (the default for water)
//!   and a constant-property liquid
//! - Psychrometric relations for moist air
//!
//! # Example
//!
//! ```
//! use cm_core::units::{degf, m3ps, w};
//! use cm_fluids::FluidState;
//!
//! let inlet = FluidState::water(degf(85.0))
//!     .unwrap()
//!     .with_volumetric_flow_rate(m3ps(0.02))
//!     .unwrap();
//! let outlet = inlet.add_heat(w(400_000.0)).unwrap();
//! assert!(outlet.temperature() > inlet.temperature());
//! ```

pub mod coolprop;
pub mod error;
pub mod liquid;
pub mod psychrometrics;
pub mod state;

// Re-exports for ergonomics
pub use coolprop::CoolPropModel;
pub use error::{FluidError, FluidResult};
pub use liquid::{IncompressibleLiquid, LiquidModel, LiquidType, SpecHeatCapacity};
pub use state::{FlowSpec, FluidState, Humidity, LiquidState, PsychrometricState};
