//! Chiller performance models and ASHRAE 205 RS0001 performance maps.
//!
//! A chiller pairs an EIR formulation (direct or reformulated) with a
//! condenser side (liquid- or air-cooled). It is built once with
//! [`ChillerBuilder`], which validates the design and derives rated flows,
//! and is then evaluated at [`OperatingConditions`] or sampled into a
//! [`Performance`] section with [`generate_performance`].
//!
//! ```
//! use cm_models::{ChillerBuilder, ChillerModel};
//!
//! let chiller = ChillerBuilder::new().rated_cop(2.0).build().unwrap();
//! let rated = chiller.rated_conditions();
//! let cop = chiller.cop(&rated).unwrap();
//! assert!((cop - 2.0).abs() < 1e-9);
//! ```

pub mod builder;
pub mod catalog;
pub mod chiller;
pub mod conditions;
pub mod condenser;
pub mod curves;
pub mod design;
pub mod eir;
pub mod error;
pub mod map;
pub mod rated;
pub mod staging;

pub use builder::{ChillerBuilder, EirCurves};
pub use catalog::{
    BaselineChiller, BaselineMetadata, BaselineRequest, CompliancePath, CompressorType, CurveSet,
    baseline_chiller, find_curve_set,
};
pub use chiller::{Chiller, ChillerModel, PointPerformance};
pub use conditions::OperatingConditions;
pub use condenser::{AirCooled, CondenserSide, CondenserType, LiquidCooled};
pub use curves::{Bicubic, Biquad, Cubic, bicubic, biquad, cubic};
pub use design::{ChillerDesign, LossFractions, TemperatureRange};
pub use eir::{DirectEir, EirFormulation, EvaluatedPoint, ReformulatedEir};
pub use error::{ModelError, ModelResult};
pub use map::{
    MapResolution, Performance, PerformanceMap, Values, Variable, generate_performance,
};
pub use rated::{RatedAirStream, RatedLiquidStream};
pub use staging::StagingPolicy;
