//! Liquid property backends.
//!
//! The chiller models only need density and isobaric specific heat of the
//! heat-transfer liquid as functions of (temperature, pressure, composition).
//! [`LiquidModel`] isolates those two queries so the CoolProp backend and a
//! constant-property liquid are interchangeable.

use crate::error::{FluidError, FluidResult};
use cm_core::units::{Density, Pressure, Temperature, kgpm3};

/// Specific heat capacity [J/(kg·K)].
pub type SpecHeatCapacity = f64;

/// Heat-transfer liquid composition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LiquidType {
    #[default]
    Water,
}

impl LiquidType {
    /// Constituent label used in RS0001 liquid mixture descriptions.
    pub fn constituent(self) -> &'static str {
        match self {
            LiquidType::Water => "WATER",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LiquidType::Water => "Water",
        }
    }

    /// Parse the constituent label (case-insensitive).
    pub fn from_constituent(label: &str) -> FluidResult<Self> {
        match label.to_ascii_uppercase().as_str() {
            "WATER" => Ok(LiquidType::Water),
            _ => Err(FluidError::NotSupported {
                what: "liquid constituent",
            }),
        }
    }
}

/// Trait for liquid property models.
///
/// Implementations must be thread-safe (Send + Sync) so grid points can be
/// evaluated in parallel.
pub trait LiquidModel: Send + Sync {
    /// Get the model name (for debugging/logging).
    fn name(&self) -> &str;

    /// Density [kg/m³].
    fn density(&self, liquid: LiquidType, t: Temperature, p: Pressure) -> FluidResult<Density>;

    /// Specific heat capacity at constant pressure [J/(kg·K)].
    fn specific_heat(
        &self,
        liquid: LiquidType,
        t: Temperature,
        p: Pressure,
    ) -> FluidResult<SpecHeatCapacity>;
}

/// Constant-property liquid.
#[derive(Clone, Copy, Debug)]
pub struct IncompressibleLiquid {
    density: f64,
    specific_heat: f64,
}

impl IncompressibleLiquid {
    pub fn new(density: Density, specific_heat: SpecHeatCapacity) -> FluidResult<Self> {
        validation::validate_density(density)?;
        validation::validate_cp(specific_heat)?;
        Ok(Self {
            density: density.value,
            specific_heat,
        })
    }

    /// Water at 25 °C.
    pub fn water() -> Self {
        Self {
            density: 997.047,
            specific_heat: 4_184.0,
        }
    }
}

impl LiquidModel for IncompressibleLiquid {
    fn name(&self) -> &str {
        "incompressible"
    }

    fn density(&self, _liquid: LiquidType, t: Temperature, p: Pressure) -> FluidResult<Density> {
        validation::validate_temperature(t)?;
        validation::validate_pressure(p)?;
        Ok(kgpm3(self.density))
    }

    fn specific_heat(
        &self,
        _liquid: LiquidType,
        t: Temperature,
        p: Pressure,
    ) -> FluidResult<SpecHeatCapacity> {
        validation::validate_temperature(t)?;
        validation::validate_pressure(p)?;
        Ok(self.specific_heat)
    }
}

/// Validation helpers for fluid properties.
pub(crate) mod validation {
    use super::*;

    /// Ensure pressure is positive and finite.
    pub fn validate_pressure(p: Pressure) -> FluidResult<()> {
        if !p.value.is_finite() || p.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure temperature is positive and finite.
    pub fn validate_temperature(t: Temperature) -> FluidResult<()> {
        if !t.value.is_finite() || t.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure density is positive and finite.
    pub fn validate_density(rho: Density) -> FluidResult<()> {
        if !rho.value.is_finite() || rho.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "density must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure specific heat capacity is positive and finite.
    pub fn validate_cp(cp: f64) -> FluidResult<()> {
        if !cp.is_finite() || cp <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "cp must be positive and finite",
            });
        }
        Ok(())
    }
}
