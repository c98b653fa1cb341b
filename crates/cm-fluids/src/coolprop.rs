//! CoolProp-based liquid property model.

use crate::error::{FluidError, FluidResult};
use crate::liquid::{LiquidModel, LiquidType, SpecHeatCapacity, validation};
use cm_core::units::{Density, Pressure, Temperature, kgpm3};
use rfluids::prelude::*;

/// Densities below this are vapour, not the liquid a chiller circulates [kg/m³].
const MIN_LIQUID_DENSITY: f64 = 500.0;

/// CoolProp backend for liquid properties.
///
/// Thread-safe: rfluids Fluid instances are created per query.
#[derive(Clone, Copy, Debug, Default)]
pub struct CoolPropModel;

impl CoolPropModel {
    pub fn new() -> Self {
        Self
    }

    fn pure(liquid: LiquidType) -> Pure {
        match liquid {
            LiquidType::Water => Pure::Water,
        }
    }

    /// Fluid at (P, T), rejected unless it is in the liquid region.
    fn liquid_at(&self, liquid: LiquidType, t: Temperature, p: Pressure) -> FluidResult<Fluid> {
        validation::validate_temperature(t)?;
        validation::validate_pressure(p)?;
        let mut fluid = Fluid::from(Self::pure(liquid))
            .in_state(FluidInput::pressure(p.value), FluidInput::temperature(t.value))
            .map_err(|e| FluidError::Backend {
                message: format!("rfluids error at P={} Pa, T={} K: {}", p.value, t.value, e),
            })?;
        let rho = fluid.density().map_err(|e| FluidError::Backend {
            message: format!("rfluids error getting density: {}", e),
        })?;
        if rho < MIN_LIQUID_DENSITY {
            return Err(FluidError::OutOfRange {
                what: "liquid temperature (state is vapour at this pressure)",
            });
        }
        Ok(fluid)
    }
}

impl LiquidModel for CoolPropModel {
    fn name(&self) -> &str {
        "coolprop"
    }

    fn density(&self, liquid: LiquidType, t: Temperature, p: Pressure) -> FluidResult<Density> {
        let mut fluid = self.liquid_at(liquid, t, p)?;
        let rho = fluid.density().map_err(|e| FluidError::Backend {
            message: format!("rfluids error getting density: {}", e),
        })?;
        let rho = kgpm3(rho);
        validation::validate_density(rho)?;
        Ok(rho)
    }

    fn specific_heat(
        &self,
        liquid: LiquidType,
        t: Temperature,
        p: Pressure,
    ) -> FluidResult<SpecHeatCapacity> {
        let mut fluid = self.liquid_at(liquid, t, p)?;
        let cp = fluid.specific_heat().map_err(|e| FluidError::Backend {
            message: format!("rfluids error getting cp: {}", e),
        })?;
        validation::validate_cp(cp)?;
        Ok(cp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cm_core::units::{degc, pa};

    #[test]
    fn steam_is_rejected() {
        let model = CoolPropModel::new();
        assert!(matches!(
            model.density(LiquidType::Water, degc(120.0), pa(101_325.0)),
            Err(FluidError::OutOfRange { .. })
        ));
    }

    #[test]
    fn name_is_reported() {
        assert_eq!(CoolPropModel::new().name(), "coolprop");
    }
}
