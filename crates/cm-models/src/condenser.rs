//! Condenser sides.
//!
//! The condenser is either liquid-cooled or air-cooled. The side decides
//! which condenser axes appear in the performance map grid and which
//! condenser-specific lookup variables are reported.

use crate::chiller::PointPerformance;
use crate::conditions::OperatingConditions;
use crate::error::{ModelError, ModelResult};
use crate::map::{CondenserGrid, PerformanceMap, Variable, differential_pressure_map};
use crate::rated::{RatedAirStream, RatedLiquidStream};
use cm_core::units::{MassRate, Temperature, VolumeRate, kgps};
use cm_fluids::{FluidState, LiquidType};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CondenserType {
    Liquid,
    Air,
}

impl CondenserType {
    pub fn text(self) -> &'static str {
        match self {
            CondenserType::Liquid => "liquid-cooled",
            CondenserType::Air => "air-cooled",
        }
    }
}

/// Behavior that differs between liquid- and air-cooled condensers.
pub trait CondenserSide: Send + Sync {
    fn condenser_type(&self) -> CondenserType;

    /// Entering condenser stream at the rating point.
    fn rated_inlet(&self) -> &FluidState;

    /// Condenser liquid, when the condenser is liquid-cooled.
    fn liquid(&self) -> Option<LiquidType>;

    /// Condenser grid axes over `temperatures` with the entering states
    /// they enumerate.
    fn grid(&self, temperatures: &[Temperature]) -> ModelResult<CondenserGrid>;

    /// Names of the condenser-specific lookup variables.
    fn lookup_names(&self) -> &'static [&'static str];

    /// Values for [`lookup_names`](Self::lookup_names) at one grid point.
    fn lookup_values(
        &self,
        conditions: &OperatingConditions,
        point: &PointPerformance,
    ) -> ModelResult<Vec<f64>>;

    fn air_volumetric_flow_rate(
        &self,
        _conditions: &OperatingConditions,
    ) -> ModelResult<VolumeRate> {
        Err(ModelError::NotSupported {
            what: "condenser air volumetric flow rate of a liquid-cooled condenser",
        })
    }

    fn evaporation_rate(&self, _conditions: &OperatingConditions) -> ModelResult<MassRate> {
        Err(ModelError::NotSupported {
            what: "evaporation rate of a liquid-cooled condenser",
        })
    }

    /// Condenser liquid pressure drop map, if the side carries liquid.
    fn differential_pressure_map(&self, _temperatures: &[Temperature]) -> Option<PerformanceMap> {
        None
    }
}

/// Condenser cooled by a liquid loop held at its rated volumetric flow.
#[derive(Clone, Debug)]
pub struct LiquidCooled {
    stream: RatedLiquidStream,
}

impl LiquidCooled {
    pub fn new(stream: RatedLiquidStream) -> Self {
        Self { stream }
    }

    pub fn stream(&self) -> &RatedLiquidStream {
        &self.stream
    }
}

impl CondenserSide for LiquidCooled {
    fn condenser_type(&self) -> CondenserType {
        CondenserType::Liquid
    }

    fn rated_inlet(&self) -> &FluidState {
        self.stream.rated_state()
    }

    fn liquid(&self) -> Option<LiquidType> {
        self.stream.liquid()
    }

    fn grid(&self, temperatures: &[Temperature]) -> ModelResult<CondenserGrid> {
        let flows = [self.stream.volumetric_flow_rate()];
        let mut inlets = Vec::with_capacity(flows.len() * temperatures.len());
        for &v_dot in &flows {
            for &t in temperatures {
                inlets.push(self.stream.state_at(t, v_dot)?);
            }
        }
        Ok(CondenserGrid {
            variables: vec![
                Variable::real(
                    "condenser_liquid_volumetric_flow_rate",
                    flows.iter().map(|v| v.value).collect(),
                ),
                Variable::real(
                    "condenser_liquid_entering_temperature",
                    temperatures.iter().map(|t| t.value).collect(),
                ),
            ],
            inlets,
        })
    }

    fn lookup_names(&self) -> &'static [&'static str] {
        &["net_condenser_capacity"]
    }

    fn lookup_values(
        &self,
        _conditions: &OperatingConditions,
        point: &PointPerformance,
    ) -> ModelResult<Vec<f64>> {
        Ok(vec![point.net_condenser_capacity.value])
    }

    fn differential_pressure_map(&self, temperatures: &[Temperature]) -> Option<PerformanceMap> {
        Some(differential_pressure_map(
            "condenser",
            "condenser_liquid_entering_temperature",
            self.stream.volumetric_flow_rate(),
            temperatures,
        ))
    }
}

/// Condenser cooled by outdoor air moved at a fixed volumetric flow.
///
/// Dry condensers only; no water is evaporated.
#[derive(Clone, Debug)]
pub struct AirCooled {
    stream: RatedAirStream,
}

impl AirCooled {
    pub fn new(stream: RatedAirStream) -> Self {
        Self { stream }
    }

    pub fn stream(&self) -> &RatedAirStream {
        &self.stream
    }
}

impl CondenserSide for AirCooled {
    fn condenser_type(&self) -> CondenserType {
        CondenserType::Air
    }

    fn rated_inlet(&self) -> &FluidState {
        self.stream.rated_state()
    }

    fn liquid(&self) -> Option<LiquidType> {
        None
    }

    fn grid(&self, temperatures: &[Temperature]) -> ModelResult<CondenserGrid> {
        let humidities = [self.stream.relative_humidity()];
        let pressures = [self.stream.pressure()];
        let mut inlets = Vec::new();
        for &t in temperatures {
            for &rh in &humidities {
                for &p in &pressures {
                    inlets.push(self.stream.state_at(t, rh, p)?);
                }
            }
        }
        Ok(CondenserGrid {
            variables: vec![
                Variable::real(
                    "condenser_air_entering_drybulb_temperature",
                    temperatures.iter().map(|t| t.value).collect(),
                ),
                Variable::real("condenser_air_entering_relative_humidity", humidities.to_vec()),
                Variable::real(
                    "ambient_absolute_air_pressure",
                    pressures.iter().map(|p| p.value).collect(),
                ),
            ],
            inlets,
        })
    }

    fn lookup_names(&self) -> &'static [&'static str] {
        &["condenser_air_volumetric_flow_rate", "evaporation_rate"]
    }

    fn lookup_values(
        &self,
        conditions: &OperatingConditions,
        _point: &PointPerformance,
    ) -> ModelResult<Vec<f64>> {
        Ok(vec![
            self.air_volumetric_flow_rate(conditions)?.value,
            self.evaporation_rate(conditions)?.value,
        ])
    }

    fn air_volumetric_flow_rate(
        &self,
        conditions: &OperatingConditions,
    ) -> ModelResult<VolumeRate> {
        Ok(conditions
            .condenser_inlet
            .volumetric_flow_rate()
            .unwrap_or_else(|| self.stream.volumetric_flow_rate()))
    }

    fn evaporation_rate(&self, _conditions: &OperatingConditions) -> ModelResult<MassRate> {
        Ok(kgps(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cm_core::units::{constants, degf, delta_k, w};
    use cm_fluids::CoolPropModel;
    use std::sync::Arc;

    fn liquid_cooled() -> LiquidCooled {
        LiquidCooled::new(
            RatedLiquidStream::rate(
                Arc::new(CoolPropModel),
                LiquidType::Water,
                degf(85.0),
                degf(94.3),
                w(400_000.0),
            )
            .unwrap(),
        )
    }

    fn air_cooled() -> AirCooled {
        AirCooled::new(
            RatedAirStream::rate(
                degf(95.0),
                0.4,
                constants::standard_atmosphere(),
                delta_k(10.0),
                w(400_000.0),
            )
            .unwrap(),
        )
    }

    #[test]
    fn liquid_grid_enumerates_temperatures() {
        let side = liquid_cooled();
        let temps = [degf(55.0), degf(80.0), degf(104.0)];
        let grid = side.grid(&temps).unwrap();
        assert_eq!(grid.variables.len(), 2);
        assert_eq!(grid.inlets.len(), 3);
        let v = side.stream().volumetric_flow_rate().value;
        for (inlet, t) in grid.inlets.iter().zip(temps) {
            assert_eq!(inlet.temperature(), t);
            assert!((inlet.volumetric_flow_rate().unwrap().value - v).abs() < 1e-12);
        }
        assert!(side.differential_pressure_map(&temps).is_some());
        assert_eq!(side.lookup_names(), &["net_condenser_capacity"]);
    }

    #[test]
    fn air_grid_holds_humidity_and_pressure() {
        let side = air_cooled();
        let temps = [degf(55.0), degf(115.0)];
        let grid = side.grid(&temps).unwrap();
        let names: Vec<_> = grid.variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "condenser_air_entering_drybulb_temperature",
                "condenser_air_entering_relative_humidity",
                "ambient_absolute_air_pressure"
            ]
        );
        assert_eq!(grid.inlets.len(), 2);
        assert!(side.differential_pressure_map(&temps).is_none());
        assert_eq!(side.liquid(), None);
    }

    #[test]
    fn liquid_side_has_no_air_flow() {
        let side = liquid_cooled();
        let outlet = cm_fluids::FluidState::water(degf(44.0)).unwrap();
        let conditions =
            OperatingConditions::new(side.rated_inlet().clone(), outlet, 0);
        assert!(matches!(
            side.air_volumetric_flow_rate(&conditions),
            Err(ModelError::NotSupported { .. })
        ));
        assert!(matches!(
            side.evaporation_rate(&conditions),
            Err(ModelError::NotSupported { .. })
        ));
    }
}
