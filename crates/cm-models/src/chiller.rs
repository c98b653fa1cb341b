//! Chiller models.
//!
//! A chiller is one EIR formulation paired with one condenser side, chosen
//! when the chiller is built. Everything derived from capacity and power
//! (condenser heat, losses, leaving states) is shared through provided
//! methods on [`ChillerModel`].

use crate::conditions::OperatingConditions;
use crate::condenser::CondenserSide;
use crate::design::ChillerDesign;
use crate::eir::EirFormulation;
use crate::error::ModelResult;
use crate::rated::RatedLiquidStream;
use cm_core::units::{MassRate, Power, Temperature, VolumeRate, w};
use cm_fluids::FluidState;

/// Everything reported for one operating point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointPerformance {
    pub net_evaporator_capacity: Power,
    pub input_power: Power,
    pub net_condenser_capacity: Power,
    pub oil_cooler_heat: Power,
    pub auxiliary_heat: Power,
    pub condenser_leaving_temperature: Option<Temperature>,
}

impl PointPerformance {
    pub fn cop(&self) -> f64 {
        self.net_evaporator_capacity.value / self.input_power.value
    }

    /// Heat released to the equipment space.
    pub fn space_loss_heat(&self) -> Power {
        w((self.input_power.value + self.net_evaporator_capacity.value)
            - (self.net_condenser_capacity.value
                + self.oil_cooler_heat.value
                + self.auxiliary_heat.value))
    }
}

pub trait ChillerModel: Send + Sync {
    fn design(&self) -> &ChillerDesign;

    fn formulation_name(&self) -> &'static str;

    fn evaporator(&self) -> &RatedLiquidStream;

    fn condenser(&self) -> &dyn CondenserSide;

    /// AHRI 550/590 rating point at full load.
    fn rated_conditions(&self) -> OperatingConditions {
        OperatingConditions::new(
            self.condenser().rated_inlet().clone(),
            self.evaporator().rated_state().clone(),
            0,
        )
    }

    fn evaluate(&self, conditions: &OperatingConditions) -> ModelResult<PointPerformance>;

    fn net_evaporator_capacity(&self, conditions: &OperatingConditions) -> ModelResult<Power> {
        Ok(self.evaluate(conditions)?.net_evaporator_capacity)
    }

    fn input_power(&self, conditions: &OperatingConditions) -> ModelResult<Power> {
        Ok(self.evaluate(conditions)?.input_power)
    }

    fn net_condenser_capacity(&self, conditions: &OperatingConditions) -> ModelResult<Power> {
        Ok(self.evaluate(conditions)?.net_condenser_capacity)
    }

    fn oil_cooler_heat(&self, conditions: &OperatingConditions) -> ModelResult<Power> {
        Ok(self.evaluate(conditions)?.oil_cooler_heat)
    }

    fn auxiliary_heat(&self, conditions: &OperatingConditions) -> ModelResult<Power> {
        Ok(self.evaluate(conditions)?.auxiliary_heat)
    }

    fn cop(&self, conditions: &OperatingConditions) -> ModelResult<f64> {
        Ok(self.evaluate(conditions)?.cop())
    }

    fn space_loss_heat(&self, conditions: &OperatingConditions) -> ModelResult<Power> {
        Ok(self.evaluate(conditions)?.space_loss_heat())
    }

    /// Condenser stream after absorbing the net condenser capacity.
    fn condenser_leaving_state(&self, conditions: &OperatingConditions) -> ModelResult<FluidState> {
        let q = self.net_condenser_capacity(conditions)?;
        Ok(conditions.condenser_inlet.add_heat(q)?)
    }

    /// Evaporator stream before it gives up the net evaporator capacity.
    fn evaporator_entering_state(
        &self,
        conditions: &OperatingConditions,
    ) -> ModelResult<FluidState> {
        let q = self.net_evaporator_capacity(conditions)?;
        Ok(conditions.evaporator_outlet.add_heat(q)?)
    }

    fn condenser_air_volumetric_flow_rate(
        &self,
        conditions: &OperatingConditions,
    ) -> ModelResult<VolumeRate> {
        self.condenser().air_volumetric_flow_rate(conditions)
    }

    fn evaporation_rate(&self, conditions: &OperatingConditions) -> ModelResult<MassRate> {
        self.condenser().evaporation_rate(conditions)
    }
}

/// A chiller built from formulation `F` and condenser side `C`.
#[derive(Clone, Debug)]
pub struct Chiller<F, C> {
    design: ChillerDesign,
    formulation: F,
    evaporator: RatedLiquidStream,
    condenser: C,
}

impl<F: EirFormulation, C: CondenserSide> Chiller<F, C> {
    pub(crate) fn new(
        design: ChillerDesign,
        formulation: F,
        evaporator: RatedLiquidStream,
        condenser: C,
    ) -> Self {
        Self {
            design,
            formulation,
            evaporator,
            condenser,
        }
    }

    pub fn formulation(&self) -> &F {
        &self.formulation
    }
}

impl<F: EirFormulation, C: CondenserSide> ChillerModel for Chiller<F, C> {
    fn design(&self) -> &ChillerDesign {
        &self.design
    }

    fn formulation_name(&self) -> &'static str {
        self.formulation.name()
    }

    fn evaporator(&self) -> &RatedLiquidStream {
        &self.evaporator
    }

    fn condenser(&self) -> &dyn CondenserSide {
        &self.condenser
    }

    fn evaluate(&self, conditions: &OperatingConditions) -> ModelResult<PointPerformance> {
        let point = self.formulation.evaluate(&self.design, conditions)?;
        let gross = point.capacity.value + point.power.value;
        let losses = self.design.losses();
        Ok(PointPerformance {
            net_evaporator_capacity: point.capacity,
            input_power: point.power,
            net_condenser_capacity: w(gross * (1.0 - losses.sum())),
            oil_cooler_heat: w(gross * losses.oil_cooler),
            auxiliary_heat: w(gross * losses.auxiliary),
            condenser_leaving_temperature: point.condenser_leaving_temperature,
        })
    }
}
