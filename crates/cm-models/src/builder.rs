//! Chiller construction.
//!
//! [`ChillerBuilder`] collects design parameters, validates them, derives
//! the rated condenser capacity and rated flows, and returns the chiller as
//! a single [`ChillerModel`] trait object.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::chiller::{Chiller, ChillerModel};
use crate::condenser::{AirCooled, CondenserType, LiquidCooled};
use crate::conditions::ahri_550_590;
use crate::curves::{Bicubic, Biquad, Cubic};
use crate::design::{ChillerDesign, LossFractions, TemperatureRange};
use crate::eir::{DirectEir, EirFormulation, ReformulatedEir};
use crate::error::{ModelError, ModelResult};
use crate::rated::{RatedAirStream, RatedLiquidStream};
use crate::staging::StagingPolicy;
use cm_core::units::{Power, TempInterval, constants, degf, delta_k, w};
use cm_fluids::{CoolPropModel, LiquidModel, LiquidType};
use cm_solver::SecantConfig;

/// Performance curves and the formulation they belong to.
#[derive(Clone, Debug, PartialEq)]
pub enum EirCurves {
    Direct {
        capacity_temperature: Biquad,
        eir_temperature: Biquad,
        eir_part_load: Cubic,
    },
    Reformulated {
        capacity_temperature: Biquad,
        eir_temperature: Biquad,
        eir_part_load: Bicubic,
    },
}

impl Default for EirCurves {
    /// Rated performance at every condition, EIR constant with load.
    fn default() -> Self {
        EirCurves::Direct {
            capacity_temperature: Biquad::UNITY,
            eir_temperature: Biquad::UNITY,
            eir_part_load: Cubic::LINEAR,
        }
    }
}

/// Default rated capacity [ton_ref].
pub const DEFAULT_RATED_CAPACITY_TONS: f64 = 100.0;
pub const DEFAULT_RATED_COP: f64 = 2.0;
pub const DEFAULT_MINIMUM_PART_LOAD_RATIO: f64 = 0.25;
/// Default condenser air temperature rise at rated conditions [K].
pub const DEFAULT_AIR_TEMPERATURE_RISE: f64 = 10.0;

#[derive(Clone)]
pub struct ChillerBuilder {
    rated_net_evaporator_capacity: Power,
    rated_cop: f64,
    rated_net_condenser_capacity: Option<Power>,
    minimum_part_load_ratio: f64,
    minimum_unloading_ratio: f64,
    stages: Option<usize>,
    curves: EirCurves,
    solver: SecantConfig,
    losses: LossFractions,
    cycling_degradation_coefficient: f64,
    standby_power: Power,
    condenser_type: CondenserType,
    evaporator_leaving_range: Option<TemperatureRange>,
    condenser_entering_range: Option<TemperatureRange>,
    liquid_model: Arc<dyn LiquidModel>,
    liquid: LiquidType,
    condenser_air_temperature_rise: TempInterval,
}

impl Default for ChillerBuilder {
    fn default() -> Self {
        Self {
            rated_net_evaporator_capacity: w(DEFAULT_RATED_CAPACITY_TONS * constants::TON_REF_W),
            rated_cop: DEFAULT_RATED_COP,
            rated_net_condenser_capacity: None,
            minimum_part_load_ratio: DEFAULT_MINIMUM_PART_LOAD_RATIO,
            minimum_unloading_ratio: DEFAULT_MINIMUM_PART_LOAD_RATIO,
            stages: None,
            curves: EirCurves::default(),
            solver: SecantConfig::default(),
            losses: LossFractions::default(),
            cycling_degradation_coefficient: 0.0,
            standby_power: w(0.0),
            condenser_type: CondenserType::Liquid,
            evaporator_leaving_range: None,
            condenser_entering_range: None,
            liquid_model: Arc::new(CoolPropModel),
            liquid: LiquidType::Water,
            condenser_air_temperature_rise: delta_k(DEFAULT_AIR_TEMPERATURE_RISE),
        }
    }
}

impl ChillerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rated_net_evaporator_capacity(mut self, capacity: Power) -> Self {
        self.rated_net_evaporator_capacity = capacity;
        self
    }

    pub fn rated_cop(mut self, cop: f64) -> Self {
        self.rated_cop = cop;
        self
    }

    /// Override the capacity derived from the rated energy balance.
    pub fn rated_net_condenser_capacity(mut self, capacity: Power) -> Self {
        self.rated_net_condenser_capacity = Some(capacity);
        self
    }

    pub fn minimum_part_load_ratio(mut self, ratio: f64) -> Self {
        self.minimum_part_load_ratio = ratio;
        self
    }

    pub fn minimum_unloading_ratio(mut self, ratio: f64) -> Self {
        self.minimum_unloading_ratio = ratio;
        self
    }

    pub fn stages(mut self, stages: usize) -> Self {
        self.stages = Some(stages);
        self
    }

    pub fn curves(mut self, curves: EirCurves) -> Self {
        self.curves = curves;
        self
    }

    /// Root finder settings for the reformulated formulation.
    pub fn solver(mut self, solver: SecantConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn losses(mut self, losses: LossFractions) -> Self {
        self.losses = losses;
        self
    }

    pub fn cycling_degradation_coefficient(mut self, coefficient: f64) -> Self {
        self.cycling_degradation_coefficient = coefficient;
        self
    }

    pub fn standby_power(mut self, power: Power) -> Self {
        self.standby_power = power;
        self
    }

    pub fn condenser_type(mut self, condenser_type: CondenserType) -> Self {
        self.condenser_type = condenser_type;
        self
    }

    pub fn evaporator_leaving_range(mut self, range: TemperatureRange) -> Self {
        self.evaporator_leaving_range = Some(range);
        self
    }

    pub fn condenser_entering_range(mut self, range: TemperatureRange) -> Self {
        self.condenser_entering_range = Some(range);
        self
    }

    /// Property model used for both liquid streams.
    pub fn liquid_model(mut self, model: Arc<dyn LiquidModel>) -> Self {
        self.liquid_model = model;
        self
    }

    pub fn liquid(mut self, liquid: LiquidType) -> Self {
        self.liquid = liquid;
        self
    }

    pub fn condenser_air_temperature_rise(mut self, rise: TempInterval) -> Self {
        self.condenser_air_temperature_rise = rise;
        self
    }

    fn design(&self) -> ModelResult<ChillerDesign> {
        let capacity = self.rated_net_evaporator_capacity.value;
        if !(capacity.is_finite() && capacity > 0.0) {
            return Err(ModelError::configuration(format!(
                "rated net evaporator capacity must be positive, got {capacity} W"
            )));
        }
        if !(self.rated_cop.is_finite() && self.rated_cop > 0.0) {
            return Err(ModelError::configuration(format!(
                "rated COP must be positive, got {}",
                self.rated_cop
            )));
        }
        if !(0.0..=1.0).contains(&self.cycling_degradation_coefficient) {
            return Err(ModelError::configuration(format!(
                "cycling degradation coefficient must lie in [0, 1], got {}",
                self.cycling_degradation_coefficient
            )));
        }
        if !(self.standby_power.value.is_finite() && self.standby_power.value >= 0.0) {
            return Err(ModelError::configuration("standby power must be non-negative"));
        }
        self.losses.validate()?;
        let staging = StagingPolicy::new(
            self.minimum_part_load_ratio,
            self.minimum_unloading_ratio,
            self.stages,
        )?;

        let rated_net_condenser_capacity = match self.rated_net_condenser_capacity {
            Some(q) => {
                if !(q.value.is_finite() && q.value > 0.0) {
                    return Err(ModelError::configuration(
                        "rated net condenser capacity must be positive",
                    ));
                }
                q
            }
            // Loss sums inside the tolerance above 1.0 leave nothing for the condenser.
            None => {
                let net = gross_rejection(capacity, self.rated_cop) * (1.0 - self.losses.sum());
                w(net.max(0.0))
            }
        };

        let evaporator_leaving_range = match self.evaporator_leaving_range {
            Some(range) => range,
            None => TemperatureRange::fahrenheit(39.0, 60.0)?,
        };
        let condenser_entering_range = match (self.condenser_entering_range, self.condenser_type) {
            (Some(range), _) => range,
            (None, CondenserType::Liquid) => TemperatureRange::fahrenheit(55.0, 104.0)?,
            (None, CondenserType::Air) => TemperatureRange::fahrenheit(55.0, 115.0)?,
        };

        Ok(ChillerDesign {
            rated_net_evaporator_capacity: self.rated_net_evaporator_capacity,
            rated_cop: self.rated_cop,
            rated_net_condenser_capacity,
            staging,
            losses: self.losses,
            evaporator_leaving_range,
            condenser_entering_range,
            cycling_degradation_coefficient: self.cycling_degradation_coefficient,
            standby_power: self.standby_power,
        })
    }

    /// Validate the design, derive rated flows and assemble the chiller.
    pub fn build(self) -> ModelResult<Box<dyn ChillerModel>> {
        let design = self.design()?;
        let evaporator = RatedLiquidStream::rate(
            Arc::clone(&self.liquid_model),
            self.liquid,
            degf(ahri_550_590::EVAPORATOR_LEAVING_F),
            degf(ahri_550_590::EVAPORATOR_ENTERING_F),
            design.rated_net_evaporator_capacity,
        )?;
        debug!(
            stages = design.staging.stages(),
            condenser = self.condenser_type.text(),
            rated_condenser_capacity = design.rated_net_condenser_capacity.value,
            "building chiller"
        );
        match self.curves.clone() {
            EirCurves::Direct {
                capacity_temperature,
                eir_temperature,
                eir_part_load,
            } => self.assemble(
                design,
                DirectEir {
                    capacity_temperature,
                    eir_temperature,
                    eir_part_load,
                },
                evaporator,
            ),
            EirCurves::Reformulated {
                capacity_temperature,
                eir_temperature,
                eir_part_load,
            } => self.assemble(
                design,
                ReformulatedEir {
                    capacity_temperature,
                    eir_temperature,
                    eir_part_load,
                    solver: self.solver,
                },
                evaporator,
            ),
        }
    }

    fn assemble<F: EirFormulation + 'static>(
        &self,
        design: ChillerDesign,
        formulation: F,
        evaporator: RatedLiquidStream,
    ) -> ModelResult<Box<dyn ChillerModel>> {
        self.solver
            .validate()
            .map_err(|e| ModelError::configuration(e.to_string()))?;
        let mut heat = design.rated_net_condenser_capacity;
        if heat.value <= 0.0 {
            // Every watt goes to losses; size the condenser stream on the gross rejection.
            heat = w(gross_rejection(
                design.rated_net_evaporator_capacity.value,
                design.rated_cop,
            ));
            warn!(
                losses = design.losses.sum(),
                sizing_heat = heat.value,
                "no heat reaches the condenser at rating; sizing its flow on gross rejection"
            );
        }
        Ok(match self.condenser_type {
            CondenserType::Liquid => {
                let stream = RatedLiquidStream::rate(
                    Arc::clone(&self.liquid_model),
                    self.liquid,
                    degf(ahri_550_590::CONDENSER_LIQUID_ENTERING_F),
                    degf(ahri_550_590::CONDENSER_LIQUID_LEAVING_F),
                    heat,
                )?;
                Box::new(Chiller::new(design, formulation, evaporator, LiquidCooled::new(stream)))
            }
            CondenserType::Air => {
                let stream = RatedAirStream::rate(
                    degf(ahri_550_590::CONDENSER_AIR_ENTERING_F),
                    ahri_550_590::CONDENSER_AIR_RELATIVE_HUMIDITY,
                    constants::standard_atmosphere(),
                    self.condenser_air_temperature_rise,
                    heat,
                )?;
                Box::new(Chiller::new(design, formulation, evaporator, AirCooled::new(stream)))
            }
        })
    }
}

/// Heat rejected at the rating point before losses [W].
fn gross_rejection(capacity: f64, cop: f64) -> f64 {
    capacity * (1.0 / cop + 1.0)
}
