//! EIR formulations.
//!
//! Both formulations scale rated capacity by a biquadratic temperature
//! modifier and the stage part-load ratio, and compute power as
//! `eir * capacity / plr` with the part-load EIR modifier evaluated at the
//! effective (clamped) part-load ratio. They differ in the condenser
//! temperature the curves are fit against:
//!
//! - [`DirectEir`] uses the entering condenser temperature, so every
//!   quantity is explicit.
//! - [`ReformulatedEir`] uses the leaving condenser temperature, which
//!   depends on the heat rejected; it is found with a bounded secant solve.

use tracing::{debug, warn};

use crate::conditions::OperatingConditions;
use crate::curves::{Biquad, Bicubic, Cubic};
use crate::design::ChillerDesign;
use crate::error::{ModelError, ModelResult};
use cm_core::units::{Power, Temperature, celsius, k, w};
use cm_fluids::FluidResult;
use cm_solver::{Root, SecantConfig, SolverError, secant};

/// Capacity and power at one operating point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EvaluatedPoint {
    pub capacity: Power,
    pub power: Power,
    /// Leaving condenser temperature, when the formulation solves for it
    pub condenser_leaving_temperature: Option<Temperature>,
}

/// A capacity/power formulation.
pub trait EirFormulation: Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(
        &self,
        design: &ChillerDesign,
        conditions: &OperatingConditions,
    ) -> ModelResult<EvaluatedPoint>;
}

/// Stage part-load ratios at `conditions`: `(actual, effective)`.
fn part_load_ratios(
    design: &ChillerDesign,
    conditions: &OperatingConditions,
) -> ModelResult<(f64, f64)> {
    let staging = design.staging();
    Ok((
        staging.part_load_ratio(conditions.compressor_speed)?,
        staging.effective_part_load_ratio(conditions.compressor_speed)?,
    ))
}

/// EnergyPlus electric EIR chiller curves.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectEir {
    pub capacity_temperature: Biquad,
    pub eir_temperature: Biquad,
    pub eir_part_load: Cubic,
}

impl EirFormulation for DirectEir {
    fn name(&self) -> &'static str {
        "direct EIR"
    }

    fn evaluate(
        &self,
        design: &ChillerDesign,
        conditions: &OperatingConditions,
    ) -> ModelResult<EvaluatedPoint> {
        let (plr, effective_plr) = part_load_ratios(design, conditions)?;
        let t_evap = celsius(conditions.evaporator_outlet.temperature());
        let t_cond = celsius(conditions.condenser_inlet.temperature());

        let capacity = design.rated_net_evaporator_capacity().value
            * self.capacity_temperature.eval(t_evap, t_cond)
            * plr;
        let eir = self.eir_temperature.eval(t_evap, t_cond) * self.eir_part_load.eval(effective_plr)
            / design.rated_cop();

        Ok(EvaluatedPoint {
            capacity: w(capacity),
            power: w(eir * capacity / plr),
            condenser_leaving_temperature: None,
        })
    }
}

/// EnergyPlus reformulated electric EIR chiller curves.
#[derive(Clone, Debug, PartialEq)]
pub struct ReformulatedEir {
    pub capacity_temperature: Biquad,
    pub eir_temperature: Biquad,
    /// Part-load EIR modifier in (leaving condenser temperature [°C],
    /// effective part-load ratio)
    pub eir_part_load: Bicubic,
    pub solver: SecantConfig,
}

impl ReformulatedEir {
    pub fn new(capacity_temperature: Biquad, eir_temperature: Biquad, eir_part_load: Bicubic) -> Self {
        Self {
            capacity_temperature,
            eir_temperature,
            eir_part_load,
            solver: SecantConfig::default(),
        }
    }

    /// Capacity and power [W] at a candidate leaving condenser temperature.
    fn capacity_and_power(
        &self,
        design: &ChillerDesign,
        t_evap_c: f64,
        t_cond_leaving_c: f64,
        plr: f64,
        effective_plr: f64,
    ) -> (f64, f64) {
        let capacity = design.rated_net_evaporator_capacity().value
            * self.capacity_temperature.eval(t_evap_c, t_cond_leaving_c)
            * plr;
        let eir = self.eir_temperature.eval(t_evap_c, t_cond_leaving_c)
            * self.eir_part_load.eval(t_cond_leaving_c, effective_plr)
            / design.rated_cop();
        (capacity, eir * capacity / plr)
    }

    fn energy_balance(
        &self,
        design: &ChillerDesign,
        conditions: &OperatingConditions,
        plr: f64,
        effective_plr: f64,
        t_cond_leaving: f64,
    ) -> FluidResult<f64> {
        let inlet = &conditions.condenser_inlet;
        let leaving = inlet.at_temperature(k(t_cond_leaving))?;
        let absorbed = leaving.heat_difference(inlet)?;
        let (capacity, power) = self.capacity_and_power(
            design,
            celsius(conditions.evaporator_outlet.temperature()),
            celsius(leaving.temperature()),
            plr,
            effective_plr,
        );
        Ok(capacity + power - absorbed.value)
    }

    /// First-order leaving temperature: the condenser stream absorbing the
    /// staged rated capacity, ignoring compressor power.
    pub fn initial_guess(
        &self,
        design: &ChillerDesign,
        conditions: &OperatingConditions,
    ) -> ModelResult<Temperature> {
        let (plr, _) = part_load_ratios(design, conditions)?;
        let heat = w(design.rated_net_evaporator_capacity().value * plr);
        Ok(conditions.condenser_inlet.add_heat(heat)?.temperature())
    }

    /// Heat rejected by the refrigerant minus heat absorbed by the condenser
    /// stream when it leaves at `condenser_leaving`.
    pub fn residual(
        &self,
        design: &ChillerDesign,
        conditions: &OperatingConditions,
        condenser_leaving: Temperature,
    ) -> ModelResult<Power> {
        let (plr, effective_plr) = part_load_ratios(design, conditions)?;
        Ok(w(self.energy_balance(
            design,
            conditions,
            plr,
            effective_plr,
            condenser_leaving.value,
        )?))
    }

    /// Solve the condenser energy balance starting from `guess`.
    pub fn solve_from(
        &self,
        design: &ChillerDesign,
        conditions: &OperatingConditions,
        guess: Temperature,
    ) -> ModelResult<Root> {
        let (plr, effective_plr) = part_load_ratios(design, conditions)?;
        let root = secant(
            |t| {
                self.energy_balance(design, conditions, plr, effective_plr, t)
                    .map_err(SolverError::from)
            },
            guess.value,
            &self.solver,
        )
        .map_err(|err| match err {
            SolverError::Fluid(fluid) => ModelError::Fluid(fluid),
            other => ModelError::Solver(other),
        })?;
        debug!(
            speed = conditions.compressor_speed,
            t_cond_leaving = root.x,
            iterations = root.iterations,
            "solved condenser energy balance"
        );
        Ok(root)
    }
}

impl EirFormulation for ReformulatedEir {
    fn name(&self) -> &'static str {
        "reformulated EIR"
    }

    fn evaluate(
        &self,
        design: &ChillerDesign,
        conditions: &OperatingConditions,
    ) -> ModelResult<EvaluatedPoint> {
        let (plr, effective_plr) = part_load_ratios(design, conditions)?;
        let guess = self.initial_guess(design, conditions)?;
        let root = self.solve_from(design, conditions, guess)?;

        let t_inlet = conditions.condenser_inlet.temperature().value;
        if root.x < t_inlet {
            warn!(
                t_cond_leaving = root.x,
                t_cond_entering = t_inlet,
                "solved condenser leaving temperature is below entering temperature"
            );
        }

        let (capacity, power) = self.capacity_and_power(
            design,
            celsius(conditions.evaporator_outlet.temperature()),
            celsius(k(root.x)),
            plr,
            effective_plr,
        );
        Ok(EvaluatedPoint {
            capacity: w(capacity),
            power: w(power),
            condenser_leaving_temperature: Some(k(root.x)),
        })
    }
}
