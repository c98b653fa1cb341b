//! Stream states: a liquid or moist-air stream at a thermodynamic state,
//! optionally carrying a flow rate.
//!
//! Properties are evaluated once at construction. Every operation that
//! changes temperature or flow returns a new state, so a state can be shared
//! freely between threads and reused as a rated reference without mutation.

use std::fmt;
use std::sync::Arc;

use crate::error::{FluidError, FluidResult};
use crate::coolprop::CoolPropModel;
use crate::liquid::{LiquidModel, LiquidType, SpecHeatCapacity, validation};
use crate::psychrometrics as psy;
use cm_core::units::{
    Density, MassRate, Power, Pressure, Temperature, VolumeRate, celsius, constants, degc, k,
    kgpm3, kgps, m3ps, w,
};
use tracing::debug;

/// Iteration budget for the outlet temperature of [`FluidState::add_heat`].
const ADD_HEAT_MAX_ITER: usize = 50;
/// Outlet temperature tolerance of [`FluidState::add_heat`] [K].
const ADD_HEAT_TOL_K: f64 = 1e-11;

/// Flow-rate specifier. A state takes at most one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FlowSpec {
    Mass(MassRate),
    Volumetric(VolumeRate),
}

impl FlowSpec {
    /// Build from optional inputs; supplying both is an error.
    pub fn from_options(
        mass_flow_rate: Option<MassRate>,
        volumetric_flow_rate: Option<VolumeRate>,
    ) -> FluidResult<Option<Self>> {
        match (mass_flow_rate, volumetric_flow_rate) {
            (Some(_), Some(_)) => Err(FluidError::InvalidArg {
                what: "only one of mass or volumetric flow rate may be given",
            }),
            (Some(m), None) => Ok(Some(FlowSpec::Mass(m))),
            (None, Some(v)) => Ok(Some(FlowSpec::Volumetric(v))),
            (None, None) => Ok(None),
        }
    }
}

/// Humidity descriptor for moist air. Exactly one is required.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Humidity {
    WetBulb(Temperature),
    /// kg water / kg dry air
    HumidityRatio(f64),
    /// Fraction in [0, 1]
    RelativeHumidity(f64),
    /// J/kg dry air
    Enthalpy(f64),
}

impl Humidity {
    /// Build from optional inputs; anything other than exactly one is an error.
    pub fn from_options(
        wet_bulb: Option<Temperature>,
        humidity_ratio: Option<f64>,
        relative_humidity: Option<f64>,
        enthalpy: Option<f64>,
    ) -> FluidResult<Self> {
        let given = [
            wet_bulb.map(Humidity::WetBulb),
            humidity_ratio.map(Humidity::HumidityRatio),
            relative_humidity.map(Humidity::RelativeHumidity),
            enthalpy.map(Humidity::Enthalpy),
        ];
        let mut iter = given.into_iter().flatten();
        match (iter.next(), iter.next()) {
            (Some(h), None) => Ok(h),
            (None, _) => Err(FluidError::InvalidArg {
                what: "moist air requires a humidity descriptor",
            }),
            (Some(_), Some(_)) => Err(FluidError::InvalidArg {
                what: "moist air accepts a single humidity descriptor",
            }),
        }
    }
}

/// Liquid properties at (T, p).
#[derive(Clone)]
pub struct LiquidState {
    liquid: LiquidType,
    model: Arc<dyn LiquidModel>,
    t: Temperature,
    p: Pressure,
    rho: Density,
    cp: SpecHeatCapacity,
}

impl LiquidState {
    pub fn new(
        model: Arc<dyn LiquidModel>,
        liquid: LiquidType,
        t: Temperature,
        p: Pressure,
    ) -> FluidResult<Self> {
        let rho = model.density(liquid, t, p)?;
        let cp = model.specific_heat(liquid, t, p)?;
        Ok(Self {
            liquid,
            model,
            t,
            p,
            rho,
            cp,
        })
    }

    pub fn liquid(&self) -> LiquidType {
        self.liquid
    }

    pub fn model(&self) -> &Arc<dyn LiquidModel> {
        &self.model
    }

    fn at_temperature(&self, t: Temperature) -> FluidResult<Self> {
        Self::new(self.model.clone(), self.liquid, t, self.p)
    }
}

impl fmt::Debug for LiquidState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiquidState")
            .field("liquid", &self.liquid)
            .field("model", &self.model.name())
            .field("t", &self.t.value)
            .field("p", &self.p.value)
            .field("rho", &self.rho.value)
            .field("cp", &self.cp)
            .finish()
    }
}

/// Moist-air state anchored on dry-bulb and wet-bulb temperature.
#[derive(Clone, Debug, PartialEq)]
pub struct PsychrometricState {
    dry_bulb: Temperature,
    p: Pressure,
    wet_bulb: Temperature,
    humidity_ratio: f64,
    relative_humidity: f64,
    enthalpy: f64,
    rho: Density,
}

impl PsychrometricState {
    /// Specific heat of moist air used for sensible heat balances [J/(kg·K)].
    pub const SPECIFIC_HEAT: SpecHeatCapacity = 1_006.0;

    pub fn new(dry_bulb: Temperature, p: Pressure, humidity: Humidity) -> FluidResult<Self> {
        validation::validate_temperature(dry_bulb)?;
        validation::validate_pressure(p)?;
        let t_db = celsius(dry_bulb);
        let p_pa = p.value;

        let (humidity_ratio, t_wb) = match humidity {
            Humidity::WetBulb(t_wb) => {
                let t_wb = celsius(t_wb);
                (psy::humidity_ratio_from_wet_bulb(t_db, t_wb, p_pa)?, t_wb)
            }
            Humidity::HumidityRatio(hr) => {
                (hr, psy::wet_bulb_from_humidity_ratio(t_db, hr, p_pa)?)
            }
            Humidity::RelativeHumidity(rh) => {
                let hr = psy::humidity_ratio_from_relative_humidity(t_db, rh, p_pa)?;
                (hr, psy::wet_bulb_from_humidity_ratio(t_db, hr, p_pa)?)
            }
            Humidity::Enthalpy(h) => {
                let hr = psy::humidity_ratio_from_enthalpy(h, t_db)?;
                (hr, psy::wet_bulb_from_humidity_ratio(t_db, hr, p_pa)?)
            }
        };

        Ok(Self {
            dry_bulb,
            p,
            wet_bulb: degc(t_wb),
            humidity_ratio,
            relative_humidity: psy::relative_humidity_from_humidity_ratio(
                t_db,
                humidity_ratio,
                p_pa,
            )?,
            enthalpy: psy::moist_air_enthalpy(t_db, humidity_ratio)?,
            rho: kgpm3(psy::moist_air_density(t_db, humidity_ratio, p_pa)?),
        })
    }

    pub fn dry_bulb(&self) -> Temperature {
        self.dry_bulb
    }

    pub fn wet_bulb(&self) -> Temperature {
        self.wet_bulb
    }

    pub fn humidity_ratio(&self) -> f64 {
        self.humidity_ratio
    }

    pub fn relative_humidity(&self) -> f64 {
        self.relative_humidity
    }

    /// J/kg dry air
    pub fn enthalpy(&self) -> f64 {
        self.enthalpy
    }

    fn at_temperature(&self, t: Temperature) -> FluidResult<Self> {
        // Sensible heating or cooling keeps the moisture content fixed.
        Self::new(t, self.p, Humidity::HumidityRatio(self.humidity_ratio))
    }
}

#[derive(Clone, Debug)]
enum Properties {
    Liquid(LiquidState),
    MoistAir(PsychrometricState),
}

/// A liquid or moist-air stream state.
#[derive(Clone, Debug)]
pub struct FluidState {
    properties: Properties,
    mass_flow: Option<MassRate>,
}

impl FluidState {
    /// Liquid stream without flow.
    pub fn liquid(
        model: Arc<dyn LiquidModel>,
        liquid: LiquidType,
        t: Temperature,
        p: Pressure,
    ) -> FluidResult<Self> {
        Ok(Self {
            properties: Properties::Liquid(LiquidState::new(model, liquid, t, p)?),
            mass_flow: None,
        })
    }

    /// Water at one atmosphere using [`CoolPropModel`].
    pub fn water(t: Temperature) -> FluidResult<Self> {
        Self::liquid(
            Arc::new(CoolPropModel),
            LiquidType::Water,
            t,
            constants::standard_atmosphere(),
        )
    }

    /// Moist-air stream without flow.
    pub fn moist_air(dry_bulb: Temperature, p: Pressure, humidity: Humidity) -> FluidResult<Self> {
        Ok(Self {
            properties: Properties::MoistAir(PsychrometricState::new(dry_bulb, p, humidity)?),
            mass_flow: None,
        })
    }

    /// Same state with the given flow applied (the other flow form is derived
    /// through density).
    pub fn with_flow(self, flow: FlowSpec) -> FluidResult<Self> {
        match flow {
            FlowSpec::Mass(m) => self.with_mass_flow_rate(m),
            FlowSpec::Volumetric(v) => self.with_volumetric_flow_rate(v),
        }
    }

    pub fn with_mass_flow_rate(mut self, m_dot: MassRate) -> FluidResult<Self> {
        if !m_dot.value.is_finite() || m_dot.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "mass flow rate must be positive and finite",
            });
        }
        self.mass_flow = Some(m_dot);
        Ok(self)
    }

    pub fn with_volumetric_flow_rate(self, v_dot: VolumeRate) -> FluidResult<Self> {
        if !v_dot.value.is_finite() || v_dot.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "volumetric flow rate must be positive and finite",
            });
        }
        let m_dot = kgps(v_dot.value * self.density().value);
        self.with_mass_flow_rate(m_dot)
    }

    pub fn temperature(&self) -> Temperature {
        match &self.properties {
            Properties::Liquid(s) => s.t,
            Properties::MoistAir(s) => s.dry_bulb,
        }
    }

    pub fn pressure(&self) -> Pressure {
        match &self.properties {
            Properties::Liquid(s) => s.p,
            Properties::MoistAir(s) => s.p,
        }
    }

    pub fn density(&self) -> Density {
        match &self.properties {
            Properties::Liquid(s) => s.rho,
            Properties::MoistAir(s) => s.rho,
        }
    }

    pub fn specific_heat(&self) -> SpecHeatCapacity {
        match &self.properties {
            Properties::Liquid(s) => s.cp,
            Properties::MoistAir(_) => PsychrometricState::SPECIFIC_HEAT,
        }
    }

    pub fn mass_flow_rate(&self) -> Option<MassRate> {
        self.mass_flow
    }

    pub fn volumetric_flow_rate(&self) -> Option<VolumeRate> {
        self.mass_flow.map(|m| m3ps(m.value / self.density().value))
    }

    pub fn liquid_state(&self) -> Option<&LiquidState> {
        match &self.properties {
            Properties::Liquid(s) => Some(s),
            Properties::MoistAir(_) => None,
        }
    }

    pub fn psychrometrics(&self) -> Option<&PsychrometricState> {
        match &self.properties {
            Properties::Liquid(_) => None,
            Properties::MoistAir(s) => Some(s),
        }
    }

    /// Thermal capacity rate `m_dot * cp` [W/K].
    pub fn capacity_rate(&self) -> FluidResult<f64> {
        let m_dot = self.mass_flow.ok_or(FluidError::FlowNotSet {
            what: "capacity rate",
        })?;
        Ok(m_dot.value * self.specific_heat())
    }

    /// Same composition, pressure and mass flow at a different temperature.
    pub fn at_temperature(&self, t: Temperature) -> FluidResult<Self> {
        let properties = match &self.properties {
            Properties::Liquid(s) => Properties::Liquid(s.at_temperature(t)?),
            Properties::MoistAir(s) => Properties::MoistAir(s.at_temperature(t)?),
        };
        Ok(Self {
            properties,
            mass_flow: self.mass_flow,
        })
    }

    /// New state after adding `q` to the stream: `T + q / (m_dot * cp)`,
    /// with `cp` the mean of the inlet and outlet specific heats.
    ///
    /// Using the mean over the step makes the operation exactly reversible:
    /// `add_heat(q).add_heat(-q)` returns to the starting temperature even
    /// when `cp` depends on temperature.
    pub fn add_heat(&self, q: Power) -> FluidResult<Self> {
        let m_dot = self
            .mass_flow
            .ok_or(FluidError::FlowNotSet { what: "added heat" })?
            .value;
        if q.value == 0.0 {
            return Ok(self.clone());
        }
        let t_in = self.temperature().value;
        let cp_in = self.specific_heat();
        let mut outlet = self.at_temperature(k(t_in + q.value / (m_dot * cp_in)))?;
        for iteration in 0..ADD_HEAT_MAX_ITER {
            let cp_mean = 0.5 * (cp_in + outlet.specific_heat());
            let t_next = t_in + q.value / (m_dot * cp_mean);
            if (t_next - outlet.temperature().value).abs() <= ADD_HEAT_TOL_K {
                debug!(iterations = iteration + 1, t_out = t_next, "added heat to stream");
                return if t_next == outlet.temperature().value {
                    Ok(outlet)
                } else {
                    self.at_temperature(k(t_next))
                };
            }
            outlet = self.at_temperature(k(t_next))?;
        }
        Err(FluidError::ConvergenceFailed {
            what: "outlet temperature of added heat",
        })
    }

    /// Heat carried by this stream relative to `other`: the mean capacity
    /// rate of the two states times their temperature difference. With equal
    /// capacity rates this is `c * T - other.c * other.T`; it is the heat
    /// that [`add_heat`](Self::add_heat) moves between the two temperatures.
    pub fn heat_difference(&self, other: &FluidState) -> FluidResult<Power> {
        let c = self.capacity_rate()?;
        let c_other = other.capacity_rate()?;
        let delta_t = self.temperature().value - other.temperature().value;
        Ok(w(0.5 * (c + c_other) * delta_t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::liquid::IncompressibleLiquid;
    use approx::assert_relative_eq;
    use cm_core::units::{degf, pa};
    use proptest::prelude::*;

    fn incompressible(t: f64) -> FluidState {
        FluidState::liquid(
            Arc::new(IncompressibleLiquid::water()),
            LiquidType::Water,
            degc(t),
            pa(101_325.0),
        )
        .unwrap()
    }

    #[test]
    fn volumetric_flow_derives_mass_flow() {
        let state = FluidState::water(degc(10.0))
            .unwrap()
            .with_volumetric_flow_rate(m3ps(0.01))
            .unwrap();
        let m = state.mass_flow_rate().unwrap().value;
        assert_relative_eq!(m, 0.01 * state.density().value, epsilon = 1e-12);
        assert_relative_eq!(
            state.volumetric_flow_rate().unwrap().value,
            0.01,
            epsilon = 1e-12
        );
    }

    #[test]
    fn both_flows_rejected() {
        let err = FlowSpec::from_options(Some(kgps(1.0)), Some(m3ps(0.001))).unwrap_err();
        assert!(matches!(err, FluidError::InvalidArg { .. }));
        assert_eq!(FlowSpec::from_options(None, None).unwrap(), None);
    }

    #[test]
    fn add_heat_requires_flow() {
        let state = FluidState::water(degf(85.0)).unwrap();
        assert!(matches!(
            state.add_heat(w(1000.0)),
            Err(FluidError::FlowNotSet { .. })
        ));
        assert!(state.capacity_rate().is_err());
    }

    #[test]
    fn add_heat_keeps_mass_flow() {
        let state = incompressible(29.0).with_mass_flow_rate(kgps(10.0)).unwrap();
        let warmer = state.add_heat(w(41_840.0)).unwrap();
        assert_relative_eq!(warmer.temperature().value - state.temperature().value, 1.0, epsilon = 1e-9);
        assert_eq!(warmer.mass_flow_rate(), state.mass_flow_rate());
        // Source state untouched.
        assert_relative_eq!(celsius(state.temperature()), 29.0, epsilon = 1e-12);
    }

    #[test]
    fn heat_difference_matches_added_heat() {
        let inlet = incompressible(29.0).with_mass_flow_rate(kgps(20.0)).unwrap();
        let outlet = inlet.add_heat(w(500_000.0)).unwrap();
        let q = outlet.heat_difference(&inlet).unwrap();
        assert_relative_eq!(q.value, 500_000.0, max_relative = 1e-9);
    }

    #[test]
    fn humidity_requires_exactly_one_descriptor() {
        assert!(Humidity::from_options(None, None, None, None).is_err());
        assert!(Humidity::from_options(Some(degc(20.0)), Some(0.01), None, None).is_err());
        assert_eq!(
            Humidity::from_options(None, None, Some(0.4), None).unwrap(),
            Humidity::RelativeHumidity(0.4)
        );
    }

    #[test]
    fn moist_air_descriptors_agree() {
        let p = pa(101_325.0);
        let from_rh = PsychrometricState::new(degf(95.0), p, Humidity::RelativeHumidity(0.4)).unwrap();
        let from_wb =
            PsychrometricState::new(degf(95.0), p, Humidity::WetBulb(from_rh.wet_bulb())).unwrap();
        let from_h =
            PsychrometricState::new(degf(95.0), p, Humidity::Enthalpy(from_rh.enthalpy())).unwrap();

        assert_relative_eq!(from_wb.humidity_ratio(), from_rh.humidity_ratio(), max_relative = 1e-3);
        assert_relative_eq!(from_h.humidity_ratio(), from_rh.humidity_ratio(), max_relative = 1e-9);
        assert_relative_eq!(from_rh.relative_humidity(), 0.4, epsilon = 1e-9);
        assert!(from_rh.wet_bulb().value < from_rh.dry_bulb().value);
    }

    #[test]
    fn moist_air_heating_keeps_humidity_ratio() {
        let air = FluidState::moist_air(degc(35.0), pa(101_325.0), Humidity::RelativeHumidity(0.4))
            .unwrap()
            .with_mass_flow_rate(kgps(5.0))
            .unwrap();
        let hot = air.add_heat(w(50_300.0)).unwrap();
        assert_relative_eq!(celsius(hot.temperature()), 45.0, epsilon = 1e-9);
        let (a, b) = (air.psychrometrics().unwrap(), hot.psychrometrics().unwrap());
        assert_relative_eq!(a.humidity_ratio(), b.humidity_ratio(), epsilon = 1e-15);
        assert!(b.relative_humidity() < a.relative_humidity());
    }

    #[test]
    fn water_add_heat_is_reversible() {
        for (t, m, q) in [(10.0, 1.0, 2.0e5), (7.0, 2.0, 1.5e5), (30.0, 0.5, 1.0e5)] {
            let state = FluidState::water(degc(t))
                .unwrap()
                .with_mass_flow_rate(kgps(m))
                .unwrap();
            let heated = state.add_heat(w(q)).unwrap();
            let back = heated.add_heat(w(-q)).unwrap();
            assert!(
                (back.temperature().value - state.temperature().value).abs() < 1e-8,
                "{t} °C, {m} kg/s, {q} W: returned to {} K",
                back.temperature().value
            );
            let carried = heated.heat_difference(&state).unwrap();
            assert_relative_eq!(carried.value, q, max_relative = 1e-9);
        }
    }

    #[test]
    fn water_add_heat_uses_mean_specific_heat() {
        let state = FluidState::water(degc(10.0))
            .unwrap()
            .with_mass_flow_rate(kgps(1.0))
            .unwrap();
        let heated = state.add_heat(w(2.0e5)).unwrap();
        let cp_mean = 0.5 * (state.specific_heat() + heated.specific_heat());
        let delta_t = heated.temperature().value - state.temperature().value;
        assert_relative_eq!(delta_t, 2.0e5 / cp_mean, max_relative = 1e-10);
    }

    #[test]
    fn zero_heat_returns_same_temperature() {
        let state = FluidState::water(degc(12.0))
            .unwrap()
            .with_mass_flow_rate(kgps(3.0))
            .unwrap();
        let same = state.add_heat(w(0.0)).unwrap();
        assert_eq!(same.temperature(), state.temperature());
    }

    proptest! {
        #[test]
        fn add_heat_round_trip(t in 5.0..45.0f64, m in 0.5..50.0f64, q in -2.0e5..2.0e5f64) {
            let state = incompressible(t).with_mass_flow_rate(kgps(m)).unwrap();
            let back = state.add_heat(w(q)).unwrap().add_heat(w(-q)).unwrap();
            prop_assert!((back.temperature().value - state.temperature().value).abs() < 1e-9);
        }

        #[test]
        fn water_add_heat_round_trip(t in 10.0..30.0f64, m in 5.0..50.0f64, q in -1.0e5..1.0e5f64) {
            let state = FluidState::water(degc(t)).unwrap().with_mass_flow_rate(kgps(m)).unwrap();
            let back = state.add_heat(w(q)).unwrap().add_heat(w(-q)).unwrap();
            prop_assert!((back.temperature().value - state.temperature().value).abs() < 1e-8);
        }
    }
}
