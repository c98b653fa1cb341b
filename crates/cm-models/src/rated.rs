//! Rated streams.
//!
//! Rated flow rates are derived once per chiller from the rated heat flow
//! and the temperature change across the heat exchanger at the rating point.
//! Each chiller owns its rated states; nothing here is shared or mutated.

use std::sync::Arc;

use crate::error::{ModelError, ModelResult};
use cm_core::units::{Power, Pressure, TempInterval, Temperature, VolumeRate, constants, kgps};
use cm_core::{Tolerances, nearly_equal};
use cm_fluids::{FluidError, FluidState, Humidity, LiquidModel, LiquidType};
use tracing::info;

/// A liquid stream with a rated volumetric flow.
#[derive(Clone, Debug)]
pub struct RatedLiquidStream {
    rated: FluidState,
    volumetric_flow_rate: VolumeRate,
}

impl RatedLiquidStream {
    /// Flow that carries `heat` between `rated_temperature` and
    /// `opposite_temperature`, with the specific heat averaged over the two,
    /// so that adding `heat` to the rated state lands on the opposite one.
    pub fn rate(
        model: Arc<dyn LiquidModel>,
        liquid: LiquidType,
        rated_temperature: Temperature,
        opposite_temperature: Temperature,
        heat: Power,
    ) -> ModelResult<Self> {
        if nearly_equal(
            rated_temperature.value,
            opposite_temperature.value,
            Tolerances::default(),
        ) {
            return Err(ModelError::configuration(
                "rating temperatures must differ to derive a flow rate",
            ));
        }
        let delta_t = (opposite_temperature.value - rated_temperature.value).abs();
        let state = FluidState::liquid(
            model,
            liquid,
            rated_temperature,
            constants::standard_atmosphere(),
        )?;
        let opposite = state.at_temperature(opposite_temperature)?;
        let cp_mean = 0.5 * (state.specific_heat() + opposite.specific_heat());
        let m_dot = heat.value / (cp_mean * delta_t);
        let rated = state.with_mass_flow_rate(kgps(m_dot))?;
        let volumetric_flow_rate = volumetric_flow(&rated)?;
        info!(
            liquid = liquid.name(),
            m_dot,
            v_dot = volumetric_flow_rate.value,
            "derived rated liquid flow"
        );
        Ok(Self {
            rated,
            volumetric_flow_rate,
        })
    }

    pub fn rated_state(&self) -> &FluidState {
        &self.rated
    }

    pub fn volumetric_flow_rate(&self) -> VolumeRate {
        self.volumetric_flow_rate
    }

    pub fn liquid(&self) -> Option<LiquidType> {
        self.rated.liquid_state().map(|s| s.liquid())
    }

    /// Stream at `t` carrying volumetric flow `v_dot`.
    pub fn state_at(&self, t: Temperature, v_dot: VolumeRate) -> ModelResult<FluidState> {
        Ok(self.rated.at_temperature(t)?.with_volumetric_flow_rate(v_dot)?)
    }
}

/// A moist-air stream with a rated volumetric flow at fixed entering
/// relative humidity and ambient pressure.
#[derive(Clone, Debug)]
pub struct RatedAirStream {
    rated: FluidState,
    volumetric_flow_rate: VolumeRate,
    relative_humidity: f64,
    pressure: Pressure,
}

impl RatedAirStream {
    /// Flow that absorbs `heat` with an air temperature rise of `rise`.
    pub fn rate(
        entering: Temperature,
        relative_humidity: f64,
        pressure: Pressure,
        rise: TempInterval,
        heat: Power,
    ) -> ModelResult<Self> {
        if !(rise.value > 0.0 && rise.value.is_finite()) {
            return Err(ModelError::configuration(
                "condenser air temperature rise must be positive",
            ));
        }
        let state = FluidState::moist_air(
            entering,
            pressure,
            Humidity::RelativeHumidity(relative_humidity),
        )?;
        let m_dot = heat.value / (state.specific_heat() * rise.value);
        let rated = state.with_mass_flow_rate(kgps(m_dot))?;
        let volumetric_flow_rate = volumetric_flow(&rated)?;
        info!(m_dot, v_dot = volumetric_flow_rate.value, "derived rated condenser air flow");
        Ok(Self {
            rated,
            volumetric_flow_rate,
            relative_humidity,
            pressure,
        })
    }

    pub fn rated_state(&self) -> &FluidState {
        &self.rated
    }

    pub fn volumetric_flow_rate(&self) -> VolumeRate {
        self.volumetric_flow_rate
    }

    pub fn relative_humidity(&self) -> f64 {
        self.relative_humidity
    }

    pub fn pressure(&self) -> Pressure {
        self.pressure
    }

    pub fn state_at(
        &self,
        dry_bulb: Temperature,
        relative_humidity: f64,
        pressure: Pressure,
    ) -> ModelResult<FluidState> {
        Ok(
            FluidState::moist_air(dry_bulb, pressure, Humidity::RelativeHumidity(relative_humidity))?
                .with_volumetric_flow_rate(self.volumetric_flow_rate)?,
        )
    }
}

fn volumetric_flow(state: &FluidState) -> ModelResult<VolumeRate> {
    state.volumetric_flow_rate().ok_or(ModelError::Fluid(FluidError::FlowNotSet {
        what: "rated volumetric flow rate",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cm_core::units::{constants::TON_REF_W, degc, degf, delta_k, w};
    use cm_fluids::CoolPropModel;

    #[test]
    fn evaporator_flow_carries_rated_capacity() {
        let q = w(100.0 * TON_REF_W);
        let stream = RatedLiquidStream::rate(
            Arc::new(CoolPropModel),
            LiquidType::Water,
            degf(44.0),
            degf(54.0),
            q,
        )
        .unwrap();
        let entering = stream.rated_state().add_heat(q).unwrap();
        assert_relative_eq!(entering.temperature().value, degf(54.0).value, epsilon = 1e-9);
        assert!(stream.volumetric_flow_rate().value > 0.014);
    }

    #[test]
    fn air_flow_carries_rated_heat() {
        let q = w(500_000.0);
        let stream = RatedAirStream::rate(
            degf(95.0),
            0.4,
            constants::standard_atmosphere(),
            delta_k(10.0),
            q,
        )
        .unwrap();
        let leaving = stream.rated_state().add_heat(q).unwrap();
        assert_relative_eq!(
            leaving.temperature().value - degf(95.0).value,
            10.0,
            epsilon = 1e-9
        );
        let at_rating = stream
            .state_at(degf(95.0), 0.4, constants::standard_atmosphere())
            .unwrap();
        assert_relative_eq!(
            at_rating.mass_flow_rate().unwrap().value,
            stream.rated_state().mass_flow_rate().unwrap().value,
            max_relative = 1e-12
        );
    }

    #[test]
    fn equal_rating_temperatures_rejected() {
        // 44 °F spelled two ways differs only by rounding
        let err = RatedLiquidStream::rate(
            Arc::new(CoolPropModel),
            LiquidType::Water,
            degf(44.0),
            degc((44.0 - 32.0) / 1.8),
            w(TON_REF_W),
        )
        .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn zero_air_rise_rejected() {
        let err = RatedAirStream::rate(
            degf(95.0),
            0.4,
            constants::standard_atmosphere(),
            delta_k(0.0),
            w(1.0),
        )
        .unwrap_err();
        assert!(err.is_configuration());
    }
}
