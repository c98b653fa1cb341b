//! Chiller design parameters shared by every formulation.

use crate::error::{ModelError, ModelResult};
use crate::staging::StagingPolicy;
use cm_core::linspace;
use cm_core::units::{Power, Temperature, degf, k};

/// Fractions of the gross heat rejection `(power + capacity)` that do not
/// reach the condenser stream.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LossFractions {
    pub oil_cooler: f64,
    pub auxiliary: f64,
    pub space_gain: f64,
}

impl LossFractions {
    /// Allowed overshoot of the sum above 1.0 (rounding in user input).
    pub const TOLERANCE: f64 = 1e-6;

    pub fn sum(&self) -> f64 {
        self.oil_cooler + self.auxiliary + self.space_gain
    }

    pub fn validate(&self) -> ModelResult<()> {
        for (value, what) in [
            (self.oil_cooler, "oil cooler fraction"),
            (self.auxiliary, "auxiliary fraction"),
            (self.space_gain, "space gain fraction"),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ModelError::configuration(format!(
                    "{what} must be non-negative and finite, got {value}"
                )));
            }
        }
        let sum = self.sum();
        if sum > 1.0 + Self::TOLERANCE {
            return Err(ModelError::LossFractions { sum });
        }
        Ok(())
    }
}

/// Inclusive temperature span sampled by the performance map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TemperatureRange {
    minimum: Temperature,
    maximum: Temperature,
}

impl TemperatureRange {
    pub fn new(minimum: Temperature, maximum: Temperature) -> ModelResult<Self> {
        if !minimum.value.is_finite() || !maximum.value.is_finite() || minimum.value <= 0.0 {
            return Err(ModelError::configuration(
                "temperature range bounds must be positive and finite",
            ));
        }
        if minimum.value >= maximum.value {
            return Err(ModelError::configuration(format!(
                "temperature range minimum ({} K) must be below maximum ({} K)",
                minimum.value, maximum.value
            )));
        }
        Ok(Self { minimum, maximum })
    }

    pub fn fahrenheit(minimum: f64, maximum: f64) -> ModelResult<Self> {
        Self::new(degf(minimum), degf(maximum))
    }

    pub fn minimum(&self) -> Temperature {
        self.minimum
    }

    pub fn maximum(&self) -> Temperature {
        self.maximum
    }

    /// `n` evenly spaced temperatures, both bounds included.
    pub fn samples(&self, n: usize) -> ModelResult<Vec<Temperature>> {
        let values = linspace(self.minimum.value, self.maximum.value, n)
            .map_err(|e| ModelError::configuration(e.to_string()))?;
        Ok(values.into_iter().map(k).collect())
    }
}

/// Rated performance, staging and operating envelope of one chiller.
#[derive(Clone, Debug)]
pub struct ChillerDesign {
    pub(crate) rated_net_evaporator_capacity: Power,
    pub(crate) rated_cop: f64,
    pub(crate) rated_net_condenser_capacity: Power,
    pub(crate) staging: StagingPolicy,
    pub(crate) losses: LossFractions,
    pub(crate) evaporator_leaving_range: TemperatureRange,
    pub(crate) condenser_entering_range: TemperatureRange,
    pub(crate) cycling_degradation_coefficient: f64,
    pub(crate) standby_power: Power,
}

impl ChillerDesign {
    pub fn rated_net_evaporator_capacity(&self) -> Power {
        self.rated_net_evaporator_capacity
    }

    pub fn rated_cop(&self) -> f64 {
        self.rated_cop
    }

    pub fn rated_net_condenser_capacity(&self) -> Power {
        self.rated_net_condenser_capacity
    }

    pub fn staging(&self) -> &StagingPolicy {
        &self.staging
    }

    pub fn losses(&self) -> &LossFractions {
        &self.losses
    }

    pub fn evaporator_leaving_range(&self) -> &TemperatureRange {
        &self.evaporator_leaving_range
    }

    pub fn condenser_entering_range(&self) -> &TemperatureRange {
        &self.condenser_entering_range
    }

    pub fn cycling_degradation_coefficient(&self) -> f64 {
        self.cycling_degradation_coefficient
    }

    pub fn standby_power(&self) -> Power {
        self.standby_power
    }
}
