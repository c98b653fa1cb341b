//! Performance maps: grid variables, lookup variables and the generator
//! that samples a chiller over its operating envelope.
//!
//! Lookup sequences are flattened in row-major order over the grid
//! variables, outermost first: evaporator flow, evaporator temperature,
//! condenser axes, compressor sequence number.

use rayon::prelude::*;
use tracing::debug;

use crate::chiller::{ChillerModel, PointPerformance};
use crate::conditions::OperatingConditions;
use crate::error::{ModelError, ModelResult};
use cm_core::units::{Temperature, VolumeRate, degc};
use cm_fluids::LiquidType;

/// Liquid pressure drop reported for every heat-exchanger flow and
/// temperature [Pa].
pub const LIQUID_DIFFERENTIAL_PRESSURE_PA: f64 = 15_000.0;

/// Environment temperature of the standby map [°C].
pub const STANDBY_ENVIRONMENT_TEMPERATURE_C: f64 = 20.0;

pub const OPERATION_STATE_NORMAL: &str = "NORMAL";

pub const COMPRESSOR_SPEED_CONTROL_CONTINUOUS: &str = "CONTINUOUS";

#[derive(Clone, Debug, PartialEq)]
pub enum Values {
    Real(Vec<f64>),
    Integer(Vec<i64>),
    Tag(Vec<String>),
}

impl Values {
    pub fn len(&self) -> usize {
        match self {
            Values::Real(v) => v.len(),
            Values::Integer(v) => v.len(),
            Values::Tag(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_real(&self) -> Option<&[f64]> {
        match self {
            Values::Real(v) => Some(v),
            _ => None,
        }
    }
}

/// A named sequence of values.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    pub name: String,
    pub values: Values,
}

impl Variable {
    pub fn real(name: &str, values: Vec<f64>) -> Self {
        Self {
            name: name.to_string(),
            values: Values::Real(values),
        }
    }

    pub fn integer(name: &str, values: Vec<i64>) -> Self {
        Self {
            name: name.to_string(),
            values: Values::Integer(values),
        }
    }

    pub fn tag(name: &str, values: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            values: Values::Tag(values),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PerformanceMap {
    pub grid_variables: Vec<Variable>,
    pub lookup_variables: Vec<Variable>,
}

impl PerformanceMap {
    /// Number of grid points (product of the grid variable lengths).
    pub fn grid_size(&self) -> usize {
        self.grid_variables.iter().map(|g| g.values.len()).product()
    }

    pub fn grid_variable(&self, name: &str) -> Option<&Values> {
        self.grid_variables
            .iter()
            .find(|g| g.name == name)
            .map(|g| &g.values)
    }

    pub fn lookup_variable(&self, name: &str) -> Option<&Values> {
        self.lookup_variables
            .iter()
            .find(|l| l.name == name)
            .map(|l| &l.values)
    }

    /// Every lookup variable must hold one value per grid point.
    pub fn validate(&self) -> ModelResult<()> {
        let size = self.grid_size();
        for lookup in &self.lookup_variables {
            if lookup.values.len() != size {
                return Err(ModelError::MapShape {
                    what: format!(
                        "lookup '{}' has {} values for {} grid points",
                        lookup.name,
                        lookup.values.len(),
                        size
                    ),
                });
            }
        }
        Ok(())
    }

    fn constant_lookup(grid_variables: Vec<Variable>, name: &str, value: f64) -> Self {
        let size = grid_variables.iter().map(|g| g.values.len()).product();
        Self {
            grid_variables,
            lookup_variables: vec![Variable::real(name, vec![value; size])],
        }
    }
}

/// Sampling density of the generated maps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapResolution {
    /// Samples across each temperature range (bounds included)
    pub temperature_samples: usize,
}

impl Default for MapResolution {
    fn default() -> Self {
        Self {
            temperature_samples: 4,
        }
    }
}

/// The performance section of a chiller representation.
#[derive(Clone, Debug)]
pub struct Performance {
    pub evaporator_liquid: LiquidType,
    pub condenser_liquid: Option<LiquidType>,
    pub evaporator_fouling_factor: f64,
    pub condenser_fouling_factor: f64,
    pub compressor_speed_control_type: &'static str,
    /// Largest input power over the cooling map [W]
    pub maximum_power: f64,
    pub cycling_degradation_coefficient: f64,
    pub performance_map_cooling: PerformanceMap,
    pub performance_map_standby: PerformanceMap,
    pub performance_map_evaporator_liquid_pressure_differential: PerformanceMap,
    pub performance_map_condenser_liquid_pressure_differential: Option<PerformanceMap>,
}

/// Condenser-side grid axes and the entering states they enumerate, in
/// traversal order.
#[derive(Clone, Debug)]
pub struct CondenserGrid {
    pub variables: Vec<Variable>,
    pub inlets: Vec<cm_fluids::FluidState>,
}

/// Flow × temperature sub-map of constant liquid differential pressure.
pub fn differential_pressure_map(
    side: &str,
    temperature_name: &str,
    flow: VolumeRate,
    temperatures: &[Temperature],
) -> PerformanceMap {
    PerformanceMap::constant_lookup(
        vec![
            Variable::real(
                &format!("{side}_liquid_volumetric_flow_rate"),
                vec![flow.value],
            ),
            Variable::real(
                temperature_name,
                temperatures.iter().map(|t| t.value).collect(),
            ),
        ],
        &format!("{side}_liquid_differential_pressure"),
        LIQUID_DIFFERENTIAL_PRESSURE_PA,
    )
}

/// Standby power at a single environment temperature.
pub fn standby_map(standby_power: f64) -> PerformanceMap {
    PerformanceMap::constant_lookup(
        vec![Variable::real(
            "environment_dry_bulb_temperature",
            vec![degc(STANDBY_ENVIRONMENT_TEMPERATURE_C).value],
        )],
        "input_power",
        standby_power,
    )
}

/// Sample `chiller` over its rated flows and temperature ranges.
///
/// Grid points are evaluated in parallel; any point that fails fails the
/// whole map.
pub fn generate_performance(
    chiller: &dyn ChillerModel,
    resolution: &MapResolution,
) -> ModelResult<Performance> {
    let design = chiller.design();
    let staging = design.staging();
    let samples = resolution.temperature_samples;

    let evaporator = chiller.evaporator();
    let evaporator_flows = [evaporator.volumetric_flow_rate()];
    let evaporator_temperatures = design.evaporator_leaving_range().samples(samples)?;
    let condenser_temperatures = design.condenser_entering_range().samples(samples)?;
    let condenser = chiller.condenser();
    let condenser_grid = condenser.grid(&condenser_temperatures)?;
    let sequence: Vec<(usize, usize)> = staging.sequence().collect();

    let mut grid_variables = vec![
        Variable::real(
            "evaporator_liquid_volumetric_flow_rate",
            evaporator_flows.iter().map(|v| v.value).collect(),
        ),
        Variable::real(
            "evaporator_liquid_leaving_temperature",
            evaporator_temperatures.iter().map(|t| t.value).collect(),
        ),
    ];
    grid_variables.extend(condenser_grid.variables);
    grid_variables.push(Variable::integer(
        "compressor_sequence_number",
        sequence.iter().map(|&(n, _)| n as i64).collect(),
    ));

    let mut points = Vec::new();
    for &v_evap in &evaporator_flows {
        for &t_evap in &evaporator_temperatures {
            let outlet = evaporator.state_at(t_evap, v_evap)?;
            for inlet in &condenser_grid.inlets {
                for &(_, speed) in &sequence {
                    points.push(OperatingConditions::new(inlet.clone(), outlet.clone(), speed));
                }
            }
        }
    }

    let results: Vec<(PointPerformance, Vec<f64>)> = points
        .par_iter()
        .map(|conditions| {
            let point = chiller.evaluate(conditions)?;
            let extra = condenser.lookup_values(conditions, &point)?;
            Ok((point, extra))
        })
        .collect::<ModelResult<Vec<_>>>()?;

    let column = |f: fn(&PointPerformance) -> f64| -> Vec<f64> {
        results.iter().map(|(p, _)| f(p)).collect()
    };
    let input_power = column(|p| p.input_power.value);

    let mut lookup_variables = vec![
        Variable::real("input_power", input_power.clone()),
        Variable::real(
            "net_evaporator_capacity",
            column(|p| p.net_evaporator_capacity.value),
        ),
    ];
    for (i, name) in condenser.lookup_names().iter().enumerate() {
        lookup_variables.push(Variable::real(
            name,
            results.iter().map(|(_, extra)| extra[i]).collect(),
        ));
    }
    lookup_variables.push(Variable::real("oil_cooler_heat", column(|p| p.oil_cooler_heat.value)));
    lookup_variables.push(Variable::real("auxiliary_heat", column(|p| p.auxiliary_heat.value)));
    lookup_variables.push(Variable::tag(
        "operation_state",
        vec![OPERATION_STATE_NORMAL.to_string(); results.len()],
    ));

    let cooling = PerformanceMap {
        grid_variables,
        lookup_variables,
    };
    cooling.validate()?;

    let maximum_power = input_power.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    debug!(
        points = results.len(),
        maximum_power, "generated cooling performance map"
    );

    Ok(Performance {
        evaporator_liquid: evaporator.liquid().unwrap_or_default(),
        condenser_liquid: condenser.liquid(),
        evaporator_fouling_factor: 0.0,
        condenser_fouling_factor: 0.0,
        compressor_speed_control_type: COMPRESSOR_SPEED_CONTROL_CONTINUOUS,
        maximum_power,
        cycling_degradation_coefficient: design.cycling_degradation_coefficient(),
        performance_map_cooling: cooling,
        performance_map_standby: standby_map(design.standby_power().value),
        performance_map_evaporator_liquid_pressure_differential: differential_pressure_map(
            "evaporator",
            "evaporator_liquid_leaving_temperature",
            evaporator.volumetric_flow_rate(),
            &evaporator_temperatures,
        ),
        performance_map_condenser_liquid_pressure_differential: condenser
            .differential_pressure_map(&condenser_temperatures),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_size_and_validation() {
        let mut map = PerformanceMap {
            grid_variables: vec![
                Variable::real("a", vec![1.0, 2.0]),
                Variable::integer("b", vec![1, 2, 3]),
            ],
            lookup_variables: vec![Variable::real("y", vec![0.0; 6])],
        };
        assert_eq!(map.grid_size(), 6);
        assert!(map.validate().is_ok());

        map.lookup_variables
            .push(Variable::tag("state", vec!["NORMAL".to_string(); 5]));
        assert!(matches!(map.validate(), Err(ModelError::MapShape { .. })));
    }

    #[test]
    fn standby_map_shape() {
        let map = standby_map(500.0);
        assert_eq!(map.grid_size(), 1);
        assert_eq!(
            map.lookup_variable("input_power"),
            Some(&Values::Real(vec![500.0]))
        );
        let t = map
            .grid_variable("environment_dry_bulb_temperature")
            .and_then(Values::as_real)
            .unwrap();
        assert!((t[0] - 293.15).abs() < 1e-9);
    }

    #[test]
    fn differential_pressure_is_constant() {
        let temps = [degc(5.0), degc(10.0), degc(15.0)];
        let map = differential_pressure_map(
            "evaporator",
            "evaporator_liquid_leaving_temperature",
            cm_core::units::m3ps(0.015),
            &temps,
        );
        assert!(map.validate().is_ok());
        let dp = map
            .lookup_variable("evaporator_liquid_differential_pressure")
            .and_then(Values::as_real)
            .unwrap();
        assert_eq!(dp, &[15_000.0; 3]);
    }
}
