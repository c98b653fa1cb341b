//! Reformulated EIR: condenser energy balance solved per operating point.

use approx::assert_relative_eq;
use cm_core::units::{constants::TON_REF_W, degc, k, w};
use cm_models::{
    Bicubic, Biquad, ChillerBuilder, ChillerModel, CondenserType, EirCurves, MapResolution,
    OperatingConditions, ReformulatedEir, Values, generate_performance,
};

const CAPACITY_TEMPERATURE: [f64; 6] = [
    0.9061150, 0.0292277, -0.0003647, -0.0009709, -0.0000905, 0.0002527,
];
const EIR_TEMPERATURE: [f64; 6] = [
    0.3617105, -0.0229833, -0.0009519, 0.0131889, 0.0003752, -0.0007059,
];
const EIR_PART_LOAD: [f64; 10] = [
    4.602131e-02,
    2.433945e-02,
    6.394526e-05,
    -3.648563e-01,
    1.854759e00,
    -2.809346e-02,
    0.0,
    -4.821515e-01,
    0.0,
    0.0,
];

fn formulation() -> ReformulatedEir {
    ReformulatedEir::new(
        Biquad(CAPACITY_TEMPERATURE),
        Biquad(EIR_TEMPERATURE),
        Bicubic(EIR_PART_LOAD),
    )
}

fn forty_ton() -> Box<dyn ChillerModel> {
    forty_ton_builder().build().unwrap()
}

fn forty_ton_builder() -> ChillerBuilder {
    ChillerBuilder::new()
        .rated_net_evaporator_capacity(w(40.0 * TON_REF_W))
        .rated_cop(5.5)
        .minimum_part_load_ratio(0.1)
        .minimum_unloading_ratio(0.2)
        .curves(EirCurves::Reformulated {
            capacity_temperature: Biquad(CAPACITY_TEMPERATURE),
            eir_temperature: Biquad(EIR_TEMPERATURE),
            eir_part_load: Bicubic(EIR_PART_LOAD),
        })
}

#[test]
fn rated_capacity_within_one_percent() {
    let chiller = forty_ton();
    assert_eq!(chiller.formulation_name(), "reformulated EIR");
    assert_eq!(chiller.design().staging().stages(), 5);
    let rated = chiller.rated_conditions();
    let point = chiller.evaluate(&rated).unwrap();
    let rated_capacity = 40.0 * TON_REF_W;
    assert!((point.net_evaporator_capacity.value - rated_capacity).abs() < 0.01 * rated_capacity);
    let leaving = point.condenser_leaving_temperature.unwrap();
    assert!(leaving.value > rated.condenser_inlet.temperature().value);
}

#[test]
fn residual_vanishes_at_solution() {
    let chiller = forty_ton();
    let f = formulation();
    for speed in 0..chiller.design().staging().stages() {
        let conditions = chiller.rated_conditions().at_speed(speed);
        let guess = f.initial_guess(chiller.design(), &conditions).unwrap();
        let root = f.solve_from(chiller.design(), &conditions, guess).unwrap();
        let residual = f.residual(chiller.design(), &conditions, k(root.x)).unwrap();
        assert!(residual.value.abs() < 1.0, "speed {speed}: residual {}", residual.value);
    }
}

#[test]
fn perturbed_guesses_reach_same_root() {
    let chiller = forty_ton();
    let f = formulation();
    let conditions = chiller.rated_conditions();
    let guess = f.initial_guess(chiller.design(), &conditions).unwrap();
    let reference = f.solve_from(chiller.design(), &conditions, guess).unwrap();
    for offset in [-5.0, 5.0] {
        let root = f
            .solve_from(chiller.design(), &conditions, k(guess.value + offset))
            .unwrap();
        assert_relative_eq!(root.x, reference.x, epsilon = 1e-4);
    }
}

#[test]
fn bypass_stage_runs_at_minimum_part_load() {
    let chiller = forty_ton();
    let rated = chiller.rated_conditions();
    let unloaded = chiller.evaluate(&rated.at_speed(3)).unwrap();
    let bypass = chiller.evaluate(&rated.at_speed(4)).unwrap();
    assert!(bypass.net_evaporator_capacity.value < unloaded.net_evaporator_capacity.value);
    // false loading: less capacity for barely less power
    assert!(bypass.cop() < unloaded.cop());
}

/// Solved leaving temperature against the stream heated by the net
/// condenser capacity at that solution.
fn leaving_temperature_gap(chiller: &dyn ChillerModel, conditions: &OperatingConditions) -> f64 {
    let point = chiller.evaluate(conditions).unwrap();
    let solved = point.condenser_leaving_temperature.unwrap().value;
    let heated = chiller.condenser_leaving_state(conditions).unwrap().temperature().value;
    (solved - heated).abs()
}

#[test]
fn solved_leaving_temperature_matches_heated_stream() {
    let chiller = forty_ton();
    let rated = chiller.rated_conditions();
    let cool_inlet = OperatingConditions::new(
        rated.condenser_inlet.at_temperature(degc(12.8)).unwrap(),
        rated.evaporator_outlet.clone(),
        0,
    );
    for conditions in [rated, cool_inlet] {
        for speed in 0..chiller.design().staging().stages() {
            let conditions = conditions.at_speed(speed);
            let gap = leaving_temperature_gap(chiller.as_ref(), &conditions);
            assert!(gap < 1e-3, "speed {speed}: gap {gap} K");
        }
    }
}

#[test]
fn residual_vanishes_across_performance_map() {
    let chiller = forty_ton();
    let f = formulation();
    let design = chiller.design();
    let resolution = MapResolution::default();
    let performance = generate_performance(chiller.as_ref(), &resolution).unwrap();
    let capacities = performance
        .performance_map_cooling
        .lookup_variable("net_evaporator_capacity")
        .and_then(Values::as_real)
        .unwrap();

    let evaporator = chiller.evaporator();
    let evaporator_temperatures = design
        .evaporator_leaving_range()
        .samples(resolution.temperature_samples)
        .unwrap();
    let condenser_temperatures = design
        .condenser_entering_range()
        .samples(resolution.temperature_samples)
        .unwrap();
    let inlets = chiller.condenser().grid(&condenser_temperatures).unwrap().inlets;
    let sequence: Vec<(usize, usize)> = design.staging().sequence().collect();
    assert_eq!(
        capacities.len(),
        evaporator_temperatures.len() * inlets.len() * sequence.len()
    );

    let mut index = 0;
    for &t_evap in &evaporator_temperatures {
        let outlet = evaporator
            .state_at(t_evap, evaporator.volumetric_flow_rate())
            .unwrap();
        for inlet in &inlets {
            for &(_, speed) in &sequence {
                let conditions = OperatingConditions::new(inlet.clone(), outlet.clone(), speed);
                let guess = f.initial_guess(design, &conditions).unwrap();
                let root = f.solve_from(design, &conditions, guess).unwrap();
                let residual = f.residual(design, &conditions, k(root.x)).unwrap();
                assert!(
                    residual.value.abs() < 1.0,
                    "point {index}: residual {} W",
                    residual.value
                );
                let point = chiller.evaluate(&conditions).unwrap();
                assert_relative_eq!(
                    point.net_evaporator_capacity.value,
                    capacities[index],
                    max_relative = 1e-9
                );
                index += 1;
            }
        }
    }
}

#[test]
fn air_cooled_reformulated_chiller_solves() {
    let chiller = forty_ton_builder()
        .condenser_type(CondenserType::Air)
        .build()
        .unwrap();
    assert_eq!(chiller.formulation_name(), "reformulated EIR");
    let f = formulation();
    let rated = chiller.rated_conditions();
    let rated_capacity = 40.0 * TON_REF_W;
    for speed in 0..chiller.design().staging().stages() {
        let conditions = rated.at_speed(speed);
        let guess = f.initial_guess(chiller.design(), &conditions).unwrap();
        let root = f.solve_from(chiller.design(), &conditions, guess).unwrap();
        let residual = f.residual(chiller.design(), &conditions, k(root.x)).unwrap();
        assert!(residual.value.abs() < 1.0, "speed {speed}: residual {}", residual.value);
        assert!(root.x > conditions.condenser_inlet.temperature().value);
        let gap = leaving_temperature_gap(chiller.as_ref(), &conditions);
        assert!(gap < 1e-3, "speed {speed}: gap {gap} K");
    }
    let full = chiller.evaluate(&rated).unwrap();
    let ratio = full.net_evaporator_capacity.value / rated_capacity;
    assert!((0.8..1.1).contains(&ratio), "capacity ratio {ratio}");
}
