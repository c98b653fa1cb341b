//! Rated-condition behavior of built chillers.

use approx::assert_relative_eq;
use cm_core::units::{constants::TON_REF_W, degf, w};
use cm_models::catalog::curve_set;
use cm_models::{
    ChillerBuilder, ChillerModel, CondenserType, LossFractions, ModelError,
};

fn hundred_ton() -> ChillerBuilder {
    ChillerBuilder::new()
        .rated_net_evaporator_capacity(w(100.0 * TON_REF_W))
        .rated_cop(2.0)
        .minimum_part_load_ratio(0.25)
        .minimum_unloading_ratio(0.25)
}

#[test]
fn unity_curves_reproduce_rating() {
    let chiller = hundred_ton().build().unwrap();
    assert_eq!(chiller.design().staging().stages(), 4);

    let rated = chiller.rated_conditions();
    assert_relative_eq!(chiller.cop(&rated).unwrap(), 2.0, max_relative = 1e-12);
    assert_relative_eq!(
        chiller.net_evaporator_capacity(&rated).unwrap().value,
        100.0 * TON_REF_W,
        max_relative = 1e-12
    );

    let entering = chiller.evaporator_entering_state(&rated).unwrap();
    assert_relative_eq!(entering.temperature().value, degf(54.0).value, epsilon = 1e-9);
    let leaving = chiller.condenser_leaving_state(&rated).unwrap();
    assert_relative_eq!(leaving.temperature().value, degf(94.3).value, epsilon = 1e-9);
}

#[test]
fn catalog_curves_reproduce_rating() {
    let set = curve_set("D").unwrap();
    let chiller = hundred_ton()
        .curves(set.curves())
        .rated_cop(set.cop)
        .build()
        .unwrap();
    let rated = chiller.rated_conditions();
    let capacity = chiller.net_evaporator_capacity(&rated).unwrap().value;
    assert!((capacity - 100.0 * TON_REF_W).abs() < 0.01 * 100.0 * TON_REF_W);
    let cop = chiller.cop(&rated).unwrap();
    assert!((cop - set.cop).abs() < 0.05 * set.cop, "cop {cop}");
}

#[test]
fn loss_fraction_limit_at_construction() {
    let over = hundred_ton()
        .losses(LossFractions {
            oil_cooler: 0.5,
            auxiliary: 0.3,
            space_gain: 0.2001,
        })
        .build();
    assert!(matches!(over.err(), Some(ModelError::LossFractions { .. })));

    let under = hundred_ton()
        .losses(LossFractions {
            oil_cooler: 0.5,
            auxiliary: 0.3,
            space_gain: 0.199,
        })
        .build();
    assert!(under.is_ok());
}

#[test]
fn condenser_heat_closes_energy_balance() {
    let losses = LossFractions {
        oil_cooler: 0.02,
        auxiliary: 0.01,
        space_gain: 0.03,
    };
    let chiller = hundred_ton()
        .curves(curve_set("E").unwrap().curves())
        .losses(losses)
        .build()
        .unwrap();
    let rated = chiller.rated_conditions();
    for speed in 0..chiller.design().staging().stages() {
        let conditions = rated.at_speed(speed);
        let point = chiller.evaluate(&conditions).unwrap();
        let gross = point.input_power.value + point.net_evaporator_capacity.value;
        assert_relative_eq!(
            point.net_condenser_capacity.value,
            gross * (1.0 - losses.sum()),
            max_relative = 1e-12
        );
        assert_relative_eq!(point.oil_cooler_heat.value, gross * 0.02, max_relative = 1e-12);
        assert_relative_eq!(
            point.space_loss_heat().value,
            gross * 0.03,
            max_relative = 1e-9
        );
    }
}

#[test]
fn staged_capacity_decreases_with_speed_index() {
    let chiller = hundred_ton().build().unwrap();
    let rated = chiller.rated_conditions();
    let capacities: Vec<f64> = (0..4)
        .map(|speed| {
            chiller
                .net_evaporator_capacity(&rated.at_speed(speed))
                .unwrap()
                .value
        })
        .collect();
    assert!(capacities.windows(2).all(|pair| pair[0] > pair[1]));
    assert_relative_eq!(capacities[3], 0.25 * 100.0 * TON_REF_W, max_relative = 1e-12);
    assert!(matches!(
        chiller.evaluate(&rated.at_speed(4)),
        Err(ModelError::InvalidSpeed { .. })
    ));
}

#[test]
fn liquid_cooled_has_no_condenser_air_flow() {
    let chiller = hundred_ton().build().unwrap();
    let rated = chiller.rated_conditions();
    assert!(matches!(
        chiller.condenser_air_volumetric_flow_rate(&rated),
        Err(ModelError::NotSupported { .. })
    ));
    assert!(chiller.evaporation_rate(&rated).is_err());
}

#[test]
fn air_cooled_reports_rated_air_flow() {
    let chiller = hundred_ton()
        .condenser_type(CondenserType::Air)
        .curves(curve_set("A").unwrap().curves())
        .build()
        .unwrap();
    let rated = chiller.rated_conditions();
    let air = chiller.condenser_air_volumetric_flow_rate(&rated).unwrap();
    assert!(air.value > 0.0);
    assert_eq!(chiller.evaporation_rate(&rated).unwrap().value, 0.0);

    let rise = chiller.condenser_leaving_state(&rated).unwrap().temperature().value
        - rated.condenser_inlet.temperature().value;
    assert!((rise - 10.0).abs() < 0.5, "air temperature rise {rise}");
}
