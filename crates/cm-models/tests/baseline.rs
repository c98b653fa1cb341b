//! Baseline chillers from the ASHRAE 90.1 curve-set catalog.

use cm_core::units::{constants::TON_REF_W, w};
use cm_models::catalog::{CURVE_SETS, curve_set};
use cm_models::{
    BaselineRequest, ChillerModel, CompliancePath, CompressorType, CondenserType, LossFractions,
    MapResolution, ModelError, baseline_chiller, find_curve_set, generate_performance,
};

#[test]
fn every_curve_set_reproduces_its_rating() {
    for set in &CURVE_SETS {
        let request = BaselineRequest::for_curve_set(set);
        let baseline = baseline_chiller(&request).unwrap();
        assert_eq!(baseline.curve_set.name, set.name);

        let chiller = &baseline.model;
        let rated = chiller.rated_conditions();
        let size = request.rated_net_evaporator_capacity.value;
        let cop = chiller.cop(&rated).unwrap();
        let capacity = chiller.net_evaporator_capacity(&rated).unwrap().value;
        assert!((cop - set.cop).abs() < 0.05, "set {}: cop {cop}", set.name);
        assert!(
            (capacity - size).abs() < 0.01 * size,
            "set {}: capacity {capacity}",
            set.name
        );
    }
}

#[test]
fn open_ended_bracket_sized_above_minimum() {
    let b = curve_set("B").unwrap();
    assert_eq!(
        b.representative_capacity().value,
        b.minimum_capacity + 50.0 * TON_REF_W
    );
    let a = curve_set("A").unwrap();
    assert_eq!(a.representative_capacity().value, 0.5 * a.maximum_capacity);
}

#[test]
fn centrifugal_selects_centrifugal_sets() {
    let set = find_curve_set(
        CompliancePath::EcbB,
        CondenserType::Liquid,
        CompressorType::Centrifugal,
        w(1_200_000.0),
    )
    .unwrap();
    assert_eq!(set.name, "T");
}

#[test]
fn unmatched_baseline_is_configuration_error() {
    let request = BaselineRequest::new(
        CompliancePath::EcbA,
        CondenserType::Liquid,
        CompressorType::Centrifugal,
        w(0.0),
        6.0,
    );
    let err = baseline_chiller(&request).unwrap_err();
    assert!(matches!(err, ModelError::CurveSetMatch { .. }));
}

#[test]
fn detailed_baseline_carries_losses() {
    let plain_request = BaselineRequest::new(
        CompliancePath::Prm,
        CondenserType::Liquid,
        CompressorType::PositiveDisplacement,
        w(999_070.745),
        5.33,
    );
    let mut request = plain_request.clone();
    request.cycling_degradation_coefficient = 0.25;
    request.standby_power = w(500.0);
    request.losses = LossFractions {
        oil_cooler: 0.01,
        auxiliary: 0.01,
        space_gain: 0.02,
    };
    let plain = baseline_chiller(&plain_request).unwrap();
    let detailed = baseline_chiller(&request).unwrap();
    assert_ne!(plain.metadata.uuid_seed, detailed.metadata.uuid_seed);

    let rated = detailed.model.rated_conditions();
    let point = detailed.model.evaluate(&rated).unwrap();
    assert!(point.oil_cooler_heat.value > 0.0);
    assert!(point.space_loss_heat().value > 0.0);

    let performance = generate_performance(detailed.model.as_ref(), &MapResolution::default()).unwrap();
    assert_eq!(performance.cycling_degradation_coefficient, 0.25);
}
