//! Project validation logic.

use crate::schema::{
    BaselineDef, ChillerDef, ChillerModelDef, CurvesDef, CustomChillerDef, LiquidPropertiesDef,
    LossesDef, ProjectDef, QuantityDef, RangeDef,
};
use std::collections::HashSet;

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Value of `quantity` in `si_unit`, which also fixes the expected dimension.
pub fn quantity_si(quantity: &QuantityDef, si_unit: &str, field: &str) -> Result<f64, ValidationError> {
    cm_core::convert(quantity.value, &quantity.unit, si_unit).map_err(|e| ValidationError::InvalidValue {
        field: field.to_string(),
        value: format!("{} {}", quantity.value, quantity.unit),
        reason: e.to_string(),
    })
}

pub fn validate_project(project: &ProjectDef) -> Result<(), ValidationError> {
    if project.version == 0 || project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    let mut chiller_ids = HashSet::new();
    for chiller in &project.chillers {
        if chiller.id.trim().is_empty() {
            return Err(invalid("chiller.id", "", "must not be empty"));
        }
        if !chiller_ids.insert(&chiller.id) {
            return Err(ValidationError::DuplicateId {
                id: chiller.id.clone(),
                context: "chillers".to_string(),
            });
        }
        validate_chiller(chiller)?;
    }
    Ok(())
}

pub fn validate_chiller(chiller: &ChillerDef) -> Result<(), ValidationError> {
    if chiller.data_version == 0 {
        return Err(invalid(
            &format!("{}.data_version", chiller.id),
            0,
            "data versions start at 1",
        ));
    }
    match &chiller.model {
        ChillerModelDef::Custom(custom) => validate_custom(&chiller.id, custom),
        ChillerModelDef::Baseline(baseline) => validate_baseline(&chiller.id, baseline),
    }
}

fn positive(value: f64, field: &str) -> Result<(), ValidationError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(invalid(field, value, "must be positive"));
    }
    Ok(())
}

fn unit_interval(value: f64, field: &str) -> Result<(), ValidationError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(field, value, "must lie in [0, 1]"));
    }
    Ok(())
}

fn validate_losses(id: &str, losses: &LossesDef) -> Result<(), ValidationError> {
    for (value, name) in [
        (losses.oil_cooler, "oil_cooler"),
        (losses.auxiliary, "auxiliary"),
        (losses.space_gain, "space_gain"),
    ] {
        unit_interval(value, &format!("{id}.losses.{name}"))?;
    }
    let sum = losses.oil_cooler + losses.auxiliary + losses.space_gain;
    if sum > 1.0 + cm_models::LossFractions::TOLERANCE {
        return Err(invalid(&format!("{id}.losses"), sum, "fractions sum above 1"));
    }
    Ok(())
}

fn validate_range(range: &RangeDef, field: &str) -> Result<(), ValidationError> {
    let min = quantity_si(&range.minimum, "K", &format!("{field}.minimum"))?;
    let max = quantity_si(&range.maximum, "K", &format!("{field}.maximum"))?;
    if min >= max {
        return Err(invalid(field, format!("{min} K..{max} K"), "minimum must be below maximum"));
    }
    Ok(())
}

fn validate_curves(id: &str, curves: &CurvesDef) -> Result<(), ValidationError> {
    let (part_load_arity, cap_t, eir_t, eir_plr) = match curves {
        CurvesDef::Direct {
            capacity_temperature,
            eir_temperature,
            eir_part_load,
        } => (4, capacity_temperature, eir_temperature, eir_part_load),
        CurvesDef::Reformulated {
            capacity_temperature,
            eir_temperature,
            eir_part_load,
        } => (10, capacity_temperature, eir_temperature, eir_part_load),
    };
    for (coefficients, arity, name) in [
        (cap_t, 6, "capacity_temperature"),
        (eir_t, 6, "eir_temperature"),
        (eir_plr, part_load_arity, "eir_part_load"),
    ] {
        if coefficients.len() != arity {
            return Err(invalid(
                &format!("{id}.curves.{name}"),
                coefficients.len(),
                &format!("expected {arity} coefficients"),
            ));
        }
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(invalid(&format!("{id}.curves.{name}"), "NaN/inf", "coefficients must be finite"));
        }
    }
    Ok(())
}

fn validate_custom(id: &str, custom: &CustomChillerDef) -> Result<(), ValidationError> {
    positive(
        quantity_si(&custom.rated_net_evaporator_capacity, "W", &format!("{id}.rated_net_evaporator_capacity"))?,
        &format!("{id}.rated_net_evaporator_capacity"),
    )?;
    positive(custom.rated_cop, &format!("{id}.rated_cop"))?;
    if let Some(q) = &custom.rated_net_condenser_capacity {
        let field = format!("{id}.rated_net_condenser_capacity");
        positive(quantity_si(q, "W", &field)?, &field)?;
    }
    let plr = custom.minimum_part_load_ratio.unwrap_or(0.25);
    let unloading = custom.minimum_unloading_ratio.unwrap_or(plr);
    for (value, name) in [(plr, "minimum_part_load_ratio"), (unloading, "minimum_unloading_ratio")] {
        positive(value, &format!("{id}.{name}"))?;
        unit_interval(value, &format!("{id}.{name}"))?;
    }
    if unloading < plr {
        return Err(invalid(
            &format!("{id}.minimum_unloading_ratio"),
            unloading,
            "must not be below minimum_part_load_ratio",
        ));
    }
    validate_curves(id, &custom.curves)?;
    validate_losses(id, &custom.losses)?;
    unit_interval(
        custom.cycling_degradation_coefficient,
        &format!("{id}.cycling_degradation_coefficient"),
    )?;
    if let Some(q) = &custom.standby_power {
        quantity_si(q, "W", &format!("{id}.standby_power"))?;
    }
    if let Some(range) = &custom.evaporator_leaving_range {
        validate_range(range, &format!("{id}.evaporator_leaving_range"))?;
    }
    if let Some(range) = &custom.condenser_entering_range {
        validate_range(range, &format!("{id}.condenser_entering_range"))?;
    }
    if let Some(rise) = &custom.condenser_air_temperature_rise {
        let field = format!("{id}.condenser_air_temperature_rise");
        positive(quantity_si(rise, "delta_K", &field)?, &field)?;
    }
    match &custom.liquid_properties {
        LiquidPropertiesDef::CoolProp => {}
        LiquidPropertiesDef::Constant {
            density,
            specific_heat,
        } => {
            let field = format!("{id}.liquid_properties.density");
            positive(quantity_si(density, "kg/m3", &field)?, &field)?;
            let field = format!("{id}.liquid_properties.specific_heat");
            positive(quantity_si(specific_heat, "J/kg/K", &field)?, &field)?;
        }
    }
    Ok(())
}

fn validate_baseline(id: &str, baseline: &BaselineDef) -> Result<(), ValidationError> {
    positive(
        quantity_si(&baseline.rated_net_evaporator_capacity, "W", &format!("{id}.rated_net_evaporator_capacity"))?,
        &format!("{id}.rated_net_evaporator_capacity"),
    )?;
    if let Some(cop) = baseline.rated_cop {
        positive(cop, &format!("{id}.rated_cop"))?;
    }
    validate_losses(id, &baseline.losses)?;
    unit_interval(
        baseline.cycling_degradation_coefficient,
        &format!("{id}.cycling_degradation_coefficient"),
    )?;
    if let Some(q) = &baseline.standby_power {
        quantity_si(q, "W", &format!("{id}.standby_power"))?;
    }
    Ok(())
}
