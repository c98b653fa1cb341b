//! Turn chiller definitions into evaluable models.

use crate::ProjectResult;
use crate::schema::{
    BaselineDef, ChillerDef, ChillerModelDef, CompliancePathDef, CompressorTypeDef,
    CondenserTypeDef, CurvesDef, CustomChillerDef, LiquidPropertiesDef, LossesDef, RangeDef,
};
use crate::validate::{quantity_si, validate_chiller};
use cm_core::units::{delta_k, k, kgpm3, w};
use cm_fluids::{IncompressibleLiquid, LiquidModel};
use cm_models::{
    BaselineRequest, ChillerBuilder, ChillerModel, CompliancePath, CompressorType, CondenserType,
    EirCurves, LossFractions, ModelError, TemperatureRange, baseline_chiller, find_curve_set,
};
use std::sync::Arc;
use tracing::debug;

/// A chiller ready to be rated or represented, with its document texts.
pub struct ResolvedChiller {
    pub id: String,
    pub name: String,
    pub model: Box<dyn ChillerModel>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub data_version: u32,
    /// Text hashed into the document id.
    pub uuid_seed: String,
    pub compressor_type: Option<&'static str>,
}

impl std::fmt::Debug for ResolvedChiller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedChiller")
            .field("id", &self.id)
            .field("formulation", &self.model.formulation_name())
            .field("data_version", &self.data_version)
            .finish()
    }
}

impl From<CondenserTypeDef> for CondenserType {
    fn from(def: CondenserTypeDef) -> Self {
        match def {
            CondenserTypeDef::LiquidCooled => CondenserType::Liquid,
            CondenserTypeDef::AirCooled => CondenserType::Air,
        }
    }
}

impl From<CompliancePathDef> for CompliancePath {
    fn from(def: CompliancePathDef) -> Self {
        match def {
            CompliancePathDef::EcbA => CompliancePath::EcbA,
            CompliancePathDef::EcbB => CompliancePath::EcbB,
            CompliancePathDef::Prm => CompliancePath::Prm,
        }
    }
}

impl From<CompressorTypeDef> for CompressorType {
    fn from(def: CompressorTypeDef) -> Self {
        match def {
            CompressorTypeDef::Unknown => CompressorType::Unknown,
            CompressorTypeDef::Centrifugal => CompressorType::Centrifugal,
            CompressorTypeDef::PositiveDisplacement => CompressorType::PositiveDisplacement,
            CompressorTypeDef::Screw => CompressorType::Screw,
            CompressorTypeDef::Scroll => CompressorType::Scroll,
        }
    }
}

impl From<LossesDef> for LossFractions {
    fn from(def: LossesDef) -> Self {
        LossFractions {
            oil_cooler: def.oil_cooler,
            auxiliary: def.auxiliary,
            space_gain: def.space_gain,
        }
    }
}

pub fn resolve_chiller(chiller: &ChillerDef) -> ProjectResult<ResolvedChiller> {
    validate_chiller(chiller)?;
    debug!(id = %chiller.id, "resolving chiller");
    match &chiller.model {
        ChillerModelDef::Custom(custom) => {
            let model = build_custom(&chiller.id, custom)?;
            Ok(ResolvedChiller {
                id: chiller.id.clone(),
                name: chiller.name.clone(),
                model,
                description: chiller.description.clone(),
                notes: chiller.notes.clone(),
                data_version: chiller.data_version,
                uuid_seed: format!("('{}', {})", chiller.id, chiller.data_version),
                compressor_type: None,
            })
        }
        ChillerModelDef::Baseline(baseline) => {
            let request = baseline_request(&chiller.id, baseline)?;
            let built = baseline_chiller(&request)?;
            Ok(ResolvedChiller {
                id: chiller.id.clone(),
                name: chiller.name.clone(),
                model: built.model,
                description: chiller
                    .description
                    .clone()
                    .or(Some(built.metadata.description)),
                notes: chiller.notes.clone().or(Some(built.metadata.notes)),
                data_version: chiller.data_version,
                uuid_seed: built.metadata.uuid_seed,
                compressor_type: built.metadata.compressor_type,
            })
        }
    }
}

fn range(id: &str, def: &RangeDef, field: &str) -> ProjectResult<TemperatureRange> {
    let field = format!("{id}.{field}");
    let minimum = quantity_si(&def.minimum, "K", &field)?;
    let maximum = quantity_si(&def.maximum, "K", &field)?;
    Ok(TemperatureRange::new(k(minimum), k(maximum))?)
}

fn curves(def: &CurvesDef) -> Result<EirCurves, ModelError> {
    Ok(match def {
        CurvesDef::Direct {
            capacity_temperature,
            eir_temperature,
            eir_part_load,
        } => EirCurves::Direct {
            capacity_temperature: capacity_temperature.as_slice().try_into()?,
            eir_temperature: eir_temperature.as_slice().try_into()?,
            eir_part_load: eir_part_load.as_slice().try_into()?,
        },
        CurvesDef::Reformulated {
            capacity_temperature,
            eir_temperature,
            eir_part_load,
        } => EirCurves::Reformulated {
            capacity_temperature: capacity_temperature.as_slice().try_into()?,
            eir_temperature: eir_temperature.as_slice().try_into()?,
            eir_part_load: eir_part_load.as_slice().try_into()?,
        },
    })
}

fn liquid_model(def: &LiquidPropertiesDef, id: &str) -> ProjectResult<Option<Arc<dyn LiquidModel>>> {
    match def {
        LiquidPropertiesDef::CoolProp => Ok(None),
        LiquidPropertiesDef::Constant {
            density,
            specific_heat,
        } => {
            let rho = quantity_si(density, "kg/m3", &format!("{id}.liquid_properties.density"))?;
            let cp = quantity_si(
                specific_heat,
                "J/kg/K",
                &format!("{id}.liquid_properties.specific_heat"),
            )?;
            let model: Arc<dyn LiquidModel> =
                Arc::new(IncompressibleLiquid::new(kgpm3(rho), cp).map_err(ModelError::from)?);
            Ok(Some(model))
        }
    }
}

fn build_custom(id: &str, def: &CustomChillerDef) -> ProjectResult<Box<dyn ChillerModel>> {
    let capacity = quantity_si(
        &def.rated_net_evaporator_capacity,
        "W",
        &format!("{id}.rated_net_evaporator_capacity"),
    )?;
    let mut builder = ChillerBuilder::new()
        .rated_net_evaporator_capacity(w(capacity))
        .rated_cop(def.rated_cop)
        .condenser_type(def.condenser_type.into())
        .curves(curves(&def.curves)?)
        .losses(def.losses.into())
        .cycling_degradation_coefficient(def.cycling_degradation_coefficient);

    if let Some(q) = &def.rated_net_condenser_capacity {
        let value = quantity_si(q, "W", &format!("{id}.rated_net_condenser_capacity"))?;
        builder = builder.rated_net_condenser_capacity(w(value));
    }
    if let Some(ratio) = def.minimum_part_load_ratio {
        builder = builder.minimum_part_load_ratio(ratio);
    }
    // An unset unloading floor follows the part-load floor.
    if let Some(ratio) = def.minimum_unloading_ratio.or(def.minimum_part_load_ratio) {
        builder = builder.minimum_unloading_ratio(ratio);
    }
    if let Some(stages) = def.stages {
        builder = builder.stages(stages);
    }
    if let Some(q) = &def.standby_power {
        builder = builder.standby_power(w(quantity_si(q, "W", &format!("{id}.standby_power"))?));
    }
    if let Some(r) = &def.evaporator_leaving_range {
        builder = builder.evaporator_leaving_range(range(id, r, "evaporator_leaving_range")?);
    }
    if let Some(r) = &def.condenser_entering_range {
        builder = builder.condenser_entering_range(range(id, r, "condenser_entering_range")?);
    }
    if let Some(q) = &def.condenser_air_temperature_rise {
        let rise = quantity_si(q, "delta_K", &format!("{id}.condenser_air_temperature_rise"))?;
        builder = builder.condenser_air_temperature_rise(delta_k(rise));
    }
    if let Some(model) = liquid_model(&def.liquid_properties, id)? {
        builder = builder.liquid_model(model);
    }
    Ok(builder.build()?)
}

fn baseline_request(id: &str, def: &BaselineDef) -> ProjectResult<BaselineRequest> {
    let capacity = w(quantity_si(
        &def.rated_net_evaporator_capacity,
        "W",
        &format!("{id}.rated_net_evaporator_capacity"),
    )?);
    let path = def.path.into();
    let condenser_type = def.condenser_type.into();
    let compressor_type = def.compressor_type.into();
    let rated_cop = match def.rated_cop {
        Some(cop) => cop,
        None => find_curve_set(path, condenser_type, compressor_type, capacity)?.cop,
    };
    let mut request =
        BaselineRequest::new(path, condenser_type, compressor_type, capacity, rated_cop);
    request.cycling_degradation_coefficient = def.cycling_degradation_coefficient;
    request.losses = def.losses.into();
    if let Some(q) = &def.standby_power {
        request.standby_power = w(quantity_si(q, "W", &format!("{id}.standby_power"))?);
    }
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::QuantityDef;
    use approx::assert_relative_eq;

    fn custom(curves: CurvesDef) -> ChillerDef {
        ChillerDef {
            id: "ch-1".to_string(),
            name: "Plant chiller".to_string(),
            description: None,
            notes: None,
            data_version: 1,
            model: ChillerModelDef::Custom(CustomChillerDef {
                rated_net_evaporator_capacity: QuantityDef::new(100.0, "ton_ref"),
                rated_cop: 5.5,
                rated_net_condenser_capacity: None,
                condenser_type: CondenserTypeDef::LiquidCooled,
                minimum_part_load_ratio: None,
                minimum_unloading_ratio: None,
                stages: None,
                curves,
                losses: LossesDef::default(),
                cycling_degradation_coefficient: 0.0,
                standby_power: None,
                evaporator_leaving_range: None,
                condenser_entering_range: None,
                condenser_air_temperature_rise: None,
                liquid_properties: LiquidPropertiesDef::CoolProp,
            }),
        }
    }

    fn unity_direct() -> CurvesDef {
        CurvesDef::Direct {
            capacity_temperature: vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            eir_temperature: vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            eir_part_load: vec![0.0, 1.0, 0.0, 0.0],
        }
    }

    #[test]
    fn custom_chiller_rates_at_its_cop() {
        let resolved = resolve_chiller(&custom(unity_direct())).unwrap();
        let rated = resolved.model.rated_conditions();
        assert_relative_eq!(resolved.model.cop(&rated).unwrap(), 5.5, epsilon = 1e-9);
        assert_relative_eq!(
            resolved.model.design().rated_net_evaporator_capacity().value,
            100.0 * cm_core::units::constants::TON_REF_W,
            epsilon = 1e-6
        );
        assert_eq!(resolved.model.formulation_name(), "direct EIR");
    }

    #[test]
    fn constant_liquid_properties_are_used() {
        let mut def = custom(unity_direct());
        if let ChillerModelDef::Custom(c) = &mut def.model {
            c.liquid_properties = LiquidPropertiesDef::Constant {
                density: QuantityDef::new(1000.0, "kg/m3"),
                specific_heat: QuantityDef::new(4180.0, "J/kg/K"),
            };
        }
        let resolved = resolve_chiller(&def).unwrap();
        let rated = resolved.model.evaporator().rated_state();
        assert_relative_eq!(rated.specific_heat(), 4180.0, epsilon = 1e-9);
    }

    #[test]
    fn baseline_cop_defaults_to_the_curve_set() {
        let def = ChillerDef {
            id: "base".to_string(),
            name: "Baseline".to_string(),
            description: None,
            notes: None,
            data_version: 2,
            model: ChillerModelDef::Baseline(BaselineDef {
                path: CompliancePathDef::Prm,
                condenser_type: CondenserTypeDef::LiquidCooled,
                compressor_type: CompressorTypeDef::Centrifugal,
                rated_net_evaporator_capacity: QuantityDef::new(400.0, "ton_ref"),
                rated_cop: None,
                cycling_degradation_coefficient: 0.0,
                standby_power: None,
                losses: LossesDef::default(),
            }),
        };
        let resolved = resolve_chiller(&def).unwrap();
        let set = find_curve_set(
            CompliancePath::Prm,
            CondenserType::Liquid,
            CompressorType::Centrifugal,
            w(400.0 * cm_core::units::constants::TON_REF_W),
        )
        .unwrap();
        assert_relative_eq!(resolved.model.design().rated_cop(), set.cop, epsilon = 1e-12);
        assert!(resolved.description.is_some_and(|d| d.contains(set.name)));
        assert_eq!(resolved.data_version, 2);
    }

    #[test]
    fn wrong_dimension_is_a_validation_error() {
        let mut def = custom(unity_direct());
        if let ChillerModelDef::Custom(c) = &mut def.model {
            c.rated_net_evaporator_capacity = QuantityDef::new(100.0, "K");
        }
        let err = resolve_chiller(&def).unwrap_err();
        assert!(matches!(
            err,
            crate::ProjectError::Validation(crate::ValidationError::InvalidValue { .. })
        ));
    }
}
