//! Project schema definitions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectDef {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub chillers: Vec<ChillerDef>,
}

/// A number with its unit label, e.g. `{ value: 100, unit: ton_ref }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuantityDef {
    pub value: f64,
    pub unit: String,
}

impl QuantityDef {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChillerDef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default = "default_data_version")]
    pub data_version: u32,
    pub model: ChillerModelDef,
}

fn default_data_version() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ChillerModelDef {
    Custom(CustomChillerDef),
    Baseline(BaselineDef),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CondenserTypeDef {
    #[default]
    LiquidCooled,
    AirCooled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompliancePathDef {
    EcbA,
    EcbB,
    Prm,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompressorTypeDef {
    #[default]
    Unknown,
    Centrifugal,
    PositiveDisplacement,
    Screw,
    Scroll,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomChillerDef {
    pub rated_net_evaporator_capacity: QuantityDef,
    pub rated_cop: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rated_net_condenser_capacity: Option<QuantityDef>,
    #[serde(default)]
    pub condenser_type: CondenserTypeDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_part_load_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_unloading_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stages: Option<usize>,
    pub curves: CurvesDef,
    #[serde(default)]
    pub losses: LossesDef,
    #[serde(default)]
    pub cycling_degradation_coefficient: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standby_power: Option<QuantityDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaporator_leaving_range: Option<RangeDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condenser_entering_range: Option<RangeDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condenser_air_temperature_rise: Option<QuantityDef>,
    #[serde(default)]
    pub liquid_properties: LiquidPropertiesDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "formulation", rename_all = "snake_case")]
pub enum CurvesDef {
    Direct {
        capacity_temperature: Vec<f64>,
        eir_temperature: Vec<f64>,
        eir_part_load: Vec<f64>,
    },
    Reformulated {
        capacity_temperature: Vec<f64>,
        eir_temperature: Vec<f64>,
        eir_part_load: Vec<f64>,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct LossesDef {
    #[serde(default)]
    pub oil_cooler: f64,
    #[serde(default)]
    pub auxiliary: f64,
    #[serde(default)]
    pub space_gain: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RangeDef {
    pub minimum: QuantityDef,
    pub maximum: QuantityDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum LiquidPropertiesDef {
    #[default]
    CoolProp,
    Constant {
        density: QuantityDef,
        specific_heat: QuantityDef,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BaselineDef {
    pub path: CompliancePathDef,
    #[serde(default)]
    pub condenser_type: CondenserTypeDef,
    #[serde(default)]
    pub compressor_type: CompressorTypeDef,
    pub rated_net_evaporator_capacity: QuantityDef,
    /// Defaults to the matched curve set's COP
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rated_cop: Option<f64>,
    #[serde(default)]
    pub cycling_degradation_coefficient: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standby_power: Option<QuantityDef>,
    #[serde(default)]
    pub losses: LossesDef,
}
