//! RS0001 document types.
//!
//! Field names follow the ASHRAE 205 RS0001 schema. Grid and lookup
//! variables serialize as maps in generation order, which is the order
//! the lookup sequences are flattened in.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use cm_fluids::LiquidType;
use cm_models::{PerformanceMap, Values, Variable};

pub const DATA_MODEL: &str = "ASHRAE_205";
pub const SCHEMA: &str = "RS0001";
pub const SCHEMA_VERSION: &str = "2.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rs0001Document {
    pub metadata: Metadata,
    pub description: Description,
    pub performance: PerformanceSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub data_model: String,
    pub schema: String,
    pub schema_version: String,
    pub description: String,
    pub id: String,
    pub data_timestamp: String,
    pub data_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Description {
    pub product_information: ProductInformation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductInformation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressor_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquid_data_source: Option<String>,
    pub hot_gas_bypass_installed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidComponent {
    pub liquid_constituent: String,
    pub concentration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidMixture {
    pub liquid_components: Vec<LiquidComponent>,
    pub concentration_type: String,
}

impl From<LiquidType> for LiquidMixture {
    fn from(liquid: LiquidType) -> Self {
        Self {
            liquid_components: vec![LiquidComponent {
                liquid_constituent: liquid.constituent().to_string(),
                concentration: 1.0,
            }],
            concentration_type: "BY_VOLUME".to_string(),
        }
    }
}

/// Variable values as they appear in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValues {
    Integer(Vec<i64>),
    Real(Vec<f64>),
    Tag(Vec<String>),
}

impl VariableValues {
    pub fn len(&self) -> usize {
        match self {
            VariableValues::Integer(v) => v.len(),
            VariableValues::Real(v) => v.len(),
            VariableValues::Tag(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&Values> for VariableValues {
    fn from(values: &Values) -> Self {
        match values {
            Values::Real(v) => VariableValues::Real(v.clone()),
            Values::Integer(v) => VariableValues::Integer(v.clone()),
            Values::Tag(v) => VariableValues::Tag(v.clone()),
        }
    }
}

/// Name → values map that keeps insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedVariables(pub Vec<(String, VariableValues)>);

impl OrderedVariables {
    pub fn get(&self, name: &str) -> Option<&VariableValues> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[Variable]> for OrderedVariables {
    fn from(variables: &[Variable]) -> Self {
        Self(
            variables
                .iter()
                .map(|v| (v.name.clone(), VariableValues::from(&v.values)))
                .collect(),
        )
    }
}

impl Serialize for OrderedVariables {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, values) in &self.0 {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

struct OrderedVariablesVisitor;

impl<'de> Visitor<'de> for OrderedVariablesVisitor {
    type Value = OrderedVariables;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of variable names to value sequences")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, values)) = access.next_entry::<String, VariableValues>()? {
            entries.push((name, values));
        }
        Ok(OrderedVariables(entries))
    }
}

impl<'de> Deserialize<'de> for OrderedVariables {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedVariablesVisitor)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapDef {
    pub grid_variables: OrderedVariables,
    pub lookup_variables: OrderedVariables,
}

impl MapDef {
    /// Product of grid variable lengths.
    pub fn grid_size(&self) -> usize {
        self.grid_variables.0.iter().map(|(_, v)| v.len()).product()
    }
}

impl From<&PerformanceMap> for MapDef {
    fn from(map: &PerformanceMap) -> Self {
        Self {
            grid_variables: OrderedVariables::from(map.grid_variables.as_slice()),
            lookup_variables: OrderedVariables::from(map.lookup_variables.as_slice()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSection {
    pub evaporator_liquid_type: LiquidMixture,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condenser_liquid_type: Option<LiquidMixture>,
    pub evaporator_fouling_factor: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condenser_fouling_factor: Option<f64>,
    pub compressor_speed_control_type: String,
    pub maximum_power: f64,
    pub cycling_degradation_coefficient: f64,
    pub performance_map_cooling: MapDef,
    pub performance_map_standby: MapDef,
    pub performance_map_evaporator_liquid_pressure_differential: MapDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_map_condenser_liquid_pressure_differential: Option<MapDef>,
}

impl From<&cm_models::Performance> for PerformanceSection {
    fn from(p: &cm_models::Performance) -> Self {
        Self {
            evaporator_liquid_type: p.evaporator_liquid.into(),
            condenser_liquid_type: p.condenser_liquid.map(LiquidMixture::from),
            evaporator_fouling_factor: p.evaporator_fouling_factor,
            condenser_fouling_factor: p
                .condenser_liquid
                .map(|_| p.condenser_fouling_factor),
            compressor_speed_control_type: p.compressor_speed_control_type.to_string(),
            maximum_power: p.maximum_power,
            cycling_degradation_coefficient: p.cycling_degradation_coefficient,
            performance_map_cooling: (&p.performance_map_cooling).into(),
            performance_map_standby: (&p.performance_map_standby).into(),
            performance_map_evaporator_liquid_pressure_differential: (&p
                .performance_map_evaporator_liquid_pressure_differential)
                .into(),
            performance_map_condenser_liquid_pressure_differential: p
                .performance_map_condenser_liquid_pressure_differential
                .as_ref()
                .map(MapDef::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_variables_keep_insertion_order() {
        let vars = OrderedVariables(vec![
            ("zeta".to_string(), VariableValues::Real(vec![1.5])),
            ("alpha".to_string(), VariableValues::Integer(vec![1, 2])),
            ("state".to_string(), VariableValues::Tag(vec!["NORMAL".to_string()])),
        ]);
        let json = serde_json::to_string(&vars).unwrap();
        assert_eq!(
            json,
            r#"{"zeta":[1.5],"alpha":[1,2],"state":["NORMAL"]}"#
        );
        let back: OrderedVariables = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vars);
    }

    #[test]
    fn real_values_stay_real() {
        let json = serde_json::to_string(&VariableValues::Real(vec![500.0])).unwrap();
        assert_eq!(json, "[500.0]");
        let back: VariableValues = serde_json::from_str(&json).unwrap();
        assert_eq!(back, VariableValues::Real(vec![500.0]));
    }

    #[test]
    fn water_mixture() {
        let mixture = LiquidMixture::from(LiquidType::Water);
        assert_eq!(mixture.liquid_components[0].liquid_constituent, "WATER");
        assert_eq!(mixture.concentration_type, "BY_VOLUME");
    }
}
