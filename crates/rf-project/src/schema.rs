//! Session schema definitions.

use std::collections::BTreeMap;

use rf_topology::PropertyValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    #[serde(default = "default_refrigerant")]
    pub refrigerant: String,
    #[serde(default)]
    pub components: Vec<ComponentDef>,
    /// Role key (`{Type}.{Id}.{Port}` or legacy `{Id}.{Port}`) → channel name.
    #[serde(default)]
    pub sensor_roles: BTreeMap<String, String>,
    #[serde(default)]
    pub rated_inputs: RatedInputsDef,
    #[serde(default)]
    pub settings: SettingsDef,
}

fn default_refrigerant() -> String {
    "R410A".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentDef {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
}

/// Compressor nameplate data. Every field is optional; gaps select default calibration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RatedInputsDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m_dot_rated_lbhr: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hz_rated: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disp_ft3: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rated_evap_temp_f: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rated_return_gas_temp_f: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityDef {
    #[default]
    FirstById,
    Reject,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AggregationDef {
    #[default]
    Average,
    Maximum,
    Minimum,
    Last,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettingsDef {
    #[serde(default)]
    pub ambiguity: AmbiguityDef,
    #[serde(default)]
    pub aggregation: AggregationDef,
    #[serde(default)]
    pub parallel: bool,
}
