//! Components and their property bags.

use std::collections::BTreeMap;

/// Physical unit types that can appear in a refrigeration topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComponentType {
    Compressor,
    Condenser,
    Evaporator,
    #[cfg_attr(feature = "serde", serde(rename = "TXV"))]
    Txv,
    Distributor,
    Junction,
    SensorBulb,
    Fan,
    AirSensorArray,
    ShelvingGrid,
}

impl ComponentType {
    pub const ALL: [ComponentType; 10] = [
        ComponentType::Compressor,
        ComponentType::Condenser,
        ComponentType::Evaporator,
        ComponentType::Txv,
        ComponentType::Distributor,
        ComponentType::Junction,
        ComponentType::SensorBulb,
        ComponentType::Fan,
        ComponentType::AirSensorArray,
        ComponentType::ShelvingGrid,
    ];

    /// Type name as it appears in role keys.
    pub fn name(&self) -> &'static str {
        match self {
            ComponentType::Compressor => "Compressor",
            ComponentType::Condenser => "Condenser",
            ComponentType::Evaporator => "Evaporator",
            ComponentType::Txv => "TXV",
            ComponentType::Distributor => "Distributor",
            ComponentType::Junction => "Junction",
            ComponentType::SensorBulb => "SensorBulb",
            ComponentType::Fan => "Fan",
            ComponentType::AirSensorArray => "AirSensorArray",
            ComponentType::ShelvingGrid => "ShelvingGrid",
        }
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ComponentType {
    type Err = crate::TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::TopologyError::UnknownComponentType {
                name: s.to_string(),
            })
    }
}

/// One value in a component's property bag.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl PropertyValue {
    /// Numeric view; text is parsed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Int(v) => Some(*v as f64),
            PropertyValue::Float(v) => Some(*v),
            PropertyValue::Text(s) => s.trim().parse().ok(),
            PropertyValue::Bool(_) => None,
        }
    }

    /// Non-negative integer view, used by dynamic port families.
    pub fn as_count(&self) -> Option<usize> {
        match self {
            PropertyValue::Int(v) => usize::try_from(*v).ok(),
            PropertyValue::Float(v) if *v >= 0.0 && v.fract() == 0.0 => Some(*v as usize),
            PropertyValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// True when this value, rendered as text, equals `expected`.
    pub fn matches_text(&self, expected: &str) -> bool {
        match self {
            PropertyValue::Text(s) => s == expected,
            PropertyValue::Int(v) => v.to_string() == expected,
            PropertyValue::Float(v) => v.to_string() == expected,
            PropertyValue::Bool(v) => v.to_string() == expected,
        }
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Int(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        PropertyValue::Int(v.into())
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Float(v)
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Text(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::Text(v)
    }
}

pub type PropertyBag = BTreeMap<String, PropertyValue>;

/// Which parallel evaporator/expansion-device path a component belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CircuitLabel {
    Left,
    Center,
    Right,
}

impl CircuitLabel {
    pub const ALL: [CircuitLabel; 3] = [CircuitLabel::Left, CircuitLabel::Center, CircuitLabel::Right];

    /// Value stored in the `circuit_label` property.
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitLabel::Left => "Left",
            CircuitLabel::Center => "Center",
            CircuitLabel::Right => "Right",
        }
    }
}

impl std::fmt::Display for CircuitLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CircuitLabel {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LEFT" | "LH" | "L" => Ok(CircuitLabel::Left),
            "CENTER" | "CENTRE" | "CTR" | "C" => Ok(CircuitLabel::Center),
            "RIGHT" | "RH" | "R" => Ok(CircuitLabel::Right),
            _ => Err("unknown circuit label"),
        }
    }
}

/// A physical unit in the topology.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub id: String,
    pub kind: ComponentType,
    pub properties: PropertyBag,
}

impl Component {
    pub fn new(id: impl Into<String>, kind: ComponentType) -> Self {
        Self {
            id: id.into(),
            kind,
            properties: PropertyBag::new(),
        }
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Numeric property, if present and finite.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.property(key)
            .and_then(PropertyValue::as_f64)
            .filter(|v| v.is_finite())
    }

    /// The component's circuit, read from `circuit_label` (`"None"` means unassigned).
    pub fn circuit_label(&self) -> Option<CircuitLabel> {
        match self.property("circuit_label")? {
            PropertyValue::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// True when every `(key, value)` filter equals the stored property.
    pub fn matches_filter(&self, filter: &[(&str, &str)]) -> bool {
        filter.iter().all(|(key, expected)| {
            self.property(key)
                .is_some_and(|value| value.matches_text(expected))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_component_type_is_case_insensitive() {
        assert_eq!("txv".parse::<ComponentType>().unwrap(), ComponentType::Txv);
        assert_eq!(
            "Evaporator".parse::<ComponentType>().unwrap(),
            ComponentType::Evaporator
        );
        assert!("Pump".parse::<ComponentType>().is_err());
    }

    #[test]
    fn counts_accept_integral_numbers_only() {
        assert_eq!(PropertyValue::Int(3).as_count(), Some(3));
        assert_eq!(PropertyValue::Float(4.0).as_count(), Some(4));
        assert_eq!(PropertyValue::Float(2.5).as_count(), None);
        assert_eq!(PropertyValue::Int(-1).as_count(), None);
        assert_eq!(PropertyValue::from("6").as_count(), Some(6));
    }

    #[test]
    fn filter_requires_every_key() {
        let mut evap = Component::new("evap_1", ComponentType::Evaporator);
        evap.properties.insert("circuit_label".into(), "Left".into());
        evap.properties.insert("circuits".into(), 2.into());

        assert!(evap.matches_filter(&[("circuit_label", "Left")]));
        assert!(evap.matches_filter(&[("circuit_label", "Left"), ("circuits", "2")]));
        assert!(!evap.matches_filter(&[("circuit_label", "Right")]));
        assert!(!evap.matches_filter(&[("circuit_label", "Left"), ("coil", "A")]));
        assert_eq!(evap.circuit_label(), Some(CircuitLabel::Left));
    }

    #[test]
    fn fan_style_labels_parse() {
        assert_eq!("LH".parse::<CircuitLabel>().unwrap(), CircuitLabel::Left);
        assert_eq!("CTR".parse::<CircuitLabel>().unwrap(), CircuitLabel::Center);
        assert!("None".parse::<CircuitLabel>().is_err());
    }
}
