//! Required sensor roles and their ordered candidate rules.
//!
//! Each role names one logical measurement. Its definition is a priority-ordered
//! list of rules; a rule selects components by type and property filter, and a
//! port (or a whole dynamic port family) on them. The table order is also the
//! order in which the duplicate-mapping guard claims channels.

use rf_topology::{CircuitLabel, ComponentType};

/// One logical measurement the calculation core needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SensorRole {
    SuctionPressure,
    DischargePressure,
    CompressorSpeed,
    CompressorInlet,
    CompressorOutlet,
    CondenserInlet,
    CondenserOutlet,
    WaterIn,
    WaterOut,
    /// TXV outlet (point 1a).
    ExpansionOutlet(CircuitLabel),
    /// Coil inlet (point 1b).
    CoilInlet(CircuitLabel),
    /// Evaporator outlet (point 2a).
    CoilOutlet(CircuitLabel),
    /// TXV inlet (point 4b).
    ExpansionInlet(CircuitLabel),
}

impl SensorRole {
    /// Stable key used in reports and logs, e.g. `"P_suc"` or `"T_2a-LH"`.
    pub fn key(&self) -> &'static str {
        use CircuitLabel::*;
        match self {
            SensorRole::SuctionPressure => "P_suc",
            SensorRole::DischargePressure => "P_disch",
            SensorRole::CompressorSpeed => "RPM",
            SensorRole::CompressorInlet => "T_2b",
            SensorRole::CompressorOutlet => "T_3a",
            SensorRole::CondenserInlet => "T_3b",
            SensorRole::CondenserOutlet => "T_4a",
            SensorRole::WaterIn => "T_waterin",
            SensorRole::WaterOut => "T_waterout",
            SensorRole::ExpansionOutlet(Left) => "T_1a-lh",
            SensorRole::ExpansionOutlet(Center) => "T_1a-ctr",
            SensorRole::ExpansionOutlet(Right) => "T_1a-rh",
            SensorRole::CoilInlet(Left) => "T_1b-lh",
            SensorRole::CoilInlet(Center) => "T_1b-ctr",
            SensorRole::CoilInlet(Right) => "T_1c-rh",
            SensorRole::CoilOutlet(Left) => "T_2a-LH",
            SensorRole::CoilOutlet(Center) => "T_2a-ctr",
            SensorRole::CoilOutlet(Right) => "T_2a-RH",
            SensorRole::ExpansionInlet(Left) => "T_4b-lh",
            SensorRole::ExpansionInlet(Center) => "T_4b-ctr",
            SensorRole::ExpansionInlet(Right) => "T_4b-rh",
        }
    }
}

impl std::fmt::Display for SensorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl serde::Serialize for SensorRole {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

/// Which port(s) of a matching component a rule reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortSelector {
    /// One named port.
    Named(&'static str),
    /// Every port of a dynamic family, e.g. `"outlet_circuit_"`; the value is their mean.
    AllOf(&'static str),
}

/// One candidate: components of `component` type whose properties match every
/// `filter` entry, read through `port`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRule {
    pub component: ComponentType,
    pub port: PortSelector,
    pub filter: Vec<(&'static str, &'static str)>,
}

impl RoleRule {
    pub fn new(component: ComponentType, port: PortSelector) -> Self {
        Self {
            component,
            port,
            filter: Vec::new(),
        }
    }

    pub fn with_filter(mut self, key: &'static str, value: &'static str) -> Self {
        self.filter.push((key, value));
        self
    }

    fn on_circuit(self, label: CircuitLabel) -> Self {
        self.with_filter("circuit_label", label.as_str())
    }
}

/// A role and its rules in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDefinition {
    pub role: SensorRole,
    pub rules: Vec<RoleRule>,
}

/// Ordered set of role definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTable {
    definitions: Vec<RoleDefinition>,
}

impl RoleTable {
    pub fn new(definitions: Vec<RoleDefinition>) -> Self {
        Self { definitions }
    }

    /// The standard three-circuit table.
    pub fn standard() -> Self {
        use ComponentType::*;
        use PortSelector::*;

        let single = |role: SensorRole, component: ComponentType, port: &'static str| {
            RoleDefinition {
                role,
                rules: vec![RoleRule::new(component, Named(port))],
            }
        };

        let mut definitions = vec![
            single(SensorRole::SuctionPressure, Compressor, "SP"),
            single(SensorRole::DischargePressure, Compressor, "DP"),
            single(SensorRole::CompressorSpeed, Compressor, "RPM"),
            single(SensorRole::CompressorInlet, Compressor, "inlet"),
            single(SensorRole::CompressorOutlet, Compressor, "outlet"),
            single(SensorRole::CondenserInlet, Condenser, "inlet"),
            single(SensorRole::CondenserOutlet, Condenser, "outlet"),
            RoleDefinition {
                role: SensorRole::WaterIn,
                rules: vec![
                    RoleRule::new(Condenser, Named("water_inlet")),
                    RoleRule::new(Condenser, Named("water_in_temp")),
                ],
            },
            RoleDefinition {
                role: SensorRole::WaterOut,
                rules: vec![
                    RoleRule::new(Condenser, Named("water_outlet")),
                    RoleRule::new(Condenser, Named("water_out_temp")),
                ],
            },
        ];

        for label in CircuitLabel::ALL {
            definitions.extend([
                RoleDefinition {
                    role: SensorRole::ExpansionOutlet(label),
                    rules: vec![
                        RoleRule::new(Txv, Named("outlet")).on_circuit(label),
                        RoleRule::new(Distributor, Named("inlet")).on_circuit(label),
                    ],
                },
                RoleDefinition {
                    role: SensorRole::CoilInlet(label),
                    rules: vec![
                        RoleRule::new(Evaporator, AllOf("inlet_circuit_")).on_circuit(label),
                        RoleRule::new(Distributor, AllOf("outlet_")).on_circuit(label),
                    ],
                },
                RoleDefinition {
                    role: SensorRole::CoilOutlet(label),
                    rules: vec![
                        RoleRule::new(Evaporator, AllOf("outlet_circuit_")).on_circuit(label),
                        RoleRule::new(Txv, Named("bulb")).on_circuit(label),
                    ],
                },
                RoleDefinition {
                    role: SensorRole::ExpansionInlet(label),
                    rules: vec![RoleRule::new(Txv, Named("inlet")).on_circuit(label)],
                },
            ]);
        }

        Self { definitions }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoleDefinition> {
        self.definitions.iter()
    }

    pub fn get(&self, role: SensorRole) -> Option<&RoleDefinition> {
        self.definitions.iter().find(|d| d.role == role)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for RoleTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn standard_table_has_one_definition_per_role() {
        let table = RoleTable::standard();
        assert_eq!(table.len(), 9 + 3 * 4);
        let keys: HashSet<&str> = table.iter().map(|d| d.role.key()).collect();
        assert_eq!(keys.len(), table.len());
    }

    #[test]
    fn pressures_come_first() {
        let table = RoleTable::standard();
        let order: Vec<SensorRole> = table.iter().take(3).map(|d| d.role).collect();
        assert_eq!(
            order,
            [
                SensorRole::SuctionPressure,
                SensorRole::DischargePressure,
                SensorRole::CompressorSpeed
            ]
        );
    }

    #[test]
    fn coil_outlet_falls_back_to_bulb() {
        let table = RoleTable::standard();
        let def = table.get(SensorRole::CoilOutlet(CircuitLabel::Right)).unwrap();
        assert_eq!(def.rules.len(), 2);
        assert_eq!(def.rules[0].port, PortSelector::AllOf("outlet_circuit_"));
        assert_eq!(def.rules[1].component, ComponentType::Txv);
        assert_eq!(def.rules[1].filter, vec![("circuit_label", "Right")]);
    }

    #[test]
    fn right_coil_inlet_keeps_its_legacy_key() {
        assert_eq!(SensorRole::CoilInlet(CircuitLabel::Right).key(), "T_1c-rh");
        assert_eq!(SensorRole::CoilOutlet(CircuitLabel::Left).to_string(), "T_2a-LH");
    }
}
