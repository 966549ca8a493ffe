//! Port schemas and the port-enumeration step.
//!
//! A component's ports are never spelled out at call sites. They come from its
//! type schema plus its property bag:
//! - static ports, always present
//! - conditional ports, present when a selector property has a given value
//! - dynamic families such as `outlet_circuit_{i}`, one port per `i` in `1..=count`

use crate::component::{Component, ComponentType};

/// A family of numbered ports whose size is driven by a count property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DynamicFamily {
    /// Port name prefix, e.g. `"outlet_circuit_"`.
    pub prefix: &'static str,
    pub count_property: &'static str,
    pub default_count: usize,
    pub min_count: usize,
    pub max_count: usize,
}

/// Ports present only when `property` equals `value` (or when it is absent and `value` is the default).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionalPorts {
    pub property: &'static str,
    pub value: &'static str,
    pub is_default: bool,
    pub ports: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentSchema {
    pub static_ports: &'static [&'static str],
    pub conditional: &'static [ConditionalPorts],
    pub dynamic: &'static [DynamicFamily],
}

/// Where a port came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PortOrigin {
    Static,
    Conditional { property: &'static str },
    Dynamic { prefix: &'static str, index: usize },
}

/// Named attachment point on one component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Port {
    pub name: String,
    pub origin: PortOrigin,
}

impl Port {
    pub fn is_dynamic(&self) -> bool {
        matches!(self.origin, PortOrigin::Dynamic { .. })
    }
}

const fn family(
    prefix: &'static str,
    count_property: &'static str,
    default_count: usize,
) -> DynamicFamily {
    DynamicFamily {
        prefix,
        count_property,
        default_count,
        min_count: 1,
        max_count: 12,
    }
}

const COMPRESSOR: ComponentSchema = ComponentSchema {
    static_ports: &["inlet", "outlet", "SP", "DP", "RPM"],
    conditional: &[],
    dynamic: &[],
};

const CONDENSER: ComponentSchema = ComponentSchema {
    static_ports: &["inlet", "outlet"],
    conditional: &[
        ConditionalPorts {
            property: "condenser_type",
            value: "Air Cooled",
            is_default: true,
            ports: &["air_in_temp", "air_out_temp"],
        },
        ConditionalPorts {
            property: "condenser_type",
            value: "Water Cooled",
            is_default: false,
            ports: &[
                "water_inlet",
                "water_outlet",
                "water_in_temp",
                "water_out_temp",
            ],
        },
    ],
    dynamic: &[],
};

const EVAPORATOR: ComponentSchema = ComponentSchema {
    static_ports: &[],
    conditional: &[],
    dynamic: &[
        family("inlet_circuit_", "circuits", 1),
        family("outlet_circuit_", "circuits", 1),
    ],
};

const TXV: ComponentSchema = ComponentSchema {
    static_ports: &["inlet", "outlet", "bulb"],
    conditional: &[],
    dynamic: &[],
};

const DISTRIBUTOR: ComponentSchema = ComponentSchema {
    static_ports: &["inlet"],
    conditional: &[],
    dynamic: &[family("outlet_", "circuit_count", 1)],
};

const JUNCTION: ComponentSchema = ComponentSchema {
    static_ports: &["sensor"],
    conditional: &[],
    dynamic: &[
        family("inlet_", "inlet_count", 2),
        family("outlet_", "outlet_count", 1),
    ],
};

const SENSOR_BULB: ComponentSchema = ComponentSchema {
    static_ports: &["measurement"],
    conditional: &[],
    dynamic: &[],
};

const FAN: ComponentSchema = ComponentSchema {
    static_ports: &[],
    conditional: &[],
    dynamic: &[family("sensor_", "sensor_count", 6)],
};

const NO_PORTS: ComponentSchema = ComponentSchema {
    static_ports: &[],
    conditional: &[],
    dynamic: &[],
};

/// Schema for a component type.
pub fn schema_for(kind: ComponentType) -> &'static ComponentSchema {
    match kind {
        ComponentType::Compressor => &COMPRESSOR,
        ComponentType::Condenser => &CONDENSER,
        ComponentType::Evaporator => &EVAPORATOR,
        ComponentType::Txv => &TXV,
        ComponentType::Distributor => &DISTRIBUTOR,
        ComponentType::Junction => &JUNCTION,
        ComponentType::SensorBulb => &SENSOR_BULB,
        ComponentType::Fan => &FAN,
        ComponentType::AirSensorArray | ComponentType::ShelvingGrid => &NO_PORTS,
    }
}

impl DynamicFamily {
    /// Port count for `component`. Unusable values fall back to the default;
    /// validation reports them separately.
    pub fn count(&self, component: &Component) -> usize {
        component
            .property(self.count_property)
            .and_then(|v| v.as_count())
            .filter(|n| (self.min_count..=self.max_count).contains(n))
            .unwrap_or(self.default_count)
    }

    /// Parse the 1-based index out of a port name belonging to this family.
    pub fn index_of(&self, port: &str) -> Option<usize> {
        port.strip_prefix(self.prefix)?.parse().ok()
    }
}

impl ConditionalPorts {
    fn active(&self, component: &Component) -> bool {
        match component.property(self.property) {
            Some(value) => value.matches_text(self.value),
            None => self.is_default,
        }
    }
}

/// Enumerate every port of `component`: static, then active conditional, then dynamic families.
pub fn enumerate_ports(component: &Component) -> Vec<Port> {
    let schema = schema_for(component.kind);
    let mut ports: Vec<Port> = schema
        .static_ports
        .iter()
        .map(|name| Port {
            name: (*name).to_string(),
            origin: PortOrigin::Static,
        })
        .collect();

    for cond in schema.conditional.iter().filter(|c| c.active(component)) {
        ports.extend(cond.ports.iter().map(|name| Port {
            name: (*name).to_string(),
            origin: PortOrigin::Conditional {
                property: cond.property,
            },
        }));
    }

    for fam in schema.dynamic {
        ports.extend((1..=fam.count(component)).map(|index| Port {
            name: format!("{}{}", fam.prefix, index),
            origin: PortOrigin::Dynamic {
                prefix: fam.prefix,
                index,
            },
        }));
    }
    ports
}
