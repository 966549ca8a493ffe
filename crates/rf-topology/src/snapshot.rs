//! Immutable topology snapshot read by the calculation core.

use std::collections::BTreeMap;

use crate::component::{Component, ComponentType};
use crate::labels::port_label;
use crate::mapping::RoleMappingTable;
use crate::schema::{Port, enumerate_ports};

/// Read-only view of the components and the role mapping table for one run.
///
/// Components are keyed by id, so every iteration is in stable id order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopologySnapshot {
    pub(crate) components: BTreeMap<String, Component>,
    pub(crate) mapping: RoleMappingTable,
}

/// One row of the port listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortListing {
    pub component_id: String,
    pub kind: ComponentType,
    pub port: String,
    pub label: String,
    pub channel: Option<String>,
}

impl TopologySnapshot {
    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.get(id)
    }

    /// All components, ordered by id.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    /// Components of one type, ordered by id.
    pub fn components_of(&self, kind: ComponentType) -> impl Iterator<Item = &Component> {
        self.components.values().filter(move |c| c.kind == kind)
    }

    /// Enumerated ports of a component.
    pub fn ports(&self, id: &str) -> Option<Vec<Port>> {
        self.component(id).map(enumerate_ports)
    }

    pub fn mapping(&self) -> &RoleMappingTable {
        &self.mapping
    }

    /// Channel mapped to one port of `component`, if any.
    pub fn mapped_channel(&self, component: &Component, port: &str) -> Option<&str> {
        self.mapping.lookup(component.kind, &component.id, port)
    }

    /// Every port of every component with its label and mapped channel.
    pub fn port_listing(&self) -> Vec<PortListing> {
        self.components()
            .flat_map(|component| {
                enumerate_ports(component)
                    .into_iter()
                    .map(move |port| PortListing {
                        component_id: component.id.clone(),
                        kind: component.kind,
                        label: port_label(&port.name),
                        channel: self
                            .mapped_channel(component, &port.name)
                            .map(str::to_string),
                        port: port.name,
                    })
            })
            .collect()
    }

    /// Mapping keys that no longer point at an existing component port.
    pub fn stale_role_keys(&self) -> Vec<String> {
        self.mapping
            .iter()
            .filter(|(key, _)| !self.key_resolves(key))
            .map(|(key, _)| key.to_string())
            .collect()
    }

    fn key_resolves(&self, key: &str) -> bool {
        let parts: Vec<&str> = key.splitn(3, '.').collect();
        let (kind, id, port) = match parts.as_slice() {
            [kind, id, port] => (Some(*kind), *id, *port),
            [id, port] => (None, *id, *port),
            _ => return false,
        };
        let Some(component) = self.component(id) else {
            return false;
        };
        if kind.is_some_and(|k| k != component.kind.name()) {
            return false;
        }
        enumerate_ports(component).iter().any(|p| p.name == port)
    }
}
