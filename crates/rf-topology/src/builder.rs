//! Incremental topology builder.

use std::collections::BTreeMap;

use crate::component::{Component, ComponentType, PropertyValue};
use crate::error::{TopologyError, TopologyResult};
use crate::mapping::RoleMappingTable;
use crate::snapshot::TopologySnapshot;
use crate::validate;

/// Builder for a topology snapshot.
///
/// Add components, set properties and map ports, then call `build()` to validate
/// and freeze everything into an immutable `TopologySnapshot`.
#[derive(Debug, Default)]
pub struct TopologyBuilder {
    components: Vec<Component>,
    mapping: RoleMappingTable,
    pending_errors: Vec<TopologyError>,
}

impl TopologyBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component.
    pub fn add_component(&mut self, id: impl Into<String>, kind: ComponentType) -> &mut Self {
        self.components.push(Component::new(id, kind));
        self
    }

    /// Set a property on an existing component.
    pub fn set_property(
        &mut self,
        id: &str,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> &mut Self {
        match self.components.iter_mut().rev().find(|c| c.id == id) {
            Some(component) => {
                component.properties.insert(key.into(), value.into());
            }
            None => self
                .pending_errors
                .push(TopologyError::UnknownComponent { id: id.to_string() }),
        }
        self
    }

    /// Insert a raw mapping entry (primary or legacy key).
    pub fn map_role(&mut self, key: impl Into<String>, channel: impl Into<String>) -> &mut Self {
        self.mapping.insert(key, channel);
        self
    }

    /// Map one component port to a channel using the primary key format.
    pub fn map_port(
        &mut self,
        kind: ComponentType,
        id: &str,
        port: &str,
        channel: impl Into<String>,
    ) -> &mut Self {
        self.mapping
            .insert(RoleMappingTable::primary_key(kind, id, port), channel);
        self
    }

    /// Validate and freeze the topology.
    pub fn build(self) -> TopologyResult<TopologySnapshot> {
        if let Some(err) = self.pending_errors.into_iter().next() {
            return Err(err);
        }

        let mut components = BTreeMap::new();
        for component in self.components {
            validate::validate_component(&component)?;
            if components.contains_key(&component.id) {
                return Err(TopologyError::DuplicateComponent {
                    id: component.id.clone(),
                });
            }
            components.insert(component.id.clone(), component);
        }

        let snapshot = TopologySnapshot {
            components,
            mapping: self.mapping,
        };
        let stale = snapshot.stale_role_keys();
        if !stale.is_empty() {
            tracing::warn!(count = stale.len(), keys = ?stale, "role mappings point at missing ports");
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_basic() {
        let mut builder = TopologyBuilder::new();
        builder
            .add_component("comp_1", ComponentType::Compressor)
            .add_component("txv_1", ComponentType::Txv)
            .set_property("txv_1", "circuit_label", "Left");
        assert_eq!(builder.components.len(), 2);
        assert_eq!(builder.components[1].properties.len(), 1);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut builder = TopologyBuilder::new();
        builder
            .add_component("x", ComponentType::Compressor)
            .add_component("x", ComponentType::Condenser);
        assert_eq!(
            builder.build().unwrap_err(),
            TopologyError::DuplicateComponent { id: "x".into() }
        );
    }

    #[test]
    fn property_on_missing_component_fails_build() {
        let mut builder = TopologyBuilder::new();
        builder.set_property("ghost", "circuits", 2);
        assert!(matches!(
            builder.build(),
            Err(TopologyError::UnknownComponent { .. })
        ));
    }

    #[test]
    fn build_orders_components_by_id() {
        let mut builder = TopologyBuilder::new();
        builder
            .add_component("txv_b", ComponentType::Txv)
            .add_component("txv_a", ComponentType::Txv);
        let snapshot = builder.build().unwrap();
        let ids: Vec<&str> = snapshot
            .components_of(ComponentType::Txv)
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, ["txv_a", "txv_b"]);
    }
}
