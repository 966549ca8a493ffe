//! rf-topology: read-only topology snapshot for refrigflow.
//!
//! Provides:
//! - Component types and property bags
//! - Port schemas and the explicit port-enumeration step (static, conditional, dynamic)
//! - Role mapping table (`{Type}.{Id}.{Port}` with legacy `{Id}.{Port}` fallback)
//! - Snapshot builder with validation
//! - Human-readable port labels
//!
//! # Example
//!
//! ```
//! use rf_topology::{ComponentType, TopologyBuilder};
//!
//! let mut builder = TopologyBuilder::new();
//! builder.add_component("comp_1", ComponentType::Compressor);
//! builder.add_component("evap_1", ComponentType::Evaporator);
//! builder.set_property("evap_1", "circuits", 3);
//! builder.map_port(ComponentType::Compressor, "comp_1", "SP", "Suction PSIG");
//! let topology = builder.build().unwrap();
//!
//! assert_eq!(topology.ports("evap_1").unwrap().len(), 6);
//! let comp = topology.component("comp_1").unwrap();
//! assert_eq!(topology.mapped_channel(comp, "SP"), Some("Suction PSIG"));
//! ```

pub mod builder;
pub mod component;
pub mod error;
pub mod labels;
pub mod mapping;
pub mod schema;
pub mod snapshot;
pub(crate) mod validate;

pub use builder::TopologyBuilder;
pub use component::{CircuitLabel, Component, ComponentType, PropertyBag, PropertyValue};
pub use error::{TopologyError, TopologyResult};
pub use labels::port_label;
pub use mapping::RoleMappingTable;
pub use schema::{ComponentSchema, Port, PortOrigin, enumerate_ports, schema_for};
pub use snapshot::{PortListing, TopologySnapshot};
