//! Integration tests for rf-topology.

use rf_topology::{CircuitLabel, ComponentType, PortOrigin, TopologyBuilder};

fn three_circuit_rig() -> rf_topology::TopologySnapshot {
    let mut builder = TopologyBuilder::new();
    builder
        .add_component("comp_1", ComponentType::Compressor)
        .add_component("cond_1", ComponentType::Condenser)
        .set_property("cond_1", "condenser_type", "Water Cooled");
    for (id, label) in [("evap_l", "Left"), ("evap_c", "Center"), ("evap_r", "Right")] {
        builder
            .add_component(id, ComponentType::Evaporator)
            .set_property(id, "circuit_label", label)
            .set_property(id, "circuits", 2);
    }
    builder
        .map_port(ComponentType::Compressor, "comp_1", "SP", "Suction PSIG")
        .map_port(ComponentType::Condenser, "cond_1", "water_in_temp", "Water In")
        .map_port(ComponentType::Evaporator, "evap_l", "outlet_circuit_2", "LH Out 2")
        .map_role("evap_r.outlet_circuit_1", "RH Out 1")
        .map_role("Compressor.comp_9.SP", "Leftover");
    builder.build().unwrap()
}

#[test]
fn port_listing_covers_every_enumerated_port() {
    let topology = three_circuit_rig();
    let listing = topology.port_listing();

    // compressor 5 + water-cooled condenser 6 + three 2-circuit evaporators 4 each
    assert_eq!(listing.len(), 5 + 6 + 12);

    let lh = listing
        .iter()
        .find(|row| row.component_id == "evap_l" && row.port == "outlet_circuit_2")
        .unwrap();
    assert_eq!(lh.label, "Outlet Circuit 2");
    assert_eq!(lh.channel.as_deref(), Some("LH Out 2"));
}

#[test]
fn legacy_keys_resolve_through_snapshot() {
    let topology = three_circuit_rig();
    let evap = topology.component("evap_r").unwrap();
    assert_eq!(evap.circuit_label(), Some(CircuitLabel::Right));
    assert_eq!(topology.mapped_channel(evap, "outlet_circuit_1"), Some("RH Out 1"));
    assert_eq!(topology.mapped_channel(evap, "outlet_circuit_2"), None);
}

#[test]
fn stale_keys_are_reported() {
    let topology = three_circuit_rig();
    assert_eq!(topology.stale_role_keys(), ["Compressor.comp_9.SP"]);
}

#[test]
fn dynamic_ports_carry_their_origin() {
    let topology = three_circuit_rig();
    let ports = topology.ports("evap_c").unwrap();
    assert!(ports.iter().any(|p| p.origin
        == PortOrigin::Dynamic {
            prefix: "inlet_circuit_",
            index: 2
        }));
    assert!(topology.ports("missing").is_none());
}
