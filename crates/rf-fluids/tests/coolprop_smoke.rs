//! CoolProp integration tests.
//!
//! Broad tolerances avoid backend version drift while still enforcing physical plausibility.

use rf_core::units::field::{fahrenheit, psig, to_fahrenheit};
use rf_core::units::{k, pa};
use rf_fluids::{CoolPropOracle, Property, PropertyOracle, Refrigerant, StateSpec};

#[test]
fn r410a_saturation_at_typical_suction() {
    let oracle = CoolPropOracle::new();
    // 118 psig is a textbook R410A suction pressure at roughly 40 °F saturation
    let t_sat = oracle
        .saturation_temperature(psig(118.0), 0.0, Refrigerant::R410A)
        .unwrap();
    let t_f = to_fahrenheit(t_sat);
    assert!(t_f > 35.0 && t_f < 45.0, "T_sat = {} °F", t_f);
}

#[test]
fn r134a_density_liquid_vs_vapor() {
    let oracle = CoolPropOracle::new();
    let p = pa(500_000.0);
    let liquid = oracle
        .evaluate(Property::Density, StateSpec::PT { p, t: k(280.0) }, Refrigerant::R134a)
        .unwrap();
    let vapor = oracle
        .evaluate(Property::Density, StateSpec::PT { p, t: k(320.0) }, Refrigerant::R134a)
        .unwrap();
    assert!(liquid > 1100.0 && liquid < 1400.0, "rho_l = {}", liquid);
    assert!(vapor > 15.0 && vapor < 40.0, "rho_v = {}", vapor);
}

#[test]
fn isenthalpic_throttling_produces_two_phase() {
    let oracle = CoolPropOracle::new();
    let h = oracle
        .evaluate(
            Property::Enthalpy,
            StateSpec::PT { p: psig(250.0), t: fahrenheit(80.0) },
            Refrigerant::R410A,
        )
        .unwrap();
    let q = oracle
        .evaluate(Property::Quality, StateSpec::PH { p: psig(118.0), h }, Refrigerant::R410A)
        .unwrap();
    assert!(q > 0.05 && q < 0.5, "quality = {}", q);
}

#[test]
fn isentropic_compression_raises_enthalpy() {
    let oracle = CoolPropOracle::new();
    let r = Refrigerant::R410A;
    let inlet = oracle
        .point_props(StateSpec::PT { p: psig(118.0), t: fahrenheit(55.0) }, r)
        .unwrap();
    let h_out = oracle
        .evaluate(Property::Enthalpy, StateSpec::PS { p: psig(400.0), s: inlet.s }, r)
        .unwrap();
    let work = h_out - inlet.h;
    assert!(work > 10_000.0 && work < 80_000.0, "work = {} J/kg", work);
}

#[test]
fn every_catalog_refrigerant_has_backend_data() {
    let oracle = CoolPropOracle::new();
    for r in Refrigerant::ALL {
        let t = if r == Refrigerant::R744 { k(260.0) } else { k(270.0) };
        let p = oracle.saturation_pressure(t, 1.0, r);
        assert!(p.is_ok(), "{} failed: {:?}", r, p.err());
    }
}
