//! End-to-end runs over the demo session, with both property backends.

use std::path::PathBuf;

use rf_core::units::field::{fahrenheit, psig};
use rf_engine::{
    CalibrationMethod, Column, CycleInputs, CycleTemperatures, Engine, Series, StatePoint,
    compile_project, compute_cycle,
};
use rf_fluids::{CoolPropOracle, PropertyOracle, Refrigerant, SurrogateOracle};

fn demo(rel: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos").join(rel)
}

fn engine<O: PropertyOracle>(oracle: O) -> Engine<O> {
    let project = rf_project::load(&demo("sessions/three_circuit.yaml")).unwrap();
    Engine::new(compile_project(&project).unwrap(), oracle)
}

fn series() -> Series {
    let text = std::fs::read_to_string(demo("series/three_rows.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn check_reference_cycle<O: PropertyOracle>(oracle: O) {
    let inputs = CycleInputs {
        suction: psig(10.0),
        discharge: psig(250.0),
        temperatures: CycleTemperatures {
            compressor_inlet: Some(fahrenheit(50.0)),
            expansion_inlet: Some(fahrenheit(95.0)),
            ..CycleTemperatures::default()
        },
    };
    let result = compute_cycle(&oracle, Refrigerant::R410A, &inputs);
    assert!(result.is_ok(), "{:?}", result.errors);

    let h_2b = result.state(StatePoint::CompressorInlet).unwrap().h_j_per_kg;
    let h_4b = result.state(StatePoint::ExpansionInlet).unwrap().h_j_per_kg;
    let h_1 = result.state(StatePoint::EvaporatorInlet).unwrap().h_j_per_kg;
    assert!(h_2b.is_finite() && h_4b.is_finite());
    assert_eq!(h_1, h_4b);
    assert!(result.performance.unwrap().cop.unwrap() > 0.0);
}

fn check_missing_suction_row<O: PropertyOracle>(oracle: O) {
    let output = engine(oracle).run_batch(&series());
    assert_eq!(output.rows.len(), 3);

    let row2 = &output.rows[1].output;
    assert_eq!(
        row2.error(),
        Some("Missing pressure sensors - map suction and discharge pressure sensors")
    );
    assert!(row2.fields().is_none());

    for i in [0, 2] {
        let fields = output.rows[i].output.fields().unwrap();
        assert_eq!(fields.len(), Column::COUNT, "row {} has {:?}", i + 1, fields.keys());
    }
    assert_eq!(
        output.rows[2].timestamp.unwrap().to_string(),
        "2026-06-01 12:00:20"
    );
}

fn check_resolution_and_calibration<O: PropertyOracle>(oracle: O) {
    let output = engine(oracle).run_batch(&series());
    assert!(output.resolution.is_clean(), "{}", output.resolution.summary());
    assert_eq!(output.calibration.method, CalibrationMethod::Calculated);
    // A nameplate that implies eta_vol outside (0.3, 1.2) would indicate a unit slip.
    let eta = output.calibration.eta_vol;
    assert!(eta > 0.3 && eta < 1.2, "eta_vol = {}", eta);
}

#[test]
fn r410a_cycle_at_reference_conditions() {
    check_reference_cycle(CoolPropOracle::new());
}

#[test]
fn r410a_cycle_at_reference_conditions_surrogate() {
    check_reference_cycle(SurrogateOracle::new());
}

#[test]
fn batch_row_without_suction_pressure_is_a_single_error() {
    check_missing_suction_row(CoolPropOracle::new());
}

#[test]
fn batch_row_without_suction_pressure_is_a_single_error_surrogate() {
    check_missing_suction_row(SurrogateOracle::new());
}

#[test]
fn demo_session_resolves_cleanly_and_calibrates() {
    check_resolution_and_calibration(CoolPropOracle::new());
}

#[test]
fn demo_session_resolves_cleanly_and_calibrates_surrogate() {
    check_resolution_and_calibration(SurrogateOracle::new());
}

#[test]
fn removing_speed_changes_only_mass_flow_and_capacity() {
    let engine = engine(SurrogateOracle::new());
    let mut data = series();
    let full = engine.run_batch(&data);
    for row in &mut data.rows {
        row.values.remove("Comp RPM");
    }
    let reduced = engine.run_batch(&data);

    let mut expected = full.rows[0].output.fields().unwrap().clone();
    assert!(expected.remove(&Column::MassFlow).is_some());
    assert!(expected.remove(&Column::CoolingCapacity).is_some());
    assert_eq!(reduced.rows[0].output.fields().unwrap(), &expected);
}

#[test]
fn batch_serializes_as_flat_rows() {
    let output = engine(SurrogateOracle::new()).run_batch(&series());
    let json = serde_json::to_value(&output.rows).unwrap();
    assert_eq!(json[0]["timestamp"], "2026-06-01T12:00:00");
    assert_eq!(json[0]["P_suction"], 118.0);
    assert!(json[0]["m_dot"].as_f64().unwrap() > 0.0);
    assert_eq!(json[1]["error"].as_str().unwrap().split(' ').next(), Some("Missing"));
    assert!(json[1].get("P_suction").is_none());
}

#[test]
fn full_system_on_the_demo_rig() {
    let engine = engine(SurrogateOracle::new());
    let data = series();
    let reader = rf_engine::SeriesAggregate::new(&data, engine.context().settings.aggregation);
    let result = engine.full_system(&reader);
    assert!(result.ok, "{:?}", result.errors);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let flow = result.mass_flow.unwrap();
    assert!((flow.eta_vol - 0.85).abs() < 1e-12);
    let perf = result.performance.unwrap();
    assert!(perf.cooling_capacity_tons > 0.0);
    assert!(perf.eer.unwrap() > 0.0);
}
