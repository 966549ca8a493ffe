//! 8-point vapor-compression cycle model.
//!
//! Points follow the refrigerant around the loop:
//!
//! | point | location             | pressure  | reference |
//! |-------|----------------------|-----------|-----------|
//! | 1     | evaporator inlet     | suction   | isenthalpic from 4b |
//! | 2a    | evaporator outlet    | suction   | superheat |
//! | 2b    | compressor inlet     | suction   | superheat |
//! | 3a    | compressor outlet    | discharge | superheat |
//! | 3b    | condenser inlet      | discharge | superheat |
//! | 4a    | condenser outlet     | discharge | subcooling |
//! | 4b    | expansion inlet      | discharge | subcooling |
//!
//! Every state is computed independently. An oracle failure is recorded as an
//! error string and the remaining points are still evaluated.

use std::collections::BTreeMap;

use rf_core::units::field::{delta_fahrenheit, to_fahrenheit};
use rf_core::units::{Pressure, Temperature};
use rf_fluids::{FluidResult, Property, PropertyOracle, Refrigerant, StateSpec};
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CycleTemperatures {
    pub compressor_outlet: Option<Temperature>,
    pub condenser_inlet: Option<Temperature>,
    pub condenser_outlet: Option<Temperature>,
    pub expansion_inlet: Option<Temperature>,
    pub evaporator_outlet: Option<Temperature>,
    pub compressor_inlet: Option<Temperature>,
}

/// Absolute pressures plus whichever temperatures are known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleInputs {
    pub suction: Pressure,
    pub discharge: Pressure,
    pub temperatures: CycleTemperatures,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatePoint {
    EvaporatorInlet,
    EvaporatorOutlet,
    CompressorInlet,
    CompressorOutlet,
    CondenserInlet,
    CondenserOutlet,
    ExpansionInlet,
}

impl StatePoint {
    pub const ALL: [StatePoint; 7] = [
        StatePoint::EvaporatorInlet,
        StatePoint::EvaporatorOutlet,
        StatePoint::CompressorInlet,
        StatePoint::CompressorOutlet,
        StatePoint::CondenserInlet,
        StatePoint::CondenserOutlet,
        StatePoint::ExpansionInlet,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            StatePoint::EvaporatorInlet => "1",
            StatePoint::EvaporatorOutlet => "2a",
            StatePoint::CompressorInlet => "2b",
            StatePoint::CompressorOutlet => "3a",
            StatePoint::CondenserInlet => "3b",
            StatePoint::CondenserOutlet => "4a",
            StatePoint::ExpansionInlet => "4b",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatePoint::EvaporatorInlet => "evaporator inlet",
            StatePoint::EvaporatorOutlet => "evaporator outlet",
            StatePoint::CompressorInlet => "compressor inlet",
            StatePoint::CompressorOutlet => "compressor outlet",
            StatePoint::CondenserInlet => "condenser inlet",
            StatePoint::CondenserOutlet => "condenser outlet",
            StatePoint::ExpansionInlet => "expansion inlet",
        }
    }

    fn on_suction_side(&self) -> bool {
        matches!(
            self,
            StatePoint::EvaporatorInlet | StatePoint::EvaporatorOutlet | StatePoint::CompressorInlet
        )
    }

    fn is_liquid_line(&self) -> bool {
        matches!(self, StatePoint::CondenserOutlet | StatePoint::ExpansionInlet)
    }
}

impl std::fmt::Display for StatePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.label(), self.key())
    }
}

impl Serialize for StatePoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

/// Distance from saturation in °F; signed, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Margin {
    Superheat(f64),
    Subcooling(f64),
}

impl Margin {
    pub fn value(&self) -> f64 {
        match self {
            Margin::Superheat(v) | Margin::Subcooling(v) => *v,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateResult {
    pub t_k: f64,
    pub p_pa: f64,
    pub h_j_per_kg: f64,
    pub s_j_per_kg_k: f64,
    pub rho_kg_m3: f64,
    pub t_sat_k: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    /// Vapor quality, only inside the dome.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<f64>,
}

impl StateResult {
    pub fn t_f(&self) -> f64 {
        to_fahrenheit(rf_core::units::k(self.t_k))
    }
}

/// Specific (per kg) cycle figures [J/kg].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CyclePerformance {
    pub refrigeration_effect: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compressor_work: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heat_rejected: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cop: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleResult {
    pub refrigerant: Refrigerant,
    pub suction_pa: f64,
    pub discharge_pa: f64,
    pub states: BTreeMap<StatePoint, StateResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<CyclePerformance>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl CycleResult {
    pub fn state(&self, point: StatePoint) -> Option<&StateResult> {
        self.states.get(&point)
    }

    /// Suction-gas density at the compressor inlet, feeding mass flow.
    pub fn compressor_inlet_density(&self) -> Option<f64> {
        self.state(StatePoint::CompressorInlet).map(|s| s.rho_kg_m3)
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

struct Cycle<'o, O: ?Sized> {
    oracle: &'o O,
    refrigerant: Refrigerant,
    suction: Pressure,
    discharge: Pressure,
}

impl<O: PropertyOracle + ?Sized> Cycle<'_, O> {
    fn pressure(&self, point: StatePoint) -> Pressure {
        if point.on_suction_side() {
            self.suction
        } else {
            self.discharge
        }
    }

    /// State at a measured temperature.
    fn measured(&self, point: StatePoint, t: Temperature) -> FluidResult<StateResult> {
        let p = self.pressure(point);
        let props = self.oracle.point_props(StateSpec::PT { p, t }, self.refrigerant)?;
        let liquid = point.is_liquid_line();
        let q_sat = if liquid { 0.0 } else { 1.0 };
        let t_sat = self.oracle.saturation_temperature(p, q_sat, self.refrigerant)?;
        let dt = delta_fahrenheit(t.value - t_sat.value);
        let margin = if liquid {
            Margin::Subcooling(-dt)
        } else {
            Margin::Superheat(dt)
        };
        Ok(StateResult {
            t_k: t.value,
            p_pa: p.value,
            h_j_per_kg: props.h,
            s_j_per_kg_k: props.s,
            rho_kg_m3: props.rho,
            t_sat_k: t_sat.value,
            margin: Some(margin),
            quality: None,
        })
    }

    /// Evaporator inlet after isenthalpic expansion from `h`.
    fn throttled(&self, h: f64) -> FluidResult<StateResult> {
        let p = self.suction;
        let state = StateSpec::PH { p, h };
        let eval = |target| self.oracle.evaluate(target, state, self.refrigerant);
        let t_k = eval(Property::Temperature)?;
        let rho = eval(Property::Density)?;
        let s = eval(Property::Entropy)?;
        let quality = eval(Property::Quality)?;
        let t_sat = self.oracle.saturation_temperature(p, 1.0, self.refrigerant)?;
        Ok(StateResult {
            t_k,
            p_pa: p.value,
            h_j_per_kg: h,
            s_j_per_kg_k: s,
            rho_kg_m3: rho,
            t_sat_k: t_sat.value,
            margin: None,
            quality: Some(quality).filter(|q| (0.0..=1.0).contains(q)),
        })
    }

    fn isentropic_discharge_enthalpy(&self, s: f64) -> FluidResult<f64> {
        self.oracle.evaluate(
            Property::Enthalpy,
            StateSpec::PS {
                p: self.discharge,
                s,
            },
            self.refrigerant,
        )
    }
}

fn margin_warning(point: StatePoint, margin: Margin) -> Option<String> {
    match margin {
        Margin::Superheat(v) if v < 0.0 => Some(format!(
            "{} is {:.1} °F below saturation",
            point,
            -v
        )),
        Margin::Subcooling(v) if v < 0.0 => Some(format!(
            "{} is {:.1} °F above saturation",
            point,
            -v
        )),
        _ => None,
    }
}

/// Evaluate every state the inputs allow, then the specific performance figures.
pub fn compute_cycle<O: PropertyOracle + ?Sized>(
    oracle: &O,
    refrigerant: Refrigerant,
    inputs: &CycleInputs,
) -> CycleResult {
    let cycle = Cycle {
        oracle,
        refrigerant,
        suction: inputs.suction,
        discharge: inputs.discharge,
    };
    let mut result = CycleResult {
        refrigerant,
        suction_pa: inputs.suction.value,
        discharge_pa: inputs.discharge.value,
        states: BTreeMap::new(),
        performance: None,
        errors: Vec::new(),
        warnings: Vec::new(),
    };

    let temps = &inputs.temperatures;
    let measured = [
        (StatePoint::CompressorOutlet, temps.compressor_outlet),
        (StatePoint::CondenserInlet, temps.condenser_inlet),
        (StatePoint::CondenserOutlet, temps.condenser_outlet),
        (StatePoint::ExpansionInlet, temps.expansion_inlet),
        (StatePoint::EvaporatorOutlet, temps.evaporator_outlet),
        (StatePoint::CompressorInlet, temps.compressor_inlet),
    ];
    for (point, t) in measured {
        let Some(t) = t else { continue };
        match cycle.measured(point, t) {
            Ok(state) => {
                if let Some(w) = state.margin.and_then(|m| margin_warning(point, m)) {
                    result.warnings.push(w);
                }
                result.states.insert(point, state);
            }
            Err(e) => result.errors.push(format!("State {} ({}): {}", point.key(), point.label(), e)),
        }
    }

    if let Some(h_4b) = result.state(StatePoint::ExpansionInlet).map(|s| s.h_j_per_kg) {
        match cycle.throttled(h_4b) {
            Ok(state) => {
                result.states.insert(StatePoint::EvaporatorInlet, state);
            }
            Err(e) => result.errors.push(format!("State 1 (evaporator inlet): {}", e)),
        }
    }

    let h = |point| result.state(point).map(|s: &StateResult| s.h_j_per_kg);
    let suction = result
        .state(StatePoint::CompressorInlet)
        .map(|s| (s.h_j_per_kg, s.s_j_per_kg_k));
    if let (Some((h_2b, s_2b)), Some(h_4b)) = (suction, h(StatePoint::ExpansionInlet)) {
        let refrigeration_effect = h_2b - h_4b;
        let heat_rejected = h(StatePoint::CompressorOutlet)
            .zip(h(StatePoint::CondenserOutlet))
            .map(|(h_3a, h_4a)| h_3a - h_4a);
        let compressor_work = match cycle.isentropic_discharge_enthalpy(s_2b) {
            Ok(h_3s) => Some(h_3s - h_2b),
            Err(e) => {
                result.errors.push(format!("Isentropic compressor work: {}", e));
                None
            }
        };
        let cop = compressor_work
            .filter(|w| *w > 0.0)
            .map(|w| refrigeration_effect / w);
        result.performance = Some(CyclePerformance {
            refrigeration_effect,
            compressor_work,
            heat_rejected,
            cop,
        });
    }

    for w in &result.warnings {
        tracing::warn!(%refrigerant, "{}", w);
    }
    if !result.errors.is_empty() {
        tracing::warn!(%refrigerant, errors = result.errors.len(), "cycle computed with errors");
    }
    result
}
