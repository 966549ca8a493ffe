//! Run-level entry points: single-instant system analysis and batch processing.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use rayon::prelude::*;
use rf_core::numeric::mean;
use rf_core::units::Volume;
use rf_core::units::field::{cubic_feet, fahrenheit, psig};
use rf_fluids::PropertyOracle;
use rf_topology::{CircuitLabel, Component, ComponentType, PortOrigin, enumerate_ports};
use serde::Serialize;

use crate::calibration::{CalibrationResult, DEFAULT_ETA_VOL, calibrate};
use crate::compile::RunContext;
use crate::cycle::{CycleInputs, CycleResult, CycleTemperatures, compute_cycle};
use crate::guard::{ResolutionReport, resolve_all};
use crate::performance::{MassFlowSummary, SystemPerformance, mass_flow, system_performance};
use crate::schema::RowOutput;
use crate::series::{ChannelReader, Series};
use crate::transform::{RowContext, transform_row};

const EVAPORATOR_OUTLETS: &str = "outlet_circuit_";

/// Single-instant analysis of the whole system.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FullSystemResult {
    /// The cycle ran without property errors.
    pub ok: bool,
    pub cycle: Option<CycleResult>,
    pub mass_flow: Option<MassFlowSummary>,
    pub performance: Option<SystemPerformance>,
    pub errors: Vec<String>,
}

/// Single-instant cycle restricted to one labelled circuit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircuitResult {
    pub ok: bool,
    pub circuit: CircuitLabel,
    pub cycle: Option<CycleResult>,
    pub errors: Vec<String>,
}

/// One output row, aligned with the input row it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(flatten)]
    pub output: RowOutput,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutput {
    pub rows: Vec<OutputRow>,
    pub calibration: CalibrationResult,
    pub resolution: ResolutionReport,
}

impl BatchOutput {
    pub fn failed_rows(&self) -> usize {
        self.rows.iter().filter(|r| r.output.error().is_some()).count()
    }
}

/// Compressor figures for the single-instant mass flow.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct CompressorSpecs {
    displacement: Option<Volume>,
    speed_rpm: Option<f64>,
    eta_vol: f64,
}

/// A compiled run bound to a property oracle.
pub struct Engine<O> {
    ctx: RunContext,
    oracle: O,
}

impl<O: PropertyOracle> Engine<O> {
    pub fn new(ctx: RunContext, oracle: O) -> Self {
        Self { ctx, oracle }
    }

    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Resolve every role, demoting channels absent from `columns` when given.
    pub fn resolve(&self, columns: Option<&BTreeSet<String>>) -> ResolutionReport {
        resolve_all(
            &self.ctx.topology,
            &self.ctx.roles,
            self.ctx.settings.ambiguity,
            columns,
        )
    }

    pub fn calibrate(&self) -> CalibrationResult {
        calibrate(&self.oracle, &self.ctx.rated, self.ctx.refrigerant)
    }

    /// Resolve once, calibrate once, then transform every row independently.
    ///
    /// Output order equals input order whether or not rows run in parallel.
    pub fn run_batch(&self, series: &Series) -> BatchOutput {
        let span = tracing::info_span!("batch", rows = series.len(), oracle = self.oracle.name());
        let _enter = span.enter();

        let columns = series.columns();
        let resolution = self.resolve(Some(&columns));
        let calibration = self.calibrate();
        let row_ctx = RowContext {
            channels: &resolution.bindings,
            eta_vol: calibration.eta_vol,
            displacement: self.ctx.row_displacement(),
            refrigerant: self.ctx.refrigerant,
        };

        let transform = |row: &crate::series::Row| OutputRow {
            timestamp: row.timestamp,
            output: transform_row(&self.oracle, row, &row_ctx),
        };
        let rows: Vec<OutputRow> = if self.ctx.settings.parallel {
            series.rows.par_iter().map(transform).collect()
        } else {
            series.rows.iter().map(transform).collect()
        };

        let output = BatchOutput {
            rows,
            calibration,
            resolution,
        };
        tracing::info!(
            rows = output.rows.len(),
            failed = output.failed_rows(),
            eta_vol = output.calibration.eta_vol,
            method = output.calibration.method.as_str(),
            "batch complete"
        );
        output
    }

    /// 8-point cycle, mass flow and performance for one instant of the whole system.
    ///
    /// Missing prerequisites are reported one error string each; every stage that
    /// can still run does.
    pub fn full_system<R: ChannelReader + ?Sized>(&self, reader: &R) -> FullSystemResult {
        let mut result = FullSystemResult::default();
        let compressor = self.first(ComponentType::Compressor);
        let condenser = self.first(ComponentType::Condenser);

        let suction = compressor.and_then(|c| self.port_value(reader, c, "SP"));
        let discharge = compressor.and_then(|c| self.port_value(reader, c, "DP"));
        if suction.is_none() {
            result
                .errors
                .push("Missing suction pressure - map Compressor.SP port".to_string());
        }
        if discharge.is_none() {
            result
                .errors
                .push("Missing liquid pressure - map Compressor.DP port".to_string());
        }

        let port_f = |c: Option<&Component>, port| c.and_then(|c| self.port_value(reader, c, port));
        let expansion_inlets: Vec<f64> = self
            .ctx
            .topology
            .components_of(ComponentType::Txv)
            .filter_map(|c| self.port_value(reader, c, "inlet"))
            .collect();
        let evaporator_outlets: Vec<f64> = self
            .ctx
            .topology
            .components_of(ComponentType::Evaporator)
            .flat_map(|c| self.family_values(reader, c, EVAPORATOR_OUTLETS))
            .collect();
        let temps_f = [
            port_f(compressor, "inlet"),
            port_f(compressor, "outlet"),
            port_f(condenser, "inlet"),
            port_f(condenser, "outlet"),
            mean(&expansion_inlets),
            mean(&evaporator_outlets),
        ];
        let [t_2b, t_3a, t_3b, t_4a, t_4b, t_2a] = temps_f;

        let required = [
            (t_2b, "Missing compressor inlet temp (T_2b) - map Compressor.inlet port"),
            (t_3a, "Missing compressor outlet temp (T_3a) - map Compressor.outlet port"),
            (t_4b, "Missing TXV inlet temp (T_4b) - map TXV.inlet port(s)"),
            (
                t_2a,
                "Missing evaporator outlet temp (T_2a) - map Evaporator.outlet_circuit_N port(s)",
            ),
        ];
        result.errors.extend(
            required
                .iter()
                .filter(|(t, _)| t.is_none())
                .map(|(_, msg)| msg.to_string()),
        );

        let specs = self.compressor_specs(reader, compressor);
        if specs.displacement.is_none() {
            result
                .errors
                .push("Missing compressor displacement - set in Compressor properties".to_string());
        }
        if specs.speed_rpm.is_none() {
            result.errors.push(
                "Missing compressor speed - map Compressor.RPM port or set in properties"
                    .to_string(),
            );
        }

        let (Some(suction), Some(discharge)) = (suction, discharge) else {
            return result;
        };
        let inputs = CycleInputs {
            suction: psig(suction),
            discharge: psig(discharge),
            temperatures: CycleTemperatures {
                compressor_outlet: t_3a.map(fahrenheit),
                condenser_inlet: t_3b.map(fahrenheit),
                condenser_outlet: t_4a.map(fahrenheit),
                expansion_inlet: t_4b.map(fahrenheit),
                evaporator_outlet: t_2a.map(fahrenheit),
                compressor_inlet: t_2b.map(fahrenheit),
            },
        };
        let cycle = compute_cycle(&self.oracle, self.ctx.refrigerant, &inputs);
        result.errors.extend(cycle.errors.iter().cloned());
        result.ok = cycle.is_ok();

        match (
            cycle.compressor_inlet_density(),
            specs.displacement,
            specs.speed_rpm,
        ) {
            (Some(rho), Some(displacement), Some(rpm)) => {
                let flow = mass_flow(rho, displacement, rpm, specs.eta_vol);
                result.performance = cycle
                    .performance
                    .as_ref()
                    .map(|p| system_performance(p, flow.actual_kg_s));
                result.mass_flow = Some(flow);
            }
            (None, _, _) => result
                .errors
                .push("Cannot calculate mass flow - missing density (need T_2b)".to_string()),
            _ => {}
        }
        result.cycle = Some(cycle);

        tracing::debug!(ok = result.ok, errors = result.errors.len(), "full system analysis");
        result
    }

    /// 8-point cycle using only one circuit's TXV inlet and evaporator outlets.
    ///
    /// Compressor temperatures and the condenser outlet are shared by all circuits.
    pub fn per_circuit<R: ChannelReader + ?Sized>(&self, reader: &R, circuit: CircuitLabel) -> CircuitResult {
        let mut result = CircuitResult {
            ok: false,
            circuit,
            cycle: None,
            errors: Vec::new(),
        };
        let compressor = self.first(ComponentType::Compressor);
        let condenser = self.first(ComponentType::Condenser);
        let port_f = |c: Option<&Component>, port| c.and_then(|c| self.port_value(reader, c, port));

        let (Some(suction), Some(discharge)) = (port_f(compressor, "SP"), port_f(compressor, "DP")) else {
            result.errors.push("Missing pressures".to_string());
            return result;
        };

        let on_circuit = |c: &&Component| c.circuit_label() == Some(circuit);
        let expansion_inlet = self
            .ctx
            .topology
            .components_of(ComponentType::Txv)
            .find(on_circuit)
            .and_then(|c| self.port_value(reader, c, "inlet"));
        let evaporator_outlets: Vec<f64> = self
            .ctx
            .topology
            .components_of(ComponentType::Evaporator)
            .filter(on_circuit)
            .flat_map(|c| self.family_values(reader, c, EVAPORATOR_OUTLETS))
            .collect();

        let inputs = CycleInputs {
            suction: psig(suction),
            discharge: psig(discharge),
            temperatures: CycleTemperatures {
                compressor_inlet: port_f(compressor, "inlet").map(fahrenheit),
                compressor_outlet: port_f(compressor, "outlet").map(fahrenheit),
                condenser_inlet: None,
                condenser_outlet: port_f(condenser, "outlet").map(fahrenheit),
                expansion_inlet: expansion_inlet.map(fahrenheit),
                evaporator_outlet: mean(&evaporator_outlets).map(fahrenheit),
            },
        };
        let cycle = compute_cycle(&self.oracle, self.ctx.refrigerant, &inputs);
        result.errors.extend(cycle.errors.iter().cloned());
        result.ok = cycle.is_ok();
        result.cycle = Some(cycle);
        result
    }

    fn first(&self, kind: ComponentType) -> Option<&Component> {
        self.ctx.topology.components_of(kind).next()
    }

    fn port_value<R: ChannelReader + ?Sized>(&self, reader: &R, component: &Component, port: &str) -> Option<f64> {
        self.ctx
            .topology
            .mapped_channel(component, port)
            .and_then(|channel| reader.value(channel))
    }

    /// Present values of every mapped port in one dynamic family.
    fn family_values<R: ChannelReader + ?Sized>(
        &self,
        reader: &R,
        component: &Component,
        family: &str,
    ) -> Vec<f64> {
        enumerate_ports(component)
            .iter()
            .filter(|p| matches!(p.origin, PortOrigin::Dynamic { prefix, .. } if prefix == family))
            .filter_map(|p| self.port_value(reader, component, &p.name))
            .collect()
    }

    fn compressor_specs<R: ChannelReader + ?Sized>(
        &self,
        reader: &R,
        compressor: Option<&Component>,
    ) -> CompressorSpecs {
        let Some(compressor) = compressor else {
            return CompressorSpecs {
                eta_vol: DEFAULT_ETA_VOL,
                ..CompressorSpecs::default()
            };
        };
        let positive = |v: Option<f64>| v.filter(|v| v.is_finite() && *v > 0.0);
        CompressorSpecs {
            displacement: self.ctx.compressor_displacement().or_else(|| {
                positive(self.ctx.rated.disp_ft3).map(cubic_feet)
            }),
            speed_rpm: positive(self.port_value(reader, compressor, "RPM"))
                .or_else(|| positive(compressor.number("speed_rpm"))),
            eta_vol: positive(compressor.number("vol_eff")).unwrap_or(DEFAULT_ETA_VOL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Row;
    use rf_fluids::{Refrigerant, SurrogateOracle};
    use rf_project::from_yaml_str;

    const SESSION: &str = r#"
version: 1
name: two circuits
refrigerant: R410A
components:
  - id: comp
    type: Compressor
    properties: { displacement_cm3: 40.0, speed_rpm: 3000 }
  - id: cond
    type: Condenser
  - id: evap_l
    type: Evaporator
    properties: { circuits: 2, circuit_label: Left }
  - id: evap_r
    type: Evaporator
    properties: { circuits: 1, circuit_label: Right }
  - id: txv_l
    type: TXV
    properties: { circuit_label: Left }
  - id: txv_r
    type: TXV
    properties: { circuit_label: Right }
sensor_roles:
  Compressor.comp.SP: SP
  Compressor.comp.DP: DP
  Compressor.comp.inlet: T2b
  Compressor.comp.outlet: T3a
  Condenser.cond.outlet: T4a
  Evaporator.evap_l.outlet_circuit_1: L1
  Evaporator.evap_l.outlet_circuit_2: L2
  Evaporator.evap_r.outlet_circuit_1: R1
  TXV.txv_l.inlet: TXV L
  TXV.txv_r.inlet: TXV R
"#;

    fn engine() -> Engine<SurrogateOracle> {
        let project = from_yaml_str(SESSION).unwrap();
        let ctx = crate::compile::compile_project(&project).unwrap();
        Engine::new(ctx, SurrogateOracle::new())
    }

    fn row() -> Row {
        Row::new()
            .with("SP", 118.0)
            .with("DP", 340.0)
            .with("T2b", 55.0)
            .with("T3a", 170.0)
            .with("T4a", 95.0)
            .with("L1", 50.0)
            .with("L2", 52.0)
            .with("R1", 57.0)
            .with("TXV L", 92.0)
            .with("TXV R", 94.0)
    }

    #[test]
    fn full_system_averages_circuits_and_falls_back_to_speed_property() {
        let r = engine().full_system(&row());
        assert!(r.ok, "{:?}", r.errors);
        assert!(r.errors.is_empty(), "{:?}", r.errors);
        let cycle = r.cycle.unwrap();
        let t_2a = cycle.state(crate::cycle::StatePoint::EvaporatorOutlet).unwrap().t_f();
        assert!((t_2a - 53.0).abs() < 1e-9);
        let t_4b = cycle.state(crate::cycle::StatePoint::ExpansionInlet).unwrap().t_f();
        assert!((t_4b - 93.0).abs() < 1e-9);
        assert!(r.mass_flow.unwrap().actual_kg_s > 0.0);
        assert!(r.performance.unwrap().cop.unwrap() > 0.0);
    }

    #[test]
    fn full_system_accumulates_every_missing_prerequisite() {
        let mut row = row();
        for ch in ["SP", "T3a", "TXV L", "TXV R"] {
            row.values.remove(ch);
        }
        let r = engine().full_system(&row);
        assert!(!r.ok);
        assert!(r.cycle.is_none());
        assert_eq!(
            r.errors,
            [
                "Missing suction pressure - map Compressor.SP port",
                "Missing compressor outlet temp (T_3a) - map Compressor.outlet port",
                "Missing TXV inlet temp (T_4b) - map TXV.inlet port(s)",
            ]
        );
    }

    #[test]
    fn per_circuit_uses_only_that_circuit() {
        let r = engine().per_circuit(&row(), CircuitLabel::Right);
        assert!(r.ok);
        let cycle = r.cycle.unwrap();
        let t_2a = cycle.state(crate::cycle::StatePoint::EvaporatorOutlet).unwrap().t_f();
        assert!((t_2a - 57.0).abs() < 1e-9);

        let center = engine().per_circuit(&row(), CircuitLabel::Center);
        let cycle = center.cycle.unwrap();
        assert!(cycle.state(crate::cycle::StatePoint::ExpansionInlet).is_none());
        assert!(cycle.performance.is_none());
    }

    #[test]
    fn per_circuit_without_pressures_fails_early() {
        let mut row = row();
        row.values.remove("DP");
        let r = engine().per_circuit(&row, CircuitLabel::Left);
        assert_eq!(r.errors, ["Missing pressures"]);
        assert!(r.cycle.is_none());
    }

    #[test]
    fn parallel_batch_matches_sequential() {
        let series: Series = (0..16)
            .map(|i| {
                let r = row().with("T2b", 55.0 + i as f64 * 0.25);
                if i % 5 == 2 { r.with("SP", f64::NAN) } else { r }
            })
            .collect();
        let sequential = engine().run_batch(&series);

        let mut parallel_engine = engine();
        parallel_engine.ctx.settings.parallel = true;
        let parallel = parallel_engine.run_batch(&series);

        assert_eq!(sequential, parallel);
        assert_eq!(sequential.rows.len(), 16);
        assert_eq!(sequential.failed_rows(), 3);
        assert_eq!(sequential.calibration.eta_vol, DEFAULT_ETA_VOL);
        assert_eq!(parallel_engine.context().refrigerant, Refrigerant::R410A);
    }
}
