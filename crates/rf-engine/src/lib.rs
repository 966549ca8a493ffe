//! rf-engine: the refrigflow calculation core.
//!
//! Stages, in run order:
//! - Role resolution: sensor roles → channels through the topology, with a
//!   duplicate-channel guard and a check against the series columns
//! - Calibration: one-time volumetric efficiency from nameplate data
//! - Row transform: per-row performance fields, or a single error
//! - 8-point cycle model and system performance for single-instant analysis
//!
//! Every stage is a pure function of an immutable `RunContext` plus its input.
//!
//! # Example
//!
//! ```no_run
//! use rf_engine::{Engine, Series, compile_project};
//! use rf_fluids::CoolPropOracle;
//!
//! let project = rf_project::load(std::path::Path::new("session.yaml")).unwrap();
//! let engine = Engine::new(compile_project(&project).unwrap(), CoolPropOracle::new());
//! let series: Series = serde_json::from_str("[]").unwrap();
//! let output = engine.run_batch(&series);
//! println!("{} rows, eta_vol = {}", output.rows.len(), output.calibration.eta_vol);
//! ```

pub mod calibration;
pub mod compile;
pub mod cycle;
pub mod error;
pub mod guard;
pub mod orchestrator;
pub mod performance;
pub mod resolver;
pub mod roles;
pub mod schema;
pub mod series;
pub mod transform;

pub use calibration::{
    CalibrationMethod, CalibrationResult, DEFAULT_ETA_VOL, RatedInputs, calibrate,
};
pub use compile::{EngineSettings, RunContext, compile_project};
pub use cycle::{
    CycleInputs, CyclePerformance, CycleResult, CycleTemperatures, Margin, StatePoint,
    StateResult, compute_cycle,
};
pub use error::{EngineError, EngineResult};
pub use guard::{ChannelMap, Conflict, ResolutionReport, resolve_all};
pub use orchestrator::{BatchOutput, CircuitResult, Engine, FullSystemResult, OutputRow};
pub use performance::{MassFlowSummary, SystemPerformance, mass_flow, system_performance};
pub use resolver::{AmbiguityPolicy, Binding, resolve_role};
pub use roles::{PortSelector, RoleDefinition, RoleRule, RoleTable, SensorRole};
pub use schema::{Column, RowFields, RowOutput};
pub use series::{AggregationMethod, ChannelReader, Row, Series, SeriesAggregate};
pub use transform::{RowContext, transform_row};
