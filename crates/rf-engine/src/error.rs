//! Error types for the calculation engine.

/// Configuration problems found while compiling a session into a run.
///
/// Numeric failures never surface here: calibration degrades to its default,
/// row failures become `RowOutput::Failed`, and the cycle model collects strings.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Unknown refrigerant: {0}")]
    UnknownRefrigerant(String),

    #[error("Unknown component type '{kind}' for component {id}")]
    UnknownComponentType { id: String, kind: String },

    #[error("Topology error: {0}")]
    Topology(#[from] rf_topology::TopologyError),

    #[error("Project error: {0}")]
    Project(#[from] rf_project::ProjectError),
}

pub type EngineResult<T> = Result<T, EngineError>;
