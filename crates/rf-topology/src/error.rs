//! Topology-specific error types.

/// Result type for topology operations.
pub type TopologyResult<T> = Result<T, TopologyError>;

/// Topology construction and validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// Two components share one id.
    DuplicateComponent { id: String },

    /// Component id is empty or whitespace.
    EmptyId,

    /// A property refers to a component that was never added.
    UnknownComponent { id: String },

    /// Unrecognized component type name.
    UnknownComponentType { name: String },

    /// A count property that drives dynamic ports is not a usable integer.
    InvalidCount {
        id: String,
        property: String,
        reason: String,
    },
}

impl std::fmt::Display for TopologyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopologyError::DuplicateComponent { id } => {
                write!(f, "Component id '{}' is used more than once", id)
            }
            TopologyError::EmptyId => write!(f, "Component id must not be empty"),
            TopologyError::UnknownComponent { id } => {
                write!(f, "Component '{}' does not exist", id)
            }
            TopologyError::UnknownComponentType { name } => {
                write!(f, "Unknown component type '{}'", name)
            }
            TopologyError::InvalidCount {
                id,
                property,
                reason,
            } => {
                write!(
                    f,
                    "Component '{}' has an invalid '{}' property: {}",
                    id, property, reason
                )
            }
        }
    }
}

impl std::error::Error for TopologyError {}
