//! Fluid property errors.

use rf_core::RfError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors raised by a property oracle. All of them are recoverable for the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical values (negative pressure, quality outside 0..=1, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Value out of the backend's valid range.
    #[error("Value out of range for {what}")]
    OutOfRange { what: &'static str },

    /// Operation not supported (refrigerant without backend data, input pair, ...).
    #[error("Not supported: {what}")]
    NotSupported { what: &'static str },

    /// Backend (CoolProp) error.
    #[error("Backend error: {message}")]
    Backend { message: String },
}

impl From<RfError> for FluidError {
    fn from(err: RfError) -> Self {
        match err {
            RfError::NonFinite { what, .. } => FluidError::NonPhysical { what },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FluidError::NonPhysical { what: "pressure" };
        assert!(err.to_string().contains("pressure"));

        let err = FluidError::Backend {
            message: "CoolProp failed".into(),
        };
        assert!(err.to_string().contains("CoolProp"));
    }

    #[test]
    fn core_error_maps_to_non_physical() {
        let err: FluidError = RfError::NonFinite {
            what: "temperature",
            value: f64::NAN,
        }
        .into();
        assert_eq!(err, FluidError::NonPhysical { what: "temperature" });
    }
}
