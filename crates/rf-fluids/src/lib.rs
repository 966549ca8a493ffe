//! rf-fluids: refrigerant property evaluation for refrigflow.
//!
//! Provides:
//! - Refrigerant catalog (R410A, R22, R32, R134a, blends, naturals)
//! - `Property` / `StateSpec`: what to ask and which two state variables fix the state
//! - `PropertyOracle` trait, the only seam the calculation core talks to
//! - CoolProp backend (via `rfluids`) for real properties
//! - Closed-form surrogate backend for offline runs and deterministic tests
//!
//! # Example
//!
//! ```no_run
//! use rf_core::units::{k, pa};
//! use rf_fluids::{CoolPropOracle, Property, PropertyOracle, Refrigerant, StateSpec};
//!
//! let oracle = CoolPropOracle::new();
//! let h = oracle
//!     .evaluate(
//!         Property::Enthalpy,
//!         StateSpec::PT { p: pa(1.0e6), t: k(320.0) },
//!         Refrigerant::R410A,
//!     )
//!     .unwrap();
//! println!("h = {h} J/kg");
//! ```

pub mod coolprop;
pub mod error;
pub mod oracle;
pub mod property;
pub mod refrigerant;
pub mod surrogate;

pub use coolprop::CoolPropOracle;
pub use error::{FluidError, FluidResult};
pub use oracle::PropertyOracle;
pub use property::{PointProps, Property, StateSpec};
pub use refrigerant::Refrigerant;
pub use surrogate::{SurrogateOracle, SurrogateParams};
