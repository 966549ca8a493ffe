//! rf-core: shared foundation for refrigflow.
//!
//! Contains:
//! - units (uom SI types, constructors, and the field conversions used by the calculations)
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{RfError, RfResult};
pub use numeric::*;
pub use units::*;
