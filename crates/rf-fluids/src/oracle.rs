//! The property-oracle seam.

use crate::error::{FluidError, FluidResult};
use crate::property::{PointProps, Property, StateSpec};
use crate::refrigerant::Refrigerant;
use rf_core::units::{Pressure, Temperature, k, pa};

/// Synchronous, side-effect-free property evaluation.
///
/// The calculation core decides what to ask; implementations decide how to answer.
/// Implementations must be thread-safe (Send + Sync) so batch rows can be evaluated
/// in parallel against one shared oracle.
pub trait PropertyOracle: Send + Sync {
    /// Backend name (for logging).
    fn name(&self) -> &str;

    /// Evaluate `target` at the state fixed by `state`.
    ///
    /// Fails recoverably on invalid states, unsupported input pairs or refrigerants
    /// without backend data.
    fn evaluate(
        &self,
        target: Property,
        state: StateSpec,
        refrigerant: Refrigerant,
    ) -> FluidResult<f64>;

    /// Saturation temperature at `p` on the bubble (`q = 0`) or dew (`q = 1`) line.
    fn saturation_temperature(
        &self,
        p: Pressure,
        q: f64,
        refrigerant: Refrigerant,
    ) -> FluidResult<Temperature> {
        let t = self.evaluate(Property::Temperature, StateSpec::PQ { p, q }, refrigerant)?;
        checked(t, "saturation temperature").map(k)
    }

    /// Saturation pressure at `t` on the bubble (`q = 0`) or dew (`q = 1`) line.
    fn saturation_pressure(
        &self,
        t: Temperature,
        q: f64,
        refrigerant: Refrigerant,
    ) -> FluidResult<Pressure> {
        let p = self.evaluate(Property::Pressure, StateSpec::TQ { t, q }, refrigerant)?;
        checked(p, "saturation pressure").map(pa)
    }

    /// Enthalpy, entropy and density at one state.
    fn point_props(&self, state: StateSpec, refrigerant: Refrigerant) -> FluidResult<PointProps> {
        Ok(PointProps {
            h: self.evaluate(Property::Enthalpy, state, refrigerant)?,
            s: self.evaluate(Property::Entropy, state, refrigerant)?,
            rho: self.evaluate(Property::Density, state, refrigerant)?,
        })
    }
}

fn checked(v: f64, what: &'static str) -> FluidResult<f64> {
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(FluidError::NonPhysical { what })
    }
}

impl<O: PropertyOracle + ?Sized> PropertyOracle for &O {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn evaluate(
        &self,
        target: Property,
        state: StateSpec,
        refrigerant: Refrigerant,
    ) -> FluidResult<f64> {
        (**self).evaluate(target, state, refrigerant)
    }
}

impl<O: PropertyOracle + ?Sized> PropertyOracle for Box<O> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn evaluate(
        &self,
        target: Property,
        state: StateSpec,
        refrigerant: Refrigerant,
    ) -> FluidResult<f64> {
        (**self).evaluate(target, state, refrigerant)
    }
}
