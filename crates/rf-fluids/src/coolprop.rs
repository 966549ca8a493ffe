//! CoolProp-based property oracle.

use crate::error::{FluidError, FluidResult};
use crate::oracle::PropertyOracle;
use crate::property::{Property, StateSpec};
use crate::refrigerant::Refrigerant;
use rfluids::prelude::*;

/// CoolProp backend for refrigerant properties.
///
/// Thread-safe: a fresh rfluids `Fluid` is built per query, nothing is shared.
#[derive(Debug, Default, Clone, Copy)]
pub struct CoolPropOracle;

impl CoolPropOracle {
    /// Create a new CoolProp oracle.
    pub fn new() -> Self {
        Self
    }

    fn fluid_in(&self, refrigerant: Refrigerant, state: StateSpec) -> FluidResult<Fluid> {
        let (a, b) = match state {
            StateSpec::PT { p, t } => (
                FluidInput::pressure(p.value),
                FluidInput::temperature(t.value),
            ),
            StateSpec::PH { p, h } => (FluidInput::pressure(p.value), FluidInput::enthalpy(h)),
            StateSpec::PS { p, s } => (FluidInput::pressure(p.value), FluidInput::entropy(s)),
            StateSpec::PQ { p, q } => (FluidInput::pressure(p.value), FluidInput::quality(q)),
            StateSpec::TQ { t, q } => (FluidInput::temperature(t.value), FluidInput::quality(q)),
        };
        Fluid::from(refrigerant.rfluids_pure())
            .in_state(a, b)
            .map_err(|e| FluidError::Backend {
                message: format!("rfluids error for {} at {}: {}", refrigerant, state, e),
            })
    }
}

impl PropertyOracle for CoolPropOracle {
    fn name(&self) -> &str {
        "CoolProp"
    }

    fn evaluate(
        &self,
        target: Property,
        state: StateSpec,
        refrigerant: Refrigerant,
    ) -> FluidResult<f64> {
        state.validate()?;
        let mut fluid = self.fluid_in(refrigerant, state)?;
        let value = match target {
            Property::Enthalpy => fluid.enthalpy(),
            Property::Entropy => fluid.entropy(),
            Property::Density => fluid.density(),
            Property::Temperature => fluid.temperature(),
            Property::Pressure => fluid.pressure(),
            Property::Quality => fluid.quality(),
        }
        .map_err(|e| FluidError::Backend {
            message: format!(
                "rfluids error getting {} for {} at {}: {}",
                target.symbol(),
                refrigerant,
                state,
                e
            ),
        })?;
        if !value.is_finite() {
            return Err(FluidError::OutOfRange {
                what: "backend returned a non-finite value",
            });
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rf_core::units::{k, pa};

    #[test]
    fn invalid_state_is_rejected_before_backend() {
        let oracle = CoolPropOracle::new();
        let err = oracle
            .evaluate(
                Property::Enthalpy,
                StateSpec::PT { p: pa(-10.0), t: k(300.0) },
                Refrigerant::R410A,
            )
            .unwrap_err();
        assert!(matches!(err, FluidError::NonPhysical { .. }));
    }
}
