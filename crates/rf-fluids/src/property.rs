//! Property queries: which quantity to return and which two variables fix the state.

use crate::error::{FluidError, FluidResult};
use rf_core::ensure_finite;
use rf_core::units::{Pressure, SpecEnthalpy, SpecEntropy, Temperature};

/// A thermodynamic quantity an oracle can return.
///
/// Values cross the oracle boundary in SI base units: J/kg, J/(kg·K), kg/m³, K, Pa,
/// and a dimensionless vapor quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Property {
    Enthalpy,
    Entropy,
    Density,
    Temperature,
    Pressure,
    Quality,
}

impl Property {
    pub fn symbol(&self) -> &'static str {
        match self {
            Property::Enthalpy => "H",
            Property::Entropy => "S",
            Property::Density => "D",
            Property::Temperature => "T",
            Property::Pressure => "P",
            Property::Quality => "Q",
        }
    }
}

/// Two independent state variables fixing a refrigerant state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateSpec {
    /// Pressure and temperature (single-phase only).
    PT { p: Pressure, t: Temperature },
    /// Pressure and specific enthalpy.
    PH { p: Pressure, h: SpecEnthalpy },
    /// Pressure and specific entropy.
    PS { p: Pressure, s: SpecEntropy },
    /// Pressure and vapor quality.
    PQ { p: Pressure, q: f64 },
    /// Temperature and vapor quality.
    TQ { t: Temperature, q: f64 },
}

impl StateSpec {
    /// Short name of the input pair, e.g. `"PT"`.
    pub fn pair(&self) -> &'static str {
        match self {
            StateSpec::PT { .. } => "PT",
            StateSpec::PH { .. } => "PH",
            StateSpec::PS { .. } => "PS",
            StateSpec::PQ { .. } => "PQ",
            StateSpec::TQ { .. } => "TQ",
        }
    }

    /// Reject non-finite inputs, non-positive absolute values and qualities outside `0..=1`.
    pub fn validate(&self) -> FluidResult<()> {
        match *self {
            StateSpec::PT { p, t } => {
                positive(p.value, "pressure must be positive and finite")?;
                positive(t.value, "temperature must be positive and finite")
            }
            StateSpec::PH { p, h } => {
                positive(p.value, "pressure must be positive and finite")?;
                finite(h, "enthalpy must be finite")
            }
            StateSpec::PS { p, s } => {
                positive(p.value, "pressure must be positive and finite")?;
                finite(s, "entropy must be finite")
            }
            StateSpec::PQ { p, q } => {
                positive(p.value, "pressure must be positive and finite")?;
                quality(q)
            }
            StateSpec::TQ { t, q } => {
                positive(t.value, "temperature must be positive and finite")?;
                quality(q)
            }
        }
    }
}

impl std::fmt::Display for StateSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateSpec::PT { p, t } => write!(f, "P={:.0} Pa, T={:.2} K", p.value, t.value),
            StateSpec::PH { p, h } => write!(f, "P={:.0} Pa, h={:.0} J/kg", p.value, h),
            StateSpec::PS { p, s } => write!(f, "P={:.0} Pa, s={:.2} J/kg/K", p.value, s),
            StateSpec::PQ { p, q } => write!(f, "P={:.0} Pa, Q={}", p.value, q),
            StateSpec::TQ { t, q } => write!(f, "T={:.2} K, Q={}", t.value, q),
        }
    }
}

/// Enthalpy, entropy and density evaluated at one state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointProps {
    /// Specific enthalpy [J/kg]
    pub h: SpecEnthalpy,
    /// Specific entropy [J/(kg·K)]
    pub s: SpecEntropy,
    /// Density [kg/m³]
    pub rho: f64,
}

fn positive(v: f64, what: &'static str) -> FluidResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(FluidError::NonPhysical { what })
    }
}

fn finite(v: f64, what: &'static str) -> FluidResult<()> {
    ensure_finite(v, what)?;
    Ok(())
}

fn quality(q: f64) -> FluidResult<()> {
    if q.is_finite() && (0.0..=1.0).contains(&q) {
        Ok(())
    } else {
        Err(FluidError::NonPhysical {
            what: "quality must lie in 0..=1",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rf_core::units::{k, pa};

    #[test]
    fn validate_rejects_bad_inputs() {
        assert!(StateSpec::PT { p: pa(-1.0), t: k(300.0) }.validate().is_err());
        assert!(StateSpec::PH { p: pa(1e5), h: f64::NAN }.validate().is_err());
        assert!(StateSpec::PQ { p: pa(1e5), q: 1.2 }.validate().is_err());
        assert!(StateSpec::TQ { t: k(250.0), q: 0.0 }.validate().is_ok());
    }

    #[test]
    fn non_finite_entropy_is_non_physical() {
        let err = StateSpec::PS { p: pa(1e5), s: f64::INFINITY }.validate().unwrap_err();
        assert_eq!(err, FluidError::NonPhysical { what: "entropy must be finite" });
    }

    #[test]
    fn display_names_the_pair() {
        let spec = StateSpec::PQ { p: pa(101_325.0), q: 0.0 };
        assert_eq!(spec.pair(), "PQ");
        assert!(spec.to_string().contains("Q=0"));
    }
}
