//! Closed-form refrigerant surrogate.
//!
//! A two-phase model with just enough physics to behave like a refrigerant:
//! - Clausius-Clapeyron saturation curve through the normal boiling point
//! - latent heat falling linearly with temperature
//! - constant liquid and vapor heat capacities
//! - incompressible liquid, ideal-gas vapor
//!
//! Every input pair is inverted analytically from the same `h(P,T)` and `s(P,T)`
//! functions, so PT, PH, PS, PQ and TQ queries agree with each other exactly.
//! Absolute values are rough (tens of percent against CoolProp). Use it for offline
//! runs and tests, never for reporting.

use crate::error::{FluidError, FluidResult};
use crate::oracle::PropertyOracle;
use crate::property::{Property, StateSpec};
use crate::refrigerant::Refrigerant;

const P_REF_PA: f64 = 101_325.0;
const R_UNIVERSAL: f64 = 8314.462618;

/// Quality reported for single-phase states, following CoolProp's convention.
pub const SINGLE_PHASE_QUALITY: f64 = -1.0;

/// Per-refrigerant surrogate parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurrogateParams {
    /// Normal boiling point [K] (reference state: saturated liquid, h = 0, s = 0)
    pub t_nbp: f64,
    /// Molar mass [kg/kmol]
    pub molar_mass: f64,
    /// Clausius-Clapeyron slope L/R [K]
    pub clapeyron_k: f64,
    /// Liquid heat capacity [J/(kg·K)]
    pub cp_liquid: f64,
    /// Vapor heat capacity [J/(kg·K)]
    pub cp_vapor: f64,
    /// Slope of saturated-vapor enthalpy along the dome [J/(kg·K)]
    pub hg_slope: f64,
    /// Liquid density [kg/m³]
    pub rho_liquid: f64,
}

impl SurrogateParams {
    pub fn for_refrigerant(refrigerant: Refrigerant) -> Self {
        let (t_nbp, clapeyron_k, cp_liquid, cp_vapor, rho_liquid) = match refrigerant {
            Refrigerant::R410A => (221.7, 2432.0, 1500.0, 900.0, 1150.0),
            Refrigerant::R22 => (232.3, 2474.0, 1150.0, 650.0, 1280.0),
            Refrigerant::R32 => (221.5, 2440.0, 1800.0, 1100.0, 1050.0),
            Refrigerant::R134a => (247.1, 2751.0, 1300.0, 800.0, 1290.0),
            Refrigerant::R404A => (226.9, 2406.0, 1300.0, 800.0, 1150.0),
            Refrigerant::R407C => (229.5, 2174.0, 1400.0, 800.0, 1240.0),
            Refrigerant::R507A => (226.1, 2382.0, 1300.0, 800.0, 1150.0),
            Refrigerant::R290 => (231.0, 2310.0, 2500.0, 1600.0, 530.0),
            Refrigerant::R600a => (261.4, 2662.0, 2300.0, 1600.0, 580.0),
            Refrigerant::R717 => (239.8, 2835.0, 4600.0, 2200.0, 640.0),
            Refrigerant::R744 => (194.7, 1972.0, 2000.0, 1200.0, 930.0),
            Refrigerant::R1234yf => (243.7, 2572.0, 1300.0, 800.0, 1180.0),
        };
        Self {
            t_nbp,
            molar_mass: refrigerant.molar_mass(),
            clapeyron_k,
            cp_liquid,
            cp_vapor,
            hg_slope: 250.0,
            rho_liquid,
        }
    }

    fn r_specific(&self) -> f64 {
        R_UNIVERSAL / self.molar_mass
    }

    fn latent(&self, t: f64) -> FluidResult<f64> {
        let l0 = self.clapeyron_k * self.r_specific();
        let l = l0 - (self.cp_liquid - self.hg_slope) * (t - self.t_nbp);
        if l > 0.0 {
            Ok(l)
        } else {
            Err(FluidError::OutOfRange {
                what: "temperature above surrogate two-phase region",
            })
        }
    }

    fn t_sat(&self, p: f64) -> FluidResult<f64> {
        let inv = 1.0 / self.t_nbp - (p / P_REF_PA).ln() / self.clapeyron_k;
        if inv > 0.0 {
            Ok(1.0 / inv)
        } else {
            Err(FluidError::OutOfRange {
                what: "pressure above surrogate saturation curve",
            })
        }
    }

    fn p_sat(&self, t: f64) -> f64 {
        P_REF_PA * (self.clapeyron_k * (1.0 / self.t_nbp - 1.0 / t)).exp()
    }

    fn h_liquid(&self, t: f64) -> f64 {
        self.cp_liquid * (t - self.t_nbp)
    }

    fn s_liquid(&self, t: f64) -> f64 {
        self.cp_liquid * (t / self.t_nbp).ln()
    }

    fn rho_vapor(&self, p: f64, t: f64) -> f64 {
        p / (self.r_specific() * t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Liquid,
    Vapor,
    TwoPhase(f64),
}

/// A fully resolved surrogate state.
#[derive(Debug, Clone, Copy)]
struct Resolved {
    p: f64,
    t: f64,
    t_sat: f64,
    phase: Phase,
}

/// Deterministic, dependency-free property oracle.
#[derive(Debug, Default, Clone, Copy)]
pub struct SurrogateOracle;

impl SurrogateOracle {
    pub fn new() -> Self {
        Self
    }

    fn resolve(&self, params: &SurrogateParams, state: StateSpec) -> FluidResult<Resolved> {
        match state {
            StateSpec::PT { p, t } => {
                let (p, t) = (p.value, t.value);
                let t_sat = params.t_sat(p)?;
                let phase = if t < t_sat {
                    Phase::Liquid
                } else if t > t_sat {
                    Phase::Vapor
                } else {
                    return Err(FluidError::NotSupported {
                        what: "PT state on the saturation line; specify quality",
                    });
                };
                Ok(Resolved { p, t, t_sat, phase })
            }
            StateSpec::PH { p, h } => {
                let p = p.value;
                let t_sat = params.t_sat(p)?;
                let hf = params.h_liquid(t_sat);
                let hg = hf + params.latent(t_sat)?;
                let (t, phase) = if h < hf {
                    (params.t_nbp + h / params.cp_liquid, Phase::Liquid)
                } else if h > hg {
                    (t_sat + (h - hg) / params.cp_vapor, Phase::Vapor)
                } else {
                    (t_sat, Phase::TwoPhase((h - hf) / (hg - hf)))
                };
                if t <= 0.0 {
                    return Err(FluidError::OutOfRange {
                        what: "enthalpy below surrogate liquid range",
                    });
                }
                Ok(Resolved { p, t, t_sat, phase })
            }
            StateSpec::PS { p, s } => {
                let p = p.value;
                let t_sat = params.t_sat(p)?;
                let sf = params.s_liquid(t_sat);
                let sg = sf + params.latent(t_sat)? / t_sat;
                let (t, phase) = if s < sf {
                    (params.t_nbp * (s / params.cp_liquid).exp(), Phase::Liquid)
                } else if s > sg {
                    (t_sat * ((s - sg) / params.cp_vapor).exp(), Phase::Vapor)
                } else {
                    (t_sat, Phase::TwoPhase((s - sf) / (sg - sf)))
                };
                Ok(Resolved { p, t, t_sat, phase })
            }
            StateSpec::PQ { p, q } => {
                let p = p.value;
                let t_sat = params.t_sat(p)?;
                Ok(Resolved {
                    p,
                    t: t_sat,
                    t_sat,
                    phase: Phase::TwoPhase(q),
                })
            }
            StateSpec::TQ { t, q } => {
                let t = t.value;
                Ok(Resolved {
                    p: params.p_sat(t),
                    t,
                    t_sat: t,
                    phase: Phase::TwoPhase(q),
                })
            }
        }
    }

    fn property(
        &self,
        params: &SurrogateParams,
        target: Property,
        r: Resolved,
    ) -> FluidResult<f64> {
        let value = match target {
            Property::Pressure => r.p,
            Property::Temperature => r.t,
            Property::Quality => match r.phase {
                Phase::TwoPhase(x) => x,
                _ => SINGLE_PHASE_QUALITY,
            },
            Property::Enthalpy => match r.phase {
                Phase::Liquid => params.h_liquid(r.t),
                Phase::TwoPhase(x) => params.h_liquid(r.t_sat) + x * params.latent(r.t_sat)?,
                Phase::Vapor => {
                    params.h_liquid(r.t_sat)
                        + params.latent(r.t_sat)?
                        + params.cp_vapor * (r.t - r.t_sat)
                }
            },
            Property::Entropy => match r.phase {
                Phase::Liquid => params.s_liquid(r.t),
                Phase::TwoPhase(x) => {
                    params.s_liquid(r.t_sat) + x * params.latent(r.t_sat)? / r.t_sat
                }
                Phase::Vapor => {
                    params.s_liquid(r.t_sat)
                        + params.latent(r.t_sat)? / r.t_sat
                        + params.cp_vapor * (r.t / r.t_sat).ln()
                }
            },
            Property::Density => match r.phase {
                Phase::Liquid => params.rho_liquid,
                Phase::Vapor => params.rho_vapor(r.p, r.t),
                Phase::TwoPhase(x) => {
                    let v = (1.0 - x) / params.rho_liquid + x / params.rho_vapor(r.p, r.t_sat);
                    1.0 / v
                }
            },
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(FluidError::OutOfRange {
                what: "surrogate produced a non-finite value",
            })
        }
    }
}

impl PropertyOracle for SurrogateOracle {
    fn name(&self) -> &str {
        "surrogate"
    }

    fn evaluate(
        &self,
        target: Property,
        state: StateSpec,
        refrigerant: Refrigerant,
    ) -> FluidResult<f64> {
        state.validate()?;
        let params = SurrogateParams::for_refrigerant(refrigerant);
        let resolved = self.resolve(&params, state)?;
        self.property(&params, target, resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use rf_core::units::{k, pa};

    const R: Refrigerant = Refrigerant::R410A;

    fn eval(target: Property, state: StateSpec) -> f64 {
        SurrogateOracle::new().evaluate(target, state, R).unwrap()
    }

    #[test]
    fn normal_boiling_point_is_reference_state() {
        let t = eval(Property::Temperature, StateSpec::PQ { p: pa(P_REF_PA), q: 0.0 });
        assert_relative_eq!(t, 221.7, epsilon = 1e-9);
        let h = eval(Property::Enthalpy, StateSpec::PQ { p: pa(P_REF_PA), q: 0.0 });
        assert_relative_eq!(h, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn saturation_curve_is_monotonic() {
        let t1 = eval(Property::Temperature, StateSpec::PQ { p: pa(2.0e5), q: 1.0 });
        let t2 = eval(Property::Temperature, StateSpec::PQ { p: pa(2.0e6), q: 1.0 });
        assert!(t2 > t1 + 50.0, "t1={t1}, t2={t2}");
        let p = eval(Property::Pressure, StateSpec::TQ { t: k(t2), q: 0.0 });
        assert_relative_eq!(p, 2.0e6, max_relative = 1e-9);
    }

    #[test]
    fn saturated_vapor_entropy_falls_with_temperature() {
        let s_low = eval(Property::Entropy, StateSpec::PQ { p: pa(2.0e5), q: 1.0 });
        let s_high = eval(Property::Entropy, StateSpec::PQ { p: pa(2.0e6), q: 1.0 });
        assert!(s_high < s_low);
    }

    #[test]
    fn phases_from_pt() {
        let p = pa(1.0e6);
        let t_sat = eval(Property::Temperature, StateSpec::PQ { p, q: 0.0 });
        let liquid = StateSpec::PT { p, t: k(t_sat - 10.0) };
        let vapor = StateSpec::PT { p, t: k(t_sat + 10.0) };
        assert_eq!(eval(Property::Quality, liquid), SINGLE_PHASE_QUALITY);
        assert_relative_eq!(eval(Property::Density, liquid), 1150.0);
        assert!(eval(Property::Density, vapor) < 100.0);
        assert!(eval(Property::Enthalpy, vapor) > eval(Property::Enthalpy, liquid));
    }

    #[test]
    fn throttled_liquid_lands_in_the_dome() {
        let h = eval(Property::Enthalpy, StateSpec::PT { p: pa(2.0e6), t: k(300.0) });
        let q = eval(Property::Quality, StateSpec::PH { p: pa(3.0e5), h });
        assert!(q > 0.0 && q < 1.0, "q = {q}");
    }

    #[test]
    fn saturation_line_pt_is_not_supported() {
        let p = pa(1.0e6);
        let t_sat = eval(Property::Temperature, StateSpec::PQ { p, q: 0.0 });
        let err = SurrogateOracle::new()
            .evaluate(Property::Enthalpy, StateSpec::PT { p, t: k(t_sat) }, R)
            .unwrap_err();
        assert!(matches!(err, FluidError::NotSupported { .. }));
    }

    proptest! {
        #[test]
        fn ph_and_ps_invert_pt(p in 1.0e5f64..3.0e6, dt in prop_oneof![-40.0f64..-0.5, 0.5f64..60.0]) {
            let p = pa(p);
            let t_sat = eval(Property::Temperature, StateSpec::PQ { p, q: 0.0 });
            let t = t_sat + dt;
            let h = eval(Property::Enthalpy, StateSpec::PT { p, t: k(t) });
            let s = eval(Property::Entropy, StateSpec::PT { p, t: k(t) });
            let t_from_h = eval(Property::Temperature, StateSpec::PH { p, h });
            let t_from_s = eval(Property::Temperature, StateSpec::PS { p, s });
            prop_assert!((t_from_h - t).abs() < 1e-6);
            prop_assert!((t_from_s - t).abs() < 1e-6);
        }
    }
}
