//! One-time volumetric-efficiency calibration from compressor nameplate data.

use rf_core::units::field::{LBFT3_PER_KGM3, fahrenheit};
use rf_fluids::{Property, PropertyOracle, Refrigerant, StateSpec};
use serde::Serialize;

/// Used whenever the rated data cannot produce a calibrated value.
pub const DEFAULT_ETA_VOL: f64 = 0.85;

/// Nameplate values, immutable for a run. Zero counts as missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RatedInputs {
    pub m_dot_rated_lbhr: Option<f64>,
    pub hz_rated: Option<f64>,
    pub disp_ft3: Option<f64>,
    pub rated_evap_temp_f: Option<f64>,
    pub rated_return_gas_temp_f: Option<f64>,
}

impl RatedInputs {
    /// Display name and value of each field, in warning order.
    fn fields(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("Rated Mass Flow Rate", self.m_dot_rated_lbhr),
            ("Rated Compressor Speed", self.hz_rated),
            ("Compressor Displacement", self.disp_ft3),
            ("Rated Evaporator Temperature", self.rated_evap_temp_f),
            ("Rated Return Gas Temperature", self.rated_return_gas_temp_f),
        ]
    }
}

fn present(v: Option<f64>) -> Option<f64> {
    v.filter(|v| v.is_finite() && *v != 0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalibrationMethod {
    Calculated,
    Default,
}

impl CalibrationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalibrationMethod::Calculated => "calculated",
            CalibrationMethod::Default => "default",
        }
    }
}

/// Intermediate values of a successful calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationDetails {
    pub m_dot_rated_lbhr: f64,
    pub m_dot_theoretical_lbhr: f64,
    pub density_kgm3: f64,
    pub density_lbft3: f64,
    pub saturation_pressure_pa: f64,
    pub revolutions_per_hour: f64,
}

/// Always well-formed; `method` says whether `eta_vol` was derived or defaulted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibrationResult {
    pub eta_vol: f64,
    pub method: CalibrationMethod,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<CalibrationDetails>,
}

impl CalibrationResult {
    fn default_with(warnings: Vec<String>) -> Self {
        for warning in &warnings {
            tracing::warn!(eta_vol = DEFAULT_ETA_VOL, "{}", warning);
        }
        Self {
            eta_vol: DEFAULT_ETA_VOL,
            method: CalibrationMethod::Default,
            warnings,
            details: None,
        }
    }
}

/// Derive eta_vol = rated mass flow / theoretical mass flow at rated conditions.
///
/// Theoretical flow is the suction-gas density (return-gas temperature at the rated
/// evaporator saturation pressure) times revolutions per hour times displacement.
/// Never fails: gaps, a zero theoretical flow or an oracle error yield the default.
pub fn calibrate<O: PropertyOracle + ?Sized>(
    oracle: &O,
    rated: &RatedInputs,
    refrigerant: Refrigerant,
) -> CalibrationResult {
    let missing: Vec<String> = rated
        .fields()
        .iter()
        .filter(|(_, value)| present(*value).is_none())
        .map(|(name, _)| format!("Missing rated input: {}", name))
        .collect();
    if !missing.is_empty() {
        return CalibrationResult::default_with(missing);
    }

    let [m_dot_rated, hz, disp_ft3, evap_f, return_f] = rated.fields().map(|(_, v)| v.unwrap_or(0.0));

    let state = oracle
        .saturation_pressure(fahrenheit(evap_f), 0.0, refrigerant)
        .and_then(|p_sat| {
            let rho = oracle.evaluate(
                Property::Density,
                StateSpec::PT {
                    p: p_sat,
                    t: fahrenheit(return_f),
                },
                refrigerant,
            )?;
            Ok((p_sat, rho))
        });
    let (p_sat, density_kgm3) = match state {
        Ok(v) => v,
        Err(e) => {
            return CalibrationResult::default_with(vec![format!(
                "Error calculating volumetric efficiency: {}",
                e
            )]);
        }
    };

    let density_lbft3 = density_kgm3 * LBFT3_PER_KGM3;
    let revolutions_per_hour = hz * 3600.0;
    let m_dot_theoretical_lbhr = density_lbft3 * revolutions_per_hour * disp_ft3;

    if m_dot_theoretical_lbhr == 0.0 || !m_dot_theoretical_lbhr.is_finite() {
        return CalibrationResult::default_with(vec![
            "Theoretical mass flow is zero - cannot calculate volumetric efficiency".to_string(),
        ]);
    }

    let eta_vol = m_dot_rated / m_dot_theoretical_lbhr;
    tracing::info!(eta_vol, m_dot_theoretical_lbhr, %refrigerant, "volumetric efficiency calibrated");
    CalibrationResult {
        eta_vol,
        method: CalibrationMethod::Calculated,
        warnings: Vec::new(),
        details: Some(CalibrationDetails {
            m_dot_rated_lbhr: m_dot_rated,
            m_dot_theoretical_lbhr,
            density_kgm3,
            density_lbft3,
            saturation_pressure_pa: p_sat.value,
            revolutions_per_hour,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rf_fluids::SurrogateOracle;

    fn rated() -> RatedInputs {
        RatedInputs {
            m_dot_rated_lbhr: Some(560.0),
            hz_rated: Some(60.0),
            disp_ft3: Some(0.00141),
            rated_evap_temp_f: Some(45.0),
            rated_return_gas_temp_f: Some(65.0),
        }
    }

    #[test]
    fn complete_inputs_are_calibrated() {
        let oracle = SurrogateOracle::new();
        let r = calibrate(&oracle, &rated(), Refrigerant::R410A);
        assert_eq!(r.method, CalibrationMethod::Calculated);
        assert!(r.warnings.is_empty());

        let p_sat = oracle
            .saturation_pressure(fahrenheit(45.0), 0.0, Refrigerant::R410A)
            .unwrap();
        let rho = oracle
            .evaluate(
                Property::Density,
                StateSpec::PT {
                    p: p_sat,
                    t: fahrenheit(65.0),
                },
                Refrigerant::R410A,
            )
            .unwrap();
        let theoretical = rho * 0.062428 * 60.0 * 3600.0 * 0.00141;
        assert_relative_eq!(r.eta_vol, 560.0 / theoretical, max_relative = 1e-12);
        assert_relative_eq!(r.details.unwrap().m_dot_theoretical_lbhr, theoretical, max_relative = 1e-12);
    }

    #[test]
    fn each_missing_field_defaults_with_one_warning() {
        let oracle = SurrogateOracle::new();
        let cases: [(fn(&mut RatedInputs), &str); 5] = [
            (|r| r.m_dot_rated_lbhr = None, "Rated Mass Flow Rate"),
            (|r| r.hz_rated = Some(0.0), "Rated Compressor Speed"),
            (|r| r.disp_ft3 = None, "Compressor Displacement"),
            (|r| r.rated_evap_temp_f = Some(0.0), "Rated Evaporator Temperature"),
            (|r| r.rated_return_gas_temp_f = None, "Rated Return Gas Temperature"),
        ];
        for (clear, name) in cases {
            let mut inputs = rated();
            clear(&mut inputs);
            let r = calibrate(&oracle, &inputs, Refrigerant::R410A);
            assert_eq!(r.eta_vol, DEFAULT_ETA_VOL);
            assert_eq!(r.method.as_str(), "default");
            assert_eq!(r.warnings.len(), 1);
            assert!(r.warnings[0].contains(name), "{}", r.warnings[0]);
        }
    }

    #[test]
    fn all_missing_warns_per_field() {
        let r = calibrate(&SurrogateOracle::new(), &RatedInputs::default(), Refrigerant::R22);
        assert_eq!(r.warnings.len(), 5);
        assert!(r.details.is_none());
    }

    #[test]
    fn oracle_failure_falls_back_to_default() {
        let mut inputs = rated();
        // Far below absolute zero: the saturation query is rejected.
        inputs.rated_evap_temp_f = Some(-500.0);
        let r = calibrate(&SurrogateOracle::new(), &inputs, Refrigerant::R410A);
        assert_eq!(r.method, CalibrationMethod::Default);
        assert_eq!(r.warnings.len(), 1);
        assert!(r.warnings[0].starts_with("Error calculating"));
    }
}
