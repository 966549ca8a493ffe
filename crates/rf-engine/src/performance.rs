//! Mass-flow and whole-system performance figures.

use rf_core::units::Volume;
use rf_core::units::field::{BTUHR_PER_TON, BTUHR_PER_W, LB_PER_KG, W_PER_HP};
use serde::Serialize;

use crate::cycle::CyclePerformance;

/// Compressor mass flow from suction density, displacement and speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MassFlowSummary {
    pub theoretical_kg_s: f64,
    pub theoretical_kg_h: f64,
    pub actual_kg_s: f64,
    pub actual_kg_h: f64,
    pub actual_lb_hr: f64,
    pub eta_vol: f64,
}

/// theoretical = rho × displacement × rev/s; actual = theoretical × eta_vol.
pub fn mass_flow(density_kg_m3: f64, displacement: Volume, speed_rpm: f64, eta_vol: f64) -> MassFlowSummary {
    let disp_m3 = displacement.value;
    let theoretical_kg_s = density_kg_m3 * disp_m3 * speed_rpm / 60.0;
    let theoretical_kg_h = density_kg_m3 * disp_m3 * speed_rpm * 60.0;
    let actual_kg_h = theoretical_kg_h * eta_vol;
    MassFlowSummary {
        theoretical_kg_s,
        theoretical_kg_h,
        actual_kg_s: theoretical_kg_s * eta_vol,
        actual_kg_h,
        actual_lb_hr: actual_kg_h * LB_PER_KG,
        eta_vol,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SystemPerformance {
    pub mass_flow_kg_s: f64,
    pub cooling_capacity_w: f64,
    pub cooling_capacity_btu_hr: f64,
    pub cooling_capacity_tons: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compressor_power_w: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compressor_power_hp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heat_rejection_w: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heat_rejection_btu_hr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cop: Option<f64>,
    /// BTU/hr of cooling per W of compressor power.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eer: Option<f64>,
}

/// Scale the specific cycle figures by a mass flow [kg/s].
pub fn system_performance(cycle: &CyclePerformance, mass_flow_kg_s: f64) -> SystemPerformance {
    let cooling_capacity_w = mass_flow_kg_s * cycle.refrigeration_effect;
    let cooling_capacity_btu_hr = cooling_capacity_w * BTUHR_PER_W;
    let compressor_power_w = cycle.compressor_work.map(|w| mass_flow_kg_s * w);
    let heat_rejection_w = cycle.heat_rejected.map(|q| mass_flow_kg_s * q);
    SystemPerformance {
        mass_flow_kg_s,
        cooling_capacity_w,
        cooling_capacity_btu_hr,
        cooling_capacity_tons: cooling_capacity_btu_hr / BTUHR_PER_TON,
        compressor_power_w,
        compressor_power_hp: compressor_power_w.map(|w| w / W_PER_HP),
        heat_rejection_w,
        heat_rejection_btu_hr: heat_rejection_w.map(|w| w * BTUHR_PER_W),
        cop: cycle.cop,
        eer: compressor_power_w
            .filter(|w| *w > 0.0)
            .map(|w| cooling_capacity_btu_hr / w),
    }
}
