// rf-core/src/units.rs

use uom::si::f64::{
    Pressure as UomPressure, ThermodynamicTemperature as UomThermodynamicTemperature,
    Volume as UomVolume,
};

// Public canonical unit types (SI, f64)
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;
pub type Volume = UomVolume;

/// Specific enthalpy [J/kg]
pub type SpecEnthalpy = f64;

/// Specific entropy [J/(kg·K)]
pub type SpecEntropy = f64;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn m3(v: f64) -> Volume {
    use uom::si::volume::cubic_meter;
    Volume::new::<cubic_meter>(v)
}

/// Conversions between field (IP, gauge) readings and the SI quantities used internally.
///
/// Factors match the plant data sheets, not uom's exact definitions.
pub mod field {
    use super::*;

    pub const ATMOSPHERE_PSI: f64 = 14.7;
    pub const PA_PER_PSI: f64 = 6894.76;
    pub const M3_PER_FT3: f64 = 0.028_316_8;
    pub const M3_PER_CM3: f64 = 1.0e-6;
    pub const LB_PER_KG: f64 = 2.204_62;
    pub const LBFT3_PER_KGM3: f64 = 0.062_428;
    pub const BTULB_PER_JKG: f64 = 0.000_429_9;
    pub const BTUHR_PER_W: f64 = 3.412_14;
    pub const BTUHR_PER_TON: f64 = 12_000.0;
    pub const W_PER_HP: f64 = 745.7;

    /// °F reading to absolute temperature.
    #[inline]
    pub fn fahrenheit(f: f64) -> Temperature {
        k((f + 459.67) * 5.0 / 9.0)
    }

    /// Absolute temperature to °F.
    #[inline]
    pub fn to_fahrenheit(t: Temperature) -> f64 {
        t.value * 9.0 / 5.0 - 459.67
    }

    /// Temperature difference in kelvin expressed in °F.
    #[inline]
    pub fn delta_fahrenheit(dk: f64) -> f64 {
        dk * 9.0 / 5.0
    }

    /// Gauge pressure [psig] to absolute pressure.
    #[inline]
    pub fn psig(p: f64) -> Pressure {
        pa((p + ATMOSPHERE_PSI) * PA_PER_PSI)
    }

    #[inline]
    pub fn cubic_feet(v: f64) -> Volume {
        m3(v * M3_PER_FT3)
    }

    #[inline]
    pub fn cubic_centimeters(v: f64) -> Volume {
        m3(v * M3_PER_CM3)
    }

    #[inline]
    pub fn kgs_to_lbhr(kgs: f64) -> f64 {
        kgs * 3600.0 * LB_PER_KG
    }
}
