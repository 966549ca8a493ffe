//! Refrigerant definitions.

/// Refrigerants with property data in the CoolProp backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Refrigerant {
    /// R410A (R32/R125 50/50, near-azeotropic)
    R410A,
    /// R22 (chlorodifluoromethane)
    R22,
    /// R32 (difluoromethane)
    R32,
    /// R134a (1,1,1,2-tetrafluoroethane)
    R134a,
    /// R404A (R125/R143a/R134a)
    R404A,
    /// R407C (R32/R125/R134a, zeotropic)
    R407C,
    /// R507A (R125/R143a azeotrope)
    R507A,
    /// Propane
    R290,
    /// Isobutane
    R600a,
    /// Ammonia
    R717,
    /// Carbon dioxide
    R744,
    /// R1234yf (HFO)
    R1234yf,
}

impl Refrigerant {
    pub const ALL: [Refrigerant; 12] = [
        Refrigerant::R410A,
        Refrigerant::R22,
        Refrigerant::R32,
        Refrigerant::R134a,
        Refrigerant::R404A,
        Refrigerant::R407C,
        Refrigerant::R507A,
        Refrigerant::R290,
        Refrigerant::R600a,
        Refrigerant::R717,
        Refrigerant::R744,
        Refrigerant::R1234yf,
    ];

    /// Canonical key, accepted by `FromStr`.
    pub fn key(&self) -> &'static str {
        match self {
            Refrigerant::R410A => "R410A",
            Refrigerant::R22 => "R22",
            Refrigerant::R32 => "R32",
            Refrigerant::R134a => "R134a",
            Refrigerant::R404A => "R404A",
            Refrigerant::R407C => "R407C",
            Refrigerant::R507A => "R507A",
            Refrigerant::R290 => "R290",
            Refrigerant::R600a => "R600a",
            Refrigerant::R717 => "R717",
            Refrigerant::R744 => "R744",
            Refrigerant::R1234yf => "R1234yf",
        }
    }

    /// Get human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Refrigerant::R290 => "R290 (Propane)",
            Refrigerant::R600a => "R600a (Isobutane)",
            Refrigerant::R717 => "R717 (Ammonia)",
            Refrigerant::R744 => "R744 (CO2)",
            other => other.key(),
        }
    }

    /// Map to the rfluids substance used by the CoolProp backend.
    ///
    /// The HFC blends are CoolProp pseudo-pure fluids.
    pub(crate) fn rfluids_pure(&self) -> rfluids::substance::Pure {
        use rfluids::substance::Pure;
        match self {
            Refrigerant::R410A => Pure::R410A,
            Refrigerant::R22 => Pure::R22,
            Refrigerant::R32 => Pure::R32,
            Refrigerant::R134a => Pure::R134a,
            Refrigerant::R404A => Pure::R404A,
            Refrigerant::R407C => Pure::R407C,
            Refrigerant::R507A => Pure::R507A,
            Refrigerant::R290 => Pure::nPropane,
            Refrigerant::R600a => Pure::Isobutane,
            Refrigerant::R717 => Pure::Ammonia,
            Refrigerant::R744 => Pure::CarbonDioxide,
            Refrigerant::R1234yf => Pure::R1234yf,
        }
    }

    /// Get molar mass [kg/kmol].
    pub fn molar_mass(&self) -> f64 {
        match self {
            Refrigerant::R410A => 72.585,
            Refrigerant::R22 => 86.468,
            Refrigerant::R32 => 52.024,
            Refrigerant::R134a => 102.031,
            Refrigerant::R404A => 97.604,
            Refrigerant::R407C => 86.204,
            Refrigerant::R507A => 98.859,
            Refrigerant::R290 => 44.097,
            Refrigerant::R600a => 58.122,
            Refrigerant::R717 => 17.031,
            Refrigerant::R744 => 44.010,
            Refrigerant::R1234yf => 114.042,
        }
    }
}

impl std::fmt::Display for Refrigerant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Refrigerant {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | ' ' | '_'))
            .collect::<String>()
            .to_uppercase();
        match normalized.as_str() {
            "R410A" => Ok(Refrigerant::R410A),
            "R22" | "HCFC22" => Ok(Refrigerant::R22),
            "R32" | "HFC32" => Ok(Refrigerant::R32),
            "R134A" | "HFC134A" => Ok(Refrigerant::R134a),
            "R404A" => Ok(Refrigerant::R404A),
            "R407C" => Ok(Refrigerant::R407C),
            "R507A" | "R507" => Ok(Refrigerant::R507A),
            "R290" | "PROPANE" | "NPROPANE" => Ok(Refrigerant::R290),
            "R600A" | "ISOBUTANE" => Ok(Refrigerant::R600a),
            "R717" | "AMMONIA" | "NH3" => Ok(Refrigerant::R717),
            "R744" | "CO2" | "CARBONDIOXIDE" => Ok(Refrigerant::R744),
            "R1234YF" | "HFO1234YF" => Ok(Refrigerant::R1234yf),
            _ => Err("unknown refrigerant"),
        }
    }
}
