//! Fixed output schema of the row transform.

use std::collections::BTreeMap;

use rf_topology::CircuitLabel;
use serde::Serialize;

/// Fields of one evaporator coil section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CoilField {
    /// TXV outlet temperature (echo).
    ExpansionOutletTemp,
    /// Coil inlet temperature (echo).
    InletTemp,
    OutletTemp,
    SatTemp,
    Superheat,
    Density,
    Enthalpy,
    Entropy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CompressorField {
    SuctionPressure,
    InletTemp,
    SatTemp,
    Superheat,
    Density,
    Enthalpy,
    Entropy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CondenserField {
    InletTemp,
    DischargePressure,
    OutletTemp,
    SatTemp,
    Subcooling,
    WaterIn,
    WaterOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TxvField {
    InletTemp,
    SatTemp,
    Subcooling,
    Enthalpy,
}

/// P-h diagram support columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PhField {
    CompressorInlet,
    CompressorOutlet,
    CondenserInlet,
    CondenserOutlet,
    CoilOutlet(CircuitLabel),
    ExpansionInlet(CircuitLabel),
    SuctionPressure,
    CondensingPressure,
}

/// One output column. The derived order is the schema order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Coil(CircuitLabel, CoilField),
    Compressor(CompressorField),
    DischargeTemp,
    Condenser(CondenserField),
    Txv(CircuitLabel, TxvField),
    MassFlow,
    CoolingCapacity,
    Ph(PhField),
}

impl Column {
    /// Number of columns in a fully computed row.
    pub const COUNT: usize = 65;

    /// Every column in schema order.
    pub fn all() -> Vec<Column> {
        use CoilField as Cf;
        use CompressorField as Kf;
        use CondenserField as Nf;
        use TxvField as Tf;

        let mut columns = Vec::with_capacity(Self::COUNT);
        for label in CircuitLabel::ALL {
            columns.extend(
                [
                    Cf::ExpansionOutletTemp,
                    Cf::InletTemp,
                    Cf::OutletTemp,
                    Cf::SatTemp,
                    Cf::Superheat,
                    Cf::Density,
                    Cf::Enthalpy,
                    Cf::Entropy,
                ]
                .map(|f| Column::Coil(label, f)),
            );
        }
        columns.extend(
            [
                Kf::SuctionPressure,
                Kf::InletTemp,
                Kf::SatTemp,
                Kf::Superheat,
                Kf::Density,
                Kf::Enthalpy,
                Kf::Entropy,
            ]
            .map(Column::Compressor),
        );
        columns.push(Column::DischargeTemp);
        columns.extend(
            [
                Nf::InletTemp,
                Nf::DischargePressure,
                Nf::OutletTemp,
                Nf::SatTemp,
                Nf::Subcooling,
                Nf::WaterIn,
                Nf::WaterOut,
            ]
            .map(Column::Condenser),
        );
        for label in CircuitLabel::ALL {
            columns.extend(
                [Tf::InletTemp, Tf::SatTemp, Tf::Subcooling, Tf::Enthalpy]
                    .map(|f| Column::Txv(label, f)),
            );
        }
        columns.push(Column::MassFlow);
        columns.push(Column::CoolingCapacity);
        columns.extend([
            Column::Ph(PhField::CompressorInlet),
            Column::Ph(PhField::CompressorOutlet),
            Column::Ph(PhField::CondenserInlet),
            Column::Ph(PhField::CondenserOutlet),
        ]);
        columns.extend(CircuitLabel::ALL.map(|l| Column::Ph(PhField::CoilOutlet(l))));
        columns.extend(CircuitLabel::ALL.map(|l| Column::Ph(PhField::ExpansionInlet(l))));
        columns.push(Column::Ph(PhField::SuctionPressure));
        columns.push(Column::Ph(PhField::CondensingPressure));
        columns
    }

    /// Column header as it appears in exported tables.
    pub fn name(&self) -> &'static str {
        use CircuitLabel::{Center as C, Left as L, Right as R};
        match *self {
            Column::Coil(label, field) => coil_name(label, field),
            Column::Compressor(field) => match field {
                CompressorField::SuctionPressure => "P_suction",
                CompressorField::InletTemp => "T_2b",
                CompressorField::SatTemp => "T_sat.comp.in",
                CompressorField::Superheat => "S.H_total",
                CompressorField::Density => "D_comp.in",
                CompressorField::Enthalpy => "H_comp.in",
                CompressorField::Entropy => "S_comp.in",
            },
            Column::DischargeTemp => "T_3a",
            Column::Condenser(field) => match field {
                CondenserField::InletTemp => "T_3b",
                CondenserField::DischargePressure => "P_disch",
                CondenserField::OutletTemp => "T_4a",
                CondenserField::SatTemp => "T_sat.cond",
                CondenserField::Subcooling => "S.C",
                CondenserField::WaterIn => "T_waterin",
                CondenserField::WaterOut => "T_waterout",
            },
            Column::Txv(label, field) => match (label, field) {
                (L, TxvField::InletTemp) => "T_4b-lh",
                (L, TxvField::SatTemp) => "T_sat.txv.lh",
                (L, TxvField::Subcooling) => "S.C-txv.lh",
                (L, TxvField::Enthalpy) => "H_txv.lh",
                (C, TxvField::InletTemp) => "T_4b-ctr",
                (C, TxvField::SatTemp) => "T_sat.txv.ctr",
                (C, TxvField::Subcooling) => "S.C-txv.ctr",
                (C, TxvField::Enthalpy) => "H_txv.ctr",
                (R, TxvField::InletTemp) => "T_4b-rh",
                (R, TxvField::SatTemp) => "T_sat.txv.rh",
                (R, TxvField::Subcooling) => "S.C-txv.rh",
                (R, TxvField::Enthalpy) => "H_txv.rh",
            },
            Column::MassFlow => "m_dot",
            Column::CoolingCapacity => "qc",
            Column::Ph(field) => match field {
                PhField::CompressorInlet => "h_2b",
                PhField::CompressorOutlet => "h_3a",
                PhField::CondenserInlet => "h_3b",
                PhField::CondenserOutlet => "h_4a",
                PhField::CoilOutlet(L) => "h_2a_LH",
                PhField::CoilOutlet(C) => "h_2a_CTR",
                PhField::CoilOutlet(R) => "h_2a_RH",
                PhField::ExpansionInlet(L) => "h_4b_LH",
                PhField::ExpansionInlet(C) => "h_4b_CTR",
                PhField::ExpansionInlet(R) => "h_4b_RH",
                PhField::SuctionPressure => "P_suc",
                PhField::CondensingPressure => "P_cond",
            },
        }
    }

    /// Display unit of the column's values.
    pub fn unit(&self) -> &'static str {
        match *self {
            Column::Coil(_, CoilField::Superheat)
            | Column::Compressor(CompressorField::Superheat)
            | Column::Condenser(CondenserField::Subcooling)
            | Column::Txv(_, TxvField::Subcooling) => "°F (delta)",
            Column::Coil(_, CoilField::Density) | Column::Compressor(CompressorField::Density) => {
                "kg/m³"
            }
            Column::Coil(_, CoilField::Enthalpy)
            | Column::Compressor(CompressorField::Enthalpy)
            | Column::Txv(_, TxvField::Enthalpy) => "kJ/kg",
            Column::Coil(_, CoilField::Entropy) | Column::Compressor(CompressorField::Entropy) => {
                "kJ/(kg·K)"
            }
            Column::Compressor(CompressorField::SuctionPressure)
            | Column::Condenser(CondenserField::DischargePressure) => "psig",
            Column::MassFlow => "lb/hr",
            Column::CoolingCapacity => "BTU/hr",
            Column::Ph(PhField::SuctionPressure | PhField::CondensingPressure) => "Pa",
            Column::Ph(_) => "kJ/kg",
            _ => "°F",
        }
    }
}

fn coil_name(label: CircuitLabel, field: CoilField) -> &'static str {
    use CircuitLabel::{Center as C, Left as L, Right as R};
    use CoilField::*;
    match (label, field) {
        (L, ExpansionOutletTemp) => "T_1a-lh",
        (L, InletTemp) => "T_1b-lh",
        (L, OutletTemp) => "T_2a-LH",
        (L, SatTemp) => "T_sat.lh",
        (L, Superheat) => "S.H_lh coil",
        (L, Density) => "D_coil lh",
        (L, Enthalpy) => "H_coil lh",
        (L, Entropy) => "S_coil lh",
        (C, ExpansionOutletTemp) => "T_1a-ctr",
        (C, InletTemp) => "T_1b-ctr",
        (C, OutletTemp) => "T_2a-ctr",
        (C, SatTemp) => "T_sat.ctr",
        (C, Superheat) => "S.H_ctr coil",
        (C, Density) => "D_coil ctr",
        (C, Enthalpy) => "H_coil ctr",
        (C, Entropy) => "S_coil ctr",
        (R, ExpansionOutletTemp) => "T_1a-rh",
        (R, InletTemp) => "T_1c-rh",
        (R, OutletTemp) => "T_2a-RH",
        (R, SatTemp) => "T_sat.rh",
        (R, Superheat) => "S.H_rh coil",
        (R, Density) => "D_coil rh",
        (R, Enthalpy) => "H_coil rh",
        (R, Entropy) => "S_coil rh",
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Column {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Fields computed for one row, keyed in schema order.
pub type RowFields = BTreeMap<Column, f64>;

/// Result of transforming one input row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RowOutput {
    Computed(RowFields),
    Failed { error: String },
}

impl RowOutput {
    pub fn get(&self, column: Column) -> Option<f64> {
        match self {
            RowOutput::Computed(fields) => fields.get(&column).copied(),
            RowOutput::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RowOutput::Computed(_) => None,
            RowOutput::Failed { error } => Some(error),
        }
    }

    pub fn fields(&self) -> Option<&RowFields> {
        match self {
            RowOutput::Computed(fields) => Some(fields),
            RowOutput::Failed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_is_sorted_and_unique() {
        let all = Column::all();
        let mut sorted = all.clone();
        sorted.sort();
        assert_eq!(all, sorted);

        let names: HashSet<&str> = all.iter().map(|c| c.name()).collect();
        assert_eq!(names.len(), all.len());
        assert_eq!(all.len(), Column::COUNT);
    }

    #[test]
    fn schema_starts_with_left_coil_and_ends_with_pressures() {
        let all = Column::all();
        assert_eq!(all.len(), Column::COUNT);
        assert_eq!(all.first().unwrap().name(), "T_1a-lh");
        assert_eq!(all.last().unwrap().name(), "P_cond");
    }

    #[test]
    fn failed_rows_serialize_as_a_single_error_field() {
        let failed = RowOutput::Failed {
            error: "Missing pressure sensors".into(),
        };
        assert_eq!(
            serde_json::to_string(&failed).unwrap(),
            r#"{"error":"Missing pressure sensors"}"#
        );

        let mut fields = RowFields::new();
        fields.insert(Column::MassFlow, 1.5);
        fields.insert(Column::Compressor(CompressorField::SuctionPressure), 118.0);
        assert_eq!(
            serde_json::to_string(&RowOutput::Computed(fields)).unwrap(),
            r#"{"P_suction":118.0,"m_dot":1.5}"#
        );
    }
}
