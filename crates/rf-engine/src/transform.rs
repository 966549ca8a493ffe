//! Per-row performance transform.
//!
//! Every section of the output is derived independently: a missing optional
//! temperature drops only its own section, and only `m_dot` and `qc` read the
//! speed channel. Missing suction or discharge pressure fails the row, as does
//! any oracle error, so a row is either fully consistent or a single `error`.

use rf_core::numeric::mean;
use rf_core::units::field::{
    BTULB_PER_JKG, delta_fahrenheit, fahrenheit, kgs_to_lbhr, psig, to_fahrenheit,
};
use rf_core::units::{Pressure, Temperature, Volume};
use rf_fluids::{FluidError, PointProps, PropertyOracle, Refrigerant, StateSpec};
use rf_topology::CircuitLabel;

use crate::guard::ChannelMap;
use crate::roles::SensorRole;
use crate::schema::{
    Column, CoilField, CompressorField, CondenserField, PhField, RowFields, RowOutput, TxvField,
};
use crate::series::ChannelReader;

/// Everything a row needs besides the row itself. Immutable for a batch.
#[derive(Debug, Clone, Copy)]
pub struct RowContext<'a> {
    pub channels: &'a ChannelMap,
    pub eta_vol: f64,
    pub displacement: Option<Volume>,
    pub refrigerant: Refrigerant,
}

#[derive(Debug, thiserror::Error)]
pub enum RowError {
    #[error("Missing pressure sensors - map suction and discharge pressure sensors")]
    MissingPressures,

    #[error("{what}: {source}")]
    Property {
        what: &'static str,
        #[source]
        source: FluidError,
    },
}

/// Transform one row into the output schema, or a single error.
pub fn transform_row<O, R>(oracle: &O, reader: &R, ctx: &RowContext<'_>) -> RowOutput
where
    O: PropertyOracle + ?Sized,
    R: ChannelReader + ?Sized,
{
    match compute_fields(oracle, reader, ctx) {
        Ok(fields) => RowOutput::Computed(fields),
        Err(e) => RowOutput::Failed {
            error: e.to_string(),
        },
    }
}

struct Props<'o, O: ?Sized> {
    oracle: &'o O,
    refrigerant: Refrigerant,
}

impl<O: PropertyOracle + ?Sized> Props<'_, O> {
    fn at(&self, p: Pressure, t: Temperature, what: &'static str) -> Result<PointProps, RowError> {
        self.oracle
            .point_props(StateSpec::PT { p, t }, self.refrigerant)
            .map_err(|source| RowError::Property { what, source })
    }

    fn t_sat(&self, p: Pressure, what: &'static str) -> Result<Temperature, RowError> {
        self.oracle
            .saturation_temperature(p, 0.0, self.refrigerant)
            .map_err(|source| RowError::Property { what, source })
    }
}

/// The value of one role, or `None` when unmapped or absent in this row.
fn read<R: ChannelReader + ?Sized>(reader: &R, ctx: &RowContext<'_>, role: SensorRole) -> Option<f64> {
    ctx.channels.get(&role).and_then(|b| reader.read(b))
}

pub fn compute_fields<O, R>(oracle: &O, reader: &R, ctx: &RowContext<'_>) -> Result<RowFields, RowError>
where
    O: PropertyOracle + ?Sized,
    R: ChannelReader + ?Sized,
{
    let value = |role| read(reader, ctx, role);
    let (Some(p_suc_psig), Some(p_disch_psig)) = (
        value(SensorRole::SuctionPressure),
        value(SensorRole::DischargePressure),
    ) else {
        return Err(RowError::MissingPressures);
    };

    let props = Props {
        oracle,
        refrigerant: ctx.refrigerant,
    };
    let p_suc = psig(p_suc_psig);
    let p_disch = psig(p_disch_psig);
    let t_sat_suc = props.t_sat(p_suc, "suction saturation temperature")?;
    let t_sat_disch = props.t_sat(p_disch, "discharge saturation temperature")?;

    let mut out = RowFields::new();

    for label in CircuitLabel::ALL {
        coil_section(&props, &value, label, p_suc, t_sat_suc, &mut out)?;
    }

    // Compressor inlet
    out.insert(
        Column::Compressor(CompressorField::SuctionPressure),
        p_suc_psig,
    );
    let mut suction_gas: Option<PointProps> = None;
    if let Some(t_f) = value(SensorRole::CompressorInlet) {
        let t = fahrenheit(t_f);
        let pp = props.at(p_suc, t, "compressor inlet")?;
        out.insert(Column::Compressor(CompressorField::InletTemp), t_f);
        out.insert(
            Column::Compressor(CompressorField::SatTemp),
            to_fahrenheit(t_sat_suc),
        );
        out.insert(
            Column::Compressor(CompressorField::Superheat),
            delta_fahrenheit(t.value - t_sat_suc.value),
        );
        out.insert(Column::Compressor(CompressorField::Density), pp.rho);
        out.insert(Column::Compressor(CompressorField::Enthalpy), pp.h / 1000.0);
        out.insert(Column::Compressor(CompressorField::Entropy), pp.s / 1000.0);
        out.insert(Column::Ph(PhField::CompressorInlet), pp.h / 1000.0);
        suction_gas = Some(pp);
    }

    // Compressor outlet and condenser
    if let Some(t_f) = value(SensorRole::CompressorOutlet) {
        let pp = props.at(p_disch, fahrenheit(t_f), "compressor outlet")?;
        out.insert(Column::DischargeTemp, t_f);
        out.insert(Column::Ph(PhField::CompressorOutlet), pp.h / 1000.0);
    }
    if let Some(t_f) = value(SensorRole::CondenserInlet) {
        let pp = props.at(p_disch, fahrenheit(t_f), "condenser inlet")?;
        out.insert(Column::Condenser(CondenserField::InletTemp), t_f);
        out.insert(Column::Ph(PhField::CondenserInlet), pp.h / 1000.0);
    }
    out.insert(
        Column::Condenser(CondenserField::DischargePressure),
        p_disch_psig,
    );
    if let Some(t_f) = value(SensorRole::CondenserOutlet) {
        let t = fahrenheit(t_f);
        let pp = props.at(p_disch, t, "condenser outlet")?;
        out.insert(Column::Condenser(CondenserField::OutletTemp), t_f);
        out.insert(
            Column::Condenser(CondenserField::SatTemp),
            to_fahrenheit(t_sat_disch),
        );
        out.insert(
            Column::Condenser(CondenserField::Subcooling),
            delta_fahrenheit(t_sat_disch.value - t.value),
        );
        out.insert(Column::Ph(PhField::CondenserOutlet), pp.h / 1000.0);
    }
    if let Some(t_f) = value(SensorRole::WaterIn) {
        out.insert(Column::Condenser(CondenserField::WaterIn), t_f);
    }
    if let Some(t_f) = value(SensorRole::WaterOut) {
        out.insert(Column::Condenser(CondenserField::WaterOut), t_f);
    }

    // TXV inlets
    let mut liquid_enthalpies = Vec::new();
    for label in CircuitLabel::ALL {
        if let Some(h) = txv_section(&props, &value, label, p_disch, t_sat_disch, &mut out)? {
            liquid_enthalpies.push(h);
        }
    }

    // Totals: the only fields that read the speed channel.
    let speed_rpm = value(SensorRole::CompressorSpeed).filter(|s| *s > 0.0);
    let displacement_m3 = ctx.displacement.map(|d| d.value).filter(|d| *d > 0.0);
    if let (Some(rpm), Some(gas), Some(disp)) = (speed_rpm, suction_gas, displacement_m3) {
        let m_dot_kgs = gas.rho * ctx.eta_vol * disp * (rpm / 60.0);
        let m_dot_lbhr = kgs_to_lbhr(m_dot_kgs);
        out.insert(Column::MassFlow, m_dot_lbhr);

        if let Some(h_liquid) = mean(&liquid_enthalpies) {
            let qc = m_dot_lbhr * (gas.h - h_liquid) * BTULB_PER_JKG;
            out.insert(Column::CoolingCapacity, qc);
        }
    }

    out.insert(Column::Ph(PhField::SuctionPressure), p_suc.value);
    out.insert(Column::Ph(PhField::CondensingPressure), p_disch.value);
    Ok(out)
}

fn coil_section<O, F>(
    props: &Props<'_, O>,
    value: &F,
    label: CircuitLabel,
    p_suc: Pressure,
    t_sat_suc: Temperature,
    out: &mut RowFields,
) -> Result<(), RowError>
where
    O: PropertyOracle + ?Sized,
    F: Fn(SensorRole) -> Option<f64>,
{
    let col = |field| Column::Coil(label, field);
    if let Some(t_f) = value(SensorRole::ExpansionOutlet(label)) {
        out.insert(col(CoilField::ExpansionOutletTemp), t_f);
    }
    if let Some(t_f) = value(SensorRole::CoilInlet(label)) {
        out.insert(col(CoilField::InletTemp), t_f);
    }
    if let Some(t_f) = value(SensorRole::CoilOutlet(label)) {
        let t = fahrenheit(t_f);
        let pp = props.at(p_suc, t, "evaporator outlet")?;
        out.insert(col(CoilField::OutletTemp), t_f);
        out.insert(col(CoilField::SatTemp), to_fahrenheit(t_sat_suc));
        out.insert(
            col(CoilField::Superheat),
            delta_fahrenheit(t.value - t_sat_suc.value),
        );
        out.insert(col(CoilField::Density), pp.rho);
        out.insert(col(CoilField::Enthalpy), pp.h / 1000.0);
        out.insert(col(CoilField::Entropy), pp.s / 1000.0);
        out.insert(Column::Ph(PhField::CoilOutlet(label)), pp.h / 1000.0);
    }
    Ok(())
}

/// Emits one TXV section and returns its inlet enthalpy [J/kg].
fn txv_section<O, F>(
    props: &Props<'_, O>,
    value: &F,
    label: CircuitLabel,
    p_disch: Pressure,
    t_sat_disch: Temperature,
    out: &mut RowFields,
) -> Result<Option<f64>, RowError>
where
    O: PropertyOracle + ?Sized,
    F: Fn(SensorRole) -> Option<f64>,
{
    let Some(t_f) = value(SensorRole::ExpansionInlet(label)) else {
        return Ok(None);
    };
    let t = fahrenheit(t_f);
    let pp = props.at(p_disch, t, "TXV inlet")?;
    let col = |field| Column::Txv(label, field);
    out.insert(col(TxvField::InletTemp), t_f);
    out.insert(col(TxvField::SatTemp), to_fahrenheit(t_sat_disch));
    out.insert(
        col(TxvField::Subcooling),
        delta_fahrenheit(t_sat_disch.value - t.value),
    );
    out.insert(col(TxvField::Enthalpy), pp.h / 1000.0);
    out.insert(Column::Ph(PhField::ExpansionInlet(label)), pp.h / 1000.0);
    Ok(Some(pp.h))
}
