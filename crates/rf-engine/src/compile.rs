//! Compile a session document into the immutable run snapshot.

use rf_core::units::Volume;
use rf_core::units::field::{cubic_centimeters, cubic_feet};
use rf_fluids::Refrigerant;
use rf_project::{AggregationDef, AmbiguityDef, Project, RatedInputsDef};
use rf_topology::{ComponentType, TopologyBuilder, TopologySnapshot};

use crate::calibration::RatedInputs;
use crate::error::{EngineError, EngineResult};
use crate::resolver::AmbiguityPolicy;
use crate::roles::RoleTable;
use crate::series::AggregationMethod;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineSettings {
    pub ambiguity: AmbiguityPolicy,
    pub aggregation: AggregationMethod,
    pub parallel: bool,
}

/// Everything a run reads. Nothing in it changes while rows are processed.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub topology: TopologySnapshot,
    pub roles: RoleTable,
    pub rated: RatedInputs,
    pub refrigerant: Refrigerant,
    pub settings: EngineSettings,
}

impl RunContext {
    /// Displacement used for per-row mass flow: nameplate value first, then the
    /// first compressor's `displacement_cm3`.
    pub fn row_displacement(&self) -> Option<Volume> {
        self.rated
            .disp_ft3
            .filter(|d| *d > 0.0)
            .map(cubic_feet)
            .or_else(|| self.compressor_displacement())
    }

    /// `displacement_cm3` of the first compressor.
    pub fn compressor_displacement(&self) -> Option<Volume> {
        self.topology
            .components_of(ComponentType::Compressor)
            .next()
            .and_then(|c| c.number("displacement_cm3"))
            .filter(|d| *d > 0.0)
            .map(cubic_centimeters)
    }
}

impl From<AmbiguityDef> for AmbiguityPolicy {
    fn from(def: AmbiguityDef) -> Self {
        match def {
            AmbiguityDef::FirstById => AmbiguityPolicy::FirstById,
            AmbiguityDef::Reject => AmbiguityPolicy::Reject,
        }
    }
}

impl From<AggregationDef> for AggregationMethod {
    fn from(def: AggregationDef) -> Self {
        match def {
            AggregationDef::Average => AggregationMethod::Average,
            AggregationDef::Maximum => AggregationMethod::Maximum,
            AggregationDef::Minimum => AggregationMethod::Minimum,
            AggregationDef::Last => AggregationMethod::Last,
        }
    }
}

impl From<&RatedInputsDef> for RatedInputs {
    fn from(def: &RatedInputsDef) -> Self {
        RatedInputs {
            m_dot_rated_lbhr: def.m_dot_rated_lbhr,
            hz_rated: def.hz_rated,
            disp_ft3: def.disp_ft3,
            rated_evap_temp_f: def.rated_evap_temp_f,
            rated_return_gas_temp_f: def.rated_return_gas_temp_f,
        }
    }
}

/// Build the run snapshot from a loaded (migrated, validated) project.
pub fn compile_project(project: &Project) -> EngineResult<RunContext> {
    let refrigerant: Refrigerant = project
        .refrigerant
        .parse()
        .map_err(|_| EngineError::UnknownRefrigerant(project.refrigerant.clone()))?;

    let mut builder = TopologyBuilder::new();
    for def in &project.components {
        let kind: ComponentType =
            def.kind
                .parse()
                .map_err(|_| EngineError::UnknownComponentType {
                    id: def.id.clone(),
                    kind: def.kind.clone(),
                })?;
        builder.add_component(def.id.clone(), kind);
        for (key, value) in &def.properties {
            builder.set_property(&def.id, key.clone(), value.clone());
        }
    }
    for (key, channel) in &project.sensor_roles {
        builder.map_role(key.clone(), channel.clone());
    }
    let topology = builder.build()?;

    let settings = EngineSettings {
        ambiguity: project.settings.ambiguity.into(),
        aggregation: project.settings.aggregation.into(),
        parallel: project.settings.parallel,
    };
    tracing::debug!(
        project = %project.name,
        %refrigerant,
        components = project.components.len(),
        mappings = project.sensor_roles.len(),
        "compiled session"
    );

    Ok(RunContext {
        topology,
        roles: RoleTable::standard(),
        rated: RatedInputs::from(&project.rated_inputs),
        refrigerant,
        settings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rf_project::from_yaml_str;

    const SESSION: &str = r#"
version: 1
name: bench
refrigerant: R-22
components:
  - id: comp_1
    type: Compressor
    properties:
      displacement_cm3: 40.0
  - id: evap_1
    type: Evaporator
    properties:
      circuits: 2
      circuit_label: Left
sensor_roles:
  Compressor.comp_1.SP: Suction PSIG
  Evaporator.evap_1.outlet_circuit_2: Coil Out 2
settings:
  ambiguity: reject
  aggregation: last
"#;

    #[test]
    fn compiles_topology_and_settings() {
        let project = from_yaml_str(SESSION).unwrap();
        let ctx = compile_project(&project).unwrap();
        assert_eq!(ctx.refrigerant, Refrigerant::R22);
        assert_eq!(ctx.settings.ambiguity, AmbiguityPolicy::Reject);
        assert_eq!(ctx.settings.aggregation, AggregationMethod::Last);
        assert!(!ctx.settings.parallel);
        assert_eq!(ctx.topology.ports("evap_1").unwrap().len(), 4);
        let comp = ctx.topology.component("comp_1").unwrap();
        assert_eq!(ctx.topology.mapped_channel(comp, "SP"), Some("Suction PSIG"));
    }

    #[test]
    fn displacement_prefers_the_nameplate() {
        let mut project = from_yaml_str(SESSION).unwrap();
        let ctx = compile_project(&project).unwrap();
        let d = ctx.row_displacement().unwrap();
        assert!((d.value - 40.0e-6).abs() < 1e-15);

        project.rated_inputs.disp_ft3 = Some(0.00141);
        let ctx = compile_project(&project).unwrap();
        let d = ctx.row_displacement().unwrap();
        assert!((d.value - 0.00141 * 0.028_316_8).abs() < 1e-15);
    }

    #[test]
    fn unknown_refrigerant_is_a_compile_error() {
        let mut project = from_yaml_str(SESSION).unwrap();
        project.refrigerant = "R999".into();
        let err = compile_project(&project).unwrap_err();
        assert!(matches!(err, EngineError::UnknownRefrigerant(ref r) if r == "R999"));
    }
}
