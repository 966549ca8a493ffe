//! Session validation logic.

use std::collections::HashSet;

use rf_fluids::Refrigerant;
use rf_topology::{ComponentType, schema_for};

use crate::schema::{ComponentDef, Project, RatedInputsDef};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    if project.refrigerant.parse::<Refrigerant>().is_err() {
        return Err(ValidationError::InvalidValue {
            field: "refrigerant".to_string(),
            value: project.refrigerant.clone(),
            reason: "unknown refrigerant".to_string(),
        });
    }

    let mut ids = HashSet::new();
    for component in &project.components {
        if !ids.insert(component.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: component.id.clone(),
                context: "components".to_string(),
            });
        }
        validate_component(component)?;
    }

    validate_rated_inputs(&project.rated_inputs)
}

fn validate_component(component: &ComponentDef) -> Result<(), ValidationError> {
    if component.id.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "components.id".to_string(),
            value: component.id.clone(),
            reason: "component id must not be empty".to_string(),
        });
    }

    let kind: ComponentType =
        component
            .kind
            .parse()
            .map_err(|_| ValidationError::InvalidValue {
                field: format!("components.{}.type", component.id),
                value: component.kind.clone(),
                reason: "unknown component type".to_string(),
            })?;

    for family in schema_for(kind).dynamic {
        let Some(value) = component.properties.get(family.count_property) else {
            continue;
        };
        let ok = value
            .as_count()
            .is_some_and(|n| (family.min_count..=family.max_count).contains(&n));
        if !ok {
            return Err(ValidationError::InvalidValue {
                field: format!("components.{}.{}", component.id, family.count_property),
                value: format!("{:?}", value),
                reason: format!(
                    "expected an integer in {}..={}",
                    family.min_count, family.max_count
                ),
            });
        }
    }
    Ok(())
}

fn validate_rated_inputs(rated: &RatedInputsDef) -> Result<(), ValidationError> {
    let fields = [
        ("m_dot_rated_lbhr", rated.m_dot_rated_lbhr, true),
        ("hz_rated", rated.hz_rated, true),
        ("disp_ft3", rated.disp_ft3, true),
        ("rated_evap_temp_f", rated.rated_evap_temp_f, false),
        ("rated_return_gas_temp_f", rated.rated_return_gas_temp_f, false),
    ];
    for (field, value, must_be_positive) in fields {
        let Some(v) = value else { continue };
        if !v.is_finite() || (must_be_positive && v < 0.0) {
            return Err(ValidationError::InvalidValue {
                field: format!("rated_inputs.{}", field),
                value: v.to_string(),
                reason: if must_be_positive {
                    "must be finite and non-negative".to_string()
                } else {
                    "must be finite".to_string()
                },
            });
        }
    }
    Ok(())
}
