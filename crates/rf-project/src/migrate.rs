//! Schema migration framework.

use rf_topology::ComponentType;

use crate::ProjectError;
use crate::schema::Project;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut project: Project) -> Result<Project, ProjectError> {
    while project.version < LATEST_VERSION {
        project = migrate_one_version(project)?;
    }
    Ok(project)
}

fn migrate_one_version(project: Project) -> Result<Project, ProjectError> {
    match project.version {
        0 => migrate_v0_to_v1(project),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Version 0 sessions keyed roles as `{Id}.{Port}`. Rewrite every key whose id names a
/// known component into `{Type}.{Id}.{Port}`; an existing primary key is kept over the legacy one.
fn migrate_v0_to_v1(mut project: Project) -> Result<Project, ProjectError> {
    let mut migrated = std::collections::BTreeMap::new();
    let mut legacy = Vec::new();

    for (key, channel) in std::mem::take(&mut project.sensor_roles) {
        let parts: Vec<&str> = key.split('.').collect();
        let component = match parts.as_slice() {
            [id, _port] => project.components.iter().find(|c| c.id == *id),
            _ => None,
        };
        match component {
            Some(component) => {
                let kind = component
                    .kind
                    .parse::<ComponentType>()
                    .map(|k| k.name().to_string())
                    .unwrap_or_else(|_| component.kind.clone());
                legacy.push((format!("{}.{}", kind, key), channel));
            }
            None => {
                migrated.insert(key, channel);
            }
        }
    }
    for (key, channel) in legacy {
        migrated.entry(key).or_insert(channel);
    }

    project.sensor_roles = migrated;
    project.version = 1;
    Ok(project)
}
