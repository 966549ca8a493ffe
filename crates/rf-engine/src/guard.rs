//! Duplicate-mapping guard: resolves every role in table order, one claim per channel.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use rf_topology::TopologySnapshot;
use serde::Serialize;

use crate::resolver::{AmbiguityPolicy, Binding, resolve_role_excluding};
use crate::roles::{RoleTable, SensorRole};

/// Role → channel binding for one run.
pub type ChannelMap = BTreeMap<SensorRole, Binding>;

/// A mapping problem settled deterministically during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Conflict {
    /// `role` wanted `channel`, already claimed by `claimed_by`.
    DuplicateChannel {
        role: SensorRole,
        channel: String,
        claimed_by: SensorRole,
    },
    /// Several components satisfied one rule.
    Ambiguous {
        role: SensorRole,
        candidates: Vec<String>,
        chosen: Option<String>,
    },
    /// `channel` resolved but is not a column of the input series.
    MissingColumn { role: SensorRole, channel: String },
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Conflict::DuplicateChannel {
                role,
                channel,
                claimed_by,
            } => write!(f, "{}: channel '{}' already used by {}", role, channel, claimed_by),
            Conflict::Ambiguous {
                role,
                candidates,
                chosen,
            } => match chosen {
                Some(id) => write!(
                    f,
                    "{}: ambiguous match [{}], using {}",
                    role,
                    candidates.join(", "),
                    id
                ),
                None => write!(f, "{}: ambiguous match [{}], rejected", role, candidates.join(", ")),
            },
            Conflict::MissingColumn { role, channel } => {
                write!(f, "{}: channel '{}' not in input data", role, channel)
            }
        }
    }
}

/// Outcome of resolving the whole role table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionReport {
    pub bindings: ChannelMap,
    /// Roles without a usable channel, in table order.
    pub unmapped: Vec<SensorRole>,
    pub conflicts: Vec<Conflict>,
}

impl ResolutionReport {
    pub fn binding(&self, role: SensorRole) -> Option<&Binding> {
        self.bindings.get(&role)
    }

    pub fn is_clean(&self) -> bool {
        self.unmapped.is_empty() && self.conflicts.is_empty()
    }

    /// One-line summary of unmapped roles and conflicts.
    pub fn summary(&self) -> String {
        let unmapped: Vec<&str> = self.unmapped.iter().map(|r| r.key()).collect();
        let conflicts: Vec<String> = self.conflicts.iter().map(|c| c.to_string()).collect();
        format!(
            "{} mapped, {} unmapped [{}], {} conflict(s) [{}]",
            self.bindings.len(),
            unmapped.len(),
            unmapped.join(", "),
            conflicts.len(),
            conflicts.join("; ")
        )
    }
}

/// Resolve every role of `table` in order, never binding one channel to two roles.
///
/// A role whose preferred channel is already claimed falls back to its next candidate.
/// When `columns` is given, channels absent from it are demoted afterwards; a family
/// binding keeps whichever of its channels are present.
pub fn resolve_all(
    snapshot: &TopologySnapshot,
    table: &RoleTable,
    policy: AmbiguityPolicy,
    columns: Option<&BTreeSet<String>>,
) -> ResolutionReport {
    let mut report = ResolutionReport::default();
    let mut claims: HashMap<String, SensorRole> = HashMap::new();

    for definition in table.iter() {
        let resolution =
            resolve_role_excluding(snapshot, definition, policy, |ch| claims.contains_key(ch));

        for channel in resolution.rejected {
            if let Some(&claimed_by) = claims.get(&channel) {
                report.conflicts.push(Conflict::DuplicateChannel {
                    role: definition.role,
                    channel,
                    claimed_by,
                });
            }
        }
        report
            .conflicts
            .extend(resolution.ambiguities.into_iter().map(|a| Conflict::Ambiguous {
                role: a.role,
                candidates: a.candidates,
                chosen: a.chosen,
            }));

        if let Some(binding) = resolution.binding {
            for channel in binding.channels() {
                claims.insert(channel.clone(), definition.role);
            }
            report.bindings.insert(definition.role, binding);
        }
    }

    if let Some(columns) = columns {
        demote_missing(&mut report, columns);
    }

    report.unmapped = table
        .iter()
        .map(|d| d.role)
        .filter(|role| !report.bindings.contains_key(role))
        .collect();

    if !report.is_clean() {
        tracing::warn!(
            unmapped = report.unmapped.len(),
            conflicts = report.conflicts.len(),
            "sensor role resolution: {}",
            report.summary()
        );
    }
    report
}

fn demote_missing(report: &mut ResolutionReport, columns: &BTreeSet<String>) {
    let mut demoted = Vec::new();
    for (role, binding) in report.bindings.iter_mut() {
        let (present, missing): (Vec<String>, Vec<String>) = binding
            .channels()
            .iter()
            .cloned()
            .partition(|ch| columns.contains(ch));

        report.conflicts.extend(
            missing
                .into_iter()
                .map(|channel| Conflict::MissingColumn { role: *role, channel }),
        );

        match binding {
            _ if present.is_empty() => demoted.push(*role),
            Binding::Average(channels) => *channels = present,
            Binding::Single(_) => {}
        }
    }
    for role in demoted {
        report.bindings.remove(&role);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::{PortSelector, RoleDefinition, RoleRule};
    use rf_topology::{CircuitLabel, ComponentType, TopologyBuilder};

    fn rig() -> TopologySnapshot {
        let mut b = TopologyBuilder::new();
        b.add_component("comp", ComponentType::Compressor)
            .add_component("txv", ComponentType::Txv)
            .set_property("txv", "circuit_label", "Left")
            .add_component("dist", ComponentType::Distributor)
            .set_property("dist", "circuit_label", "Left")
            .map_port(ComponentType::Compressor, "comp", "SP", "Suction")
            .map_port(ComponentType::Compressor, "comp", "DP", "Discharge")
            .map_port(ComponentType::Txv, "txv", "outlet", "Shared")
            .map_port(ComponentType::Distributor, "dist", "inlet", "Dist In")
            .map_port(ComponentType::Distributor, "dist", "outlet_1", "Shared");
        b.build().unwrap()
    }

    #[test]
    fn claimed_channel_forces_fallback() {
        let report = resolve_all(&rig(), &RoleTable::standard(), AmbiguityPolicy::FirstById, None);
        assert_eq!(
            report.binding(SensorRole::ExpansionOutlet(CircuitLabel::Left)),
            Some(&Binding::Single("Shared".into()))
        );
        assert_eq!(report.binding(SensorRole::CoilInlet(CircuitLabel::Left)), None);
        assert!(report.conflicts.contains(&Conflict::DuplicateChannel {
            role: SensorRole::CoilInlet(CircuitLabel::Left),
            channel: "Shared".into(),
            claimed_by: SensorRole::ExpansionOutlet(CircuitLabel::Left),
        }));
        assert!(report.unmapped.contains(&SensorRole::CoilInlet(CircuitLabel::Left)));
    }

    #[test]
    fn two_roles_on_one_channel_map_exactly_once() {
        let table = RoleTable::new(vec![
            RoleDefinition {
                role: SensorRole::CompressorInlet,
                rules: vec![RoleRule::new(ComponentType::Compressor, PortSelector::Named("SP"))],
            },
            RoleDefinition {
                role: SensorRole::SuctionPressure,
                rules: vec![RoleRule::new(ComponentType::Compressor, PortSelector::Named("SP"))],
            },
        ]);
        let report = resolve_all(&rig(), &table, AmbiguityPolicy::FirstById, None);
        assert_eq!(report.bindings.len(), 1);
        assert!(report.bindings.contains_key(&SensorRole::CompressorInlet));
        assert_eq!(report.unmapped, [SensorRole::SuctionPressure]);
        assert_eq!(report.conflicts.len(), 1);
    }

    #[test]
    fn channels_missing_from_the_series_are_demoted() {
        let columns: BTreeSet<String> = ["Suction".to_string()].into_iter().collect();
        let report = resolve_all(
            &rig(),
            &RoleTable::standard(),
            AmbiguityPolicy::FirstById,
            Some(&columns),
        );
        assert_eq!(
            report.binding(SensorRole::SuctionPressure),
            Some(&Binding::Single("Suction".into()))
        );
        assert_eq!(report.binding(SensorRole::DischargePressure), None);
        assert!(report.conflicts.contains(&Conflict::MissingColumn {
            role: SensorRole::DischargePressure,
            channel: "Discharge".into(),
        }));
    }

    #[test]
    fn resolution_is_deterministic() {
        let a = resolve_all(&rig(), &RoleTable::standard(), AmbiguityPolicy::FirstById, None);
        let b = resolve_all(&rig(), &RoleTable::standard(), AmbiguityPolicy::FirstById, None);
        assert_eq!(a, b);
    }
}
