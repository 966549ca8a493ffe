//! Sensor role resolver.
//!
//! Pure function of a topology snapshot and one role definition. Rules are tried
//! in priority order; within a rule, matching components are tried in id order.

use rf_topology::{Component, PortOrigin, TopologySnapshot, enumerate_ports};
use serde::Serialize;

use crate::roles::{PortSelector, RoleDefinition, RoleRule, SensorRole};

/// Channel(s) a role reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Binding {
    Single(String),
    /// Every mapped port of a dynamic family; the reading is their mean.
    Average(Vec<String>),
}

impl Binding {
    pub fn channels(&self) -> &[String] {
        match self {
            Binding::Single(channel) => std::slice::from_ref(channel),
            Binding::Average(channels) => channels,
        }
    }
}

/// How a rule matched by several components is settled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityPolicy {
    /// Use the first candidate in id order and record the ambiguity.
    #[default]
    FirstById,
    /// Treat the rule as non-matching and record the ambiguity.
    Reject,
}

/// A rule that more than one component satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ambiguity {
    pub role: SensorRole,
    pub rule_index: usize,
    /// Candidate component ids, in id order.
    pub candidates: Vec<String>,
    /// Candidate that was used, if any.
    pub chosen: Option<String>,
}

/// Result of resolving one role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleResolution {
    pub binding: Option<Binding>,
    pub ambiguities: Vec<Ambiguity>,
    /// Channels skipped because the caller had already claimed them.
    pub rejected: Vec<String>,
}

/// Resolve one role with no channels claimed.
pub fn resolve_role(
    snapshot: &TopologySnapshot,
    definition: &RoleDefinition,
    policy: AmbiguityPolicy,
) -> RoleResolution {
    resolve_role_excluding(snapshot, definition, policy, |_| false)
}

/// Resolve one role, skipping every channel for which `claimed` returns true.
///
/// A skipped channel makes its component a non-candidate for that rule, so the
/// search falls through to the next component and then to the next rule.
pub fn resolve_role_excluding(
    snapshot: &TopologySnapshot,
    definition: &RoleDefinition,
    policy: AmbiguityPolicy,
    claimed: impl Fn(&str) -> bool,
) -> RoleResolution {
    let mut resolution = RoleResolution::default();

    for (rule_index, rule) in definition.rules.iter().enumerate() {
        let mut candidates: Vec<(&Component, Binding)> = Vec::new();
        for component in snapshot
            .components_of(rule.component)
            .filter(|c| c.matches_filter(&rule.filter))
        {
            if let Some(binding) = bind(snapshot, component, rule, &claimed, &mut resolution.rejected)
            {
                candidates.push((component, binding));
            }
        }

        match candidates.len() {
            0 => continue,
            1 => {
                resolution.binding = candidates.pop().map(|(_, binding)| binding);
                return resolution;
            }
            _ => {
                let ids: Vec<String> = candidates.iter().map(|(c, _)| c.id.clone()).collect();
                match policy {
                    AmbiguityPolicy::FirstById => {
                        let (first, binding) = candidates.swap_remove(0);
                        resolution.ambiguities.push(Ambiguity {
                            role: definition.role,
                            rule_index,
                            candidates: ids,
                            chosen: Some(first.id.clone()),
                        });
                        resolution.binding = Some(binding);
                        return resolution;
                    }
                    AmbiguityPolicy::Reject => {
                        resolution.ambiguities.push(Ambiguity {
                            role: definition.role,
                            rule_index,
                            candidates: ids,
                            chosen: None,
                        });
                    }
                }
            }
        }
    }
    resolution
}

fn bind(
    snapshot: &TopologySnapshot,
    component: &Component,
    rule: &RoleRule,
    claimed: &impl Fn(&str) -> bool,
    rejected: &mut Vec<String>,
) -> Option<Binding> {
    let ports = enumerate_ports(component);
    let mut available = |port: &str| -> Option<String> {
        let channel = snapshot.mapped_channel(component, port)?;
        if claimed(channel) {
            rejected.push(channel.to_string());
            None
        } else {
            Some(channel.to_string())
        }
    };

    match rule.port {
        PortSelector::Named(name) => {
            if !ports.iter().any(|p| p.name == name) {
                return None;
            }
            available(name).map(Binding::Single)
        }
        PortSelector::AllOf(prefix) => {
            let channels: Vec<String> = ports
                .iter()
                .filter(|p| matches!(p.origin, PortOrigin::Dynamic { prefix: fam, .. } if fam == prefix))
                .filter_map(|p| available(&p.name))
                .collect();
            (!channels.is_empty()).then_some(Binding::Average(channels))
        }
    }
}
