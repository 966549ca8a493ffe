//! Role key → channel mapping table.

use std::collections::BTreeMap;

use crate::component::ComponentType;

/// Maps port role keys to physical data channels.
///
/// Keys are `{Type}.{Id}.{Port}`; older sessions stored `{Id}.{Port}`, which is
/// consulted when the primary key is absent. Empty channel names count as unmapped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleMappingTable {
    entries: BTreeMap<String, String>,
}

impl RoleMappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primary_key(kind: ComponentType, id: &str, port: &str) -> String {
        format!("{}.{}.{}", kind.name(), id, port)
    }

    pub fn legacy_key(id: &str, port: &str) -> String {
        format!("{}.{}", id, port)
    }

    pub fn insert(&mut self, key: impl Into<String>, channel: impl Into<String>) {
        self.entries.insert(key.into(), channel.into());
    }

    /// Channel for one component port: primary key first, then the legacy key.
    pub fn lookup(&self, kind: ComponentType, id: &str, port: &str) -> Option<&str> {
        self.non_empty(&Self::primary_key(kind, id, port))
            .or_else(|| self.non_empty(&Self::legacy_key(id, port)))
    }

    fn non_empty(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(|ch| ch.trim())
            .filter(|ch| !ch.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for RoleMappingTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_key_wins_over_legacy() {
        let mut table = RoleMappingTable::new();
        table.insert("comp_1.SP", "old channel");
        table.insert("Compressor.comp_1.SP", "Suction PSIG");
        assert_eq!(
            table.lookup(ComponentType::Compressor, "comp_1", "SP"),
            Some("Suction PSIG")
        );
    }

    #[test]
    fn legacy_key_is_a_fallback() {
        let mut table = RoleMappingTable::new();
        table.insert("comp_1.DP", "Discharge PSIG");
        assert_eq!(
            table.lookup(ComponentType::Compressor, "comp_1", "DP"),
            Some("Discharge PSIG")
        );
    }

    #[test]
    fn empty_channel_is_unmapped() {
        let mut table = RoleMappingTable::new();
        table.insert("Compressor.comp_1.RPM", "  ");
        table.insert("comp_1.RPM", "Speed");
        assert_eq!(
            table.lookup(ComponentType::Compressor, "comp_1", "RPM"),
            Some("Speed")
        );
        assert_eq!(table.lookup(ComponentType::Compressor, "comp_2", "RPM"), None);
    }
}
