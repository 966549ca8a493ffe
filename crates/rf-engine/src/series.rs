//! Input rows, series and single-instant channel readers.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use rf_core::numeric::{finite, mean};
use serde::{Deserialize, Deserializer, Serialize};

use crate::resolver::Binding;

/// "Value of this channel now."
pub trait ChannelReader {
    /// Finite reading of one channel; NaN, infinities and absent channels read as `None`.
    fn value(&self, channel: &str) -> Option<f64>;

    /// Reading of a binding. A family binding is the mean of its present channels.
    fn read(&self, binding: &Binding) -> Option<f64> {
        match binding {
            Binding::Single(channel) => self.value(channel),
            Binding::Average(channels) => {
                let values: Vec<f64> = channels.iter().filter_map(|c| self.value(c)).collect();
                mean(&values)
            }
        }
    }
}

/// One timestamped observation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_values")]
    pub values: BTreeMap<String, f64>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, channel: impl Into<String>, value: f64) -> Self {
        self.values.insert(channel.into(), value);
        self
    }

    pub fn at(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

impl ChannelReader for Row {
    fn value(&self, channel: &str) -> Option<f64> {
        self.values.get(channel).copied().and_then(finite)
    }
}

/// `null` entries are dropped so they read as absent.
fn deserialize_values<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Option<f64>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
        .collect())
}

mod timestamp {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{Deserialize, Deserializer, de::Error};

    /// RFC 3339 (converted to UTC) or naive ISO 8601.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(text) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        if let Ok(dt) = DateTime::parse_from_rfc3339(&text) {
            return Ok(Some(dt.naive_utc()));
        }
        text.parse::<NaiveDateTime>()
            .map(Some)
            .map_err(|e| D::Error::custom(format!("invalid timestamp '{}': {}", text, e)))
    }
}

/// Ordered, fully materialized table of rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series {
    pub rows: Vec<Row>,
}

impl Series {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Union of every row's channel names.
    pub fn columns(&self) -> BTreeSet<String> {
        self.rows
            .iter()
            .flat_map(|r| r.values.keys().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }
}

impl FromIterator<Row> for Series {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

/// Column reduction used for single-instant reads over a whole series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMethod {
    #[default]
    Average,
    Maximum,
    Minimum,
    Last,
}

/// Reads each channel as one aggregate over the series.
#[derive(Debug, Clone, Copy)]
pub struct SeriesAggregate<'a> {
    pub series: &'a Series,
    pub method: AggregationMethod,
}

impl<'a> SeriesAggregate<'a> {
    pub fn new(series: &'a Series, method: AggregationMethod) -> Self {
        Self { series, method }
    }
}

impl ChannelReader for SeriesAggregate<'_> {
    fn value(&self, channel: &str) -> Option<f64> {
        let values = self.series.iter().filter_map(|row| row.value(channel));
        match self.method {
            AggregationMethod::Average => mean(&values.collect::<Vec<_>>()),
            AggregationMethod::Maximum => values.reduce(f64::max),
            AggregationMethod::Minimum => values.reduce(f64::min),
            AggregationMethod::Last => values.last(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> Series {
        Series::new(vec![
            Row::new().with("P", 100.0).with("T", 40.0),
            Row::new().with("P", 110.0).with("T", f64::NAN),
            Row::new().with("P", 90.0),
        ])
    }

    #[test]
    fn nan_reads_as_absent() {
        let s = series();
        assert_eq!(s.rows[1].value("T"), None);
        assert_eq!(s.rows[1].value("missing"), None);
        assert_eq!(s.rows[0].value("T"), Some(40.0));
    }

    #[test]
    fn aggregates_skip_absent_values() {
        let s = series();
        let read = |method| SeriesAggregate::new(&s, method).value("P");
        assert_eq!(read(AggregationMethod::Average), Some(100.0));
        assert_eq!(read(AggregationMethod::Maximum), Some(110.0));
        assert_eq!(read(AggregationMethod::Minimum), Some(90.0));
        assert_eq!(read(AggregationMethod::Last), Some(90.0));
        assert_eq!(
            SeriesAggregate::new(&s, AggregationMethod::Last).value("T"),
            Some(40.0)
        );
    }

    #[test]
    fn family_binding_averages_present_channels() {
        let row = Row::new().with("O1", 50.0).with("O2", 54.0);
        let binding = Binding::Average(vec!["O1".into(), "O2".into(), "O3".into()]);
        assert_eq!(row.read(&binding), Some(52.0));
        assert_eq!(row.read(&Binding::Average(vec!["O3".into()])), None);
    }

    #[test]
    fn columns_are_the_union_of_keys() {
        let s = Series::new(vec![Row::new().with("a", 1.0), Row::new().with("b", 2.0)]);
        let cols: Vec<String> = s.columns().into_iter().collect();
        assert_eq!(cols, ["a", "b"]);
    }

    #[test]
    fn parses_json_rows_with_either_timestamp_form() {
        let json = r#"[
            {"timestamp": "2026-06-01T12:00:00", "values": {"P": 1.5, "T": null}},
            {"timestamp": "2026-06-01T14:00:10+02:00", "values": {"P": 2.0}},
            {"values": {}}
        ]"#;
        let s: Series = serde_json::from_str(json).unwrap();
        assert_eq!(s.len(), 3);
        assert!(!s.rows[0].values.contains_key("T"));
        assert_eq!(s.rows[0].timestamp.unwrap().to_string(), "2026-06-01 12:00:00");
        assert_eq!(s.rows[1].timestamp.unwrap().to_string(), "2026-06-01 12:00:10");
        assert_eq!(s.rows[2].timestamp, None);
    }
}
