use std::collections::BTreeMap;

use foundation::ids::RegionId;
use foundation::time::DateKey;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::geometry::Geometry;

/// Label → value readings for one region at one date.
///
/// Insertion order is preserved: it defines the order labels are offered to
/// the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Readings {
    entries: Vec<(String, f64)>,
}

impl Readings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `label` to `value`, keeping the label's original position if it
    /// was already present.
    pub fn insert(&mut self, label: impl Into<String>, value: f64) {
        let label = label.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| *v)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries.iter().map(|(l, v)| (l.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Readings {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut out = Readings::new();
        for (label, value) in iter {
            out.insert(label, value);
        }
        out
    }
}

impl Serialize for Readings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Readings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ReadingsVisitor;

        impl<'de> Visitor<'de> for ReadingsVisitor {
            type Value = Readings;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of label to numeric value")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Readings, A::Error> {
                let mut out = Readings::new();
                while let Some((label, value)) = access.next_entry::<String, f64>()? {
                    out.insert(label, value);
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(ReadingsVisitor)
    }
}

/// A geographic unit with per-date, per-label values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub dates: BTreeMap<DateKey, Readings>,
}

impl Region {
    pub fn new(id: impl Into<RegionId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            geometry: None,
            dates: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, date: impl Into<DateKey>, label: impl Into<String>, value: f64) -> Self {
        self.set_value(date, label, value);
        self
    }

    pub fn set_value(&mut self, date: impl Into<DateKey>, label: impl Into<String>, value: f64) {
        self.dates.entry(date.into()).or_default().insert(label, value);
    }

    pub fn value(&self, date: &DateKey, label: &str) -> Option<f64> {
        self.dates.get(date)?.get(label)
    }
}

/// Ordered regions. Position `i` corresponds to the `i`-th geometric feature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    regions: Vec<Region>,
}

impl Dataset {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, index: usize) -> Option<&Region> {
        self.regions.get(index)
    }

    pub fn position_of(&self, id: &RegionId) -> Option<usize> {
        self.regions.iter().position(|r| &r.id == id)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
