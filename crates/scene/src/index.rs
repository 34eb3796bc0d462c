use foundation::ids::RegionId;
use foundation::time::DateKey;
use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Region};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    Empty,
    NoDates,
    NoLabels,
    LabelOutOfRange { index: usize, len: usize },
    DateOutOfRange { index: usize, len: usize },
    RegionOutOfRange { index: usize, len: usize },
    MissingValue {
        region: RegionId,
        date: DateKey,
        label: String,
    },
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Empty => write!(f, "dataset has no regions"),
            DatasetError::NoDates => write!(f, "dataset has no dates"),
            DatasetError::NoLabels => write!(f, "dataset has no labels"),
            DatasetError::LabelOutOfRange { index, len } => {
                write!(f, "label index {index} out of range (labels={len})")
            }
            DatasetError::DateOutOfRange { index, len } => {
                write!(f, "date index {index} out of range (dates={len})")
            }
            DatasetError::RegionOutOfRange { index, len } => {
                write!(f, "region index {index} out of range (regions={len})")
            }
            DatasetError::MissingValue {
                region,
                date,
                label,
            } => write!(f, "region {region} has no value for {label} at {date}"),
        }
    }
}

impl std::error::Error for DatasetError {}

/// Turns a raw label key into the text shown to the user.
pub trait LabelFormatter {
    fn format(&self, label: &str) -> String;
}

/// Default formatter: `_` and `-` become spaces and every word is capitalized.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct TitleCaseLabels;

impl LabelFormatter for TitleCaseLabels {
    fn format(&self, label: &str) -> String {
        label
            .split(['_', '-', ' '])
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(c) => c.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Sorted date keys. Index 0 is the initial active date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateAxis {
    dates: Vec<DateKey>,
}

impl DateAxis {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Never true for an axis produced by [`DatasetIndex::build`].
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DateKey> {
        self.dates.get(index)
    }

    pub fn first(&self) -> Option<&DateKey> {
        self.dates.first()
    }

    pub fn last_index(&self) -> usize {
        self.dates.len().saturating_sub(1)
    }

    pub fn position(&self, date: &DateKey) -> Option<usize> {
        self.dates.binary_search(date).ok()
    }

    pub fn as_slice(&self) -> &[DateKey] {
        &self.dates
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEntry {
    pub key: String,
    pub text: String,
}

/// Labels in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<LabelEntry>,
}

impl LabelSet {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LabelEntry> {
        self.labels.get(index)
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.labels.iter().position(|l| l.key == key)
    }

    pub fn as_slice(&self) -> &[LabelEntry] {
        &self.labels
    }
}

/// Value range mapped onto the lightness scale.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorDomain {
    pub min: f64,
    pub max: f64,
}

impl ColorDomain {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

/// Date axis and label set derived from a dataset, plus value lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetIndex {
    dates: DateAxis,
    labels: LabelSet,
}

impl DatasetIndex {
    /// Dates come from the first region (all regions share one date set);
    /// labels are collected across every region and date in first-seen order.
    pub fn build(dataset: &Dataset, formatter: &dyn LabelFormatter) -> Result<Self, DatasetError> {
        let representative = dataset.region(0).ok_or(DatasetError::Empty)?;
        let dates: Vec<DateKey> = representative.dates.keys().cloned().collect();
        if dates.is_empty() {
            return Err(DatasetError::NoDates);
        }

        let mut labels: Vec<LabelEntry> = Vec::new();
        for region in dataset.regions() {
            for readings in region.dates.values() {
                for key in readings.labels() {
                    if !labels.iter().any(|l| l.key == key) {
                        labels.push(LabelEntry {
                            key: key.to_string(),
                            text: formatter.format(key),
                        });
                    }
                }
            }
        }
        if labels.is_empty() {
            return Err(DatasetError::NoLabels);
        }

        Ok(Self {
            dates: DateAxis { dates },
            labels: LabelSet { labels },
        })
    }

    pub fn dates(&self) -> &DateAxis {
        &self.dates
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn label(&self, index: usize) -> Result<&LabelEntry, DatasetError> {
        self.labels.get(index).ok_or(DatasetError::LabelOutOfRange {
            index,
            len: self.labels.len(),
        })
    }

    pub fn date(&self, index: usize) -> Result<&DateKey, DatasetError> {
        self.dates.get(index).ok_or(DatasetError::DateOutOfRange {
            index,
            len: self.dates.len(),
        })
    }

    /// Min/max of the label's values at the *first* date, across all regions.
    ///
    /// The selected date never participates, so the color legend stays fixed
    /// while scrubbing through time.
    pub fn domain_for_label(
        &self,
        dataset: &Dataset,
        label_index: usize,
    ) -> Result<ColorDomain, DatasetError> {
        if dataset.is_empty() {
            return Err(DatasetError::Empty);
        }
        let mut domain: Option<ColorDomain> = None;
        for region in dataset.regions() {
            let v = self.region_value(region, 0, label_index)?;
            domain = Some(match domain {
                None => ColorDomain::new(v, v),
                Some(d) => ColorDomain::new(d.min.min(v), d.max.max(v)),
            });
        }
        domain.ok_or(DatasetError::Empty)
    }

    pub fn value_at(
        &self,
        dataset: &Dataset,
        region_index: usize,
        date_index: usize,
        label_index: usize,
    ) -> Result<f64, DatasetError> {
        let region = dataset
            .region(region_index)
            .ok_or(DatasetError::RegionOutOfRange {
                index: region_index,
                len: dataset.len(),
            })?;
        self.region_value(region, date_index, label_index)
    }

    pub fn region_value(
        &self,
        region: &Region,
        date_index: usize,
        label_index: usize,
    ) -> Result<f64, DatasetError> {
        let date = self.date(date_index)?;
        let label = self.label(label_index)?;
        region
            .value(date, &label.key)
            .ok_or_else(|| DatasetError::MissingValue {
                region: region.id.clone(),
                date: date.clone(),
                label: label.key.clone(),
            })
    }
}
