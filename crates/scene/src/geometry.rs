use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;

/// Boundary geometry, opaque to the core.
///
/// Typically a GeoJSON geometry object; it is only ever handed to the path
/// collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Geometry(serde_json::Value);

impl Geometry {
    pub fn new(value: serde_json::Value) -> Self {
        Geometry(value)
    }

    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// GeoJSON allows string or numeric ids; numbers are kept as their decimal text.
    #[serde(
        default,
        deserialize_with = "feature_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub geometry: Geometry,
}

fn feature_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "feature id must be a string or number, got {other}"
        ))),
    }
}

/// Ordered boundary geometries; position `i` belongs to the dataset's region `i`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Builds features from geometry carried on the regions themselves.
    ///
    /// Returns `None` if any region lacks geometry.
    pub fn from_regions(dataset: &Dataset) -> Option<Self> {
        let features = dataset
            .regions()
            .iter()
            .map(|r| {
                r.geometry.clone().map(|geometry| Feature {
                    id: Some(r.id.as_str().to_string()),
                    geometry,
                })
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Self { features })
    }
}
