use std::collections::BTreeMap;

use foundation::handles::ShapeHandle;
use foundation::ids::RegionId;
use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Region};
use crate::geometry::{FeatureCollection, Geometry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    CountMismatch { regions: usize, features: usize },
    IdMismatch {
        position: usize,
        region: RegionId,
        feature: String,
    },
    DuplicateRegion(RegionId),
    /// The surface (or the path collaborator) could not produce a shape.
    ShapeFailed {
        position: usize,
        region: RegionId,
        reason: String,
    },
    BordersFailed(String),
}

impl std::fmt::Display for BindingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BindingError::CountMismatch { regions, features } => write!(
                f,
                "feature count does not match dataset: regions={regions} features={features}"
            ),
            BindingError::IdMismatch {
                position,
                region,
                feature,
            } => write!(
                f,
                "feature {position} has id {feature} but region {position} is {region}"
            ),
            BindingError::DuplicateRegion(id) => write!(f, "duplicate region id {id}"),
            BindingError::ShapeFailed {
                position,
                region,
                reason,
            } => write!(f, "cannot draw region {region} (position {position}): {reason}"),
            BindingError::BordersFailed(reason) => write!(f, "cannot draw borders: {reason}"),
        }
    }
}

impl std::error::Error for BindingError {}

/// How feature ids take part in binding.
///
/// Features commonly carry ids from another key space (numeric FIPS codes
/// next to a dataset keyed by state code), so ids are ignored unless asked.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureIds {
    #[default]
    Positional,
    /// A feature that carries an id must carry its region's id.
    MatchRegion,
}

/// Region id → shape handle table, built once when shapes are created.
///
/// Binding is positional (region `i` gets feature `i`); the table makes the
/// correspondence explicit and checks it. Counts must match and region ids
/// must be unique; feature ids are checked only under
/// [`FeatureIds::MatchRegion`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeTable {
    order: Vec<RegionId>,
    shapes: Vec<ShapeHandle>,
    by_region: BTreeMap<RegionId, usize>,
}

impl ShapeTable {
    /// Validates the pairing, then calls `create` once per region in dataset
    /// order. Nothing is created when validation fails; the first failing
    /// `create` aborts the binding.
    pub fn bind<F>(
        dataset: &Dataset,
        features: &FeatureCollection,
        ids: FeatureIds,
        mut create: F,
    ) -> Result<Self, BindingError>
    where
        F: FnMut(usize, &Region, &Geometry) -> Result<ShapeHandle, String>,
    {
        if dataset.len() != features.len() {
            return Err(BindingError::CountMismatch {
                regions: dataset.len(),
                features: features.len(),
            });
        }

        let mut by_region = BTreeMap::new();
        for (position, (region, feature)) in
            dataset.regions().iter().zip(&features.features).enumerate()
        {
            if let (FeatureIds::MatchRegion, Some(fid)) = (ids, &feature.id) {
                if fid != region.id.as_str() {
                    return Err(BindingError::IdMismatch {
                        position,
                        region: region.id.clone(),
                        feature: fid.clone(),
                    });
                }
            }
            if by_region.insert(region.id.clone(), position).is_some() {
                return Err(BindingError::DuplicateRegion(region.id.clone()));
            }
        }

        let mut order = Vec::with_capacity(dataset.len());
        let mut shapes = Vec::with_capacity(dataset.len());
        for (position, (region, feature)) in
            dataset.regions().iter().zip(&features.features).enumerate()
        {
            let shape = create(position, region, &feature.geometry).map_err(|reason| {
                BindingError::ShapeFailed {
                    position,
                    region: region.id.clone(),
                    reason,
                }
            })?;
            shapes.push(shape);
            order.push(region.id.clone());
        }

        Ok(Self {
            order,
            shapes,
            by_region,
        })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn position_of(&self, region: &RegionId) -> Option<usize> {
        self.by_region.get(region).copied()
    }

    pub fn shape_of(&self, region: &RegionId) -> Option<ShapeHandle> {
        self.position_of(region).map(|i| self.shapes[i])
    }

    pub fn region_at(&self, position: usize) -> Option<&RegionId> {
        self.order.get(position)
    }

    /// `(position, region, shape)` in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &RegionId, ShapeHandle)> + '_ {
        self.order
            .iter()
            .zip(self.shapes.iter().copied())
            .enumerate()
            .map(|(i, (r, s))| (i, r, s))
    }
}
