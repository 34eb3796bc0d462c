//! Test doubles for the surface and the path collaborator.

use std::collections::BTreeMap;

use foundation::color::Hsl;
use foundation::handles::ShapeHandle;
use foundation::ids::RegionId;
use layers::choropleth::{GeoPath, ShapeSurface};
use scene::dataset::{Dataset, Region};
use scene::geometry::{Feature, FeatureCollection, Geometry};
use scene::index::LabelEntry;
use serde_json::json;

use crate::surface::MapSurface;

/// Records every call so tests can assert on what a user would see.
#[derive(Debug, Default)]
pub(crate) struct RecordingSurface {
    pub missing_elements: Vec<String>,
    /// Position at which `create_region_shape` fails.
    pub fail_shape_at: Option<usize>,
    pub filter_labels: Vec<LabelEntry>,
    pub filters: Vec<bool>,
    pub date_range: Option<(usize, usize)>,
    pub date_value: Option<usize>,
    pub date_text: String,
    pub shapes: Vec<(RegionId, String)>,
    pub borders: Vec<String>,
    pub fills: BTreeMap<ShapeHandle, (Hsl, u32)>,
    pub fill_calls: usize,
    pub tooltip: Option<String>,
    pub tooltip_position: Option<(f64, f64)>,
    pub tooltip_height: f64,
    pub tooltip_shows: usize,
}

impl RecordingSurface {
    pub fn active_filters(&self) -> Vec<usize> {
        self.filters
            .iter()
            .enumerate()
            .filter(|(_, active)| **active)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn fill_at(&self, position: usize) -> Option<Hsl> {
        self.fills
            .get(&ShapeHandle::new(position as u32, 0))
            .map(|(fill, _)| *fill)
    }

    pub fn lightness_at(&self, position: usize) -> Option<f64> {
        self.fill_at(position).map(|f| f.lightness_pct)
    }
}

impl ShapeSurface for RecordingSurface {
    fn create_region_shape(
        &mut self,
        position: usize,
        region: &Region,
        path: &str,
    ) -> Result<ShapeHandle, String> {
        if self.fail_shape_at == Some(position) {
            return Err(format!("cannot append {}", region.id));
        }
        self.shapes.push((region.id.clone(), path.to_string()));
        Ok(ShapeHandle::new(position as u32, 0))
    }

    fn draw_borders(&mut self, path: &str) -> Result<(), String> {
        self.borders.push(path.to_string());
        Ok(())
    }

    fn transition_fill(&mut self, shape: ShapeHandle, fill: Hsl, duration_ms: u32) {
        self.fills.insert(shape, (fill, duration_ms));
        self.fill_calls += 1;
    }
}

impl MapSurface for RecordingSurface {
    fn has_element(&self, id: &str) -> bool {
        !self.missing_elements.iter().any(|m| m == id)
    }

    fn build_filter_controls(&mut self, labels: &[LabelEntry]) {
        self.filter_labels = labels.to_vec();
        self.filters = vec![false; labels.len()];
    }

    fn set_filter_active(&mut self, index: usize, active: bool) {
        if let Some(slot) = self.filters.get_mut(index) {
            *slot = active;
        }
    }

    fn build_date_range(&mut self, min: usize, max: usize, value: usize) {
        self.date_range = Some((min, max));
        self.date_value = Some(value);
    }

    fn set_date_range_value(&mut self, value: usize) {
        self.date_value = Some(value);
    }

    fn set_current_date_text(&mut self, text: &str) {
        self.date_text = text.to_string();
    }

    fn show_tooltip(&mut self, html: &str) {
        self.tooltip = Some(html.to_string());
        self.tooltip_shows += 1;
    }

    fn move_tooltip(&mut self, x: f64, y: f64) {
        self.tooltip_position = Some((x, y));
    }

    fn hide_tooltip(&mut self) {
        self.tooltip = None;
        self.tooltip_position = None;
    }

    fn tooltip_height(&self) -> f64 {
        self.tooltip_height
    }
}

/// Path collaborator that echoes the geometry's `name` member.
pub(crate) struct NamePath;

impl GeoPath for NamePath {
    fn path(&self, geometry: &Geometry) -> Result<String, String> {
        geometry.as_json()["name"]
            .as_str()
            .map(|name| format!("M{name}Z"))
            .ok_or_else(|| "geometry has no name".to_string())
    }
}

pub(crate) fn named_geometry(name: &str) -> Geometry {
    Geometry::new(json!({ "name": name }))
}

pub(crate) fn features_for(dataset: &Dataset) -> FeatureCollection {
    FeatureCollection::new(
        dataset
            .regions()
            .iter()
            .map(|r| Feature {
                id: Some(r.id.as_str().to_string()),
                geometry: named_geometry(r.id.as_str()),
            })
            .collect(),
    )
}

/// Two regions, two dates, two labels:
///
/// | region | metricA (d1/d2) | metricB (d1/d2) |
/// |--------|-----------------|-----------------|
/// | R1     | 10 / 20         | 5 / 6           |
/// | R2     | 30 / 40         | 1 / 2           |
pub(crate) fn scenario_dataset() -> Dataset {
    Dataset::new(vec![
        Region::new("R1", "Region One")
            .with_value("2013-01-01", "metricA", 10.0)
            .with_value("2013-01-01", "metricB", 5.0)
            .with_value("2013-02-01", "metricA", 20.0)
            .with_value("2013-02-01", "metricB", 6.0),
        Region::new("R2", "Region Two")
            .with_value("2013-01-01", "metricA", 30.0)
            .with_value("2013-01-01", "metricB", 1.0)
            .with_value("2013-02-01", "metricA", 40.0)
            .with_value("2013-02-01", "metricB", 2.0),
    ])
}
