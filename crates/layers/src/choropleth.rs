use foundation::color::Hsl;
use foundation::handles::ShapeHandle;
use foundation::ids::RegionId;
use scene::binding::{BindingError, FeatureIds, ShapeTable};
use scene::dataset::{Dataset, Region};
use scene::geometry::{FeatureCollection, Geometry};
use scene::index::{ColorDomain, DatasetError, DatasetIndex};

use crate::symbology::{ColorScale, FillStyle};

/// Projects a geometry into a drawable path string (e.g. SVG path data).
pub trait GeoPath {
    fn path(&self, geometry: &Geometry) -> Result<String, String>;
}

/// Drawing side of the surface the renderer needs.
pub trait ShapeSurface {
    /// Creates the drawable for one region. Called once per region at build time.
    ///
    /// The returned handle must stay valid for the surface's lifetime; a
    /// failure aborts the build rather than leaving a gap.
    fn create_region_shape(
        &mut self,
        position: usize,
        region: &Region,
        path: &str,
    ) -> Result<ShapeHandle, String>;

    fn draw_borders(&mut self, path: &str) -> Result<(), String>;

    /// Starts moving the shape's fill toward `fill`. Never awaited; a later call
    /// for the same shape supersedes an unfinished one.
    fn transition_fill(&mut self, shape: ShapeHandle, fill: Hsl, duration_ms: u32);
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RefreshMode {
    /// Initial paint: no interpolation.
    Immediate,
    Animated,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderReport {
    pub painted: Vec<(RegionId, Hsl)>,
    pub skipped: Vec<(RegionId, DatasetError)>,
}

impl RenderReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn fill_of(&self, region: &RegionId) -> Option<Hsl> {
        self.painted
            .iter()
            .find(|(r, _)| r == region)
            .map(|(_, fill)| *fill)
    }
}

/// Keeps one shape per region and recolors them for a (date, label) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct MapRenderer {
    shapes: ShapeTable,
    style: FillStyle,
    transition_ms: u32,
}

impl MapRenderer {
    /// Creates every region shape and the border mesh.
    ///
    /// Shapes are bound once; later refreshes only recolor them.
    #[allow(clippy::too_many_arguments)]
    pub fn build<S>(
        dataset: &Dataset,
        features: &FeatureCollection,
        feature_ids: FeatureIds,
        border_mesh: Option<&Geometry>,
        path: &dyn GeoPath,
        style: FillStyle,
        transition_ms: u32,
        surface: &mut S,
    ) -> Result<Self, BindingError>
    where
        S: ShapeSurface + ?Sized,
    {
        let shapes = ShapeTable::bind(dataset, features, feature_ids, |position, region, geometry| {
            let d = path.path(geometry)?;
            surface.create_region_shape(position, region, &d)
        })?;
        if let Some(mesh) = border_mesh {
            path.path(mesh)
                .and_then(|d| surface.draw_borders(&d))
                .map_err(BindingError::BordersFailed)?;
        }
        tracing::debug!(regions = shapes.len(), "bound region shapes");
        Ok(Self {
            shapes,
            style,
            transition_ms,
        })
    }

    pub fn shapes(&self) -> &ShapeTable {
        &self.shapes
    }

    pub fn style(&self) -> FillStyle {
        self.style
    }

    /// Fill of the region at `position` for the given selection.
    pub fn fill_for(
        &self,
        dataset: &Dataset,
        index: &DatasetIndex,
        position: usize,
        date_index: usize,
        label_index: usize,
        domain: ColorDomain,
    ) -> Result<Hsl, DatasetError> {
        let value = index.value_at(dataset, position, date_index, label_index)?;
        Ok(self.style.fill(&ColorScale::new(domain), value))
    }

    /// Recolors every shape. Regions without a value keep their previous fill
    /// and are listed in the report.
    #[allow(clippy::too_many_arguments)]
    pub fn refresh<S>(
        &self,
        dataset: &Dataset,
        index: &DatasetIndex,
        date_index: usize,
        label_index: usize,
        domain: ColorDomain,
        mode: RefreshMode,
        surface: &mut S,
    ) -> RenderReport
    where
        S: ShapeSurface + ?Sized,
    {
        let duration_ms = match mode {
            RefreshMode::Immediate => 0,
            RefreshMode::Animated => self.transition_ms,
        };
        let mut report = RenderReport::default();
        for (position, region, shape) in self.shapes.iter() {
            match self.fill_for(dataset, index, position, date_index, label_index, domain) {
                Ok(fill) => {
                    surface.transition_fill(shape, fill, duration_ms);
                    report.painted.push((region.clone(), fill));
                }
                Err(err) => {
                    tracing::warn!(region = %region, "skipping fill: {err}");
                    report.skipped.push((region.clone(), err));
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::{GeoPath, MapRenderer, RefreshMode, ShapeSurface};
    use scene::binding::{BindingError, FeatureIds};
    use crate::symbology::FillStyle;
    use foundation::color::Hsl;
    use foundation::handles::ShapeHandle;
    use foundation::ids::RegionId;
    use pretty_assertions::assert_eq;
    use scene::dataset::{Dataset, Region};
    use scene::geometry::{Feature, FeatureCollection, Geometry};
    use scene::index::{DatasetError, DatasetIndex, TitleCaseLabels};
    use serde_json::json;

    struct NamePath;

    impl GeoPath for NamePath {
        fn path(&self, geometry: &Geometry) -> Result<String, String> {
            match geometry.as_json()["name"].as_str() {
                Some(name) => Ok(format!("M{name}")),
                None => Err("unnamed geometry".to_string()),
            }
        }
    }

    #[derive(Default)]
    struct Canvas {
        shapes: Vec<(RegionId, String)>,
        borders: Vec<String>,
        fills: Vec<(ShapeHandle, String, u32)>,
    }

    impl ShapeSurface for Canvas {
        fn create_region_shape(
            &mut self,
            position: usize,
            region: &Region,
            path: &str,
        ) -> Result<ShapeHandle, String> {
            self.shapes.push((region.id.clone(), path.to_string()));
            Ok(ShapeHandle::new(position as u32, 0))
        }

        fn draw_borders(&mut self, path: &str) -> Result<(), String> {
            self.borders.push(path.to_string());
            Ok(())
        }

        fn transition_fill(&mut self, shape: ShapeHandle, fill: Hsl, duration_ms: u32) {
            self.fills.push((shape, fill.to_string(), duration_ms));
        }
    }

    fn build(
        ds: &Dataset,
        fc: &FeatureCollection,
        mesh: Option<&Geometry>,
        transition_ms: u32,
        canvas: &mut Canvas,
    ) -> Result<MapRenderer, BindingError> {
        MapRenderer::build(
            ds,
            fc,
            FeatureIds::Positional,
            mesh,
            &NamePath,
            FillStyle::default(),
            transition_ms,
            canvas,
        )
    }

    fn geometry(name: &str) -> Geometry {
        Geometry::new(json!({ "name": name }))
    }

    fn scenario() -> (Dataset, FeatureCollection) {
        let ds = Dataset::new(vec![
            Region::new("R1", "Region One")
                .with_value("2013-01-01", "metricA", 10.0)
                .with_value("2013-02-01", "metricA", 20.0),
            Region::new("R2", "Region Two")
                .with_value("2013-01-01", "metricA", 30.0)
                .with_value("2013-02-01", "metricA", 40.0),
        ]);
        let fc = FeatureCollection::new(vec![
            Feature {
                id: None,
                geometry: geometry("r1"),
            },
            Feature {
                id: None,
                geometry: geometry("r2"),
            },
        ]);
        (ds, fc)
    }

    #[test]
    fn build_creates_shapes_in_order_and_borders() {
        let (ds, fc) = scenario();
        let mut canvas = Canvas::default();
        let mesh = geometry("mesh");
        let r = build(&ds, &fc, Some(&mesh), 500, &mut canvas).unwrap();
        assert_eq!(
            canvas.shapes,
            vec![
                (RegionId::new("R1"), "Mr1".to_string()),
                (RegionId::new("R2"), "Mr2".to_string())
            ]
        );
        assert_eq!(canvas.borders, vec!["Mmesh".to_string()]);
        assert_eq!(r.shapes().len(), 2);
    }

    #[test]
    fn later_dates_reuse_first_date_domain_and_clamp() {
        let (ds, fc) = scenario();
        let idx = DatasetIndex::build(&ds, &TitleCaseLabels).unwrap();
        let mut canvas = Canvas::default();
        let r = build(&ds, &fc, None, 500, &mut canvas).unwrap();
        let domain = idx.domain_for_label(&ds, 0).unwrap();

        let initial = r.refresh(&ds, &idx, 0, 0, domain, RefreshMode::Immediate, &mut canvas);
        assert_eq!(
            initial.fill_of(&RegionId::new("R1")).map(|f| f.to_string()),
            Some("hsl(216, 86%, 90%)".to_string())
        );
        assert_eq!(canvas.fills[0].2, 0);

        let second = r.refresh(&ds, &idx, 1, 0, domain, RefreshMode::Animated, &mut canvas);
        assert!(second.is_complete());
        // R1 reads 20 → 50%; R2 reads 40, beyond the (10, 30) domain → clamps to 100%.
        assert_eq!(second.fill_of(&RegionId::new("R1")).unwrap().lightness_pct, 40.0);
        assert_eq!(second.fill_of(&RegionId::new("R2")).unwrap().lightness_pct, -10.0);
        assert_eq!(canvas.fills.last().map(|f| f.2), Some(500));
        // Refreshes never create shapes.
        assert_eq!(canvas.shapes.len(), 2);
    }

    #[test]
    fn missing_values_skip_only_that_region() {
        let ds = Dataset::new(vec![
            Region::new("A", "Alpha").with_value("d1", "m", 1.0),
            Region::new("B", "Beta").with_value("d1", "other", 2.0),
        ]);
        let fc = FeatureCollection::new(vec![
            Feature {
                id: None,
                geometry: geometry("a"),
            },
            Feature {
                id: None,
                geometry: geometry("b"),
            },
        ]);
        let idx = DatasetIndex::build(&ds, &TitleCaseLabels).unwrap();
        let mut canvas = Canvas::default();
        let r = build(&ds, &fc, None, 0, &mut canvas).unwrap();
        let domain = scene::index::ColorDomain::new(0.0, 2.0);
        let report = r.refresh(&ds, &idx, 0, 0, domain, RefreshMode::Animated, &mut canvas);
        assert_eq!(report.painted.len(), 1);
        assert!(matches!(
            report.skipped.as_slice(),
            [(_, DatasetError::MissingValue { .. })]
        ));
        assert_eq!(canvas.fills.len(), 1);
    }

    #[test]
    fn unprojectable_geometry_fails_the_build() {
        let (ds, mut fc) = scenario();
        fc.features[1].geometry = Geometry::new(json!({ "type": "Polygon" }));
        let mut canvas = Canvas::default();
        let err = build(&ds, &fc, None, 0, &mut canvas).unwrap_err();
        assert!(matches!(err, BindingError::ShapeFailed { position: 1, .. }));

        let (ds, fc) = scenario();
        let mesh = Geometry::new(json!({}));
        let err = build(&ds, &fc, Some(&mesh), 0, &mut canvas).unwrap_err();
        assert!(matches!(err, BindingError::BordersFailed(_)));
    }
}
