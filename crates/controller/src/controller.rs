use foundation::ids::RegionId;
use foundation::time::DateKey;
use layers::choropleth::{GeoPath, MapRenderer, RefreshMode, RenderReport};
use runtime::dispatch::DispatchTable;
use runtime::event_bus::{Event, EventBus};
use runtime::input::{EventKind, EventOutcome, EventTarget, InputEvent};
use scene::dataset::Dataset;
use scene::geometry::{FeatureCollection, Geometry};
use scene::index::{ColorDomain, DatasetError, DatasetIndex, LabelEntry, LabelFormatter};
use serde::Serialize;

use crate::config::MapConfig;
use crate::error::ControllerError;
use crate::filter::FilterController;
use crate::navigator::DateNavigator;
use crate::surface::{MapSurface, TooltipContent, TooltipTemplate};
use crate::tooltip::{TooltipController, TooltipState};

/// Everything needed to build a controller, apart from the surface.
pub struct MapSetup<'a> {
    pub config: MapConfig,
    pub dataset: Dataset,
    /// `None` takes geometry from the regions themselves.
    pub features: Option<FeatureCollection>,
    pub border_mesh: Option<Geometry>,
    pub path: &'a dyn GeoPath,
    pub labels: &'a dyn LabelFormatter,
    pub template: Box<dyn TooltipTemplate>,
}

/// Read-only view of the current selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSnapshot {
    pub label_index: usize,
    pub label: LabelEntry,
    pub date_index: usize,
    pub date: DateKey,
    pub domain: Option<ColorDomain>,
    pub tooltip: TooltipState,
}

pub type Handlers<S> = DispatchTable<MapController<S>, ControllerError>;

/// Owns the dataset, the selection and the surface, and routes input events
/// to state transitions.
pub struct MapController<S: MapSurface> {
    config: MapConfig,
    dataset: Dataset,
    index: DatasetIndex,
    /// Always computed at the first date of the axis.
    domain: Result<ColorDomain, DatasetError>,
    filter: FilterController,
    navigator: DateNavigator,
    tooltip: TooltipController,
    renderer: MapRenderer,
    template: Box<dyn TooltipTemplate>,
    surface: S,
    events: EventBus,
    handlers: Handlers<S>,
}

impl<S: MapSurface> MapController<S> {
    /// Binds region shapes, builds the filter controls and the date range,
    /// binds the event handlers and paints (label 0, date 0).
    ///
    /// Fails without touching the surface if a required element is missing.
    pub fn new(setup: MapSetup<'_>, mut surface: S) -> Result<Self, ControllerError> {
        let MapSetup {
            config,
            dataset,
            features,
            border_mesh,
            path,
            labels,
            template,
        } = setup;

        config.validate()?;
        if let Some(missing) = config
            .elements
            .required()
            .into_iter()
            .find(|id| !surface.has_element(id))
        {
            return Err(ControllerError::MissingElement(missing.to_string()));
        }

        let index = DatasetIndex::build(&dataset, labels).map_err(ControllerError::Dataset)?;
        let features = match features {
            Some(features) => features,
            None => FeatureCollection::from_regions(&dataset)
                .ok_or(ControllerError::MissingGeometry)?,
        };
        let domain = index.domain_for_label(&dataset, 0);

        let renderer = MapRenderer::build(
            &dataset,
            &features,
            config.feature_ids,
            border_mesh.as_ref(),
            path,
            config.fill,
            config.transition_ms,
            &mut surface,
        )?;

        surface.build_filter_controls(index.labels().as_slice());
        let filter = FilterController::mount(index.labels().len(), &mut surface);

        let navigator = DateNavigator::new(index.dates().len());
        surface.build_date_range(0, navigator.max_index(), navigator.index());
        if let Some(first) = index.dates().first() {
            surface.set_current_date_text(first.as_str());
        }

        let tooltip = TooltipController::new(config.tooltip);
        surface.hide_tooltip();

        let mut controller = Self {
            config,
            dataset,
            index,
            domain,
            filter,
            navigator,
            tooltip,
            renderer,
            template,
            surface,
            events: EventBus::new(),
            handlers: Self::default_handlers(),
        };

        controller.events.emit(
            "init",
            format!(
                "regions={} dates={} labels={}",
                controller.dataset.len(),
                controller.index.dates().len(),
                controller.index.labels().len()
            ),
        );
        if let Err(err) = controller.repaint(RefreshMode::Immediate) {
            tracing::warn!("initial render incomplete: {err}");
        }
        Ok(controller)
    }

    fn default_handlers() -> Handlers<S> {
        let mut table = DispatchTable::new();
        table.bind(EventKind::Click, on_click::<S>);
        table.bind(EventKind::Change, on_change::<S>);
        table.bind(EventKind::KeyDown, on_key_down::<S>);
        table.bind(EventKind::MouseOver, on_mouse_over::<S>);
        table.bind(EventKind::MouseMove, on_mouse_move::<S>);
        table.bind(EventKind::MouseOut, on_mouse_out::<S>);
        table
    }

    /// Routes one input event through the dispatch table.
    pub fn handle(&mut self, event: &InputEvent) -> Result<EventOutcome, ControllerError> {
        match self.handlers.handler(event.kind()) {
            Some(handler) => handler(self, event),
            None => Ok(EventOutcome::ignored()),
        }
    }

    pub fn handlers(&self) -> &Handlers<S> {
        &self.handlers
    }

    /// Activates label `index`, recomputes the color domain from the first
    /// date and repaints every region.
    pub fn select_label(&mut self, index: usize) -> Result<RenderReport, ControllerError> {
        let change = self.filter.select_label(index, &mut self.surface)?;
        self.domain = self.index.domain_for_label(&self.dataset, change.current);
        let key = self
            .index
            .label(change.current)
            .map(|l| l.key.clone())
            .unwrap_or_default();
        self.events.emit("label", format!("{} -> {key}", change.previous));
        self.repaint(RefreshMode::Animated)
    }

    /// Jumps to date `index`, clamped to the axis. `Ok(None)` if nothing moved.
    pub fn set_date_index(&mut self, index: i64) -> Result<Option<RenderReport>, ControllerError> {
        let changed = self.navigator.set_index(index);
        self.date_changed(changed)
    }

    /// Steps the date by `delta`; a step past either end is ignored.
    pub fn step_date(&mut self, delta: i64) -> Result<Option<RenderReport>, ControllerError> {
        let changed = self.navigator.step(delta);
        self.date_changed(changed)
    }

    fn date_changed(&mut self, changed: bool) -> Result<Option<RenderReport>, ControllerError> {
        let current = self.navigator.index();
        self.surface.set_date_range_value(current);
        if !changed {
            return Ok(None);
        }
        let date = self.index.date(current)?.clone();
        self.surface.set_current_date_text(date.as_str());
        self.events.emit("date", format!("{current} {date}"));
        self.repaint(RefreshMode::Animated).map(Some)
    }

    /// Recolors all regions for the current selection.
    ///
    /// Fails as a whole only when the color domain is unavailable; regions
    /// lacking a value are reported in the result instead.
    pub fn repaint(&mut self, mode: RefreshMode) -> Result<RenderReport, ControllerError> {
        let domain = self.domain.clone()?;
        let report = self.renderer.refresh(
            &self.dataset,
            &self.index,
            self.navigator.index(),
            self.filter.active(),
            domain,
            mode,
            &mut self.surface,
        );
        self.events.emit(
            "render",
            format!(
                "painted={} skipped={}",
                report.painted.len(),
                report.skipped.len()
            ),
        );
        Ok(report)
    }

    pub fn pointer_enter(
        &mut self,
        region: &RegionId,
        page_x: f64,
        page_y: f64,
    ) -> Result<(), ControllerError> {
        let content = self.tooltip_content(region);
        let result = self.tooltip.enter(
            region.clone(),
            content,
            self.template.as_ref(),
            page_x,
            page_y,
            &mut self.surface,
        );
        match &result {
            Ok(()) => self.events.emit("tooltip", format!("show {region}")),
            Err(err) => self.events.emit("tooltip", format!("failed {region}: {err}")),
        }
        result
    }

    /// Repositions the tooltip. A move over a region other than the one shown
    /// (or while hidden after an enter was missed) behaves like an enter.
    pub fn pointer_move(
        &mut self,
        region: &RegionId,
        page_x: f64,
        page_y: f64,
    ) -> Result<(), ControllerError> {
        let shown = self.tooltip.state().region().cloned();
        match shown {
            Some(shown) if &shown == region => {
                self.tooltip.move_to(page_x, page_y, &mut self.surface);
                Ok(())
            }
            Some(_) => self.pointer_enter(region, page_x, page_y),
            None => Ok(()),
        }
    }

    pub fn pointer_leave(&mut self, region: &RegionId) {
        self.tooltip.leave(&mut self.surface);
        self.events.emit("tooltip", format!("hide {region}"));
    }

    fn tooltip_content(&self, region: &RegionId) -> Result<TooltipContent, ControllerError> {
        let position = self
            .renderer
            .shapes()
            .position_of(region)
            .ok_or_else(|| ControllerError::UnknownRegion(region.clone()))?;
        let region = self
            .dataset
            .region(position)
            .ok_or_else(|| ControllerError::UnknownRegion(region.clone()))?;
        TooltipContent::for_region(
            &self.index,
            region,
            self.navigator.index(),
            self.filter.active(),
        )
        .map_err(ControllerError::from)
    }

    pub fn snapshot(&self) -> MapSnapshot {
        let label_index = self.filter.active();
        let date_index = self.navigator.index();
        MapSnapshot {
            label_index,
            label: self.index.labels().as_slice()[label_index].clone(),
            date_index,
            date: self.index.dates().as_slice()[date_index].clone(),
            domain: self.domain.clone().ok(),
            tooltip: self.tooltip.state().clone(),
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn index(&self) -> &DatasetIndex {
        &self.index
    }

    pub fn domain(&self) -> Result<ColorDomain, DatasetError> {
        self.domain.clone()
    }

    pub fn tooltip_state(&self) -> &TooltipState {
        self.tooltip.state()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> + '_ {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }
}

fn on_click<S: MapSurface>(
    c: &mut MapController<S>,
    event: &InputEvent,
) -> Result<EventOutcome, ControllerError> {
    match event.current_target() {
        EventTarget::FilterControl(index) => {
            c.select_label(*index)?;
            Ok(EventOutcome::handled())
        }
        _ => Ok(EventOutcome::ignored()),
    }
}

fn on_change<S: MapSurface>(
    c: &mut MapController<S>,
    event: &InputEvent,
) -> Result<EventOutcome, ControllerError> {
    let InputEvent::Change {
        target: EventTarget::DateRange,
        value,
    } = event
    else {
        return Ok(EventOutcome::ignored());
    };
    // Unparsable slider values are dropped like any other out-of-range input.
    let Some(index) = parse_range_value(value) else {
        tracing::debug!(value = %value, "ignoring unparsable date range value");
        return Ok(EventOutcome::ignored());
    };
    c.set_date_index(index)?;
    Ok(EventOutcome::handled())
}

fn on_key_down<S: MapSurface>(
    c: &mut MapController<S>,
    event: &InputEvent,
) -> Result<EventOutcome, ControllerError> {
    let InputEvent::KeyDown { key_code } = event else {
        return Ok(EventOutcome::ignored());
    };
    let delta = if *key_code == c.config.keys.previous {
        -1
    } else if *key_code == c.config.keys.next {
        1
    } else {
        return Ok(EventOutcome::ignored());
    };
    c.step_date(delta)?;
    Ok(EventOutcome::handled_and_prevented())
}

fn on_mouse_over<S: MapSurface>(
    c: &mut MapController<S>,
    event: &InputEvent,
) -> Result<EventOutcome, ControllerError> {
    match (event.current_target(), event.page_position()) {
        (EventTarget::Region(region), Some((x, y))) => {
            let region = region.clone();
            c.pointer_enter(&region, x, y)?;
            Ok(EventOutcome::handled())
        }
        _ => Ok(EventOutcome::ignored()),
    }
}

fn on_mouse_move<S: MapSurface>(
    c: &mut MapController<S>,
    event: &InputEvent,
) -> Result<EventOutcome, ControllerError> {
    match (event.current_target(), event.page_position()) {
        (EventTarget::Region(region), Some((x, y))) => {
            let region = region.clone();
            c.pointer_move(&region, x, y)?;
            Ok(EventOutcome::handled())
        }
        _ => Ok(EventOutcome::ignored()),
    }
}

fn on_mouse_out<S: MapSurface>(
    c: &mut MapController<S>,
    event: &InputEvent,
) -> Result<EventOutcome, ControllerError> {
    match event.current_target() {
        EventTarget::Region(region) => {
            let region = region.clone();
            c.pointer_leave(&region);
            Ok(EventOutcome::handled())
        }
        _ => Ok(EventOutcome::ignored()),
    }
}

fn parse_range_value(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(i) = value.parse::<i64>() {
        return Some(i);
    }
    let f = value.parse::<f64>().ok()?;
    f.is_finite().then(|| f.round() as i64)
}
