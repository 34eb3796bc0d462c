use foundation::ids::RegionId;
use scene::dataset::Region;
use scene::index::{DatasetError, DatasetIndex};
use serde::Serialize;

use crate::config::TooltipConfig;
use crate::error::ControllerError;
use crate::surface::{MapSurface, TooltipContent, TooltipTemplate};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TooltipState {
    #[default]
    Hidden,
    Visible { region: RegionId, x: f64, y: f64 },
}

impl TooltipState {
    pub fn is_visible(&self) -> bool {
        matches!(self, TooltipState::Visible { .. })
    }

    pub fn region(&self) -> Option<&RegionId> {
        match self {
            TooltipState::Visible { region, .. } => Some(region),
            TooltipState::Hidden => None,
        }
    }
}

impl TooltipContent {
    /// Content for `region` at the given date and label.
    pub fn for_region(
        index: &DatasetIndex,
        region: &Region,
        date_index: usize,
        label_index: usize,
    ) -> Result<Self, DatasetError> {
        let data = index.region_value(region, date_index, label_index)?;
        let label = index.label(label_index)?;
        Ok(Self {
            data,
            label: label.text.clone(),
            state: region.name.clone(),
        })
    }
}

/// Hover tooltip: `Hidden ⇄ Visible`, purely event-synchronous.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipController {
    state: TooltipState,
    config: TooltipConfig,
}

impl TooltipController {
    pub fn new(config: TooltipConfig) -> Self {
        Self {
            state: TooltipState::Hidden,
            config,
        }
    }

    pub fn state(&self) -> &TooltipState {
        &self.state
    }

    /// Screen position for a pointer at `(page_x, page_y)`: a little to the
    /// right, and raised by the tooltip height minus the fixed correction.
    pub fn position(&self, page_x: f64, page_y: f64, tooltip_height: f64) -> (f64, f64) {
        (
            page_x + self.config.offset_x,
            page_y - (tooltip_height - self.config.height_correction),
        )
    }

    /// Pointer entered `region`. On a content or template failure the
    /// tooltip is hidden and the error returned.
    pub fn enter<S: MapSurface + ?Sized>(
        &mut self,
        region: RegionId,
        content: Result<TooltipContent, ControllerError>,
        template: &dyn TooltipTemplate,
        page_x: f64,
        page_y: f64,
        surface: &mut S,
    ) -> Result<(), ControllerError> {
        let html = content.and_then(|c| template.render(&c).map_err(ControllerError::Template));
        let html = match html {
            Ok(html) => html,
            Err(err) => {
                self.leave(surface);
                return Err(err);
            }
        };
        surface.show_tooltip(&html);
        let (x, y) = self.position(page_x, page_y, surface.tooltip_height());
        surface.move_tooltip(x, y);
        tracing::debug!(region = %region, x, y, "tooltip shown");
        self.state = TooltipState::Visible { region, x, y };
        Ok(())
    }

    /// Repositions a visible tooltip; content is left as is.
    ///
    /// Returns `false` when hidden (nothing to move).
    pub fn move_to<S: MapSurface + ?Sized>(
        &mut self,
        page_x: f64,
        page_y: f64,
        surface: &mut S,
    ) -> bool {
        let (nx, ny) = self.position(page_x, page_y, surface.tooltip_height());
        let TooltipState::Visible { x, y, .. } = &mut self.state else {
            return false;
        };
        *x = nx;
        *y = ny;
        surface.move_tooltip(nx, ny);
        true
    }

    pub fn leave<S: MapSurface + ?Sized>(&mut self, surface: &mut S) {
        if self.state.is_visible() {
            tracing::debug!("tooltip hidden");
        }
        surface.hide_tooltip();
        self.state = TooltipState::Hidden;
    }
}

#[cfg(test)]
mod tests {
    use super::{TooltipController, TooltipState};
    use crate::config::TooltipConfig;
    use crate::error::ControllerError;
    use crate::surface::{PlainTooltip, TooltipContent};
    use crate::testing::RecordingSurface;
    use foundation::ids::RegionId;
    use scene::index::DatasetError;

    fn content(value: f64) -> Result<TooltipContent, ControllerError> {
        Ok(TooltipContent {
            data: value,
            label: "Metric A".to_string(),
            state: "Region One".to_string(),
        })
    }

    #[test]
    fn hidden_until_entered_and_after_leave() {
        let mut surface = RecordingSurface::default();
        surface.tooltip_height = 100.0;
        let mut t = TooltipController::new(TooltipConfig::default());
        assert_eq!(t.state(), &TooltipState::Hidden);

        t.enter(RegionId::new("R1"), content(10.0), &PlainTooltip, 200.0, 300.0, &mut surface)
            .unwrap();
        assert_eq!(
            t.state(),
            &TooltipState::Visible {
                region: RegionId::new("R1"),
                x: 205.0,
                y: 260.0
            }
        );
        assert_eq!(
            surface.tooltip.as_deref(),
            Some("<strong>Region One</strong><br>Metric A: 10")
        );

        t.leave(&mut surface);
        assert_eq!(t.state(), &TooltipState::Hidden);
        assert_eq!(surface.tooltip, None);
    }

    #[test]
    fn move_repositions_without_touching_content() {
        let mut surface = RecordingSurface::default();
        surface.tooltip_height = 40.0;
        let mut t = TooltipController::new(TooltipConfig::default());
        assert!(!t.move_to(1.0, 1.0, &mut surface));

        t.enter(RegionId::new("R1"), content(1.5), &PlainTooltip, 0.0, 0.0, &mut surface)
            .unwrap();
        let shown = surface.tooltip.clone();
        let shows = surface.tooltip_shows;
        assert!(t.move_to(10.0, 50.0, &mut surface));
        // 50 - (40 - 60) = 70: short tooltips sit below the pointer.
        assert_eq!(surface.tooltip_position, Some((15.0, 70.0)));
        assert_eq!(surface.tooltip, shown);
        assert_eq!(surface.tooltip_shows, shows);
    }

    #[test]
    fn enter_and_move_place_the_tooltip_identically() {
        let mut surface = RecordingSurface::default();
        surface.tooltip_height = 75.0;
        let mut t = TooltipController::new(TooltipConfig {
            offset_x: 12.0,
            height_correction: 20.0,
        });
        t.enter(RegionId::new("R1"), content(1.0), &PlainTooltip, 30.0, 40.0, &mut surface)
            .unwrap();
        let entered = surface.tooltip_position;
        t.leave(&mut surface);
        t.enter(RegionId::new("R1"), content(1.0), &PlainTooltip, 0.0, 0.0, &mut surface)
            .unwrap();
        assert!(t.move_to(30.0, 40.0, &mut surface));
        assert_eq!(surface.tooltip_position, entered);
        assert_eq!(entered, Some(t.position(30.0, 40.0, 75.0)));
        assert_eq!(entered, Some((42.0, -15.0)));
    }

    #[test]
    fn failed_content_keeps_tooltip_hidden() {
        let mut surface = RecordingSurface::default();
        let mut t = TooltipController::new(TooltipConfig::default());
        let err = t
            .enter(
                RegionId::new("R1"),
                Err(ControllerError::MissingData(DatasetError::Empty)),
                &PlainTooltip,
                0.0,
                0.0,
                &mut surface,
            )
            .unwrap_err();
        assert!(matches!(err, ControllerError::MissingData(_)));
        assert_eq!(t.state(), &TooltipState::Hidden);

        let failing = |_: &TooltipContent| Err::<String, _>("bad template".to_string());
        let err = t
            .enter(RegionId::new("R1"), content(1.0), &failing, 0.0, 0.0, &mut surface)
            .unwrap_err();
        assert!(matches!(err, ControllerError::Template(_)));
        assert!(!t.state().is_visible());
        assert_eq!(surface.tooltip, None);
    }
}
