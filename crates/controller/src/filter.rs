use crate::error::ControllerError;
use crate::surface::MapSurface;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LabelChange {
    pub previous: usize,
    pub current: usize,
}

/// Active label and the filter control marking it.
///
/// Exactly one control is active at any time; it always matches `active()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterController {
    active: usize,
    count: usize,
}

impl FilterController {
    /// Marks control 0 active. `count` must be non-zero.
    pub fn mount<S: MapSurface + ?Sized>(count: usize, surface: &mut S) -> Self {
        for i in 1..count {
            surface.set_filter_active(i, false);
        }
        surface.set_filter_active(0, true);
        Self { active: 0, count }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Moves the active mark to `index`.
    ///
    /// Re-selecting the active label is allowed and still reported as a change,
    /// so the caller recomputes and repaints.
    pub fn select_label<S: MapSurface + ?Sized>(
        &mut self,
        index: usize,
        surface: &mut S,
    ) -> Result<LabelChange, ControllerError> {
        if index >= self.count {
            return Err(ControllerError::LabelOutOfRange {
                index,
                len: self.count,
            });
        }
        let previous = self.active;
        if previous != index {
            surface.set_filter_active(previous, false);
        }
        surface.set_filter_active(index, true);
        self.active = index;
        tracing::debug!(previous, current = index, "label selected");
        Ok(LabelChange {
            previous,
            current: index,
        })
    }
}
