use foundation::ids::RegionId;

/// Kinds of input the controller reacts to.
///
/// Mirrors the DOM event names the host surface dispatches.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Click,
    Change,
    KeyDown,
    MouseOver,
    MouseMove,
    MouseOut,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::Click,
        EventKind::Change,
        EventKind::KeyDown,
        EventKind::MouseOver,
        EventKind::MouseMove,
        EventKind::MouseOut,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Change => "change",
            EventKind::KeyDown => "keydown",
            EventKind::MouseOver => "mouseover",
            EventKind::MouseMove => "mousemove",
            EventKind::MouseOut => "mouseout",
        }
    }
}

/// The element an event listener is attached to (`currentTarget`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTarget {
    FilterControl(usize),
    DateRange,
    Document,
    Region(RegionId),
}

/// A single input event, as delivered by the host surface.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Click {
        target: EventTarget,
    },
    /// `value` is the raw control value (range inputs report strings).
    Change {
        target: EventTarget,
        value: String,
    },
    KeyDown {
        key_code: u32,
    },
    MouseOver {
        target: EventTarget,
        page_x: f64,
        page_y: f64,
    },
    MouseMove {
        target: EventTarget,
        page_x: f64,
        page_y: f64,
    },
    MouseOut {
        target: EventTarget,
    },
}

impl InputEvent {
    pub fn click(target: EventTarget) -> Self {
        InputEvent::Click { target }
    }

    pub fn change(target: EventTarget, value: impl Into<String>) -> Self {
        InputEvent::Change {
            target,
            value: value.into(),
        }
    }

    pub fn key_down(key_code: u32) -> Self {
        InputEvent::KeyDown { key_code }
    }

    pub fn mouse_over(region: impl Into<RegionId>, page_x: f64, page_y: f64) -> Self {
        InputEvent::MouseOver {
            target: EventTarget::Region(region.into()),
            page_x,
            page_y,
        }
    }

    pub fn mouse_move(region: impl Into<RegionId>, page_x: f64, page_y: f64) -> Self {
        InputEvent::MouseMove {
            target: EventTarget::Region(region.into()),
            page_x,
            page_y,
        }
    }

    pub fn mouse_out(region: impl Into<RegionId>) -> Self {
        InputEvent::MouseOut {
            target: EventTarget::Region(region.into()),
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::Click { .. } => EventKind::Click,
            InputEvent::Change { .. } => EventKind::Change,
            InputEvent::KeyDown { .. } => EventKind::KeyDown,
            InputEvent::MouseOver { .. } => EventKind::MouseOver,
            InputEvent::MouseMove { .. } => EventKind::MouseMove,
            InputEvent::MouseOut { .. } => EventKind::MouseOut,
        }
    }

    /// Key events are dispatched on the document.
    pub fn current_target(&self) -> &EventTarget {
        match self {
            InputEvent::Click { target }
            | InputEvent::Change { target, .. }
            | InputEvent::MouseOver { target, .. }
            | InputEvent::MouseMove { target, .. }
            | InputEvent::MouseOut { target } => target,
            InputEvent::KeyDown { .. } => &EventTarget::Document,
        }
    }

    pub fn page_position(&self) -> Option<(f64, f64)> {
        match self {
            InputEvent::MouseOver { page_x, page_y, .. }
            | InputEvent::MouseMove { page_x, page_y, .. } => Some((*page_x, *page_y)),
            _ => None,
        }
    }
}

/// What the host should do after an event was handled.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct EventOutcome {
    /// A handler reacted to the event.
    pub handled: bool,
    /// The event's default action must be suppressed (`preventDefault`).
    pub prevent_default: bool,
}

impl EventOutcome {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            prevent_default: false,
        }
    }

    pub fn handled_and_prevented() -> Self {
        Self {
            handled: true,
            prevent_default: true,
        }
    }
}
