use std::collections::BTreeMap;

use crate::input::{EventKind, EventOutcome, InputEvent};

/// Plain state-transition function bound to an event kind.
pub type Handler<C, E> = fn(&mut C, &InputEvent) -> Result<EventOutcome, E>;

/// Explicit table from event kind to handler.
///
/// Handlers are plain function pointers, so a context that owns its table can
/// copy the handler out before calling it with `&mut self`.
pub struct DispatchTable<C, E> {
    handlers: BTreeMap<EventKind, Handler<C, E>>,
}

impl<C, E> DispatchTable<C, E> {
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Binds `handler` to `kind`, returning the handler it replaced.
    pub fn bind(&mut self, kind: EventKind, handler: Handler<C, E>) -> Option<Handler<C, E>> {
        self.handlers.insert(kind, handler)
    }

    pub fn handler(&self, kind: EventKind) -> Option<Handler<C, E>> {
        self.handlers.get(&kind).copied()
    }

    pub fn is_bound(&self, kind: EventKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Bound kinds in ascending order.
    pub fn kinds(&self) -> impl Iterator<Item = EventKind> + '_ {
        self.handlers.keys().copied()
    }
}

impl<C, E> Default for DispatchTable<C, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, E> Clone for DispatchTable<C, E> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
        }
    }
}

impl<C, E> std::fmt::Debug for DispatchTable<C, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchTable")
            .field("kinds", &self.kinds().collect::<Vec<_>>())
            .finish()
    }
}
