use std::collections::VecDeque;

/// Default number of trace events retained before the oldest are dropped.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Minimal event type for traceability.
///
/// Structured text tagged with a monotonically increasing sequence number, so
/// a session can be inspected or compared after the fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub sequence: u64,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct EventBus {
    events: VecDeque<Event>,
    next_sequence: u64,
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            next_sequence: 0,
            capacity: capacity.max(1),
        }
    }

    /// Records an event and mirrors it to `tracing` at debug level.
    pub fn emit(&mut self, kind: &'static str, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(kind, sequence = self.next_sequence, "{message}");
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(Event {
            sequence: self.next_sequence,
            kind,
            message,
        });
        self.next_sequence += 1;
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> + '_ {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> Option<&Event> {
        self.events.back()
    }

    pub fn drain(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;

    #[test]
    fn records_events_with_sequence() {
        let mut bus = EventBus::new();
        bus.emit("label", "selected 1");
        bus.emit("date", "index 2");
        let seqs: Vec<u64> = bus.events().map(|e| e.sequence).collect();
        assert_eq!(seqs, vec![0, 1]);
        assert_eq!(bus.last().map(|e| e.kind), Some("date"));
    }

    #[test]
    fn drain_clears_events_but_keeps_sequence() {
        let mut bus = EventBus::new();
        bus.emit("k", "m");
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.is_empty());
        bus.emit("k", "m");
        assert_eq!(bus.last().map(|e| e.sequence), Some(1));
    }

    #[test]
    fn drops_oldest_past_capacity() {
        let mut bus = EventBus::with_capacity(2);
        bus.emit("a", "1");
        bus.emit("b", "2");
        bus.emit("c", "3");
        let kinds: Vec<&str> = bus.events().map(|e| e.kind).collect();
        assert_eq!(kinds, vec!["b", "c"]);
        assert_eq!(bus.len(), 2);
    }
}
