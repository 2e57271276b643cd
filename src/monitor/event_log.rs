use std::collections::VecDeque;

use serde::Serialize;

use super::event::Event;

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Bounded event history. When full, the oldest entries are evicted first.
#[derive(Debug, Clone, Serialize)]
pub struct EventLog {
    entries: VecDeque<Event>,
    #[serde(skip)]
    capacity: usize,
}

impl EventLog {
    /// Creates an empty log. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn append(&mut self, events: impl IntoIterator<Item = Event>) {
        for event in events {
            if self.entries.len() == self.capacity {
                self.entries.pop_front();
            }
            self.entries.push_back(event);
        }
    }

    /// Copy of all entries, oldest first.
    pub fn snapshot(&self) -> Vec<Event> {
        self.entries.iter().cloned().collect()
    }

    /// The newest `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &Event> {
        self.entries.iter().skip(self.entries.len().saturating_sub(n))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
