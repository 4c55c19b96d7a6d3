use cfo_common::types::AlertEvent;
use std::collections::HashSet;

/// Append-only history of fired events.
///
/// Lookups scan linearly and the log is never pruned, so memory grows with
/// the number of fires over the process lifetime.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<AlertEvent>,
    ids: HashSet<String>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, events: impl IntoIterator<Item = AlertEvent>) {
        for event in events {
            self.ids.insert(event.id.clone());
            self.events.push(event);
        }
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn get(&self, id: &str) -> Option<&AlertEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Every event, oldest first.
    pub fn all(&self) -> &[AlertEvent] {
        &self.events
    }

    /// Events that are not resolved yet, oldest first.
    pub fn active(&self) -> Vec<&AlertEvent> {
        self.events.iter().filter(|e| !e.resolved).collect()
    }

    /// Marks the event acknowledged. Returns false if no event matched.
    pub fn acknowledge(&mut self, id: &str) -> bool {
        match self.events.iter_mut().find(|e| e.id == id) {
            Some(event) => {
                event.acknowledged = true;
                true
            }
            None => false,
        }
    }

    /// Marks the event resolved, which also acknowledges it.
    pub fn resolve(&mut self, id: &str) -> bool {
        match self.events.iter_mut().find(|e| e.id == id) {
            Some(event) => {
                event.resolved = true;
                event.acknowledged = true;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
