//! Interaction events and the bounded interaction log.
//!
//! Every generation call emits an auditable trace: one PROMPT event before
//! transmission, zero or more TOKEN events while streaming, and exactly one
//! RESPONSE or ERROR event at the end. Sinks record events in call order and
//! never mutate past entries.

use crate::GenerateRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;
use uuid::Uuid;

/// Default capacity of the in-memory interaction log.
///
/// The log is bounded so long sessions do not grow memory without limit;
/// oldest entries are dropped first.
pub const DEFAULT_LOG_CAPACITY: usize = 1024;

/// Structured description of a failed generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    /// Error category (e.g. "Transport", "ContentBlocked")
    pub kind: String,
    /// Human-readable error message
    pub message: String,
}

/// Payload of an interaction event, tagged by event type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum InteractionPayload {
    /// The full outbound request, recorded before transmission
    Prompt(GenerateRequest),
    /// An incremental text fragment from a streaming response
    Token(String),
    /// The backend's complete response (backend-native shape)
    Response(serde_json::Value),
    /// A structured failure description
    Error(FailureReport),
}

/// One entry in the interaction trace.
///
/// # Examples
///
/// ```
/// use atelier_core::{InteractionEvent, InteractionPayload};
///
/// let event = InteractionEvent::now("gemini-2.0-flash", InteractionPayload::Token("Hi".into()));
/// assert_eq!(event.model, "gemini-2.0-flash");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEvent {
    /// Unique event id
    pub id: Uuid,
    /// UTC timestamp at which the event was recorded
    pub timestamp: DateTime<Utc>,
    /// Backend model identifier the call was addressed to
    pub model: String,
    /// The event payload
    pub payload: InteractionPayload,
}

impl InteractionEvent {
    /// Create an event stamped with the current time and a fresh id.
    pub fn now(model: impl Into<String>, payload: InteractionPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            model: model.into(),
            payload,
        }
    }
}

/// A recorder of generation events.
///
/// Implementations must preserve arrival order and must not reorder or
/// deduplicate entries.
pub trait EventSink: Send + Sync {
    /// Record one event.
    fn record(&self, event: InteractionEvent);
}

/// Append-only bounded event log.
///
/// Holds the most recent events up to a fixed capacity, dropping the oldest
/// entries once the bound is reached. Thread-safe; recording never blocks on
/// readers for longer than a snapshot copy.
///
/// # Examples
///
/// ```
/// use atelier_core::{EventSink, InteractionEvent, InteractionLog, InteractionPayload};
///
/// let log = InteractionLog::new(8);
/// log.record(InteractionEvent::now("m", InteractionPayload::Token("a".into())));
/// assert_eq!(log.len(), 1);
/// ```
#[derive(Debug)]
pub struct InteractionLog {
    capacity: usize,
    events: Mutex<VecDeque<InteractionEvent>>,
}

impl Default for InteractionLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl InteractionLog {
    /// Create a log bounded to `capacity` events.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            events: Mutex::new(VecDeque::new()),
        }
    }

    /// Number of events currently held.
    pub fn len(&self) -> usize {
        self.events.lock().expect("log lock poisoned").len()
    }

    /// True when no events are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the current event sequence, oldest first.
    pub fn snapshot(&self) -> Vec<InteractionEvent> {
        self.events
            .lock()
            .expect("log lock poisoned")
            .iter()
            .cloned()
            .collect()
    }

    /// Discard all recorded events.
    ///
    /// Owner-level reset between runs; the sink remains append-only within
    /// any one call sequence.
    pub fn clear(&self) {
        tracing::debug!("Clearing interaction log");
        self.events.lock().expect("log lock poisoned").clear();
    }
}

impl EventSink for InteractionLog {
    fn record(&self, event: InteractionEvent) {
        let mut events = self.events.lock().expect("log lock poisoned");
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }
}

/// A sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: InteractionEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str) -> InteractionEvent {
        InteractionEvent::now("test-model", InteractionPayload::Token(text.to_string()))
    }

    #[test]
    fn records_in_arrival_order() {
        let log = InteractionLog::new(16);
        for i in 0..5 {
            log.record(token(&i.to_string()));
        }
        let texts: Vec<String> = log
            .snapshot()
            .into_iter()
            .map(|e| match e.payload {
                InteractionPayload::Token(t) => t,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(texts, ["0", "1", "2", "3", "4"]);
    }

    #[test]
    fn drops_oldest_beyond_capacity() {
        let log = InteractionLog::new(3);
        for i in 0..5 {
            log.record(token(&i.to_string()));
        }
        assert_eq!(log.len(), 3);
        let first = log.snapshot().remove(0);
        assert_eq!(first.payload, InteractionPayload::Token("2".to_string()));
    }

    #[test]
    fn clear_empties_the_log() {
        let log = InteractionLog::default();
        log.record(token("a"));
        log.clear();
        assert!(log.is_empty());
    }
}
