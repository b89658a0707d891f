//! Outgoing events for the Evidence subsystem
//!
//! Attribute-bag events collected per transaction scope and handed to the
//! host after commit.

use serde::{Deserialize, Serialize};

pub const EVENT_TYPE_SUBMIT_EVIDENCE: &str = "submit_evidence";
pub const EVENT_TYPE_MESSAGE: &str = "message";

pub const ATTRIBUTE_KEY_EVIDENCE_HASH: &str = "evidence_hash";
pub const ATTRIBUTE_KEY_MODULE: &str = "module";
pub const ATTRIBUTE_KEY_SENDER: &str = "sender";

pub const ATTRIBUTE_VALUE_CATEGORY: &str = "evidence";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: Vec<Attribute>,
}

impl Event {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }

    /// `submit_evidence{evidence_hash}`
    pub fn submit_evidence(hash_hex: impl Into<String>) -> Self {
        Event::new(EVENT_TYPE_SUBMIT_EVIDENCE).with_attribute(ATTRIBUTE_KEY_EVIDENCE_HASH, hash_hex)
    }

    /// `message{module=evidence, sender}`
    pub fn message(sender: impl Into<String>) -> Self {
        Event::new(EVENT_TYPE_MESSAGE)
            .with_attribute(ATTRIBUTE_KEY_MODULE, ATTRIBUTE_VALUE_CATEGORY)
            .with_attribute(ATTRIBUTE_KEY_SENDER, sender)
    }
}

/// Ordered event sink for one execution scope.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventManager {
    events: Vec<Event>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_evidence_event() {
        let event = Event::submit_evidence("ABCD");
        assert_eq!(event.kind, "submit_evidence");
        assert_eq!(event.attribute("evidence_hash"), Some("ABCD"));
    }

    #[test]
    fn test_message_event() {
        let event = Event::message("cosmos1xyz");
        assert_eq!(event.attribute("module"), Some("evidence"));
        assert_eq!(event.attribute("sender"), Some("cosmos1xyz"));
    }

    #[test]
    fn test_manager_preserves_order() {
        let mut manager = EventManager::new();
        manager.emit(Event::new("first"));
        manager.emit(Event::new("second"));
        let kinds: Vec<_> = manager.into_events().into_iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec!["first", "second"]);
    }
}
