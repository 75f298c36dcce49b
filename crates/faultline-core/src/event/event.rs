use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Well-known event types.
pub mod event_types {
    /// An event describing a captured exception.
    pub const ERROR: &str = "error";
    /// A free-form log message.
    pub const LOG: &str = "log";
}

/// Well-known keys of [`Event::data`].
pub mod known_data {
    /// Structured error data produced by the error parser.
    pub const ERROR: &str = "@error";
}

/// A single telemetry event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// The kind of event, see [`event_types`].
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// When the event occurred.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Client-generated identifier used to look the event up later.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    /// Extended data attached by plugins, keyed by [`known_data`] or custom names.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub data: HashMap<String, serde_json::Value>,
}

impl Event {
    /// Create an event of the given type, stamped with the current time.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: Some(event_type.into()),
            date: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Sets the message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets where the event originated, such as a logger name or request path.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds tags, skipping empty and duplicate ones.
    pub fn add_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tag in tags {
            let tag = tag.into();
            if !tag.trim().is_empty() && !self.tags.contains(&tag) {
                self.tags.push(tag);
            }
        }
    }

    /// Whether the event is of the given type.
    pub fn is_type(&self, event_type: &str) -> bool {
        self.event_type.as_deref() == Some(event_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_event_has_type_and_date() {
        let event = Event::new(event_types::LOG).with_message("hello");

        assert!(event.is_type(event_types::LOG));
        assert!(event.date.is_some());
        assert_eq!(event.message.as_deref(), Some("hello"));
    }

    #[test]
    fn test_add_tags_skips_empty_and_duplicates() {
        let mut event = Event::default();
        event.add_tags(["critical", "", "critical", " ", "billing"]);

        assert_eq!(event.tags, vec!["critical", "billing"]);
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let mut event = Event::default().with_source("checkout");
        event.event_type = Some(event_types::ERROR.to_string());
        event
            .data
            .insert(known_data::ERROR.to_string(), serde_json::json!({ "message": "boom" }));

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            serde_json::json!({
                "type": "error",
                "source": "checkout",
                "data": { "@error": { "message": "boom" } },
            })
        );
    }
}
