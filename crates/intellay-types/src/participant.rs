//! Typed views of room participants and room state.
//!
//! Participant attributes arrive from LiveKit as an untyped string map.
//! [`Participant::attribute`] keeps the "missing vs empty vs present"
//! distinction explicit: a missing key is `None`, a key set to the empty
//! string is `Some("")`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A connected room participant: an identity plus its attribute map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Unique identity the participant joined with.
    pub identity: String,
    /// Human-readable display name. May be empty.
    #[serde(default)]
    pub name: String,
    /// Client-settable key/value attributes.
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl Participant {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            name: String::new(),
            attributes: HashMap::new(),
        }
    }

    /// Adds an attribute, builder-style. Mainly useful in tests.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Looks up an attribute by key.
    ///
    /// Returns `None` when the key is absent and `Some("")` when it is
    /// present but empty; callers that want "present and non-empty" should
    /// filter on `is_empty` themselves.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

impl From<livekit_protocol::ParticipantInfo> for Participant {
    fn from(info: livekit_protocol::ParticipantInfo) -> Self {
        Self {
            identity: info.identity,
            name: info.name,
            attributes: info.attributes,
        }
    }
}

/// A point-in-time view of a room: its name, raw metadata string, and the
/// participants connected when the snapshot was taken.
///
/// Room metadata is kept as the raw JSON-encoded string it arrives as;
/// parsing (and recovery from malformed input) belongs to the credential
/// resolver.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub name: String,
    #[serde(default)]
    pub metadata: String,
    #[serde(default)]
    pub participants: Vec<Participant>,
}

impl RoomSnapshot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: String::new(),
            participants: Vec::new(),
        }
    }
}
