//! Session credential resolution for the Mielto language-model backend.
//!
//! A session authenticates outbound LLM calls with an `{api_key, user_id}`
//! pair. The key can arrive through several channels, checked in strict
//! precedence order at startup:
//!
//! 1. an already-connected participant with a non-empty `api_key` attribute,
//! 2. the `MIELTO_API_KEY` / `OPENAI_API_KEY` environment variables,
//! 3. the room metadata JSON (`{"api_key": "..."}`), consulted only while
//!    the key is still the placeholder.
//!
//! A participant that connects *after* startup may still carry a key; how
//! that late arrival interacts with the already-resolved value is governed
//! by [`LateJoinPolicy`]. The user id comes from `MIELTO_USER_ID` or a
//! fixed default and is never revised after startup.
//!
//! Key material is never logged; log lines carry the source, the key
//! length, and whether the key is still the placeholder.

use crate::error::AgentError;
use intellay_types::{Participant, RoomSnapshot};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Fallback literal used when no credential source is found. Signals the
/// unauthenticated state to downstream logging; requests made with it will
/// be rejected at the provider boundary.
pub const PLACEHOLDER_API_KEY: &str = "your_api_key_here";

/// Fallback user id when `MIELTO_USER_ID` is unset.
pub const DEFAULT_USER_ID: &str = "default-user";

/// Participant attribute key carrying a session API key.
pub const API_KEY_ATTRIBUTE: &str = "api_key";

/// Environment variables checked for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["MIELTO_API_KEY", "OPENAI_API_KEY"];

/// Environment variable checked for the user id.
pub const USER_ID_ENV_VAR: &str = "MIELTO_USER_ID";

/// Where the active API key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    /// A participant already connected when the session started.
    ParticipantExisting,
    /// A participant that connected after startup.
    ParticipantJoined,
    /// The room metadata JSON.
    RoomMetadata,
    /// One of the named environment variables.
    Environment,
    /// No source found; the key is the placeholder.
    Default,
}

impl CredentialSource {
    /// Returns the canonical string label for this source.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ParticipantExisting => "participant_existing",
            Self::ParticipantJoined => "participant_joined",
            Self::RoomMetadata => "room_metadata",
            Self::Environment => "environment",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The active credential pair for one session.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub user_id: String,
    pub source: CredentialSource,
}

impl Credentials {
    /// True when no real credential source was found.
    pub fn is_placeholder(&self) -> bool {
        self.api_key == PLACEHOLDER_API_KEY
    }

    /// Length of the held key, safe to log.
    pub fn key_len(&self) -> usize {
        self.api_key.len()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("source", &self.source)
            .finish()
    }
}

/// Room metadata payload. Arrives as a JSON-encoded string attached to the
/// room; only the `api_key` field is meaningful here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomMetadata {
    #[serde(default)]
    pub api_key: Option<String>,
}

impl RoomMetadata {
    /// Parses the raw metadata string.
    ///
    /// An empty string is the empty object. Malformed JSON is logged and
    /// treated as the empty object; resolution continues with whatever was
    /// already found.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::default();
        }
        match serde_json::from_str(raw) {
            Ok(metadata) => metadata,
            Err(e) => {
                error!(error = %e, "failed to parse room metadata JSON, treating as empty");
                Self::default()
            }
        }
    }
}

/// Policy for a participant key arriving after startup.
///
/// The original deployment behavior is `Overwrite`: the late key replaces
/// the held value even when that value came from the environment. The
/// policy is explicit and configurable rather than an accident of callback
/// ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LateJoinPolicy {
    /// Always replace the held key with the late participant's key.
    #[default]
    Overwrite,
    /// Only replace the key when it is still the placeholder.
    KeepResolved,
}

/// Resolves the session credentials from the process environment and a
/// room snapshot, honoring the startup precedence order.
pub fn resolve(room: &RoomSnapshot) -> Credentials {
    resolve_with_env(room, |name| std::env::var(name).ok())
}

/// Same as [`resolve`] with the environment lookup injected, so tests can
/// run without touching process state.
pub fn resolve_with_env(
    room: &RoomSnapshot,
    lookup: impl Fn(&str) -> Option<String>,
) -> Credentials {
    let user_id = lookup(USER_ID_ENV_VAR)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_USER_ID.to_string());

    // Highest priority: a participant already in the room.
    for participant in &room.participants {
        if let Some(key) = participant.attribute(API_KEY_ATTRIBUTE).filter(|k| !k.is_empty()) {
            let credentials = Credentials {
                api_key: key.to_string(),
                user_id,
                source: CredentialSource::ParticipantExisting,
            };
            log_resolution(&credentials, &participant.identity);
            return credentials;
        }
    }

    // Environment, first non-empty variable wins.
    let env_key = API_KEY_ENV_VARS
        .iter()
        .find_map(|name| lookup(name).filter(|v| !v.is_empty()));

    let (mut api_key, mut source) = match env_key {
        Some(key) => (key, CredentialSource::Environment),
        None => (PLACEHOLDER_API_KEY.to_string(), CredentialSource::Default),
    };

    // Room metadata is a backup, consulted only while still unauthenticated.
    if api_key == PLACEHOLDER_API_KEY {
        let metadata = RoomMetadata::parse(&room.metadata);
        if let Some(key) = metadata.api_key.filter(|k| !k.is_empty()) {
            api_key = key;
            source = CredentialSource::RoomMetadata;
        }
    }

    let credentials = Credentials {
        api_key,
        user_id,
        source,
    };
    log_resolution(&credentials, "");
    credentials
}

fn log_resolution(credentials: &Credentials, participant: &str) {
    info!(
        source = %credentials.source,
        participant,
        key_len = credentials.key_len(),
        placeholder = credentials.is_placeholder(),
        user_id = %credentials.user_id,
        "resolved session credentials"
    );
}

/// Shared, owned credential state for one session.
///
/// The cell is handed both to pipeline construction (which snapshots it
/// once, before the session starts) and to the session event loop (which
/// applies late participant upgrades). All mutation is serialized behind
/// the lock, so a late upgrade can never produce a torn read.
#[derive(Debug, Clone)]
pub struct CredentialCell {
    inner: Arc<RwLock<Credentials>>,
    policy: LateJoinPolicy,
}

impl CredentialCell {
    pub fn new(credentials: Credentials, policy: LateJoinPolicy) -> Self {
        Self {
            inner: Arc::new(RwLock::new(credentials)),
            policy,
        }
    }

    /// Clones out the current credential pair.
    pub async fn snapshot(&self) -> Credentials {
        self.inner.read().await.clone()
    }

    /// Applies a `participant_connected` observation.
    ///
    /// Returns `true` when the held key was replaced. Idempotent: applying
    /// the same participant twice yields the same final value. The user id
    /// is never revised here.
    pub async fn apply_participant_joined(&self, participant: &Participant) -> bool {
        let Some(key) = participant
            .attribute(API_KEY_ATTRIBUTE)
            .filter(|k| !k.is_empty())
        else {
            return false;
        };

        let mut held = self.inner.write().await;
        if self.policy == LateJoinPolicy::KeepResolved && !held.is_placeholder() {
            info!(
                identity = %participant.identity,
                policy = "keep_resolved",
                "ignoring late participant key, session already authenticated"
            );
            return false;
        }

        held.api_key = key.to_string();
        held.source = CredentialSource::ParticipantJoined;
        info!(
            identity = %participant.identity,
            key_len = held.key_len(),
            "upgraded session credentials from late participant"
        );
        true
    }

    /// Validates that the held pair satisfies the session invariant:
    /// exactly one non-empty key and one non-empty user id.
    pub async fn validate(&self) -> Result<(), AgentError> {
        let held = self.inner.read().await;
        if held.api_key.is_empty() || held.user_id.is_empty() {
            return Err(AgentError::Config(
                "session credentials must carry a non-empty api_key and user_id".to_string(),
            ));
        }
        Ok(())
    }
}
