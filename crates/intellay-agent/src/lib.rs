//! Voice agent library for the Intellay worker.
//!
//! Resolves the Mielto credential for a session from its possible sources
//! (participant attributes, room metadata, environment), assembles the
//! voice pipeline descriptors (STT, LLM, TTS, VAD, turn detection, noise
//! cancellation), and runs the agent session event loop that collects
//! pipeline metrics and applies late credential upgrades.
//!
//! The providers themselves (speech recognition, language generation,
//! synthesis, detection) are external collaborators reached through the
//! session runtime; this crate only carries their typed configuration and
//! the credential/header contract for the language-model backend.

pub mod credentials;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod session;

pub use credentials::{
    CredentialCell, CredentialSource, Credentials, LateJoinPolicy, DEFAULT_USER_ID,
    PLACEHOLDER_API_KEY,
};
pub use error::AgentError;
pub use metrics::UsageCollector;
pub use pipeline::{
    LlmOptions, NoiseCancellationOptions, PipelineOptions, SttOptions, TtsOptions,
    TurnDetectionOptions, VadOptions, VoicePipeline, AGENT_INSTRUCTIONS,
};
pub use session::{AgentSession, RoomEvent};
