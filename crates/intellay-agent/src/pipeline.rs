//! Voice pipeline assembly.
//!
//! The pipeline stages are pre-built provider components; this module
//! carries their typed configuration and the header contract for the
//! Mielto language-model backend. Media flow and inference belong to the
//! providers, not to this crate.

use crate::credentials::Credentials;
use crate::error::AgentError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Base URL for the Mielto language-model backend.
pub const MIELTO_BASE_URL: &str = "https://api.mielto.com/api/v1";

/// System instructions for the voice assistant.
pub const AGENT_INSTRUCTIONS: &str = "You are a helpful voice AI assistant. The user is \
interacting with you via voice, even if you perceive the conversation as text. You eagerly \
assist users with their questions by providing information from your extensive knowledge. \
Your responses are concise, to the point, and without any complex formatting or punctuation \
including emojis, asterisks, or other symbols. You are curious, friendly, and have a sense \
of humor.";

/// Speech-to-text configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SttOptions {
    pub model: String,
    pub language: String,
}

impl Default for SttOptions {
    fn default() -> Self {
        Self {
            model: "assemblyai/universal-streaming".to_string(),
            language: "en".to_string(),
        }
    }
}

/// Language-model configuration: base URL, key, and the extra headers the
/// Mielto backend expects on every request.
#[derive(Clone, PartialEq, Eq)]
pub struct LlmOptions {
    pub base_url: String,
    pub api_key: String,
    pub user_id: String,
    pub memories_enabled: bool,
}

impl LlmOptions {
    /// Builds LLM options from the resolved session credentials.
    pub fn for_credentials(credentials: &Credentials) -> Self {
        Self {
            base_url: MIELTO_BASE_URL.to_string(),
            api_key: credentials.api_key.clone(),
            user_id: credentials.user_id.clone(),
            memories_enabled: true,
        }
    }

    /// The extra headers sent with every backend request.
    ///
    /// Header names are lowercase on the wire; HTTP header names are
    /// case-insensitive.
    pub fn http_headers(&self) -> Result<HeaderMap, AgentError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-api-key"),
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| AgentError::Config(format!("api_key is not a valid header: {}", e)))?,
        );
        headers.insert(
            HeaderName::from_static("x-user-id"),
            HeaderValue::from_str(&self.user_id)
                .map_err(|e| AgentError::Config(format!("user_id is not a valid header: {}", e)))?,
        );
        headers.insert(
            HeaderName::from_static("x-memories-enabled"),
            HeaderValue::from_static(if self.memories_enabled { "true" } else { "false" }),
        );
        Ok(headers)
    }

    /// HTTP client preconfigured with the backend headers.
    pub fn build_client(&self) -> Result<reqwest::Client, AgentError> {
        let headers = self.http_headers()?;
        reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| AgentError::Config(format!("failed to build LLM client: {}", e)))
    }
}

impl fmt::Debug for LlmOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmOptions")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("memories_enabled", &self.memories_enabled)
            .finish()
    }
}

/// Text-to-speech configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtsOptions {
    pub model: String,
    pub voice: String,
}

impl Default for TtsOptions {
    fn default() -> Self {
        Self {
            model: "cartesia/sonic-3".to_string(),
            voice: "9626c31c-bec5-4cca-baa8-f8ba9e84c8bc".to_string(),
        }
    }
}

/// Voice-activity detection configuration.
///
/// The VAD model is loaded once per worker process and shared across
/// sessions, so construction goes through [`VadOptions::prewarm`] at
/// worker startup rather than per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VadOptions {
    pub provider: String,
}

impl VadOptions {
    pub fn prewarm() -> Self {
        info!(provider = "silero", "prewarming VAD model");
        Self {
            provider: "silero".to_string(),
        }
    }
}

/// Turn-detection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnDetectionOptions {
    pub model: String,
}

impl TurnDetectionOptions {
    /// The multilingual end-of-turn model.
    pub fn multilingual() -> Self {
        Self {
            model: "multilingual".to_string(),
        }
    }
}

/// Input noise-cancellation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoiseCancellationOptions {
    pub filter: String,
}

impl NoiseCancellationOptions {
    /// Background voice cancellation; for telephony deployments the BVC
    /// telephony variant would be used instead.
    pub fn bvc() -> Self {
        Self {
            filter: "bvc".to_string(),
        }
    }
}

/// Session-level pipeline behavior flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Allow the LLM to start generating while waiting for end of turn.
    pub preemptive_generation: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            preemptive_generation: true,
        }
    }
}

/// The assembled pipeline handed to the session runtime.
#[derive(Debug, Clone)]
pub struct VoicePipeline {
    /// System instructions for the assistant persona.
    pub instructions: String,
    pub stt: SttOptions,
    pub llm: LlmOptions,
    pub tts: TtsOptions,
    pub vad: VadOptions,
    pub turn_detection: TurnDetectionOptions,
    pub noise_cancellation: NoiseCancellationOptions,
    pub options: PipelineOptions,
}

impl VoicePipeline {
    /// Wires the pipeline from the resolved credentials and the prewarmed
    /// VAD. The credentials must be the value resolved before session
    /// start; late upgrades apply to future snapshots, not to an already
    /// assembled pipeline.
    pub fn assemble(
        credentials: &Credentials,
        vad: VadOptions,
        options: PipelineOptions,
    ) -> Self {
        info!(
            base_url = MIELTO_BASE_URL,
            key_len = credentials.key_len(),
            placeholder = credentials.is_placeholder(),
            user_id = %credentials.user_id,
            preemptive_generation = options.preemptive_generation,
            "assembling voice pipeline"
        );
        Self {
            instructions: AGENT_INSTRUCTIONS.to_string(),
            stt: SttOptions::default(),
            llm: LlmOptions::for_credentials(credentials),
            tts: TtsOptions::default(),
            vad,
            turn_detection: TurnDetectionOptions::multilingual(),
            noise_cancellation: NoiseCancellationOptions::bvc(),
            options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{CredentialSource, Credentials};

    fn creds(key: &str, user: &str) -> Credentials {
        Credentials {
            api_key: key.to_string(),
            user_id: user.to_string(),
            source: CredentialSource::Environment,
        }
    }

    #[test]
    fn llm_headers_carry_key_user_and_memories_flag() {
        let llm = LlmOptions::for_credentials(&creds("abc123", "alice"));
        let headers = llm.http_headers().unwrap();

        assert_eq!(headers.get("x-api-key").unwrap(), "abc123");
        assert_eq!(headers.get("x-user-id").unwrap(), "alice");
        assert_eq!(headers.get("x-memories-enabled").unwrap(), "true");
    }

    #[test]
    fn llm_rejects_key_with_control_characters() {
        let llm = LlmOptions::for_credentials(&creds("bad\nkey", "alice"));
        assert!(llm.http_headers().is_err());
    }

    #[test]
    fn llm_debug_redacts_the_key() {
        let llm = LlmOptions::for_credentials(&creds("abc123", "alice"));
        let rendered = format!("{:?}", llm);
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("abc123"));
    }

    #[test]
    fn assemble_uses_fixed_provider_models() {
        let pipeline = VoicePipeline::assemble(
            &creds("abc123", "alice"),
            VadOptions::prewarm(),
            PipelineOptions::default(),
        );

        assert_eq!(pipeline.stt.model, "assemblyai/universal-streaming");
        assert_eq!(pipeline.stt.language, "en");
        assert_eq!(pipeline.tts.model, "cartesia/sonic-3");
        assert_eq!(pipeline.vad.provider, "silero");
        assert_eq!(pipeline.llm.base_url, MIELTO_BASE_URL);
        assert_eq!(pipeline.instructions, AGENT_INSTRUCTIONS);
        assert!(pipeline.options.preemptive_generation);
    }
}
