//! Worker configuration loading from file and environment variables.

use intellay_agent::LateJoinPolicy;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Top-level worker configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// LiveKit server settings.
    #[serde(default)]
    pub livekit: LiveKitSettings,

    /// Agent session settings.
    #[serde(default)]
    pub agent: AgentSettings,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection settings for the LiveKit server the worker joins.
///
/// These authenticate the worker against LiveKit itself; they are distinct
/// from the per-session Mielto credential resolved at job start.
#[derive(Clone, Deserialize)]
pub struct LiveKitSettings {
    /// LiveKit server URL.
    #[serde(default = "default_livekit_url")]
    pub url: String,

    /// API key for server-side Room Service calls and join tokens.
    #[serde(default = "default_livekit_api_key")]
    pub api_key: String,

    /// API secret paired with the key.
    #[serde(default = "default_livekit_api_secret")]
    pub api_secret: String,

    /// JWT token TTL in seconds for agent join tokens. Default: 3600.
    #[serde(default = "default_token_ttl_seconds")]
    pub token_ttl_seconds: u64,
}

impl fmt::Debug for LiveKitSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveKitSettings")
            .field("url", &self.url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .finish()
    }
}

/// Agent session settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentSettings {
    /// Identity the agent joins rooms with.
    #[serde(default = "default_agent_identity")]
    pub identity: String,

    /// Room the worker serves.
    #[serde(default = "default_room")]
    pub room: String,

    /// Policy for an API key arriving with a late participant.
    #[serde(default)]
    pub late_join_policy: LateJoinPolicy,

    /// Allow the LLM to generate while waiting for end of turn.
    #[serde(default = "default_preemptive_generation")]
    pub preemptive_generation: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "intellay_worker=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_livekit_url() -> String {
    "http://localhost:7880".to_string()
}

fn default_livekit_api_key() -> String {
    "devkey".to_string()
}

fn default_livekit_api_secret() -> String {
    "secret".to_string()
}

fn default_token_ttl_seconds() -> u64 {
    3600
}

fn default_agent_identity() -> String {
    "intellay-agent".to_string()
}

fn default_room() -> String {
    "intellay-dev".to_string()
}

fn default_preemptive_generation() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LiveKitSettings {
    fn default() -> Self {
        Self {
            url: default_livekit_url(),
            api_key: default_livekit_api_key(),
            api_secret: default_livekit_api_secret(),
            token_ttl_seconds: default_token_ttl_seconds(),
        }
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            identity: default_agent_identity(),
            room: default_room(),
            late_join_policy: LateJoinPolicy::default(),
            preemptive_generation: default_preemptive_generation(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `INTELLAY_LIVEKIT_URL` overrides `livekit.url`
/// - `INTELLAY_LIVEKIT_API_KEY` overrides `livekit.api_key`
/// - `INTELLAY_LIVEKIT_API_SECRET` overrides `livekit.api_secret`
/// - `INTELLAY_ROOM` overrides `agent.room`
/// - `INTELLAY_LOG_LEVEL` overrides `logging.level`
/// - `INTELLAY_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    // No logging here: the binary loads config before the tracing
    // subscriber is installed. The caller reports the fallback.
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Config::default(),
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    // Environment variable overrides
    if let Ok(url) = std::env::var("INTELLAY_LIVEKIT_URL") {
        config.livekit.url = url;
    }
    if let Ok(key) = std::env::var("INTELLAY_LIVEKIT_API_KEY") {
        config.livekit.api_key = key;
    }
    if let Ok(secret) = std::env::var("INTELLAY_LIVEKIT_API_SECRET") {
        config.livekit.api_secret = secret;
    }
    if let Ok(room) = std::env::var("INTELLAY_ROOM") {
        config.agent.room = room;
    }
    if let Ok(level) = std::env::var("INTELLAY_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("INTELLAY_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }

    Ok(config)
}
