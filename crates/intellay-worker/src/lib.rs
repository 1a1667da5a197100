//! Intellay voice agent worker.
//!
//! Wires the Intellay voice pipeline into a LiveKit room: loads worker
//! configuration, snapshots the room, resolves the session credential, and
//! runs a managed agent session until shutdown.

pub mod config;
pub mod job;
pub mod rooms;

pub use config::{load_config, Config, ConfigError};
pub use job::RoomJob;
pub use rooms::RoomDirectory;
