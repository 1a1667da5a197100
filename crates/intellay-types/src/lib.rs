//! Shared types for the Intellay voice agent worker.
//!
//! This crate provides the foundational types used across the workspace:
//! the typed participant view, the room snapshot handed to the credential
//! resolver, and the pipeline metric events emitted by a running session.
//!
//! No crate in the workspace depends on anything *except* `intellay-types`
//! for cross-cutting type definitions. This keeps the dependency graph
//! clean and prevents circular dependencies.

pub mod metrics;
pub mod participant;

pub use metrics::{PipelineMetric, UsageSummary};
pub use participant::{Participant, RoomSnapshot};
