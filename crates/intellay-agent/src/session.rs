//! The managed agent session.
//!
//! Wraps one room connection: the assembled pipeline, the credential cell,
//! and a broadcast channel of room events. Two behaviors are registered on
//! the event loop: metric events feed the usage collector, and a
//! participant connecting after startup may upgrade the session
//! credentials.
//!
//! Connection lifecycle, media transport, and event production belong to
//! the session runtime; this type consumes its event stream.

use crate::credentials::CredentialCell;
use crate::error::AgentError;
use crate::metrics::UsageCollector;
use crate::pipeline::VoicePipeline;
use intellay_types::{Participant, PipelineMetric, UsageSummary};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Default capacity for the per-session room event channel.
const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;

/// An event dispatched by the session runtime.
#[derive(Debug, Clone)]
pub enum RoomEvent {
    /// A participant connected after session startup.
    ParticipantConnected(Participant),
    /// A participant left the room.
    ParticipantDisconnected { identity: String },
    /// One pipeline stage reported a per-turn metric.
    MetricsCollected(PipelineMetric),
    /// The session is shutting down; terminates the event loop.
    Closed,
}

/// A managed voice agent session in one room.
#[derive(Debug, Clone)]
pub struct AgentSession {
    pub room_url: String,
    pub room_name: String,
    pub credentials: CredentialCell,
    pub pipeline: VoicePipeline,
    event_tx: broadcast::Sender<RoomEvent>,
    usage: Arc<RwLock<UsageCollector>>,
}

impl AgentSession {
    /// Connects the session to a room.
    ///
    /// The pipeline must already be assembled from the credentials resolved
    /// at startup; a late credential upgrade applies to future snapshots of
    /// the cell, not to the running pipeline.
    pub async fn connect(
        url: &str,
        token: &str,
        room_name: &str,
        credentials: CredentialCell,
        pipeline: VoicePipeline,
    ) -> Result<Self, AgentError> {
        credentials.validate().await?;

        info!(
            room = room_name,
            url,
            token_len = token.len(),
            "agent connecting to room"
        );

        let (event_tx, _) = broadcast::channel(DEFAULT_EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            room_url: url.to_string(),
            room_name: room_name.to_string(),
            credentials,
            pipeline,
            event_tx,
            usage: Arc::new(RwLock::new(UsageCollector::new())),
        })
    }

    /// Publishes a runtime event to the session.
    pub fn dispatch(&self, event: RoomEvent) {
        // Send only fails when no receiver is alive, i.e. the loop already
        // terminated; the event is dropped in that case.
        let _ = self.event_tx.send(event);
    }

    /// Subscribes to the raw event stream.
    pub fn events(&self) -> broadcast::Receiver<RoomEvent> {
        self.event_tx.subscribe()
    }

    /// Spawns the session event loop. Call before dispatching events;
    /// events published earlier are not replayed.
    pub fn start(&self) -> JoinHandle<()> {
        let session = self.clone();
        let rx = self.event_tx.subscribe();
        tokio::spawn(async move { session.run(rx).await })
    }

    /// Consumes room events until [`RoomEvent::Closed`] or channel close.
    pub async fn run(&self, mut rx: broadcast::Receiver<RoomEvent>) {
        loop {
            match rx.recv().await {
                Ok(RoomEvent::ParticipantConnected(participant)) => {
                    info!(
                        room = %self.room_name,
                        identity = %participant.identity,
                        attribute_count = participant.attributes.len(),
                        "participant connected"
                    );
                    self.credentials.apply_participant_joined(&participant).await;
                }
                Ok(RoomEvent::ParticipantDisconnected { identity }) => {
                    info!(room = %self.room_name, identity = %identity, "participant disconnected");
                }
                Ok(RoomEvent::MetricsCollected(metric)) => {
                    self.usage.write().await.collect(&metric);
                }
                Ok(RoomEvent::Closed) => {
                    info!(room = %self.room_name, "session closed");
                    break;
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(room = %self.room_name, skipped, "session event loop lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    /// Signals the event loop to terminate.
    pub fn close(&self) {
        self.dispatch(RoomEvent::Closed);
    }

    /// Aggregate usage collected so far. Logged once at shutdown.
    pub async fn usage_summary(&self) -> UsageSummary {
        self.usage.read().await.summary()
    }
}
