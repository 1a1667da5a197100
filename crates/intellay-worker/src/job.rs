//! Per-room job: resolve credentials, assemble the pipeline, and run a
//! managed agent session until shutdown.

use crate::config::Config;
use crate::rooms::RoomDirectory;
use intellay_agent::{
    credentials, AgentError, AgentSession, CredentialCell, PipelineOptions, VadOptions,
    VoicePipeline,
};
use intellay_types::{RoomSnapshot, UsageSummary};
use tokio::task::JoinHandle;
use tracing::info;

/// A running agent session plus its event loop task.
pub struct RoomJob {
    pub session: AgentSession,
    event_loop: JoinHandle<()>,
}

impl RoomJob {
    /// Starts a job for the configured room: snapshot the room, issue the
    /// agent join token, and hand off to [`RoomJob::start_with_snapshot`].
    pub async fn start(
        directory: &RoomDirectory,
        config: &Config,
        vad: VadOptions,
    ) -> Result<Self, AgentError> {
        let snapshot = directory.snapshot(&config.agent.room).await;
        let token = directory.agent_token(&config.agent.room, &config.agent.identity)?;
        Self::start_with_snapshot(directory.url(), &token, config, vad, snapshot).await
    }

    /// Starts a session from an already-taken room snapshot.
    ///
    /// Credential resolution happens here, before the session exists; the
    /// pipeline is assembled from that startup value, and the credential
    /// cell is handed to the session event loop for late upgrades.
    pub async fn start_with_snapshot(
        url: &str,
        token: &str,
        config: &Config,
        vad: VadOptions,
        snapshot: RoomSnapshot,
    ) -> Result<Self, AgentError> {
        let resolved = credentials::resolve(&snapshot);
        let cell = CredentialCell::new(resolved.clone(), config.agent.late_join_policy);

        let pipeline = VoicePipeline::assemble(
            &resolved,
            vad,
            PipelineOptions {
                preemptive_generation: config.agent.preemptive_generation,
            },
        );

        let session = AgentSession::connect(url, token, &snapshot.name, cell, pipeline).await?;
        let event_loop = session.start();

        Ok(Self {
            session,
            event_loop,
        })
    }

    /// Closes the session, waits for the event loop to drain, and logs the
    /// usage summary.
    pub async fn shutdown(self) -> UsageSummary {
        self.session.close();
        let _ = self.event_loop.await;

        let summary = self.session.usage_summary().await;
        info!(room = %self.session.room_name, usage = %summary, "session usage");
        summary
    }
}
