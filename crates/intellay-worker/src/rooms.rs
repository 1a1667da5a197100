//! LiveKit room directory: participant listing, room metadata, and agent
//! join tokens, built on the server-side Room Service API.

use crate::config::LiveKitSettings;
use intellay_agent::AgentError;
use intellay_types::{Participant, RoomSnapshot};
use livekit_api::access_token::{AccessToken, VideoGrants};
use livekit_api::services::room::RoomClient;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug)]
pub struct RoomDirectory {
    settings: LiveKitSettings,
    room_client: RoomClient,
}

impl RoomDirectory {
    pub fn new(settings: LiveKitSettings) -> Self {
        let room_client =
            RoomClient::with_api_key(&settings.url, &settings.api_key, &settings.api_secret);
        Self {
            settings,
            room_client,
        }
    }

    pub fn url(&self) -> &str {
        &self.settings.url
    }

    /// Takes a point-in-time snapshot of a room: its metadata string and
    /// the currently connected participants.
    ///
    /// A room that does not exist yet yields an empty snapshot rather than
    /// an error; credential resolution degrades gracefully from there.
    pub async fn snapshot(&self, room_name: &str) -> RoomSnapshot {
        let metadata = match self.room_client.list_rooms(vec![room_name.to_string()]).await {
            Ok(rooms) => rooms
                .into_iter()
                .find(|r| r.name == room_name)
                .map(|r| r.metadata)
                .unwrap_or_default(),
            Err(e) => {
                warn!(room = room_name, error = %e, "failed to list rooms, treating metadata as empty");
                String::new()
            }
        };

        let participants = match self.room_client.list_participants(room_name).await {
            Ok(infos) => infos.into_iter().map(Participant::from).collect(),
            Err(e) => {
                warn!(
                    room = room_name,
                    error = %e,
                    "failed to list participants, treating room as empty"
                );
                Vec::new()
            }
        };

        let snapshot = RoomSnapshot {
            name: room_name.to_string(),
            metadata,
            participants,
        };

        info!(
            room = room_name,
            participant_count = snapshot.participants.len(),
            metadata_len = snapshot.metadata.len(),
            "took room snapshot"
        );

        snapshot
    }

    /// Issues a join token for the agent identity.
    pub fn agent_token(&self, room_name: &str, identity: &str) -> Result<String, AgentError> {
        let token = AccessToken::with_api_key(&self.settings.api_key, &self.settings.api_secret)
            .with_identity(identity)
            .with_name("Intellay Agent")
            .with_grants(VideoGrants {
                room_join: true,
                room: room_name.to_string(),
                can_publish: true,
                can_subscribe: true,
                can_publish_data: true,
                ..Default::default()
            })
            .with_ttl(Duration::from_secs(self.settings.token_ttl_seconds));

        token.to_jwt().map_err(AgentError::LiveKit)
    }
}
