use intellay_worker::config::LiveKitSettings;
use intellay_worker::RoomDirectory;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

const DEFAULT_SECRET: &str = "secret";

#[test]
fn agent_token_is_issued() {
    let directory = RoomDirectory::new(LiveKitSettings::default());

    let token = directory
        .agent_token("test-room", "intellay-agent")
        .expect("failed to generate token");

    assert!(!token.is_empty());
}

#[test]
fn agent_token_grants_join_publish_subscribe() {
    let directory = RoomDirectory::new(LiveKitSettings::default());

    let token = directory
        .agent_token("perm-room", "intellay-agent")
        .expect("failed to generate token");

    #[derive(Deserialize)]
    struct Claims {
        video: VideoClaims,
    }

    #[derive(Deserialize)]
    struct VideoClaims {
        #[serde(rename = "canPublish")]
        can_publish: bool,
        #[serde(rename = "canSubscribe")]
        can_subscribe: bool,
        #[serde(rename = "roomJoin")]
        room_join: bool,
        room: String,
    }

    let validation = Validation::new(Algorithm::HS256);
    let key = DecodingKey::from_secret(DEFAULT_SECRET.as_bytes());
    let token_data = decode::<Claims>(&token, &key, &validation).expect("failed to decode token");

    assert!(token_data.claims.video.can_publish, "canPublish should be true");
    assert!(
        token_data.claims.video.can_subscribe,
        "canSubscribe should be true"
    );
    assert!(token_data.claims.video.room_join, "roomJoin should be true");
    assert_eq!(token_data.claims.video.room, "perm-room");
}
