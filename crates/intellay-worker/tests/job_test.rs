use intellay_agent::{credentials, RoomEvent};
use intellay_types::{Participant, RoomSnapshot};
use intellay_worker::{Config, RoomJob};
use std::time::Duration;

fn clear_credential_env() {
    for name in ["MIELTO_API_KEY", "OPENAI_API_KEY", "MIELTO_USER_ID"] {
        std::env::remove_var(name);
    }
}

async fn start_job(snapshot: RoomSnapshot) -> RoomJob {
    let config = Config::default();
    RoomJob::start_with_snapshot(
        "ws://localhost:7880",
        "test-token",
        &config,
        intellay_agent::VadOptions::prewarm(),
        snapshot,
    )
    .await
    .expect("failed to start job")
}

#[tokio::test]
async fn empty_room_degrades_to_placeholder_then_late_join_upgrades() {
    clear_credential_env();

    // No env vars, empty metadata, no participants at startup.
    let job = start_job(RoomSnapshot::new("empty-room")).await;

    let startup = job.session.credentials.snapshot().await;
    assert!(startup.is_placeholder());
    assert_eq!(startup.user_id, credentials::DEFAULT_USER_ID);

    // A participant later joins carrying a key.
    let joiner = Participant::new("late-user").with_attribute("api_key", "abc123");
    job.session.dispatch(RoomEvent::ParticipantConnected(joiner));

    let session = job.session.clone();
    let _ = tokio::time::timeout(Duration::from_secs(5), job.shutdown())
        .await
        .expect("job did not shut down");

    assert_eq!(session.credentials.snapshot().await.api_key, "abc123");
}

#[tokio::test]
async fn existing_participant_key_authenticates_the_session() {
    let mut snapshot = RoomSnapshot::new("busy-room");
    snapshot
        .participants
        .push(Participant::new("caller").with_attribute("api_key", "caller-key"));

    let job = start_job(snapshot).await;

    let startup = job.session.credentials.snapshot().await;
    assert_eq!(startup.api_key, "caller-key");
    assert_eq!(job.session.pipeline.llm.api_key, "caller-key");

    let _ = tokio::time::timeout(Duration::from_secs(5), job.shutdown())
        .await
        .expect("job did not shut down");
}

#[tokio::test]
async fn shutdown_reports_usage_summary() {
    clear_credential_env();

    let job = start_job(RoomSnapshot::new("metrics-room")).await;
    job.session
        .dispatch(RoomEvent::MetricsCollected(intellay_types::PipelineMetric::Tts {
            characters: 99,
            ttfb_ms: 40,
        }));

    let summary = tokio::time::timeout(Duration::from_secs(5), job.shutdown())
        .await
        .expect("job did not shut down");
    assert_eq!(summary.tts_characters, 99);
}
