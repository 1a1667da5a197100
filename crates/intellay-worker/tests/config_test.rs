use intellay_agent::LateJoinPolicy;
use intellay_worker::config::load_config;
use std::io::Write;

#[test]
fn defaults_when_no_path_given() {
    let config = load_config(None).expect("defaults should load");

    assert_eq!(config.livekit.url, "http://localhost:7880");
    assert_eq!(config.livekit.token_ttl_seconds, 3600);
    assert_eq!(config.agent.identity, "intellay-agent");
    assert_eq!(config.agent.late_join_policy, LateJoinPolicy::Overwrite);
    assert!(config.agent.preemptive_generation);
    assert_eq!(config.logging.level, "info");
    assert!(!config.logging.json);
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let config = load_config(Some("/nonexistent/intellay.toml")).expect("should fall back");
    assert_eq!(config.livekit.api_key, "devkey");
}

#[test]
fn toml_file_overrides_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[livekit]
url = "wss://livekit.example.com"
api_key = "prod-key"
api_secret = "prod-secret"

[agent]
room = "support"
late_join_policy = "keep_resolved"
preemptive_generation = false

[logging]
level = "debug"
json = true
"#
    )
    .unwrap();

    let config = load_config(file.path().to_str()).expect("file should parse");

    assert_eq!(config.livekit.url, "wss://livekit.example.com");
    assert_eq!(config.agent.room, "support");
    assert_eq!(config.agent.late_join_policy, LateJoinPolicy::KeepResolved);
    assert!(!config.agent.preemptive_generation);
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json);
}

#[test]
fn malformed_toml_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[livekit\nurl = ").unwrap();

    assert!(load_config(file.path().to_str()).is_err());
}

#[test]
fn debug_output_redacts_api_secret() {
    let mut settings = intellay_worker::config::LiveKitSettings::default();
    settings.api_secret = "hunter2".to_string();
    let rendered = format!("{:?}", settings);

    assert!(rendered.contains("[REDACTED]"));
    assert!(!rendered.contains("hunter2"));
}
