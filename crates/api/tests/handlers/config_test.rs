use pretty_assertions::assert_eq;
use rstest::rstest;
use slotbook_api::config::{parse_log_level, parse_slot_step, ApiConfig};
use tracing::Level;

#[rstest]
#[case("debug", Level::DEBUG)]
#[case("WARN", Level::WARN)]
#[case(" error ", Level::ERROR)]
#[case("verbose", Level::INFO)]
fn test_parse_log_level(#[case] raw: &str, #[case] expected: Level) {
    assert_eq!(parse_log_level(raw), expected);
}

#[test]
fn test_parse_slot_step() {
    assert_eq!(parse_slot_step("15").unwrap(), 15);
    assert_eq!(parse_slot_step(" 60 ").unwrap(), 60);
    assert!(parse_slot_step("0").is_err());
    assert!(parse_slot_step("half-hour").is_err());
}

#[test]
fn test_defaults() {
    let config = ApiConfig::default();

    assert_eq!(config.server_addr(), "0.0.0.0:3000");
    assert_eq!(config.slot_step_minutes, 30);
    assert_eq!(config.session_ttl_hours, 720);
    assert_eq!(config.notify_webhook_url, None);
}
