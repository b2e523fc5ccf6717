use std::path::PathBuf;

use super::{load_settings_with, Settings};

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_listen_on_service_port() {
    let settings = load_settings_with(None, no_env);
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.server_bind, "0.0.0.0:8081");
    assert!(settings.seed_path.is_none());
}

#[test]
fn file_values_override_defaults() {
    let settings = load_settings_with(
        Some("bind_addr = \"127.0.0.1:9000\"\nseed_path = \"./orders.json\""),
        no_env,
    );
    assert_eq!(settings.server_bind, "127.0.0.1:9000");
    assert_eq!(settings.seed_path, Some(PathBuf::from("./orders.json")));
}

#[test]
fn env_values_override_file() {
    let settings = load_settings_with(Some("bind_addr = \"127.0.0.1:9000\""), |key| {
        match key {
            "ORDER_SERVER_BIND" => Some("127.0.0.1:7000".to_string()),
            "ORDER_SERVER_SEED_PATH" => Some("/srv/seed.json".to_string()),
            _ => None,
        }
    });
    assert_eq!(settings.server_bind, "127.0.0.1:7000");
    assert_eq!(settings.seed_path, Some(PathBuf::from("/srv/seed.json")));
}

#[test]
fn malformed_file_falls_back_to_defaults() {
    let settings = load_settings_with(Some("bind_addr = ["), no_env);
    assert_eq!(settings.server_bind, "0.0.0.0:8081");
}

#[test]
fn blank_seed_path_clears_seed() {
    let settings = load_settings_with(Some("seed_path = \"./orders.json\""), |key| {
        (key == "ORDER_SERVER_SEED_PATH").then(|| "  ".to_string())
    });
    assert!(settings.seed_path.is_none());
}
