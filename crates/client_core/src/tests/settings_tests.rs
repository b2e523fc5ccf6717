use std::{collections::HashMap, io::Write};

use super::*;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn replaces_explicit_page_port_with_service_port() {
    let base = derive_api_base("http://shop.local:8080", 8081).expect("base");
    assert_eq!(base.as_str(), "http://shop.local:8081/");
}

#[test]
fn inserts_service_port_when_origin_uses_scheme_default() {
    let base = derive_api_base("https://shop.local", 8081).expect("base");
    assert_eq!(base.as_str(), "https://shop.local:8081/");
}

#[test]
fn drops_path_and_query_from_origin() {
    let base = derive_api_base("http://127.0.0.1:3000/index.html?x=1#top", 8081).expect("base");
    assert_eq!(base.as_str(), "http://127.0.0.1:8081/");
}

#[test]
fn rejects_unparseable_origin() {
    let err = derive_api_base("not a url", 8081).expect_err("must fail");
    assert!(matches!(err, SettingsError::InvalidOrigin { .. }));
}

#[test]
fn explicit_api_base_wins_over_origin() {
    let settings = LookupSettings {
        api_base: Some("http://orders.internal:9000".into()),
        ..LookupSettings::default()
    };
    assert_eq!(
        settings.api_base().expect("base").as_str(),
        "http://orders.internal:9000/"
    );
}

#[test]
fn defaults_point_at_local_service_port() {
    let settings = LookupSettings::default();
    assert_eq!(settings.ordering, ResponseOrdering::LatestInitiated);
    assert_eq!(
        settings.api_base().expect("base").as_str(),
        "http://localhost:8081/"
    );
}

#[test]
fn env_overrides_apply_on_top_of_defaults() {
    let mut settings = LookupSettings::default();
    settings
        .apply_env_with(env_from(&[
            ("ORDER_LOOKUP_PAGE_ORIGIN", "http://example.test:80"),
            ("ORDER_LOOKUP_SERVICE_PORT", "9091"),
            ("ORDER_LOOKUP_ORDERING", "last_to_resolve"),
            ("ORDER_LOOKUP_UTC", "yes"),
        ]))
        .expect("env");
    assert_eq!(settings.page_origin, "http://example.test:80");
    assert_eq!(settings.service_port, 9091);
    assert_eq!(settings.ordering, ResponseOrdering::LastToResolve);
    assert!(settings.utc);
}

#[test]
fn invalid_env_port_is_reported() {
    let mut settings = LookupSettings::default();
    let err = settings
        .apply_env_with(env_from(&[("ORDER_LOOKUP_SERVICE_PORT", "eighty")]))
        .expect_err("must fail");
    assert!(matches!(
        err,
        SettingsError::InvalidValue {
            key: "ORDER_LOOKUP_SERVICE_PORT",
            ..
        }
    ));
}

#[test]
fn settings_file_overrides_defaults() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        "page_origin = \"http://file.test:5000\"\nservice_port = 7000\nordering = \"last_to_resolve\""
    )
    .expect("write");

    let settings = load_settings(Some(file.path())).expect("settings");
    assert_eq!(settings.page_origin, "http://file.test:5000");
    assert_eq!(settings.service_port, 7000);
    assert_eq!(settings.ordering, ResponseOrdering::LastToResolve);
}

#[test]
fn missing_explicit_settings_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = load_settings(Some(&dir.path().join("absent.toml"))).expect_err("must fail");
    assert!(matches!(err, SettingsError::Io { .. }));
}

#[test]
fn ordering_parses_both_spellings() {
    assert_eq!(
        "latest-initiated".parse::<ResponseOrdering>().expect("ordering"),
        ResponseOrdering::LatestInitiated
    );
    assert_eq!(
        "LAST_TO_RESOLVE".parse::<ResponseOrdering>().expect("ordering"),
        ResponseOrdering::LastToResolve
    );
    assert!("fastest".parse::<ResponseOrdering>().is_err());
}
