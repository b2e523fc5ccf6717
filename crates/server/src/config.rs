use std::{collections::HashMap, fs, path::PathBuf};

pub const SETTINGS_FILE: &str = "order_server.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    /// JSON array of orders loaded into the store at startup.
    pub seed_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "0.0.0.0:8081".into(),
            seed_path: None,
        }
    }
}

pub fn load_settings() -> Settings {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    load_settings_with(file.as_deref(), |key| std::env::var(key).ok())
}

pub fn load_settings_with(file: Option<&str>, var: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match toml::from_str::<HashMap<String, String>>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("bind_addr") {
                    settings.server_bind = v.clone();
                }
                if let Some(v) = file_cfg.get("seed_path") {
                    settings.seed_path = Some(PathBuf::from(v));
                }
            }
            Err(error) => {
                tracing::warn!(%error, "ignoring unreadable {SETTINGS_FILE}");
            }
        }
    }

    if let Some(v) = var("ORDER_SERVER_BIND") {
        settings.server_bind = v;
    }

    if let Some(v) = var("ORDER_SERVER_SEED_PATH") {
        let v = v.trim();
        settings.seed_path = (!v.is_empty()).then(|| PathBuf::from(v));
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
