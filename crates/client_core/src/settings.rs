//! Lookup client settings: defaults, then `order_lookup.toml`, then environment.

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Deserialize;
use url::Url;

use crate::error::SettingsError;

pub const DEFAULT_PAGE_ORIGIN: &str = "http://localhost:8080";
pub const DEFAULT_SERVICE_PORT: u16 = 8081;
pub const SETTINGS_FILE: &str = "order_lookup.toml";

/// Which completion wins when lookups overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseOrdering {
    /// Only the most recently initiated lookup may update the state.
    #[default]
    LatestInitiated,
    /// Every completion is applied as it arrives.
    LastToResolve,
}

impl FromStr for ResponseOrdering {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest_initiated" | "latest-initiated" => Ok(Self::LatestInitiated),
            "last_to_resolve" | "last-to-resolve" => Ok(Self::LastToResolve),
            _ => Err(SettingsError::InvalidValue {
                key: "ordering",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupSettings {
    pub page_origin: String,
    pub service_port: u16,
    /// Takes precedence over `page_origin` + `service_port` when set.
    pub api_base: Option<String>,
    pub ordering: ResponseOrdering,
    /// Display timestamps in UTC instead of the local offset.
    pub utc: bool,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            page_origin: DEFAULT_PAGE_ORIGIN.into(),
            service_port: DEFAULT_SERVICE_PORT,
            api_base: None,
            ordering: ResponseOrdering::default(),
            utc: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    page_origin: Option<String>,
    service_port: Option<u16>,
    api_base: Option<String>,
    ordering: Option<ResponseOrdering>,
    utc: Option<bool>,
}

impl LookupSettings {
    pub fn api_base(&self) -> Result<Url, SettingsError> {
        match self.api_base.as_deref().map(str::trim) {
            Some(base) if !base.is_empty() => {
                Url::parse(base).map_err(|source| SettingsError::InvalidApiBase {
                    base: base.to_string(),
                    source,
                })
            }
            _ => derive_api_base(&self.page_origin, self.service_port),
        }
    }

    fn merge_file(&mut self, file: FileSettings) {
        if let Some(v) = file.page_origin {
            self.page_origin = v;
        }
        if let Some(v) = file.service_port {
            self.service_port = v;
        }
        if let Some(v) = file.api_base {
            self.api_base = Some(v);
        }
        if let Some(v) = file.ordering {
            self.ordering = v;
        }
        if let Some(v) = file.utc {
            self.utc = v;
        }
    }

    /// Applies `ORDER_LOOKUP_*` overrides read through `var`.
    pub fn apply_env_with(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), SettingsError> {
        if let Some(v) = var("ORDER_LOOKUP_PAGE_ORIGIN") {
            self.page_origin = v;
        }
        if let Some(v) = var("ORDER_LOOKUP_SERVICE_PORT") {
            self.service_port = v.trim().parse().map_err(|_| SettingsError::InvalidValue {
                key: "ORDER_LOOKUP_SERVICE_PORT",
                value: v.clone(),
            })?;
        }
        if let Some(v) = var("ORDER_LOOKUP_API_BASE") {
            self.api_base = Some(v);
        }
        if let Some(v) = var("ORDER_LOOKUP_ORDERING") {
            self.ordering = v.parse()?;
        }
        if let Some(v) = var("ORDER_LOOKUP_UTC") {
            self.utc = parse_flag(&v).ok_or(SettingsError::InvalidValue {
                key: "ORDER_LOOKUP_UTC",
                value: v.clone(),
            })?;
        }
        Ok(())
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Replaces the port of `page_origin` with `service_port`, inserting one when
/// the origin relies on its scheme default. Path, query and fragment are dropped.
pub fn derive_api_base(page_origin: &str, service_port: u16) -> Result<Url, SettingsError> {
    let mut url = Url::parse(page_origin.trim()).map_err(|source| SettingsError::InvalidOrigin {
        origin: page_origin.to_string(),
        source,
    })?;
    url.set_port(Some(service_port))
        .map_err(|()| SettingsError::OriginWithoutHost(page_origin.to_string()))?;
    url.set_path("");
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Loads settings from `path`, or from `order_lookup.toml` in the working
/// directory when it exists, then applies environment overrides.
pub fn load_settings(path: Option<&Path>) -> Result<LookupSettings, SettingsError> {
    let mut settings = LookupSettings::default();

    let file_path = match path {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default_path = PathBuf::from(SETTINGS_FILE);
            default_path.exists().then_some(default_path)
        }
    };

    if let Some(file_path) = file_path {
        let display = file_path.display().to_string();
        let raw = fs::read_to_string(&file_path).map_err(|source| SettingsError::Io {
            path: display.clone(),
            source,
        })?;
        let file: FileSettings = toml::from_str(&raw).map_err(|source| SettingsError::Parse {
            path: display,
            source,
        })?;
        settings.merge_file(file);
    }

    settings.apply_env_with(|key| std::env::var(key).ok())?;
    Ok(settings)
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
