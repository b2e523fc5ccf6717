//! Failures surfaced by a lookup attempt and by client configuration.

use thiserror::Error;

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter an order ID";
pub const NOT_FOUND_MESSAGE: &str = "Order not found";

/// Terminal outcome of a failed lookup. `Display` is the text shown in the
/// error region.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Please enter an order ID")]
    Validation,
    #[error("Order not found")]
    NotFound,
    #[error("Server error: {status}")]
    Service { status: u16 },
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Decode(String),
}

impl LookupError {
    pub fn kind(&self) -> &'static str {
        match self {
            LookupError::Validation => "validation",
            LookupError::NotFound => "not_found",
            LookupError::Service { .. } => "service",
            LookupError::Transport(_) => "transport",
            LookupError::Decode(_) => "decode",
        }
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LookupError::Decode(err.to_string())
        } else {
            LookupError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid page origin '{origin}': {source}")]
    InvalidOrigin {
        origin: String,
        source: url::ParseError,
    },
    #[error("page origin '{0}' cannot carry a port")]
    OriginWithoutHost(String),
    #[error("invalid api base '{base}': {source}")]
    InvalidApiBase {
        base: String,
        source: url::ParseError,
    },
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
    #[error("failed to read settings file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse settings file '{path}': {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}
