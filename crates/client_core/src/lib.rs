use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use shared::protocol::order_path;
use tracing::{debug, warn};
use url::Url;

pub mod error;
pub mod lookup;
pub mod render;
pub mod settings;

pub use error::{LookupError, SettingsError};
pub use lookup::{
    Completion, LookupController, LookupState, LookupTicket, OrderQuery, PendingLookup,
};
pub use render::{DisplayZone, OrderRenderer, OrderView, RenderedOrder, ViewField, ViewSection};
pub use settings::{derive_api_base, load_settings, LookupSettings, ResponseOrdering};

/// Anything that can resolve an order query to a record.
#[async_trait]
pub trait OrderSource: Send + Sync {
    async fn fetch_order(&self, query: &OrderQuery) -> Result<Value, LookupError>;
}

/// HTTP client for the order-lookup service.
#[derive(Debug, Clone)]
pub struct OrderClient {
    http: Client,
    api_base: Url,
}

impl OrderClient {
    pub fn new(api_base: Url) -> Self {
        Self {
            http: Client::new(),
            api_base,
        }
    }

    pub fn from_settings(settings: &LookupSettings) -> Result<Self, SettingsError> {
        Ok(Self::new(settings.api_base()?))
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// `{api-base}/order/{id}` with the identifier inserted as typed.
    pub fn order_url(&self, query: &OrderQuery) -> String {
        format!(
            "{}{}",
            self.api_base.as_str().trim_end_matches('/'),
            order_path(query.as_str())
        )
    }
}

#[async_trait]
impl OrderSource for OrderClient {
    async fn fetch_order(&self, query: &OrderQuery) -> Result<Value, LookupError> {
        let url = self.order_url(query);
        debug!(%url, "requesting order");

        let response = self.http.get(&url).send().await.map_err(|err| {
            warn!(%url, error = %err, "order request failed");
            LookupError::Transport(err.to_string())
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound);
        }
        if !status.is_success() {
            return Err(LookupError::Service {
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(LookupError::from)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
