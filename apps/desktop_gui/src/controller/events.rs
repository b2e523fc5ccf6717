//! Events posted from the backend worker to the UI thread.

use client_core::{LookupError, LookupTicket};
use serde_json::Value;

pub enum UiEvent {
    Info(String),
    LookupFinished {
        ticket: LookupTicket,
        outcome: Result<Value, LookupError>,
    },
    BackendFailed(String),
}
