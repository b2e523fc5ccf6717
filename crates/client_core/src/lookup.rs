//! Lookup state machine: query validation, the four UI states, and the
//! sequence guard deciding which completion may update them.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    error::LookupError,
    render::{OrderRenderer, RenderedOrder},
    settings::ResponseOrdering,
    OrderSource,
};

/// A trimmed, non-empty order identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderQuery(String);

impl OrderQuery {
    pub fn parse(raw: &str) -> Result<Self, LookupError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LookupError::Validation);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum LookupState {
    #[default]
    Idle,
    Loading,
    Error(String),
    Result(Box<RenderedOrder>),
}

impl LookupState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LookupState::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            LookupState::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&RenderedOrder> {
        match self {
            LookupState::Result(rendered) => Some(rendered.as_ref()),
            _ => None,
        }
    }
}

/// Identifies one initiated lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LookupTicket(u64);

impl LookupTicket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// A lookup that passed validation and still needs its request issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLookup {
    pub ticket: LookupTicket,
    pub query: OrderQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Discarded,
}

pub struct LookupController {
    state: LookupState,
    ordering: ResponseOrdering,
    renderer: OrderRenderer,
    last_issued: u64,
}

impl LookupController {
    pub fn new(ordering: ResponseOrdering, renderer: OrderRenderer) -> Self {
        Self {
            state: LookupState::Idle,
            ordering,
            renderer,
            last_issued: 0,
        }
    }

    pub fn state(&self) -> &LookupState {
        &self.state
    }

    pub fn ordering(&self) -> ResponseOrdering {
        self.ordering
    }

    fn next_ticket(&mut self) -> LookupTicket {
        self.last_issued += 1;
        LookupTicket(self.last_issued)
    }

    /// Validates `raw` and moves to `Loading`, or to `Error` when the trimmed
    /// input is empty. A rejected query still consumes a ticket so that older
    /// in-flight lookups cannot overwrite its error.
    pub fn begin(&mut self, raw: &str) -> Option<PendingLookup> {
        let ticket = self.next_ticket();
        match OrderQuery::parse(raw) {
            Ok(query) => {
                debug!(seq = ticket.seq(), order_id = %query, "lookup started");
                self.state = LookupState::Loading;
                Some(PendingLookup { ticket, query })
            }
            Err(err) => {
                info!(seq = ticket.seq(), "lookup rejected: empty query");
                self.state = LookupState::Error(err.to_string());
                None
            }
        }
    }

    pub fn is_current(&self, ticket: LookupTicket) -> bool {
        ticket.seq() == self.last_issued
    }

    /// Applies the outcome of `ticket` unless the ordering policy marks it stale.
    pub fn complete(
        &mut self,
        ticket: LookupTicket,
        outcome: Result<Value, LookupError>,
    ) -> Completion {
        if self.ordering == ResponseOrdering::LatestInitiated && !self.is_current(ticket) {
            warn!(
                seq = ticket.seq(),
                latest = self.last_issued,
                "discarding stale lookup response"
            );
            return Completion::Discarded;
        }

        self.state = match outcome.and_then(|record| self.renderer.render(record)) {
            Ok(rendered) => {
                debug!(seq = ticket.seq(), "lookup rendered");
                LookupState::Result(Box::new(rendered))
            }
            Err(err) => {
                info!(seq = ticket.seq(), kind = err.kind(), error = %err, "lookup failed");
                LookupState::Error(err.to_string())
            }
        };
        Completion::Applied
    }

    /// Runs one lookup to completion against `source`.
    pub async fn lookup<S>(&mut self, source: &S, raw: &str) -> &LookupState
    where
        S: OrderSource + ?Sized,
    {
        if let Some(pending) = self.begin(raw) {
            let outcome = source.fetch_order(&pending.query).await;
            self.complete(pending.ticket, outcome);
        }
        &self.state
    }
}

#[cfg(test)]
#[path = "tests/lookup_tests.rs"]
mod tests;
