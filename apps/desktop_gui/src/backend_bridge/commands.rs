//! Backend commands queued from UI to backend worker.

use client_core::{LookupTicket, OrderQuery};

pub enum BackendCommand {
    FetchOrder {
        ticket: LookupTicket,
        query: OrderQuery,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::FetchOrder { .. } => "fetch_order",
        }
    }
}
