//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use client_core::{LookupError, LookupTicket, OrderClient, OrderSource};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use serde_json::Value;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

/// Starts the worker thread. Each fetch runs as its own task, so lookups
/// issued in quick succession overlap and may complete in any order.
pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, client: OrderClient) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::BackendFailed(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info(format!(
                "Order service: {}",
                client.api_base()
            )));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::FetchOrder { ticket, query } => {
                        let client = client.clone();
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let outcome = client.fetch_order(&query).await;
                            post_lookup_result(ui_tx, ticket, outcome);
                        });
                    }
                }
            }
            tracing::debug!("backend command queue closed");
        });
    });
}

/// Hands a finished lookup to the UI. When the queue is full the send moves
/// to the blocking pool, so runtime workers never wait on the UI thread.
/// Must be called from within a tokio runtime.
fn post_lookup_result(
    ui_tx: Sender<UiEvent>,
    ticket: LookupTicket,
    outcome: Result<Value, LookupError>,
) {
    match ui_tx.try_send(UiEvent::LookupFinished { ticket, outcome }) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            tracing::warn!(seq = ticket.seq(), "ui event queue full; deferring lookup result");
            tokio::task::spawn_blocking(move || {
                if ui_tx.send(event).is_err() {
                    tracing::debug!(seq = ticket.seq(), "ui closed before lookup finished");
                }
            });
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::debug!(seq = ticket.seq(), "ui closed before lookup finished");
        }
    }
}
