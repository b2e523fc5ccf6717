//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues `cmd`, recording the reason in `status` when it cannot be queued.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Backend command processor disconnected; restart the application"
                .to_string();
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use client_core::{LookupController, OrderRenderer, ResponseOrdering};
    use crossbeam_channel::bounded;

    use super::*;

    fn fetch_command() -> BackendCommand {
        let mut controller =
            LookupController::new(ResponseOrdering::LatestInitiated, OrderRenderer::utc());
        let pending = controller.begin("12345").expect("pending");
        BackendCommand::FetchOrder {
            ticket: pending.ticket,
            query: pending.query,
        }
    }

    #[test]
    fn queues_command_when_room_is_available() {
        let (tx, rx) = bounded(1);
        let mut status = String::new();
        assert!(dispatch_backend_command(&tx, fetch_command(), &mut status));
        assert!(status.is_empty());
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn reports_full_queue() {
        let (tx, _rx) = bounded(1);
        let mut status = String::new();
        assert!(dispatch_backend_command(&tx, fetch_command(), &mut status));
        assert!(!dispatch_backend_command(&tx, fetch_command(), &mut status));
        assert_eq!(status, "UI command queue is full; please retry");
    }

    #[test]
    fn reports_disconnected_backend() {
        let (tx, rx) = bounded(1);
        drop(rx);
        let mut status = String::new();
        assert!(!dispatch_backend_command(&tx, fetch_command(), &mut status));
        assert!(status.starts_with("Backend command processor disconnected"));
    }
}
