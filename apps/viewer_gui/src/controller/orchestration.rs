//! Command orchestration from UI actions to the backend command queue.

use client_core::{PendingQuery, QueryError, QueryId};
use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues the request for a pending query. On failure the caller must settle the query itself.
pub fn dispatch_simulation(
    cmd_tx: &Sender<BackendCommand>,
    pending: PendingQuery,
) -> Result<(), QueryError> {
    let query = pending.id;
    let cmd = BackendCommand::Simulate {
        query,
        request: pending.request,
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(query = query.0, page = pending.page.get(), "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => Err(QueryError::Transport(
            "UI command queue is full; please retry".to_string(),
        )),
        Err(TrySendError::Disconnected(_)) => Err(QueryError::Transport(
            "Backend command processor disconnected (possible startup/runtime failure)"
                .to_string(),
        )),
    }
}

/// Asks the backend to abort the request for `query`. Best effort: the UI has already settled it.
pub fn request_cancel(cmd_tx: &Sender<BackendCommand>, query: QueryId) {
    if let Err(err) = cmd_tx.try_send(BackendCommand::Cancel { query }) {
        tracing::warn!(query = query.0, "failed to queue cancel command: {err}");
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;
    use shared::{
        domain::{Page, SimulationParameters},
        protocol::SimulationRequest,
    };

    use super::*;

    fn pending(id: u64) -> PendingQuery {
        PendingQuery {
            id: QueryId(id),
            page: Page::FIRST,
            request: SimulationRequest::new(&SimulationParameters::default(), 0, 2000),
        }
    }

    #[test]
    fn queues_request_for_backend() {
        let (tx, rx) = bounded(1);
        dispatch_simulation(&tx, pending(3)).expect("queued");
        let Ok(BackendCommand::Simulate { query, request }) = rx.try_recv() else {
            panic!("expected a simulate command");
        };
        assert_eq!(query, QueryId(3));
        assert_eq!(request.data.range_end, 2000);
    }

    #[test]
    fn cancel_is_forwarded_to_backend() {
        let (tx, rx) = bounded(1);
        request_cancel(&tx, QueryId(4));
        let Ok(BackendCommand::Cancel { query }) = rx.try_recv() else {
            panic!("expected a cancel command");
        };
        assert_eq!(query, QueryId(4));
    }

    #[test]
    fn full_queue_is_reported() {
        let (tx, _rx) = bounded(1);
        dispatch_simulation(&tx, pending(1)).expect("queued");
        let err = dispatch_simulation(&tx, pending(2)).expect_err("full");
        assert!(err.to_string().contains("queue is full"));
    }

    #[test]
    fn disconnected_backend_is_reported() {
        let (tx, rx) = bounded(1);
        drop(rx);
        let err = dispatch_simulation(&tx, pending(1)).expect_err("disconnected");
        assert!(matches!(err, QueryError::Transport(_)));
    }
}
