//! Runtime bridge between UI command queue and backend event intake.

use std::{
    collections::HashMap,
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    thread,
    time::Duration,
};

use client_core::{execute_request, HttpTransport, QueryId};
use crossbeam_channel::{Receiver, Sender};
use tokio::task::{AbortHandle, JoinHandle};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Abort handles for requests still running, keyed by query.
#[derive(Clone, Default)]
struct InFlight {
    tasks: Arc<Mutex<HashMap<QueryId, AbortHandle>>>,
}

impl InFlight {
    fn tasks(&self) -> MutexGuard<'_, HashMap<QueryId, AbortHandle>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `work` on its own task; the entry is dropped once the task settles.
    fn spawn<F>(&self, query: QueryId, work: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        // Held across the spawn so the task cannot finish before it is registered.
        let mut tasks = self.tasks();
        let registry = self.clone();
        let handle = tokio::spawn(async move {
            work.await;
            registry.tasks().remove(&query);
        });
        tasks.insert(query, handle.abort_handle());
        handle
    }

    fn cancel(&self, query: QueryId) -> bool {
        match self.tasks().remove(&query) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.tasks().len()
    }
}

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    server_url: String,
    timeout: Option<Duration>,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let transport = match HttpTransport::new(&server_url) {
            Ok(transport) => Arc::new(transport),
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("invalid simulator url '{server_url}': {err}"),
                )));
                tracing::error!("invalid simulator url '{server_url}': {err}");
                return;
            }
        };
        let _ = ui_tx.try_send(UiEvent::Info(format!(
            "Backend worker ready ({})",
            transport.endpoint()
        )));

        let in_flight = InFlight::default();
        runtime.block_on(async move {
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Simulate { query, request } => {
                        let transport = Arc::clone(&transport);
                        let ui_tx = ui_tx.clone();
                        in_flight.spawn(query, async move {
                            let outcome =
                                execute_request(transport.as_ref(), &request, timeout).await;
                            if ui_tx
                                .send(UiEvent::SimulationSettled { query, outcome })
                                .is_err()
                            {
                                tracing::debug!(query = query.0, "ui closed before result arrived");
                            }
                        });
                    }
                    BackendCommand::Cancel { query } => {
                        let aborted = in_flight.cancel(query);
                        tracing::debug!(query = query.0, aborted, "cancel requested");
                    }
                }
            }
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancel_aborts_running_request() {
        let in_flight = InFlight::default();
        let handle = in_flight.spawn(QueryId(1), std::future::pending());
        assert_eq!(in_flight.len(), 1);

        assert!(in_flight.cancel(QueryId(1)));
        let err = handle.await.expect_err("aborted");
        assert!(err.is_cancelled());
        assert_eq!(in_flight.len(), 0);
        assert!(!in_flight.cancel(QueryId(1)));
    }

    #[tokio::test]
    async fn settled_requests_leave_the_registry() {
        let in_flight = InFlight::default();
        in_flight
            .spawn(QueryId(2), async {})
            .await
            .expect("settled");
        assert_eq!(in_flight.len(), 0);
        assert!(!in_flight.cancel(QueryId(2)));
    }
}
