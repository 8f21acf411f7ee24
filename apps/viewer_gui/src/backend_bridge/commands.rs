//! Backend commands queued from UI to backend worker.

use client_core::QueryId;
use shared::protocol::SimulationRequest;

pub enum BackendCommand {
    Simulate {
        query: QueryId,
        request: SimulationRequest,
    },
    /// Aborts the request for `query` if it is still running.
    Cancel { query: QueryId },
}
