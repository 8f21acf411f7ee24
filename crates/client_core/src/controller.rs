use std::time::Duration;

use shared::{
    domain::{Page, PAGE_SIZE},
    protocol::{SimulationRequest, SimulationResponse},
};
use tracing::{debug, info, warn};

use crate::{
    error::{Direction, QueryError},
    navigation::{ControlState, NavigationManager, NavigationState, Phase, QueryId},
    paging::{page_range, ResultRange},
    render::{render_response, DisplaySurface},
    transport::SimulatorTransport,
};

/// A query that has moved the controller into Loading and still awaits its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
    pub id: QueryId,
    pub page: Page,
    pub request: SimulationRequest,
}

/// Owns the page counter and drives one surface through Idle/Loading.
///
/// The `begin_*` / [`QueryController::complete_query`] pair is IO-free so a front end can run the
/// request wherever it likes; the async methods compose them with a [`SimulatorTransport`].
pub struct QueryController<S: DisplaySurface> {
    surface: S,
    page: Page,
    navigation: NavigationManager,
    next_query: u64,
    timeout: Option<Duration>,
}

impl<S: DisplaySurface> QueryController<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            page: Page::FIRST,
            navigation: NavigationManager::new(),
            next_query: 1,
            timeout: None,
        }
    }

    /// `None` waits for the service indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn range(&self) -> ResultRange {
        page_range(self.page)
    }

    pub fn phase(&self) -> Phase {
        self.navigation.phase()
    }

    pub fn navigation(&self) -> NavigationState {
        self.navigation.navigation()
    }

    pub fn pending_query(&self) -> Option<QueryId> {
        self.navigation.pending()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Idle -> Loading for the current page and parameters.
    pub fn begin_query(&mut self) -> Result<PendingQuery, QueryError> {
        let id = QueryId(self.next_query);
        let controls = self.navigation.begin(id)?;
        self.next_query += 1;
        self.surface.set_controls(&controls);

        let range = self.range();
        let params = self.surface.parameters();
        info!(
            query = id.0,
            page = self.page.get(),
            range_start = range.start,
            range_end = range.end,
            "dispatching simulation query"
        );
        Ok(PendingQuery {
            id,
            page: self.page,
            request: SimulationRequest::new(&params, range.start, range.end),
        })
    }

    pub fn begin_previous_page(&mut self) -> Result<PendingQuery, QueryError> {
        self.step_page(Direction::Previous)?;
        self.begin_query()
    }

    pub fn begin_next_page(&mut self) -> Result<PendingQuery, QueryError> {
        self.step_page(Direction::Next)?;
        self.begin_query()
    }

    /// Fresh form submission: back to page 1.
    pub fn begin_submit(&mut self) -> Result<PendingQuery, QueryError> {
        self.ensure_idle()?;
        self.set_page(Page::FIRST);
        self.begin_query()
    }

    /// First load: page 1, every control disabled until the query settles.
    pub fn begin_document_ready(&mut self) -> Result<PendingQuery, QueryError> {
        self.ensure_idle()?;
        self.set_page(Page::FIRST);
        self.surface.set_controls(&ControlState::initial());
        self.begin_query()
    }

    /// Loading -> Idle. Results for anything but the pending query are dropped.
    pub fn complete_query(
        &mut self,
        id: QueryId,
        outcome: Result<SimulationResponse, QueryError>,
    ) -> Result<(), QueryError> {
        if self.navigation.pending() != Some(id) {
            debug!(query = id.0, "ignoring result of a query that is no longer pending");
            return Ok(());
        }

        let outcome = outcome.and_then(|response| {
            render_response(&mut self.surface, &response)?;
            Ok(response)
        });

        match outcome {
            Ok(response) => {
                let total = response.total_combinations();
                if let Some(controls) =
                    self.navigation
                        .settle_success(id, self.page, PAGE_SIZE, total)
                {
                    self.surface.set_controls(&controls);
                }
                info!(
                    query = id.0,
                    page = self.page.get(),
                    rows = response.rows.len(),
                    terms = response.terms.len(),
                    total,
                    "simulation query settled"
                );
                Ok(())
            }
            Err(err) => {
                if let Some(controls) = self.navigation.settle_failure(id) {
                    self.surface.set_controls(&controls);
                }
                warn!(query = id.0, page = self.page.get(), "simulation query failed: {err}");
                Err(err)
            }
        }
    }

    /// Abandons the pending query; its result will be ignored if it still arrives.
    pub fn cancel_pending(&mut self) -> bool {
        let Some(id) = self.navigation.pending() else {
            return false;
        };
        let _ = self.complete_query(id, Err(QueryError::Cancelled));
        true
    }

    pub async fn run_query<T>(&mut self, transport: &T) -> Result<(), QueryError>
    where
        T: SimulatorTransport + ?Sized,
    {
        let pending = self.begin_query()?;
        self.execute(pending, transport).await
    }

    pub async fn go_to_previous_page<T>(&mut self, transport: &T) -> Result<(), QueryError>
    where
        T: SimulatorTransport + ?Sized,
    {
        let pending = self.begin_previous_page()?;
        self.execute(pending, transport).await
    }

    pub async fn go_to_next_page<T>(&mut self, transport: &T) -> Result<(), QueryError>
    where
        T: SimulatorTransport + ?Sized,
    {
        let pending = self.begin_next_page()?;
        self.execute(pending, transport).await
    }

    pub async fn on_submit<T>(&mut self, transport: &T) -> Result<(), QueryError>
    where
        T: SimulatorTransport + ?Sized,
    {
        let pending = self.begin_submit()?;
        self.execute(pending, transport).await
    }

    pub async fn on_document_ready<T>(&mut self, transport: &T) -> Result<(), QueryError>
    where
        T: SimulatorTransport + ?Sized,
    {
        let pending = self.begin_document_ready()?;
        self.execute(pending, transport).await
    }

    async fn execute<T>(&mut self, pending: PendingQuery, transport: &T) -> Result<(), QueryError>
    where
        T: SimulatorTransport + ?Sized,
    {
        let outcome = execute_request(transport, &pending.request, self.timeout).await;
        self.complete_query(pending.id, outcome)
    }

    fn ensure_idle(&self) -> Result<(), QueryError> {
        if self.navigation.is_loading() {
            return Err(QueryError::Busy);
        }
        Ok(())
    }

    fn step_page(&mut self, direction: Direction) -> Result<(), QueryError> {
        self.ensure_idle()?;
        let navigation = self.navigation.navigation();
        let target = match direction {
            Direction::Previous if navigation.prev_enabled => self.page.previous(),
            Direction::Next if navigation.next_enabled => Some(self.page.next()),
            _ => None,
        };
        let page = target.ok_or(QueryError::NavigationUnavailable { direction })?;
        self.set_page(page);
        Ok(())
    }

    fn set_page(&mut self, page: Page) {
        self.page = page;
        self.surface.set_page_label(page);
    }
}

/// Sends one request, applying the timeout policy when one is set.
pub async fn execute_request<T>(
    transport: &T,
    request: &SimulationRequest,
    timeout: Option<Duration>,
) -> Result<SimulationResponse, QueryError>
where
    T: SimulatorTransport + ?Sized,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, transport.simulate(request))
            .await
            .unwrap_or(Err(QueryError::Timeout(limit))),
        None => transport.simulate(request).await,
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
