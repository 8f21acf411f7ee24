//! Idle/Loading state machine deciding which controls the viewer exposes.

use shared::domain::Page;

use crate::error::QueryError;

pub const SUBMIT_LABEL_IDLE: &str = "Simulate";
pub const SUBMIT_LABEL_LOADING: &str = "Simulating ...";

/// Identifies one dispatched query so late results can be told apart from the pending one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading(QueryId),
}

/// Prev/next availability, derived from the last successful response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationState {
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl NavigationState {
    pub const DISABLED: NavigationState = NavigationState {
        prev_enabled: false,
        next_enabled: false,
    };

    pub fn derive(page: Page, page_size: u64, total_combinations: u64) -> Self {
        Self {
            prev_enabled: !page.is_first(),
            next_enabled: page_size.saturating_mul(page.get()) < total_combinations,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
}

impl ControlState {
    /// Before the first query settles.
    pub fn initial() -> Self {
        Self {
            prev_enabled: false,
            next_enabled: false,
            submit_enabled: false,
            submit_label: SUBMIT_LABEL_IDLE,
        }
    }

    pub fn loading() -> Self {
        Self {
            submit_label: SUBMIT_LABEL_LOADING,
            ..Self::initial()
        }
    }

    pub fn idle(navigation: NavigationState) -> Self {
        Self {
            prev_enabled: navigation.prev_enabled,
            next_enabled: navigation.next_enabled,
            submit_enabled: true,
            submit_label: SUBMIT_LABEL_IDLE,
        }
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::initial()
    }
}

#[derive(Debug, Clone)]
pub struct NavigationManager {
    phase: Phase,
    navigation: NavigationState,
}

impl NavigationManager {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            navigation: NavigationState::DISABLED,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading(_))
    }

    pub fn pending(&self) -> Option<QueryId> {
        match self.phase {
            Phase::Loading(id) => Some(id),
            Phase::Idle => None,
        }
    }

    /// Navigation as currently exposed; always disabled while loading.
    pub fn navigation(&self) -> NavigationState {
        match self.phase {
            Phase::Idle => self.navigation,
            Phase::Loading(_) => NavigationState::DISABLED,
        }
    }

    /// Idle -> Loading. The only way into Loading.
    pub fn begin(&mut self, query: QueryId) -> Result<ControlState, QueryError> {
        if self.is_loading() {
            return Err(QueryError::Busy);
        }
        self.phase = Phase::Loading(query);
        self.navigation = NavigationState::DISABLED;
        Ok(ControlState::loading())
    }

    /// Loading -> Idle after a rendered response. `None` when `query` is not the pending one.
    pub fn settle_success(
        &mut self,
        query: QueryId,
        page: Page,
        page_size: u64,
        total_combinations: u64,
    ) -> Option<ControlState> {
        if self.pending() != Some(query) {
            return None;
        }
        self.phase = Phase::Idle;
        self.navigation = NavigationState::derive(page, page_size, total_combinations);
        Some(ControlState::idle(self.navigation))
    }

    /// Loading -> Idle after a failure. Prev/next stay disabled.
    pub fn settle_failure(&mut self, query: QueryId) -> Option<ControlState> {
        if self.pending() != Some(query) {
            return None;
        }
        self.phase = Phase::Idle;
        self.navigation = NavigationState::DISABLED;
        Some(ControlState::idle(self.navigation))
    }
}

impl Default for NavigationManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: u64) -> Page {
        Page::new(number).expect("page")
    }

    #[test]
    fn first_page_with_more_rows_enables_next_only() {
        let state = NavigationState::derive(page(1), 2000, 5000);
        assert!(!state.prev_enabled);
        assert!(state.next_enabled);
    }

    #[test]
    fn last_page_enables_prev_only() {
        let state = NavigationState::derive(page(3), 2000, 5000);
        assert!(state.prev_enabled);
        assert!(!state.next_enabled);
    }

    #[test]
    fn exact_multiple_has_no_next_page() {
        let state = NavigationState::derive(page(2), 2000, 4000);
        assert!(!state.next_enabled);
    }

    #[test]
    fn second_begin_is_rejected_while_loading() {
        let mut manager = NavigationManager::new();
        assert_eq!(
            manager.begin(QueryId(1)).expect("begin"),
            ControlState::loading()
        );
        assert_eq!(manager.begin(QueryId(2)), Err(QueryError::Busy));
        assert_eq!(manager.pending(), Some(QueryId(1)));
    }

    #[test]
    fn success_derives_controls_from_totals() {
        let mut manager = NavigationManager::new();
        manager.begin(QueryId(1)).expect("begin");
        let controls = manager
            .settle_success(QueryId(1), page(2), 2000, 5000)
            .expect("settle");
        assert!(controls.prev_enabled && controls.next_enabled && controls.submit_enabled);
        assert_eq!(controls.submit_label, SUBMIT_LABEL_IDLE);
        assert_eq!(manager.phase(), Phase::Idle);
    }

    #[test]
    fn failure_reenables_submit_only() {
        let mut manager = NavigationManager::new();
        manager.begin(QueryId(1)).expect("begin");
        manager
            .settle_success(QueryId(1), page(2), 2000, 5000)
            .expect("settle");
        manager.begin(QueryId(2)).expect("begin");
        let controls = manager.settle_failure(QueryId(2)).expect("settle");
        assert!(controls.submit_enabled);
        assert!(!controls.prev_enabled && !controls.next_enabled);
    }

    #[test]
    fn stale_settlement_is_ignored() {
        let mut manager = NavigationManager::new();
        manager.begin(QueryId(4)).expect("begin");
        assert!(manager.settle_failure(QueryId(3)).is_none());
        assert!(manager
            .settle_success(QueryId(3), Page::FIRST, 2000, 1)
            .is_none());
        assert!(manager.is_loading());
    }
}
