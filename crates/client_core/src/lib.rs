//! Client-side controller for the simulation viewer: paging, query dispatch, and table rendering.

pub mod config;
pub mod controller;
pub mod error;
pub mod format;
pub mod navigation;
pub mod paging;
pub mod render;
pub mod transport;

pub use config::{load_settings, ViewerSettings};
pub use controller::{execute_request, PendingQuery, QueryController};
pub use error::{Direction, QueryError};
pub use navigation::{ControlState, NavigationState, Phase, QueryId};
pub use render::{Cell, CombinationSummary, DisplaySurface, RenderError, Table, ViewSurface};
pub use transport::{HttpTransport, SimulatorTransport};
