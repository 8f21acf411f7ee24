//! UI layer: app shell and table widgets.

pub mod app;
pub mod tables;

pub use app::ViewerApp;
