//! UI Layer
//!
//! egui/eframe window: sidebar navigation, four views, and the per-frame
//! glue that drives the camera, worker jobs, and file lifecycle.

pub mod app;
pub mod state;
pub mod theme;
pub mod views;
pub mod widgets;

pub use app::{run_app, DocScanApp};
pub use state::{UiState, View};
