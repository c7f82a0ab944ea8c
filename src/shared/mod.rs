//! Shared state and messaging between the UI thread and worker threads

pub mod messages;
pub mod state;

pub use messages::WorkerEvent;
pub use state::{CameraCommand, RuntimeState, SharedAppState};
