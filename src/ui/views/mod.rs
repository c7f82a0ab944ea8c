//! Individual views of the window

pub mod capture;
pub mod home;
pub mod review;
pub mod settings;

pub use capture::render_capture_view;
pub use home::render_home_view;
pub use review::render_review_view;
pub use settings::render_settings_view;
