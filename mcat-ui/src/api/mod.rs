//! HTTP API handlers for mcat-ui

pub mod health;
pub mod songs;
pub mod stream;
pub mod ui;

pub use health::health_routes;
pub use songs::song_routes;
pub use ui::ui_routes;
