//! The tinylink HTTP gateway.
//!
//! Wires the allocation engine behind an axum router: an authenticated
//! management API under `/api`, the public redirect at `/{code}`, and a
//! health probe at `/healthz`.

pub mod app;
pub mod auth;
pub mod cli;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use state::AppState;
