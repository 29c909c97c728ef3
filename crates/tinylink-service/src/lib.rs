//! The tinylink allocation and resolution engine.
//!
//! [`LinkService`] orchestrates the URL normalizer, the code generator,
//! the durable store, and the cache to implement idempotent
//! create-or-get, public code resolution, and per-user ownership
//! management. The gateway consumes it behind the dyn-safe
//! [`Shortener`] trait.

pub mod error;
pub mod service;
pub mod shortener;
pub mod token;

pub use error::ServiceError;
pub use service::LinkService;
pub use shortener::{CreateOutcome, HealthReport, Shortener};
pub use token::TokenService;
