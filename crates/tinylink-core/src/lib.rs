//! Core types and traits for the tinylink URL shortener.
//!
//! This crate provides the domain vocabulary shared by the allocation
//! engine, the storage backends, and the cache backends: validated
//! identifiers, URL normalization, the code generator, and the
//! repository/cache contracts.

pub mod cache;
pub mod code;
pub mod error;
pub mod normalize;
pub mod repository;
pub mod user;

pub use cache::LinkCache;
pub use code::{CodeGenerator, RandomCodeGenerator, ShortCode};
pub use error::{CacheError, CoreError, StorageError};
pub use normalize::normalize_url;
pub use repository::{LinkStore, OwnedLink, Ownership, OwnershipStore, ShortLink};
pub use user::UserId;
