//! Durable storage backends for tinylink.
//!
//! Both backends implement the [`LinkStore`] and [`OwnershipStore`]
//! contracts from `tinylink-core`: an in-memory DashMap repository for
//! tests and single-process deployments, and a MySQL repository backed
//! by sqlx for production.
//!
//! [`LinkStore`]: tinylink_core::LinkStore
//! [`OwnershipStore`]: tinylink_core::OwnershipStore

pub mod memory;
pub mod mysql;

pub use memory::InMemoryRepository;
pub use mysql::MySqlRepository;
