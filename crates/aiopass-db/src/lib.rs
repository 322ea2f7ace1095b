//! AIOPass Database Layer
//!
//! This crate defines the credential/template store contract and its two
//! engines: SQLite via sqlx for persistence, and an in-memory store for
//! tests and throwaway runs.

pub mod error;
pub mod memory;
pub mod models;
pub mod repository;
pub mod store;

pub use error::DbError;
pub use memory::MemoryStore;
pub use models::*;
pub use repository::Database;
pub use store::Store;
