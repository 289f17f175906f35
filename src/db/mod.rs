//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and conversions
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: the `MarketStorage` handle, with per-entity queries in
//!   `category.rs`, `package.rs`, `inclusion.rs`, `user.rs` and `session.rs`

mod category;
mod inclusion;
pub mod models;
mod package;
pub mod schema;
mod session;
pub mod sqlite;
mod user;

pub use models::{DbSession, DbUser};
pub use schema::SQLITE_INIT;
pub use sqlite::{MarketStorage, SqlitePool};
