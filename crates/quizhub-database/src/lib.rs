//! # quizhub-database
//!
//! Store backends for QuizHub and the typed repositories the services use.
//!
//! Two [`Store`](quizhub_core::traits::Store) implementations are provided:
//! [`MemoryStore`] for tests and local development, and [`PgStore`], which
//! keeps every entity as a JSONB document in one PostgreSQL table.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod repositories;
pub mod table;
pub mod transaction;

pub use connection::connect_store;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use table::EntityTable;
pub use transaction::finish;
