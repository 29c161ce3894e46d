//! # todohub-database
//!
//! PostgreSQL connection management and concrete repository implementations
//! for the TodoHub credential and session subsystem.
//!
//! Mutating operations that must commit together expose `*_tx` variants
//! taking `&mut PgConnection`, so callers decide the transaction scope and
//! get all-or-nothing semantics from a single `BEGIN`/`COMMIT`.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
