//! # Stayhub Database Crate
//!
//! This crate is the Store adapter: a high-level, application-specific
//! interface to the PostgreSQL database holding the marketplace's base
//! tables. It is the only crate that speaks SQL.
//!
//! ## Architectural Principles
//!
//! - **Adapter Layer:** Encapsulates all database-specific logic behind a
//!   clean API, hiding the underlying SQL from the managers and engines.
//! - **Mechanical CRUD Lives Here:** Plain insert/fetch-by-key/delete-by-key
//!   over the fixed schemas is the Store's job. The consistency rules that
//!   span rows (overlap, eligibility) belong to the manager crates, which
//!   drive them through `StoreTx`.
//! - **Asynchronous & Pooled:** All operations are asynchronous and share a
//!   connection pool (`PgPool`) for concurrent access.
//!
//! ## Public API
//!
//! - `connect` / `connect_with`: establish the database connection pool.
//! - `run_migrations`: apply the schema migrations (dev/test tooling; the
//!   engine itself never provisions schema).
//! - `Store`: the main struct holding the pool and providing entity CRUD
//!   plus the snapshot read queries the analytics crates consume.
//! - `StoreTx`: a single transaction, used by the managers to make their
//!   check-then-insert sequences indivisible.
//! - `StoreError`: the error type of this crate; translates into the
//!   engine-wide taxonomy without leaking SQLSTATEs.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, connect_with, run_migrations};
pub use error::StoreError;
pub use store::{Store, StoreTx};
