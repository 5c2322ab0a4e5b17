//! SQLite storage implementation for the net worth tracker.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in
//! `networth-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for all domain entities
//! - Database-specific model types (with Diesel derives)
//!
//! This crate is the only place in the application where Diesel
//! dependencies exist. All other crates are database-agnostic and work
//! with traits.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod accounts;
pub mod currencies;
pub mod net_worth;
pub mod rates;
pub mod snapshots;

// Re-export database utilities
pub use db::{create_pool, get_connection, init, run_migrations, DbConnection, DbPool};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from networth-core for convenience
pub use networth_core::errors::{DatabaseError, Error, Result};
