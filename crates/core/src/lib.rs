//! Networth Core - Domain entities, services, and traits.
//!
//! This crate contains the balance ingestion pipeline and the domain
//! types it operates on. It is database-agnostic and defines traits
//! that are implemented by the `storage-sqlite` crate.

pub mod accounts;
pub mod constants;
pub mod currencies;
pub mod errors;
pub mod ingestion;
pub mod net_worth;
pub mod rates;
pub mod snapshots;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
