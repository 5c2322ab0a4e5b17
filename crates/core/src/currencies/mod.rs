//! Canonical currency registry and identity resolution.
//!
//! A canonical currency is the single internal identity for a holdable
//! unit of value; source-specific symbols and contract addresses map
//! many-to-one onto it through identity mappings.

mod currencies_model;
mod currencies_traits;
mod resolver_service;

pub use currencies_model::*;
pub use currencies_traits::*;
pub use resolver_service::*;
