//! Rate table: current USD price per unit for each canonical currency,
//! with provenance and staleness metadata.

mod propagator;
mod rates_model;
mod rates_traits;
mod refresh_service;

pub use propagator::*;
pub use rates_model::*;
pub use rates_traits::*;
pub use refresh_service::*;
