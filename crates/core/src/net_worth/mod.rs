//! Daily net worth summary.

mod net_worth_model;
mod net_worth_service;
mod net_worth_traits;

pub use net_worth_model::*;
pub use net_worth_service::*;
pub use net_worth_traits::*;
