//! Account registry: owned holding locations (banks, exchanges, wallets,
//! cash, liabilities).

mod accounts_model;
mod accounts_traits;

pub use accounts_model::*;
pub use accounts_traits::*;
