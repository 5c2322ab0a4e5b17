//! Thin source collectors shipped with the CLI.
//!
//! Each collector implements `networth_core::ingestion::SourceCollector`
//! and yields raw observations for the pipeline; everything after the
//! fetch (identity mapping, merging, valuation) lives in the core.

mod evm;
mod spreadsheet;

pub use evm::{EvmWalletCollector, WalletsConfig};
pub use spreadsheet::SpreadsheetCollector;
