//! The balance ingestion pipeline.
//!
//! Source collectors feed raw observations into the normalizer, which
//! maps them onto canonical currencies and merges duplicates; the
//! valuation engine prices the result against the rate table; the
//! reconciler synthesizes zero rows for holdings that disappeared; and
//! the snapshot writer commits the final set atomically.

mod collector_traits;
mod ingestion_service;
mod normalizer;
mod observation_model;
mod reconciler;
mod run_summary;
mod valuation;
mod writer;

pub use collector_traits::*;
pub use ingestion_service::*;
pub use normalizer::*;
pub use observation_model::*;
pub use reconciler::*;
pub use run_summary::*;
pub use valuation::*;
pub use writer::*;

#[cfg(test)]
mod ingestion_service_tests;
#[cfg(test)]
mod normalizer_tests;
