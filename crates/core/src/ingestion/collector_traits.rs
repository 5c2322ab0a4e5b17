//! Source collector boundary.

use async_trait::async_trait;

use super::observation_model::{RawObservation, SourceKind};
use crate::errors::Result;

/// An external data-fetching integration (exchange client, blockchain
/// RPC client, spreadsheet reader) outside the core pipeline.
///
/// A collector failure is recoverable per source: the run continues with
/// the remaining collectors and the failure is surfaced in the run
/// summary.
#[async_trait]
pub trait SourceCollector: Send + Sync {
    /// Which `--sources` bucket this collector belongs to.
    fn kind(&self) -> SourceKind;

    /// Human-readable label for logs and the run summary.
    fn name(&self) -> &str;

    /// Fetches the collector's raw balance observations. Order is
    /// irrelevant; duplicates for the same holding are merged downstream
    /// by summation.
    async fn collect(&self) -> Result<Vec<RawObservation>>;
}
