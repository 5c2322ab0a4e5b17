//! End-of-run reporting.

use chrono::NaiveDateTime;
use std::collections::BTreeMap;

use super::normalizer::UnmappedRecord;
use super::observation_model::{SourceKind, SourceSelection};

/// One source collector that failed during the run.
#[derive(Debug, Clone)]
pub struct SourceFailure {
    pub kind: SourceKind,
    pub name: String,
    pub message: String,
}

/// A balance that had no rate and was excluded from the snapshot.
#[derive(Debug, Clone)]
pub struct UnvaluableRecord {
    pub account_id: String,
    pub currency_code: String,
    pub quantity: f64,
}

/// Structured end-of-run summary, so an operator can diagnose partial
/// failures from logs alone without re-deriving state from the database.
#[derive(Debug)]
pub struct RunSummary {
    pub selection: SourceSelection,
    pub timestamp: NaiveDateTime,
    /// Raw observations fetched across all collectors.
    pub collected: usize,
    /// Distinct (account, currency) records after the merge.
    pub normalized: usize,
    /// Zero rows synthesized for disappeared holdings.
    pub zeroed: usize,
    /// Rows committed in the snapshot.
    pub inserted: usize,
    pub unmapped: Vec<UnmappedRecord>,
    pub unvaluable: Vec<UnvaluableRecord>,
    pub source_failures: Vec<SourceFailure>,
}

impl RunSummary {
    pub fn new(selection: SourceSelection, timestamp: NaiveDateTime) -> Self {
        Self {
            selection,
            timestamp,
            collected: 0,
            normalized: 0,
            zeroed: 0,
            inserted: 0,
            unmapped: Vec::new(),
            unvaluable: Vec::new(),
            source_failures: Vec::new(),
        }
    }

    /// True when nothing was fetched and nothing written.
    pub fn is_noop(&self) -> bool {
        self.collected == 0 && self.inserted == 0
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Ingestion run ({} sources) at {}", self.selection, self.timestamp)?;
        writeln!(
            f,
            "  collected={} normalized={} zeroed={} inserted={}",
            self.collected, self.normalized, self.zeroed, self.inserted
        )?;

        if !self.source_failures.is_empty() {
            writeln!(f, "  failed sources:")?;
            for failure in &self.source_failures {
                writeln!(
                    f,
                    "    - {} ({}): {}",
                    failure.name, failure.kind, failure.message
                )?;
            }
        }

        if !self.unmapped.is_empty() {
            // Group by cause so repeated offenders read as one line each.
            let mut by_reason: BTreeMap<String, Vec<&UnmappedRecord>> = BTreeMap::new();
            for record in &self.unmapped {
                by_reason
                    .entry(record.reason.to_string())
                    .or_default()
                    .push(record);
            }
            writeln!(f, "  unmapped records:")?;
            for (reason, records) in by_reason {
                writeln!(f, "    {} ({}):", reason, records.len())?;
                for record in records {
                    writeln!(f, "      - {} (qty {})", record.detail, record.quantity)?;
                }
            }
        }

        if !self.unvaluable.is_empty() {
            writeln!(f, "  unvaluable (no rate, excluded from snapshot):")?;
            for record in &self.unvaluable {
                writeln!(
                    f,
                    "    - {} in account {} (qty {})",
                    record.currency_code, record.account_id, record.quantity
                )?;
            }
        }

        Ok(())
    }
}
