//! CSV spreadsheet collector for manually maintained balances.
//!
//! Row format: `account_name,currency_code,quantity`. Short rows and
//! unparsable quantities are skipped, zero quantities are ignored, and
//! duplicate rows for the same holding are summed downstream.

use async_trait::async_trait;
use log::{info, warn};
use std::path::PathBuf;

use networth_core::ingestion::{RawObservation, SourceCollector, SourceKind};
use networth_core::Result;

pub struct SpreadsheetCollector {
    path: PathBuf,
}

impl SpreadsheetCollector {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn parse<R: std::io::Read>(&self, reader: R) -> Result<Vec<RawObservation>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut observations = Vec::new();
        for record in csv_reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping malformed spreadsheet row: {e}");
                    continue;
                }
            };
            if record.len() < 3 {
                continue;
            }
            let account_name = record[0].to_string();
            let currency_code = record[1].to_uppercase();
            let Ok(quantity) = record[2].parse::<f64>() else {
                continue;
            };
            if quantity == 0.0 {
                continue;
            }
            observations.push(RawObservation::Spreadsheet {
                account_name,
                currency_code,
                quantity,
            });
        }
        Ok(observations)
    }
}

#[async_trait]
impl SourceCollector for SpreadsheetCollector {
    fn kind(&self) -> SourceKind {
        SourceKind::Spreadsheet
    }

    fn name(&self) -> &str {
        "spreadsheet"
    }

    async fn collect(&self) -> Result<Vec<RawObservation>> {
        let file = std::fs::File::open(&self.path)?;
        let observations = self.parse(file)?;
        info!(
            "Parsed {} balances from {}",
            observations.len(),
            self.path.display()
        );
        Ok(observations)
    }
}
