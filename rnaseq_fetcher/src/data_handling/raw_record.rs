// src/data_handling/raw_record.rs

use tracing::warn;

use crate::errors::RecordError;
use crate::models::{FieldSlot, Regulation, RECORD_FIELDS};

/// Row markers in the payload, rewritten to plain cell delimiters.
const ROW_MARKERS: [(&str, &str); 3] = [("\nup", ",up"), ("\ndown", ",down"), ("\n", "")];

/// One gene's payload flattened to exactly [`RECORD_FIELDS`] cells.
#[derive(Debug, Clone)]
pub struct RawRecord {
    gene: String,
    fields: Vec<String>,
}

/// Collapse the three table rows into a single comma-delimited line.
pub fn normalize_payload(content: &str) -> String {
    ROW_MARKERS
        .iter()
        .fold(content.to_string(), |acc, (from, to)| acc.replace(from, to))
}

impl RawRecord {
    /// Normalize and split a fetched payload. `None` means nothing was fetched.
    pub fn from_payload(gene: &str, content: Option<&str>) -> Result<Self, RecordError> {
        let Some(content) = content else {
            warn!("Results formatting for gene {} is skipped since no data was retrieved from db", gene);
            return Err(RecordError::MissingData {
                gene: gene.to_string(),
            });
        };

        let fields: Vec<String> = normalize_payload(content)
            .split(',')
            .map(str::to_string)
            .collect();

        if fields.len() != RECORD_FIELDS {
            warn!(
                "Results formatting for gene {} is skipped since data retrieved is incomplete and has {} cells",
                gene,
                fields.len()
            );
            return Err(RecordError::Format {
                gene: gene.to_string(),
                found: fields.len(),
                expected: RECORD_FIELDS,
            });
        }

        Ok(Self {
            gene: gene.to_string(),
            fields,
        })
    }

    pub fn gene(&self) -> &str {
        &self.gene
    }

    /// Raw cell of `slot` in the row for `regulation`.
    pub fn field(&self, slot: FieldSlot, regulation: Regulation) -> &str {
        &self.fields[slot.position(regulation)]
    }
}
