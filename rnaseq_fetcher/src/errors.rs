use std::path::PathBuf;

use polars::error::PolarsError;
use thiserror::Error;

use crate::models::Regulation;

/// Per-gene failures while turning a raw payload into a result table.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("no data was retrieved from the database for gene {gene}")]
    MissingData { gene: String },

    #[error("record for gene {gene} is incomplete: {found} cells after normalisation, expected {expected}")]
    Format {
        gene: String,
        found: usize,
        expected: usize,
    },

    #[error("{regulation}-regulated {slot} for gene {gene} has {found} elements, expected {expected}")]
    SchemaMismatch {
        gene: String,
        slot: String,
        regulation: Regulation,
        found: usize,
        expected: usize,
    },

    #[error("value {value:?} in column {column} for gene {gene} is not a number")]
    InvalidNumber {
        gene: String,
        column: String,
        value: String,
    },
}

/// Anything that stops one gene from completing. Never aborts the run.
#[derive(Debug, Error)]
pub enum GeneError {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("building the result frame failed: {0}")]
    Frame(#[from] PolarsError),

    #[error("writing results to {} failed: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
}

#[derive(Debug, Error)]
pub enum GeneListError {
    #[error("the full path for the gene list cannot be empty")]
    EmptyPath,

    #[error("the given path for the gene list {} cannot be found", .0.display())]
    NotFound(PathBuf),

    #[error("gene list cannot be read, please make sure the file is not corrupted: {0}")]
    Read(#[from] csv::Error),
}
