//! Error types for the data layer.
//!
//! `LoadError` is fatal to startup; `UnknownCategoryError` only fails the
//! single view that asked for the bad column.

use std::path::PathBuf;

use thiserror::Error;

use super::model::{DatasetKind, SchemaMismatch};

/// Errors that can occur while reading a dataset file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path}: missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("{path}: no category columns besides identifier, code and year")]
    NoCategories { path: PathBuf },

    /// `line` is the 1-based line in the file, header included.
    #[error("{path}, line {line}, column '{column}': '{value}' is not a number")]
    InvalidNumber {
        path: PathBuf,
        line: u64,
        column: String,
        value: String,
    },

    #[error("{path}: {source}")]
    Schema {
        path: PathBuf,
        #[source]
        source: SchemaMismatch,
    },

    #[error("{path}: expected the {expected} dataset, found {found}")]
    WrongDataset {
        path: PathBuf,
        expected: DatasetKind,
        found: DatasetKind,
    },
}

/// A requested category name is not part of the table schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category '{category}' in the {dataset} dataset")]
pub struct UnknownCategoryError {
    pub category: String,
    pub dataset: DatasetKind,
}
