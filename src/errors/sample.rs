// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while one sample is being processed.
//!
//! A `SampleError` never leaves the worker loop: the worker converts it into a
//! failed `SimulationResult` and moves on to the next sample.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SampleError {
    /// File system error while preparing the working directory or reading output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The solver executable could not be started.
    #[error("Failed to spawn '{}': {source}", executable.display())]
    Spawn {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The sample could not be encoded into a request document.
    #[error("Failed to encode simulation request: {0}")]
    Encode(#[from] serde_json::Error),

    /// The request builder rejected the sample.
    #[error("Invalid simulation request: {0}")]
    Request(String),

    /// The output table is not valid CSV.
    #[error("Malformed output table: {0}")]
    Csv(#[from] csv::Error),

    /// The output table lacks a column the result needs.
    #[error("Output table has no column '{0}'")]
    MissingColumn(String),

    /// A cell of the output table is not a number.
    #[error("Column '{column}' row {row}: '{value}' is not a number")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },
}

/// Result alias for sample processing steps.
pub type SampleResult<T> = Result<T, SampleError>;
