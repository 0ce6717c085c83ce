// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors surfaced synchronously by `SimulationProcessor::start`.
//!
//! These are the only errors that unwind to the caller. Everything that goes
//! wrong while a sample is being processed is recorded in the sample's
//! `SimulationResult` instead (see [`SampleError`](super::SampleError)).

use thiserror::Error;

/// Configuration errors that reject a `start` call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessorError {
    /// A run is already active on this processor instance.
    #[error("Processing already active")]
    AlreadyActive,

    /// The domain initializer left the run in an inconsistent shape
    /// (sample or worker count unset, zero workers, more workers than samples).
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// The domain initializer rejected the supplied parameters.
    #[error("Failed to initialize processing: {0}")]
    Initialization(String),
}
