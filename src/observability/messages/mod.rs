// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable text and
//! [`StructuredLog`] to emit itself at the right level with structured fields.
//!
//! # Organization
//!
//! * `processor` - Run lifecycle, progress and cancellation events
//! * `worker` - Per-sample processing events and solver postmortems
//! * `runner` - External process spawn and termination events
//! * `config` - Configuration resolution events
//!
//! # Usage Pattern
//!
//! ```rust
//! use sim_dispatch::observability::messages::processor::RunStarted;
//! use sim_dispatch::observability::messages::StructuredLog;
//!
//! let msg = RunStarted {
//!     num_samples: 12,
//!     num_workers: 4,
//! };
//!
//! msg.log();
//! ```

use tracing::Span;

pub mod config;
pub mod processor;
pub mod runner;
pub mod worker;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a `tracing` event.
    fn log(&self);

    /// Build a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
