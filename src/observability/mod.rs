// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! All diagnostic and operational text lives in [`messages`] as small structs
//! with a `Display` implementation, so call sites carry no magic strings and
//! every event gets the same structured fields.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::processor` - Run lifecycle, progress and cancellation events
//! * `messages::worker` - Per-sample events and solver postmortems
//! * `messages::runner` - External process events
//! * `messages::config` - Configuration resolution events
//!
//! # Usage
//!
//! ```rust
//! use sim_dispatch::observability::messages::worker::SampleFailed;
//! use sim_dispatch::observability::messages::StructuredLog;
//!
//! SampleFailed {
//!     worker_index: 0,
//!     error: "simulation process was terminated",
//! }
//! .log();
//! ```

pub mod messages;
