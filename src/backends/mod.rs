// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Domain specializations of the processing engine.
//!
//! Each backend supplies a [`SimulationDriver`](crate::traits::SimulationDriver)
//! (run shape and sample source) and a
//! [`SampleHandler`](crate::traits::SampleHandler) (request encoding and
//! output parsing) to the generic [`SimulationProcessor`](crate::engine::SimulationProcessor).
//!
//! # Available Backends
//!
//! ## Batch
//! A fixed list of prepared samples processed by any handler:
//! - **Samples**: handed out in order, one per pull
//! - **Workers**: the requested count, capped at the number of samples
//!
//! ## Ampacity
//! Step-response case for one conductor: a single sample whose input series
//! switches from initial to changed weather and line load at time zero.
//!
//! ## Stub Backend (Test-Only)
//! - **StubDriver / StubHandler**: request text supplied by the sample, one
//!   output column read back
//! - **Note**: NOT available in production builds

pub mod ampacity;
pub mod batch;
#[cfg(test)]
pub mod stub;

pub use batch::{BatchDriver, BatchParams};
