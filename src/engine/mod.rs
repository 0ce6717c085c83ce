// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The concurrent simulation processing engine.
//!
//! A [`SimulationProcessor`] owns one run at a time: a pool of worker tasks
//! pulling samples through a single distribution lock, a control task that
//! collects results and detects completion, and a broadcast channel of
//! [`ProcessorEvent`]s for the presentation layer.

mod events;
mod processor;
mod progress;
mod result;
mod worker;


pub(crate) use events::WorkerEvent;
pub use events::{ProcessorEvent, ProgressReport};
pub use processor::{ProcessorOptions, SimulationProcessor};
pub use progress::{estimate_remaining_time, ProgressDebounce};
pub use result::SimulationResult;
