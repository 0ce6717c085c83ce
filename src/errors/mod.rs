// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod processor;
mod sample;

pub use config::ConfigError;
pub use processor::ProcessorError;
pub use sample::{SampleError, SampleResult};
