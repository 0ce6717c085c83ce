// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // domain specializations
pub mod config;     // YAML config + runtime resolution
pub mod engine;     // processor, workers, progress
pub mod errors;     // error handling
pub mod observability;
pub mod runner;     // external solver invocation
pub mod traits;     // driver / handler / feed abstractions
