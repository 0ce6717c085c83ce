// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, validating or resolving configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for `Config`
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A configuration value is out of range or malformed
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Executable discovery found nothing usable
    #[error("Solver executable '{name}' not found (searched PATH and {searched} fallback directories)")]
    ExecutableNotFound { name: String, searched: usize },
}
