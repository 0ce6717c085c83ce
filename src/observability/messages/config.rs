// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration resolution.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::path::Path;
use tracing::Span;

/// Solver executable resolved from configuration.
///
/// # Log Level
/// `info!` - Happens once per process
pub struct ExecutableResolved<'a> {
    pub executable: &'a Path,
    /// Taken from `runner.executable` rather than discovered.
    pub explicit: bool,
}

impl Display for ExecutableResolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let how = if self.explicit { "configured" } else { "discovered" };
        write!(f, "Using {} solver executable '{}'", how, self.executable.display())
    }
}

impl StructuredLog for ExecutableResolved<'_> {
    fn log(&self) {
        tracing::info!(
            executable = %self.executable.display(),
            explicit = self.explicit,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "config",
            span_name = name,
            executable = %self.executable.display(),
        )
    }
}
