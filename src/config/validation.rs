//! Configuration validation.
//!
//! Checks every field that would otherwise fail late, inside a worker, once
//! per sample. Problems are accumulated so a user sees all of them at once.
//!
//! # Rules
//!
//! - `processor.progress_interval_ms` and `processor.eta_window` are positive
//! - `processor.max_workers`, when set, is at least 1
//! - `runner.request_file`, `runner.output_dir` and `runner.output_file` are
//!   single relative path components (the solver runs inside the workspace
//!   and receives the request by bare file name)
//! - `runner.temp_prefix` contains no path separator
//! - `runner.executable_name` is non-empty when no explicit executable is set
//!
//! # Example
//! ```rust
//! use sim_dispatch::config::{validate_config, Config};
//!
//! let mut config = Config::default();
//! assert!(validate_config(&config).is_ok());
//!
//! config.processor.eta_window = 0;
//! let problems = validate_config(&config).unwrap_err();
//! assert_eq!(problems.len(), 1);
//! ```

use std::path::{Component, Path};

use crate::config::Config;

/// Validate a loaded configuration.
///
/// # Returns
///
/// * `Ok(())` - Configuration is usable
/// * `Err(Vec<String>)` - One message per problem found
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let processor = &config.processor;
    if processor.progress_interval_ms == 0 {
        errors.push("processor.progress_interval_ms must be greater than 0".to_string());
    }
    if processor.eta_window == 0 {
        errors.push("processor.eta_window must be greater than 0".to_string());
    }
    if processor.max_workers == Some(0) {
        errors.push("processor.max_workers must be at least 1".to_string());
    }

    let runner = &config.runner;
    for (field, value) in [
        ("runner.request_file", &runner.request_file),
        ("runner.output_dir", &runner.output_dir),
        ("runner.output_file", &runner.output_file),
    ] {
        if !is_single_component(value) {
            errors.push(format!(
                "{} must be a plain file name, got '{}'",
                field, value
            ));
        }
    }

    if runner.temp_prefix.contains(|c: char| c == '/' || c == '\\') {
        errors.push(format!(
            "runner.temp_prefix must not contain path separators, got '{}'",
            runner.temp_prefix
        ));
    }

    if runner.executable.is_none() && runner.executable_name.trim().is_empty() {
        errors.push("runner.executable_name must be set when runner.executable is not".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_single_component(value: &str) -> bool {
    let mut components = Path::new(value).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
