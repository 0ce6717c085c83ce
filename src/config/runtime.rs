// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::Duration;

use crate::config::Config;
use crate::engine::ProcessorOptions;
use crate::errors::ConfigError;
use crate::observability::messages::config::ExecutableResolved;
use crate::observability::messages::StructuredLog;
use crate::runner::{locate_executable, ExternalRunner, RunnerConfig};

impl Config {
    /// Resolve the solver executable and build the runner settings.
    ///
    /// An explicit `runner.executable` must point at an existing file;
    /// otherwise `runner.executable_name` is searched on `PATH`, then in
    /// `runner.search_dirs`, then next to the running binary.
    pub fn resolve_runner(&self) -> Result<RunnerConfig, ConfigError> {
        let section = &self.runner;

        let executable = match &section.executable {
            Some(path) if path.is_file() => path.clone(),
            Some(path) => {
                return Err(ConfigError::ExecutableNotFound {
                    name: path.display().to_string(),
                    searched: 0,
                })
            }
            None => locate_executable(&section.executable_name, &section.search_dirs).ok_or_else(
                || ConfigError::ExecutableNotFound {
                    name: section.executable_name.clone(),
                    searched: section.search_dirs.len(),
                },
            )?,
        };

        ExecutableResolved {
            executable: &executable,
            explicit: section.executable.is_some(),
        }
        .log();

        Ok(RunnerConfig {
            executable,
            launcher_args: section.launcher_args.clone(),
            request_file: section.request_file.clone(),
            output_dir: section.output_dir.clone(),
            output_file: section.output_file.clone(),
            temp_prefix: section.temp_prefix.clone(),
        })
    }

    /// Processor policy derived from the `processor` section.
    pub fn processor_options(&self) -> ProcessorOptions {
        ProcessorOptions {
            abort_on_error: self.processor.abort_on_error,
            progress_interval: Duration::from_millis(self.processor.progress_interval_ms),
            eta_window: self.processor.eta_window,
        }
    }
}

/// Engine runtime builder - resolves the solver and processor policy from configuration.
///
/// # Examples
///
/// ```no_run
/// use sim_dispatch::config::{load_and_validate_config, RuntimeBuilder};
///
/// let config = load_and_validate_config("sim-dispatch.yaml").unwrap();
/// let (runner, options) = RuntimeBuilder::from_config(&config).unwrap();
/// assert!(options.eta_window > 0);
/// # let _ = runner;
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build the shared runner and the processor options.
    ///
    /// Executable discovery happens here, once, before any run starts.
    pub fn from_config(cfg: &Config) -> Result<(ExternalRunner, ProcessorOptions), ConfigError> {
        let runner = ExternalRunner::new(cfg.resolve_runner()?);
        Ok((runner, cfg.processor_options()))
    }
}
