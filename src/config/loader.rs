// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{
    DEFAULT_ETA_WINDOW, DEFAULT_EXECUTABLE_NAME, DEFAULT_OUTPUT_DIR, DEFAULT_OUTPUT_FILE,
    DEFAULT_PROGRESS_INTERVAL_MS, DEFAULT_REQUEST_FILE, DEFAULT_TEMP_PREFIX,
};
use crate::errors::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure for the simulation processing engine.
///
/// Loaded from a YAML file. Both sections are optional and fall back to the
/// built-in defaults.
///
/// # Example
/// ```yaml
/// runner:
///   executable_name: dtr1d_main
///   search_dirs: ["/opt/diter/bin"]
///   request_file: simulation.pbd
///   output_dir: simulation_output
///   output_file: simulation_history.csv
/// processor:
///   abort_on_error: false
///   progress_interval_ms: 500
///   eta_window: 25
///   max_workers: 4
/// ```
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub runner: RunnerSection,
    #[serde(default)]
    pub processor: ProcessorSection,
}

/// How to find and invoke the external solver.
///
/// # Fields
/// * `executable` - Explicit solver path; skips discovery when set
/// * `executable_name` - Name searched on `PATH` and in `search_dirs`
/// * `search_dirs` - Fallback directories for discovery
/// * `launcher_args` - Arguments placed before the request file name
/// * `request_file` - Request file name inside the working directory
/// * `output_dir` - Output subfolder the solver writes into
/// * `output_file` - History table inside `output_dir`
/// * `temp_prefix` - Prefix of the per-sample temporary directories
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RunnerSection {
    pub executable: Option<PathBuf>,
    pub executable_name: String,
    pub search_dirs: Vec<PathBuf>,
    pub launcher_args: Vec<String>,
    pub request_file: String,
    pub output_dir: String,
    pub output_file: String,
    pub temp_prefix: String,
}

impl Default for RunnerSection {
    fn default() -> Self {
        Self {
            executable: None,
            executable_name: DEFAULT_EXECUTABLE_NAME.to_string(),
            search_dirs: Vec::new(),
            launcher_args: Vec::new(),
            request_file: DEFAULT_REQUEST_FILE.to_string(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            temp_prefix: DEFAULT_TEMP_PREFIX.to_string(),
        }
    }
}

/// Processor policy options.
///
/// # Fields
/// * `abort_on_error` - Cancel the whole run on the first failed sample
/// * `progress_interval_ms` - Coalescing window for progress notifications
/// * `eta_window` - How many recent elapsed times feed the ETA median
/// * `max_workers` - Upper bound on concurrent workers (defaults to CPU count)
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProcessorSection {
    pub abort_on_error: bool,
    pub progress_interval_ms: u64,
    pub eta_window: usize,
    pub max_workers: Option<usize>,
}

impl Default for ProcessorSection {
    fn default() -> Self {
        Self {
            abort_on_error: false,
            progress_interval_ms: DEFAULT_PROGRESS_INTERVAL_MS,
            eta_window: DEFAULT_ETA_WINDOW,
            max_workers: None,
        }
    }
}

impl ProcessorSection {
    /// Configured worker bound, or the number of available CPU cores (4 if unknown).
    pub fn max_workers(&self) -> usize {
        self.max_workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        })
    }
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    Ok(cfg)
}

/// Load and validate a config from a YAML file
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;

    if let Err(problems) = crate::config::validate_config(&cfg) {
        return Err(ConfigError::Invalid(format!(
            "Configuration validation failed:\n{}",
            problems.join("\n")
        )));
    }

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.runner.executable_name, DEFAULT_EXECUTABLE_NAME);
        assert_eq!(cfg.processor.progress_interval_ms, 500);
        assert_eq!(cfg.processor.eta_window, 25);
        assert!(!cfg.processor.abort_on_error);
    }

    #[test]
    fn parse_partial_config() {
        let yaml = r#"
runner:
  executable: /opt/diter/bin/dtr1d_main
  launcher_args: ["--quiet"]
processor:
  abort_on_error: true
  max_workers: 3
"#;

        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.runner.executable, Some(PathBuf::from("/opt/diter/bin/dtr1d_main")));
        assert_eq!(cfg.runner.launcher_args, vec!["--quiet"]);
        assert_eq!(cfg.runner.request_file, DEFAULT_REQUEST_FILE);
        assert!(cfg.processor.abort_on_error);
        assert_eq!(cfg.processor.max_workers(), 3);
        assert_eq!(cfg.processor.eta_window, DEFAULT_ETA_WINDOW);
    }

    #[test]
    fn default_max_workers_is_positive() {
        assert!(ProcessorSection::default().max_workers() >= 1);
    }

    #[test]
    fn test_load_and_validate_valid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.yaml");
        std::fs::write(&path, "processor:\n  progress_interval_ms: 250\n").unwrap();

        let cfg = load_and_validate_config(&path).unwrap();
        assert_eq!(cfg.processor.progress_interval_ms, 250);
    }

    #[test]
    fn test_load_and_validate_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.yaml");
        std::fs::write(
            &path,
            "runner:\n  request_file: ../escape.pbd\nprocessor:\n  eta_window: 0\n",
        )
        .unwrap();

        match load_and_validate_config(&path) {
            Err(ConfigError::Invalid(message)) => {
                assert!(message.contains("eta_window"));
                assert!(message.contains("request_file"));
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = load_config("/nonexistent/sim-dispatch.yaml");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.yaml");
        std::fs::write(&path, "processor: [not, a, map]\n").unwrap();

        assert!(matches!(load_config(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn shipped_config_is_valid() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/configs/sim-dispatch.yaml");
        let config = load_and_validate_config(path).unwrap();
        assert_eq!(config.processor.max_workers, Some(4));
        assert_eq!(config.runner.executable_name, "dtr1d_main");
    }
}
