// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tempfile::TempDir;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::consts::{
    DEFAULT_OUTPUT_DIR, DEFAULT_OUTPUT_FILE, DEFAULT_REQUEST_FILE, DEFAULT_TEMP_PREFIX,
    PIPE_DRAIN_TIMEOUT_MS,
};
use crate::errors::{SampleError, SampleResult};
use crate::observability::messages::runner::{ProcessSpawned, ProcessTerminated};
use crate::observability::messages::StructuredLog;
use crate::runner::OutputTable;

/// Resolved settings for invoking the external solver.
///
/// `executable` is expected to be resolved already (see
/// [`Config::resolve_runner`](crate::config::Config::resolve_runner)); the
/// runner never searches for it.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    pub executable: PathBuf,
    /// Arguments placed before the request file name.
    pub launcher_args: Vec<String>,
    pub request_file: String,
    pub output_dir: String,
    pub output_file: String,
    pub temp_prefix: String,
}

impl RunnerConfig {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            launcher_args: Vec::new(),
            request_file: DEFAULT_REQUEST_FILE.to_string(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            temp_prefix: DEFAULT_TEMP_PREFIX.to_string(),
        }
    }

    pub fn with_launcher_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.launcher_args = args.into_iter().map(Into::into).collect();
        self
    }
}

/// Per-sample working directory; removed from disk when dropped.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
    request_path: PathBuf,
    output_path: PathBuf,
}

impl Workspace {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn request_path(&self) -> &Path {
        &self.request_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn write_request(&self, request: &[u8]) -> SampleResult<()> {
        std::fs::write(&self.request_path, request)?;
        Ok(())
    }

    /// Request text for diagnostics; never fails.
    pub fn request_text(&self) -> String {
        std::fs::read(&self.request_path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_else(|e| format!("<unreadable request: {}>", e))
    }

    pub fn read_output_table(&self) -> SampleResult<OutputTable> {
        OutputTable::from_path(&self.output_path)
    }
}

/// Exit information and captured streams of one solver invocation.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    /// The process was killed through the cancellation token.
    pub terminated: bool,
}

impl RunOutcome {
    pub fn succeeded(&self) -> bool {
        !self.terminated && self.status.success()
    }
}

/// Runs the solver for one prepared workspace at a time.
///
/// Shared by all workers of a processor; holds no per-run state.
#[derive(Debug, Clone)]
pub struct ExternalRunner {
    config: RunnerConfig,
}

impl ExternalRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Create a fresh temporary directory with its output subfolder.
    pub fn prepare_workspace(&self) -> SampleResult<Workspace> {
        let dir = tempfile::Builder::new()
            .prefix(&self.config.temp_prefix)
            .tempdir()?;

        let output_dir = dir.path().join(&self.config.output_dir);
        std::fs::create_dir(&output_dir)?;

        Ok(Workspace {
            request_path: dir.path().join(&self.config.request_file),
            output_path: output_dir.join(&self.config.output_file),
            dir,
        })
    }

    /// Run the solver inside `workspace` until it exits or `cancel` fires.
    ///
    /// The request file is passed by its bare file name: the solver derives
    /// output names from the argument and breaks on rooted paths.
    pub async fn execute(
        &self,
        workspace: &Workspace,
        cancel: &CancellationToken,
    ) -> SampleResult<RunOutcome> {
        let mut command = Command::new(&self.config.executable);
        command
            .args(&self.config.launcher_args)
            .arg(&self.config.request_file)
            .current_dir(workspace.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|source| SampleError::Spawn {
            executable: self.config.executable.clone(),
            source,
        })?;

        ProcessSpawned {
            executable: &self.config.executable,
            workdir: workspace.path(),
            pid: child.id(),
        }
        .log();

        let stdout_task = child.stdout.take().map(|stream| tokio::spawn(read_stream(stream)));
        let stderr_task = child.stderr.take().map(|stream| tokio::spawn(read_stream(stream)));

        // Exit is polled first so a process that already finished is never
        // reported as terminated.
        let exit = tokio::select! {
            biased;
            status = child.wait() => Some(status?),
            _ = cancel.cancelled() => None,
        };

        let (status, terminated) = match exit {
            Some(status) => (status, false),
            None => {
                let (status, terminated) = stop_child(&mut child).await?;
                if terminated {
                    ProcessTerminated {
                        executable: &self.config.executable,
                        status: &status,
                    }
                    .log();
                }
                (status, terminated)
            }
        };

        let stdout = collect_stream(stdout_task, terminated).await;
        let stderr = collect_stream(stderr_task, terminated).await;

        Ok(RunOutcome {
            status,
            stdout,
            stderr,
            terminated,
        })
    }
}

/// Kill a child on cancellation, unless it has already exited.
///
/// Returns the exit status and whether the kill was needed.
async fn stop_child(child: &mut Child) -> std::io::Result<(ExitStatus, bool)> {
    if let Some(status) = child.try_wait()? {
        return Ok((status, false));
    }
    // The child may exit between the two calls; start_kill then fails and wait() reports it.
    let _ = child.start_kill();
    Ok((child.wait().await?, true))
}

async fn read_stream<R: AsyncRead + Unpin>(mut stream: R) -> String {
    let mut buffer = Vec::new();
    // Partial output is still useful for diagnostics.
    let _ = stream.read_to_end(&mut buffer).await;
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Join a stream reader. After a kill, orphaned grandchildren may keep the
/// pipe open, so the wait is bounded and the reader is aborted on timeout.
async fn collect_stream(task: Option<JoinHandle<String>>, terminated: bool) -> String {
    let Some(mut task) = task else {
        return String::new();
    };

    if !terminated {
        return task.await.unwrap_or_default();
    }

    match tokio::time::timeout(Duration::from_millis(PIPE_DRAIN_TIMEOUT_MS), &mut task).await {
        Ok(joined) => joined.unwrap_or_default(),
        Err(_) => {
            task.abort();
            String::new()
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell_runner(script: &Path) -> ExternalRunner {
        ExternalRunner::new(
            RunnerConfig::new("/bin/sh").with_launcher_args([script.to_string_lossy().into_owned()]),
        )
    }

    fn write_script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("solver.sh");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn workspace_has_output_folder_and_relative_layout() {
        let runner = ExternalRunner::new(RunnerConfig::new("/bin/true"));
        let workspace = runner.prepare_workspace().unwrap();

        assert!(workspace.path().join(DEFAULT_OUTPUT_DIR).is_dir());
        assert_eq!(workspace.request_path(), workspace.path().join(DEFAULT_REQUEST_FILE));
        assert!(workspace.output_path().starts_with(workspace.path()));

        let kept = workspace.path().to_path_buf();
        drop(workspace);
        assert!(!kept.exists());
    }

    #[tokio::test]
    async fn request_file_is_passed_relative_to_the_working_directory() {
        let scripts = tempfile::tempdir().unwrap();
        let script = write_script(
            scripts.path(),
            "case \"$1\" in /*) echo rooted >&2; exit 3;; esac\n\
             cat \"$1\"\n\
             printf 'time, I_th [A]\\n0, 1.5\\n' > simulation_output/simulation_history.csv\n",
        );
        let runner = shell_runner(&script);
        let workspace = runner.prepare_workspace().unwrap();
        workspace.write_request(b"request-body").unwrap();

        let outcome = runner.execute(&workspace, &CancellationToken::new()).await.unwrap();

        assert!(outcome.succeeded(), "stderr: {}", outcome.stderr);
        assert_eq!(outcome.stdout, "request-body");
        let table = workspace.read_output_table().unwrap();
        assert_eq!(table.column(" I_th [A]").unwrap(), vec![1.5]);
    }

    #[tokio::test]
    async fn non_zero_exit_keeps_both_streams() {
        let scripts = tempfile::tempdir().unwrap();
        let script = write_script(scripts.path(), "echo out; echo err >&2; exit 1\n");
        let runner = shell_runner(&script);
        let workspace = runner.prepare_workspace().unwrap();

        let outcome = runner.execute(&workspace, &CancellationToken::new()).await.unwrap();

        assert!(!outcome.succeeded());
        assert!(!outcome.terminated);
        assert_eq!(outcome.status.code(), Some(1));
        assert_eq!(outcome.stdout.trim(), "out");
        assert_eq!(outcome.stderr.trim(), "err");
    }

    #[tokio::test]
    async fn cancellation_kills_the_running_process() {
        let scripts = tempfile::tempdir().unwrap();
        let script = write_script(scripts.path(), "exec sleep 30\n");
        let runner = shell_runner(&script);
        let workspace = runner.prepare_workspace().unwrap();
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let started = std::time::Instant::now();
        let outcome = runner.execute(&workspace, &cancel).await.unwrap();

        assert!(outcome.terminated);
        assert!(!outcome.succeeded());
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn stopping_an_exited_child_is_not_a_termination() {
        let mut child = Command::new("/bin/true").spawn().unwrap();
        // Let it become a zombie without reaping it through wait().
        std::thread::sleep(Duration::from_millis(300));

        let (status, terminated) = stop_child(&mut child).await.unwrap();
        assert!(!terminated);
        assert!(status.success());
    }

    #[tokio::test]
    async fn stopping_a_running_child_kills_it() {
        let mut child = Command::new("sleep").arg("30").spawn().unwrap();

        let (status, terminated) = stop_child(&mut child).await.unwrap();
        assert!(terminated);
        assert!(!status.success());
    }

    #[tokio::test]
    async fn missing_executable_is_a_spawn_error() {
        let runner = ExternalRunner::new(RunnerConfig::new("/nonexistent/sim-dispatch-solver"));
        let workspace = runner.prepare_workspace().unwrap();

        let result = runner.execute(&workspace, &CancellationToken::new()).await;
        assert!(matches!(result, Err(SampleError::Spawn { .. })));
    }
}
