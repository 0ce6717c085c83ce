/// Solver executable name looked up when no explicit path is configured
pub const DEFAULT_EXECUTABLE_NAME: &str = "dtr1d_main";
/// Request file written into each sample's working directory
pub const DEFAULT_REQUEST_FILE: &str = "simulation.pbd";
/// Subfolder of the working directory the solver writes into
pub const DEFAULT_OUTPUT_DIR: &str = "simulation_output";
/// History table produced by the solver inside the output subfolder
pub const DEFAULT_OUTPUT_FILE: &str = "simulation_history.csv";
/// Prefix of per-sample temporary directories
pub const DEFAULT_TEMP_PREFIX: &str = "sim_run.";

/// Coalescing window for progress notifications (milliseconds)
pub const DEFAULT_PROGRESS_INTERVAL_MS: u64 = 500;
/// Number of most recent finite elapsed times used for the ETA median
pub const DEFAULT_ETA_WINDOW: usize = 25;

/// Bounded wait for output pipes after a process was killed (milliseconds)
pub const PIPE_DRAIN_TIMEOUT_MS: u64 = 1_000;
/// Capacity of the processor's notification channel
pub const EVENT_CHANNEL_CAPACITY: usize = 256;
