// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! External solver plumbing.
//!
//! A sample is marshalled to the solver through the file system: the request
//! is written into a fresh temporary directory, the solver runs with that
//! directory as its working directory, and its history table is read back
//! from a fixed file inside the output subfolder.
//!
//! ```text
//! <tmp>/sim_run.XXXX/
//!     simulation.pbd                       request (relative path on the command line)
//!     simulation_output/
//!         simulation_history.csv           output table
//! ```
//!
//! * `external` - process invocation, cancellation and stream capture
//! * `table` - CSV output table access by header name
//! * `locate` - one-shot executable discovery

mod external;
mod locate;
mod table;

pub use external::{ExternalRunner, RunOutcome, RunnerConfig, Workspace};
pub use locate::{executable_file_name, locate_executable};
pub use table::OutputTable;
