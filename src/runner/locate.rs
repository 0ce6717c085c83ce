// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::path::{Path, PathBuf};

/// Platform file name for an executable (`dtr1d_main` / `dtr1d_main.exe`).
pub fn executable_file_name(name: &str) -> String {
    let suffix = env::consts::EXE_SUFFIX;
    if suffix.is_empty() || name.ends_with(suffix) {
        name.to_string()
    } else {
        format!("{}{}", name, suffix)
    }
}

/// Find the solver executable.
///
/// Lookup order: every directory of `PATH`, then `search_dirs`, then the
/// directory holding the running binary. Runs once at startup; the result is
/// passed to the runner explicitly.
pub fn locate_executable(name: &str, search_dirs: &[PathBuf]) -> Option<PathBuf> {
    let file_name = executable_file_name(name);

    let path_dirs = env::var_os("PATH")
        .map(|paths| env::split_paths(&paths).collect::<Vec<_>>())
        .unwrap_or_default();
    let package_dir = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));

    path_dirs
        .iter()
        .chain(search_dirs.iter())
        .chain(package_dir.iter())
        .map(|dir| dir.join(&file_name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_executable_in_fallback_directory() {
        let dir = tempfile::tempdir().unwrap();
        let name = "sim_dispatch_locate_probe_7f3a";
        std::fs::write(dir.path().join(executable_file_name(name)), b"").unwrap();

        let found = locate_executable(name, &[dir.path().to_path_buf()]);
        assert_eq!(found, Some(dir.path().join(executable_file_name(name))));
    }

    #[test]
    fn unknown_executable_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            locate_executable("sim_dispatch_no_such_solver_91c2", &[dir.path().to_path_buf()]),
            None
        );
    }

    #[test]
    fn directories_are_not_executables() {
        let dir = tempfile::tempdir().unwrap();
        let name = "sim_dispatch_locate_dir_probe";
        std::fs::create_dir(dir.path().join(executable_file_name(name))).unwrap();
        assert_eq!(locate_executable(name, &[dir.path().to_path_buf()]), None);
    }
}
