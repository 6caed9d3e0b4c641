//! Command Resolution
//!
//! Finds the executable behind a command name: first a `PATH` walk in
//! directory order, then the name itself taken as a literal path. A
//! directory hit is reported as a permission problem rather than a
//! missing command, matching what the diagnostics promise.

use std::path::Path;

use nix::unistd::{access, AccessFlags};

use crate::env::Environment;
use crate::interpreter::errors::ExecError;
use crate::strings::concat;

/// Split a `PATH` value into its directories, skipping empty entries.
pub fn split_path(path_var: &str) -> Vec<&str> {
    path_var.split(':').filter(|dir| !dir.is_empty()).collect()
}

/// Join a directory and a command name into a candidate path.
pub fn build_command_path(dir: &str, command: &str) -> String {
    if dir.ends_with('/') {
        concat(dir, command)
    } else {
        concat(&concat(dir, "/"), command)
    }
}

/// Whether `path` passes an execute-permission probe.
fn is_executable(path: &str) -> bool {
    access(Path::new(path), AccessFlags::X_OK).is_ok()
}

/// Resolve `command` to the path handed to `execve`.
///
/// An unset `PATH` behaves as an empty search list, so bare names fall
/// through to the literal probe.
pub fn resolve(command: &str, env: &Environment) -> Result<String, ExecError> {
    if let Some(path_var) = env.get("PATH") {
        for dir in split_path(path_var) {
            let candidate = build_command_path(dir, command);
            if is_executable(&candidate) {
                return Ok(candidate);
            }
        }
    }

    if Path::new(command).is_dir() {
        return Err(ExecError::PermissionDenied(command.to_string()));
    }
    if is_executable(command) {
        return Ok(command.to_string());
    }
    Err(ExecError::NotFound(command.to_string()))
}
