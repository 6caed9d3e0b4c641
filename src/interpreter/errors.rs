//! Interpreter Errors
//!
//! Every failure in the execution path is local to its segment: the
//! engine renders the diagnostic on stderr and the REPL moves on. The
//! `Display` text of each variant is the exact message the shell
//! prints (the engine appends the terminating newline).

use nix::errno::Errno;
use thiserror::Error;

/// What went wrong while resolving or running one command segment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    /// The command is neither on `PATH` nor a runnable literal path.
    #[error("{0}: Command not found.")]
    NotFound(String),

    /// The target exists but may not be executed or traversed.
    #[error("{0}: Permission denied.")]
    PermissionDenied(String),

    /// A path operand does not exist.
    #[error("{0}: No such file or directory.")]
    NoSuchPath(String),

    /// A pipe or redirect segment with no command on one side.
    #[error("Invalid null command.")]
    NullCommand,

    /// A redirect segment with no target file name.
    #[error("Missing name for redirect.")]
    MissingRedirectTarget,

    /// `fork`, `pipe` or `dup` failed. Not printed; the segment
    /// returns 84 and the REPL continues silently.
    #[error("spawn failed: {0}")]
    Spawn(Errno),
}

impl ExecError {
    /// Whether the REPL should print this diagnostic at all.
    pub fn is_silent(&self) -> bool {
        matches!(self, ExecError::Spawn(_))
    }
}
