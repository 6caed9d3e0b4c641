//! Redirections
//!
//! Output redirection rewires stdout around one command. The saved
//! stdout fd is a scoped resource: [`StdoutGuard`] acquires it with
//! `dup`, points fd 1 at the target file with `dup2`, and restores the
//! original stdout when dropped, error paths included.

use std::io::{self, Write};
use std::os::unix::io::RawFd;
use std::path::Path;

use nix::errno::Errno;
use nix::fcntl::{open, OFlag};
use nix::sys::stat::Mode;
use nix::unistd::{close, dup, dup2};

use crate::interpreter::errors::ExecError;

const STDOUT_FILENO: RawFd = 1;

/// Open the redirect target for writing, creating it with mode 0644.
/// `append` chooses `O_APPEND` over `O_TRUNC`.
pub fn open_target(path: &str, append: bool) -> Result<RawFd, ExecError> {
    let mut flags = OFlag::O_WRONLY | OFlag::O_CREAT;
    flags |= if append { OFlag::O_APPEND } else { OFlag::O_TRUNC };

    open(Path::new(path), flags, Mode::from_bits_truncate(0o644)).map_err(|errno| match errno {
        Errno::EACCES | Errno::EISDIR => ExecError::PermissionDenied(path.to_string()),
        Errno::ENOENT | Errno::ENOTDIR => ExecError::NoSuchPath(path.to_string()),
        other => ExecError::Spawn(other),
    })
}

/// Stdout swapped onto a file for the lifetime of the guard.
#[derive(Debug)]
pub struct StdoutGuard {
    saved: RawFd,
}

impl StdoutGuard {
    /// Save the current stdout, then make `target_fd` the new fd 1.
    /// `target_fd` is consumed: closed here on success and on failure.
    pub fn install(target_fd: RawFd) -> Result<Self, ExecError> {
        io::stdout().flush().ok();
        let saved = match dup(STDOUT_FILENO) {
            Ok(fd) => fd,
            Err(errno) => {
                let _ = close(target_fd);
                return Err(ExecError::Spawn(errno));
            }
        };
        if let Err(errno) = dup2(target_fd, STDOUT_FILENO) {
            let _ = close(target_fd);
            let _ = close(saved);
            return Err(ExecError::Spawn(errno));
        }
        let _ = close(target_fd);
        Ok(Self { saved })
    }
}

impl Drop for StdoutGuard {
    fn drop(&mut self) {
        io::stdout().flush().ok();
        let _ = dup2(self.saved, STDOUT_FILENO);
        let _ = close(self.saved);
    }
}
