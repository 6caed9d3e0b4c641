//! Child Processes
//!
//! Thin wrappers around `fork`, `execve` and `waitpid`. Every fork
//! hands back a [`ChildGuard`] in the parent; the guard reaps the child
//! on `wait()` or, failing that, when it is dropped, so no segment can
//! leave a zombie behind whatever path it exits through.

use std::ffi::CString;
use std::io::{self, Write};

use log::{debug, warn};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::{fork, ForkResult, Pid};

use crate::env::Environment;
use crate::interpreter::errors::ExecError;

/// Exit status a child reports when `execve` itself fails.
pub const EXEC_FAILURE_STATUS: i32 = 84;

/// Which side of a `fork` the caller is on.
pub enum ForkOutcome {
    /// The parent, holding the reap guard for the new child.
    Parent(ChildGuard),
    /// The child. The caller must finish with `exec_replace` or
    /// `exit_child` and never return into the REPL.
    Child,
}

/// Fork the current process. Buffered stdout is flushed first so the
/// child does not replay pending parent output.
pub fn fork_process() -> Result<ForkOutcome, ExecError> {
    io::stdout().flush().ok();
    match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => Ok(ForkOutcome::Parent(ChildGuard::new(child))),
        Ok(ForkResult::Child) => Ok(ForkOutcome::Child),
        Err(errno) => {
            warn!("fork failed: {}", errno);
            Err(ExecError::Spawn(errno))
        }
    }
}

/// Fork and run `path` with `argv` and the environment snapshot.
pub fn spawn(path: &str, argv: &[String], env: &Environment) -> Result<ChildGuard, ExecError> {
    match fork_process()? {
        ForkOutcome::Parent(guard) => {
            debug!("spawned {} as pid {}", path, guard.pid());
            Ok(guard)
        }
        ForkOutcome::Child => exec_replace(path, argv, env),
    }
}

/// Replace the current (child) process image. On `execve` failure the
/// child exits with [`EXEC_FAILURE_STATUS`] without unwinding.
pub fn exec_replace(path: &str, argv: &[String], env: &Environment) -> ! {
    let path_c = CString::new(path).ok();
    let argv_c: Option<Vec<CString>> = argv
        .iter()
        .map(|arg| CString::new(arg.as_str()).ok())
        .collect();
    let env_c = env.snapshot_cstrings();

    if let (Some(path_c), Some(argv_c)) = (path_c, argv_c) {
        let _ = nix::unistd::execve(&path_c, &argv_c, &env_c);
    }
    exit_child(EXEC_FAILURE_STATUS)
}

/// Terminate a forked child immediately, flushing what it wrote.
/// `_exit` skips the parent's inherited atexit machinery.
pub fn exit_child(status: i32) -> ! {
    io::stdout().flush().ok();
    io::stderr().flush().ok();
    unsafe { libc::_exit(status) }
}

/// A forked child that is guaranteed to be reaped exactly once.
#[derive(Debug)]
pub struct ChildGuard {
    pid: Pid,
    reaped: bool,
}

impl ChildGuard {
    pub fn new(pid: Pid) -> Self {
        Self { pid, reaped: false }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Block until the child changes state (`WUNTRACED`) and translate
    /// the result into a shell status.
    pub fn wait(mut self) -> i32 {
        self.reaped = true;
        match waitpid(self.pid, Some(WaitPidFlag::WUNTRACED)) {
            Ok(WaitStatus::Exited(pid, code)) => {
                debug!("reaped pid {} with status {}", pid, code);
                code
            }
            Ok(WaitStatus::Signaled(pid, signal, _)) => {
                debug!("pid {} killed by signal {}", pid, signal);
                128 + signal as i32
            }
            Ok(WaitStatus::Stopped(pid, signal)) => {
                debug!("pid {} stopped by signal {}", pid, signal);
                128 + signal as i32
            }
            Ok(_) => 0,
            Err(errno) => {
                warn!("waitpid on {} failed: {}", self.pid, errno);
                EXEC_FAILURE_STATUS
            }
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if !self.reaped {
            let _ = waitpid(self.pid, None);
        }
    }
}
