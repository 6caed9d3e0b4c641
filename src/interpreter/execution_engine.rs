//! Execution Engine
//!
//! Drives a parsed segment list to its effects. Segments run strictly
//! in list order; the next one does not start until every child of the
//! previous one is reaped. A plain segment dispatches builtins in the
//! parent and forks externals. A pipe forks both stages and wires them
//! through a kernel pipe. A redirection swaps stdout onto the target
//! file around the command and restores it afterwards.

use std::os::unix::io::RawFd;

use nix::unistd::{close, dup2, pipe};

use crate::env::Environment;
use crate::interpreter::builtins;
use crate::interpreter::command_resolution;
use crate::interpreter::errors::ExecError;
use crate::interpreter::process::{self, ForkOutcome};
use crate::interpreter::redirections::{open_target, StdoutGuard};
use crate::parser::{Segment, SegmentKind};

const STDIN_FILENO: RawFd = 0;
const STDOUT_FILENO: RawFd = 1;

/// Run every segment of one input line, in order. Returns the status
/// of the last segment.
pub fn run_segments(env: &mut Environment, segments: &[Segment]) -> i32 {
    let mut status = 0;
    for segment in segments {
        status = run_segment(env, segment);
    }
    status
}

/// Run one segment. Failures are reported here and never escape.
pub fn run_segment(env: &mut Environment, segment: &Segment) -> i32 {
    match segment.kind {
        SegmentKind::Plain => run_command(env, &segment.argv),
        SegmentKind::Pipe => run_pipe(env, segment),
        SegmentKind::Redirect => run_redirect(env, segment, false),
        SegmentKind::RedirectAppend => run_redirect(env, segment, true),
    }
}

/// Builtin in the parent, external through fork and exec. Used for
/// plain segments and for the command side of a redirection.
fn run_command(env: &mut Environment, argv: &[String]) -> i32 {
    if argv.is_empty() {
        return 0;
    }
    if let Some(status) = builtins::dispatch(env, argv) {
        return status;
    }
    match run_external(env, argv) {
        Ok(status) => status,
        Err(error) => report(error),
    }
}

fn run_external(env: &Environment, argv: &[String]) -> Result<i32, ExecError> {
    let path = command_resolution::resolve(&argv[0], env)?;
    let child = process::spawn(&path, argv, env)?;
    Ok(child.wait())
}

/// Print the diagnostic (spawn failures stay silent) and fail the
/// segment.
fn report(error: ExecError) -> i32 {
    if !error.is_silent() {
        eprintln!("{}", error);
    }
    84
}

fn run_pipe(env: &mut Environment, segment: &Segment) -> i32 {
    if segment.argv.is_empty() || segment.rhs_argv.is_empty() {
        return report(ExecError::NullCommand);
    }
    match pipe_pair(env, &segment.argv, &segment.rhs_argv) {
        Ok(status) => status,
        Err(error) => report(error),
    }
}

/// Fork the upstream and downstream stages around one pipe. The parent
/// closes both ends, then reaps upstream first so its EOF releases the
/// downstream's input.
fn pipe_pair(env: &Environment, lhs: &[String], rhs: &[String]) -> Result<i32, ExecError> {
    let (read_end, write_end) = pipe().map_err(ExecError::Spawn)?;

    let upstream = match process::fork_process() {
        Ok(ForkOutcome::Parent(guard)) => guard,
        Ok(ForkOutcome::Child) => {
            let _ = dup2(write_end, STDOUT_FILENO);
            let _ = close(read_end);
            let _ = close(write_end);
            run_stage(env, lhs)
        }
        Err(error) => {
            let _ = close(read_end);
            let _ = close(write_end);
            return Err(error);
        }
    };

    let downstream = match process::fork_process() {
        Ok(ForkOutcome::Parent(guard)) => guard,
        Ok(ForkOutcome::Child) => {
            let _ = dup2(read_end, STDIN_FILENO);
            let _ = close(read_end);
            let _ = close(write_end);
            run_stage(env, rhs)
        }
        Err(error) => {
            // The upstream guard reaps its child on the way out.
            let _ = close(read_end);
            let _ = close(write_end);
            return Err(error);
        }
    };

    let _ = close(read_end);
    let _ = close(write_end);

    upstream.wait();
    Ok(downstream.wait())
}

/// One pipe stage, inside the forked child. Builtins run against the
/// child's copy of the table, so their effects die with the child.
fn run_stage(env: &Environment, argv: &[String]) -> ! {
    let mut child_env = env.clone();
    if let Some(status) = builtins::dispatch(&mut child_env, argv) {
        process::exit_child(status);
    }
    match command_resolution::resolve(&argv[0], &child_env) {
        Ok(path) => process::exec_replace(&path, argv, &child_env),
        Err(error) => {
            eprintln!("{}", error);
            process::exit_child(process::EXEC_FAILURE_STATUS)
        }
    }
}

fn run_redirect(env: &mut Environment, segment: &Segment, append: bool) -> i32 {
    if segment.argv.is_empty() {
        return report(ExecError::NullCommand);
    }
    if segment.rhs_argv.is_empty() {
        return report(ExecError::MissingRedirectTarget);
    }

    let target_fd = match open_target(&segment.rhs_argv[0], append) {
        Ok(fd) => fd,
        Err(error) => return report(error),
    };
    let guard = match StdoutGuard::install(target_fd) {
        Ok(guard) => guard,
        Err(error) => return report(error),
    };
    let status = run_command(env, &segment.argv);
    drop(guard);
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::test_support::process_state_lock;
    use std::fs;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn bin_env() -> Environment {
        let mut env = Environment::new();
        env.set("PATH", "/usr/bin:/bin");
        env
    }

    fn segment(kind: SegmentKind, argv: &[&str], rhs: &[&str]) -> Segment {
        Segment {
            kind,
            argv: args(argv),
            rhs_argv: args(rhs),
            leading_empty: argv.is_empty(),
        }
    }

    #[test]
    fn test_plain_external_status() {
        let mut env = bin_env();
        assert_eq!(run_segment(&mut env, &segment(SegmentKind::Plain, &["true"], &[])), 0);
        assert_ne!(run_segment(&mut env, &segment(SegmentKind::Plain, &["false"], &[])), 0);
    }

    #[test]
    fn test_plain_command_not_found() {
        let mut env = Environment::new();
        env.set("PATH", "/nonexistent-dir");
        let status = run_segment(
            &mut env,
            &segment(SegmentKind::Plain, &["surely-not-a-command"], &[]),
        );
        assert_eq!(status, 84);
    }

    #[test]
    fn test_plain_builtin_mutates_parent() {
        let mut env = bin_env();
        run_segment(&mut env, &segment(SegmentKind::Plain, &["setenv", "FOO", "bar"], &[]));
        assert_eq!(env.get("FOO"), Some("bar"));
    }

    #[test]
    fn test_segments_run_in_order() {
        let mut env = bin_env();
        let segments = vec![
            segment(SegmentKind::Plain, &["setenv", "FOO", "bar"], &[]),
            segment(SegmentKind::Plain, &["setenv", "FOO", "baz"], &[]),
        ];
        assert_eq!(run_segments(&mut env, &segments), 0);
        assert_eq!(env.get("FOO"), Some("baz"));
    }

    #[test]
    fn test_redirect_writes_file() {
        let _serial = process_state_lock();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").to_string_lossy().into_owned();

        let mut env = bin_env();
        let status = run_segment(
            &mut env,
            &segment(SegmentKind::Redirect, &["echo", "hi"], &[&path]),
        );
        assert_eq!(status, 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "hi\n");
    }

    #[test]
    fn test_redirect_truncates_previous_contents() {
        let _serial = process_state_lock();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").to_string_lossy().into_owned();
        fs::write(&path, "old contents that are longer\n").unwrap();

        let mut env = bin_env();
        run_segment(&mut env, &segment(SegmentKind::Redirect, &["echo", "new"], &[&path]));
        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
    }

    #[test]
    fn test_redirect_append_grows_file() {
        let _serial = process_state_lock();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").to_string_lossy().into_owned();

        let mut env = bin_env();
        run_segment(&mut env, &segment(SegmentKind::RedirectAppend, &["echo", "a"], &[&path]));
        run_segment(&mut env, &segment(SegmentKind::RedirectAppend, &["echo", "b"], &[&path]));
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");
    }

    #[test]
    fn test_redirect_builtin_output_lands_in_file() {
        let _serial = process_state_lock();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").to_string_lossy().into_owned();

        let mut env = Environment::new();
        env.set("ONLY", "entry");
        let status = run_segment(&mut env, &segment(SegmentKind::Redirect, &["env"], &[&path]));
        assert_eq!(status, 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "ONLY=entry\n");
    }

    #[test]
    fn test_redirect_without_command_is_null_command() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never-created").to_string_lossy().into_owned();

        let mut env = bin_env();
        let status = run_segment(&mut env, &segment(SegmentKind::Redirect, &[], &[&path]));
        assert_eq!(status, 84);
        assert!(!dir.path().join("never-created").exists());
    }

    #[test]
    fn test_redirect_without_target_is_missing_name() {
        let mut env = bin_env();
        let status = run_segment(&mut env, &segment(SegmentKind::Redirect, &["echo", "hi"], &[]));
        assert_eq!(status, 84);
    }

    #[test]
    fn test_pipe_moves_data_between_stages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sink").to_string_lossy().into_owned();

        let mut env = bin_env();
        let sink = format!("cat > {}", path);
        let status = run_segment(
            &mut env,
            &segment(SegmentKind::Pipe, &["echo", "through"], &["sh", "-c", &sink]),
        );
        assert_eq!(status, 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "through\n");
    }

    #[test]
    fn test_pipe_with_empty_side_is_null_command() {
        let mut env = bin_env();
        assert_eq!(run_segment(&mut env, &segment(SegmentKind::Pipe, &[], &["cat"])), 84);
        assert_eq!(run_segment(&mut env, &segment(SegmentKind::Pipe, &["ls"], &[])), 84);
    }

    #[test]
    fn test_builtin_in_pipe_stage_does_not_touch_parent_env() {
        let mut env = bin_env();
        let status = run_segment(
            &mut env,
            &segment(SegmentKind::Pipe, &["setenv", "FOO", "bar"], &["cat"]),
        );
        assert_eq!(status, 0);
        assert_eq!(env.get("FOO"), None);
    }

    #[test]
    fn test_pipe_downstream_not_found_status() {
        let mut env = bin_env();
        let status = run_segment(
            &mut env,
            &segment(SegmentKind::Pipe, &["echo", "hi"], &["surely-not-a-command"]),
        );
        assert_eq!(status, process::EXEC_FAILURE_STATUS);
    }
}
