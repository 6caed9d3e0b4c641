//! Builtin Dispatch
//!
//! The five builtins run in-process against the shell's own
//! environment table. Anything not in the table is an external
//! command.
//!
//! A builtin can be invoked two ways. In a plain segment it runs in the
//! parent and its mutations stick. Inside a pipe stage it runs in the
//! forked child against the child's copy of the environment, so
//! `cd`/`setenv` there look like they worked but change nothing once
//! the child exits. That matches the historical behavior of this shell
//! family and is kept on purpose.

mod cd_cmd;
mod env_cmd;
mod exit_cmd;
mod setenv_cmd;
mod unsetenv_cmd;

pub use cd_cmd::handle_cd;
pub use env_cmd::handle_env;
pub use exit_cmd::handle_exit;
pub use setenv_cmd::handle_setenv;
pub use unsetenv_cmd::handle_unsetenv;

use crate::env::Environment;

/// Names that dispatch in-process.
pub const BUILTIN_NAMES: [&str; 5] = ["cd", "exit", "env", "setenv", "unsetenv"];

/// Whether `name` is a builtin.
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_NAMES.contains(&name)
}

/// Run `argv` as a builtin if its name matches the table.
/// Returns `None` for external commands.
pub fn dispatch(env: &mut Environment, argv: &[String]) -> Option<i32> {
    let name = argv.first()?;
    match name.as_str() {
        "cd" => Some(handle_cd(env, argv)),
        "exit" => handle_exit(argv),
        "env" => Some(handle_env(env)),
        "setenv" => Some(handle_setenv(env, argv)),
        "unsetenv" => Some(handle_unsetenv(env, argv)),
        _ => None,
    }
}
