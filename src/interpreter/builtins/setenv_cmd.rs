//! setenv - Set an environment variable builtin
//!
//! `setenv KEY [VALUE]`. With no operands it prints the environment
//! like `env` does but still reports failure. Key validation happens
//! here, not in the store: the name must start with a letter and be
//! fully alphanumeric.

use crate::env::Environment;
use crate::interpreter::builtins::handle_env;

/// Handle the setenv builtin command.
pub fn handle_setenv(env: &mut Environment, argv: &[String]) -> i32 {
    if argv.len() == 1 {
        handle_env(env);
        return 84;
    }
    if argv.len() > 3 {
        eprintln!("setenv: Too many arguments.");
        return 84;
    }

    let key = &argv[1];
    if !key.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        eprintln!("setenv: Variable name must begin with a letter.");
        return 84;
    }
    if !key.chars().all(|c| c.is_ascii_alphanumeric()) {
        eprintln!("setenv: Variable name must contain alphanumeric characters.");
        return 84;
    }

    let value = argv.get(2).map(String::as_str).unwrap_or("");
    env.set(key, value);
    0
}
