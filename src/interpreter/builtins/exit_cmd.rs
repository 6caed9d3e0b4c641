//! exit - Leave the shell builtin
//!
//! Terminates the process with status 0. Arguments are ignored.

use std::io::{self, Write};

/// Handle the exit builtin command. Never returns.
pub fn handle_exit(_argv: &[String]) -> ! {
    io::stdout().flush().ok();
    std::process::exit(0)
}
