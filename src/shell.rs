//! Shell Driver
//!
//! Owns the environment table and runs the read-print loop: prompt when
//! stdin is a terminal, read a line, parse, execute. Command failures
//! never leave the loop; only EOF and the `exit` builtin do.

use std::io::{self, BufRead, Write};

use log::debug;
use nix::unistd::isatty;

use crate::env::Environment;
use crate::interpreter::execution_engine;
use crate::parser;

/// Printed before each read when the shell is interactive.
pub const PROMPT: &str = "[Redshell]$> ";

/// The interactive interpreter.
pub struct Shell {
    env: Environment,
}

impl Shell {
    /// A shell whose table snapshots the inherited process environment.
    pub fn new() -> Self {
        Self { env: Environment::from_inherited() }
    }

    /// A shell over a caller-provided table.
    pub fn with_env(env: Environment) -> Self {
        Self { env }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// The read-execute loop. Returns the shell's exit status: 0 on
    /// end of input.
    pub fn run(&mut self) -> i32 {
        let interactive = isatty(0).unwrap_or(false);
        let stdin = io::stdin();
        let mut line = String::new();

        loop {
            if interactive {
                print!("{}", PROMPT);
                io::stdout().flush().ok();
            }
            line.clear();
            match stdin.lock().read_line(&mut line) {
                Ok(0) | Err(_) => return 0,
                Ok(_) => {}
            }
            if line == "\n" {
                continue;
            }
            self.run_input(&line);
        }
    }

    /// Parse and execute one chunk of input. Pasted input can carry
    /// several lines; each runs in order. Returns the status of the
    /// last segment executed.
    pub fn run_input(&mut self, input: &str) -> i32 {
        let mut status = 0;
        for line in input.split('\n').filter(|l| !l.is_empty()) {
            let segments = parser::parse_line(line);
            debug!("parsed {} segment(s) from {:?}", segments.len(), line);
            status = execution_engine::run_segments(&mut self.env, &segments);
        }
        status
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}
