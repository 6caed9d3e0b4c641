//! Interpreter
//!
//! Everything between a parsed segment list and its observable effects:
//! builtin dispatch, `PATH` resolution, process plumbing and the
//! execution engine itself.

pub mod builtins;
pub mod command_resolution;
pub mod errors;
pub mod execution_engine;
pub mod process;
pub mod redirections;

pub use errors::ExecError;
pub use execution_engine::{run_segment, run_segments};
