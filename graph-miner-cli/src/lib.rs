//! Support library for the graph-miner CLI binary.
//!
//! Exposes the command pipeline, accessor code generation, and logging setup
//! so tests can exercise them without spawning a subprocess.

pub mod cli;
pub mod codegen;
pub mod logging;
