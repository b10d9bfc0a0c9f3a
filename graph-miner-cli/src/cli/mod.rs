//! Command-line interface for listing, inspecting, fetching, and generating
//! accessors for repository graphs.

mod commands;

pub use commands::{
    Cli, CliError, Command, CommandOutput, FetchCommand, GenerateCommand, GraphDetails,
    GraphSelector, ListCommand, render_output, run_cli,
};

#[cfg(test)]
mod tests;
