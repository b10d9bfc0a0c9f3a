//! `graph-miner` binary.
//!
//! Lists and describes the bundled graph catalogues, fetches graphs into the
//! local cache, and generates accessor modules. Results go to stdout; failures
//! are logged with their stable error codes and end with a non-zero exit.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use graph_miner_cli::{
    cli::{Cli, CliError, Command, render_output, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::List(_) => "list",
        Command::Show(_) => "show",
        Command::Fetch(_) => "fetch",
        Command::Generate(_) => "generate",
    }
}

/// Returns the retrieval and repository codes carried by a failed command.
fn error_codes(err: &anyhow::Error) -> (Option<&'static str>, Option<&'static str>) {
    match err.downcast_ref::<CliError>() {
        Some(CliError::Repository(repository)) => (None, Some(repository.code().as_str())),
        Some(CliError::Retrieval(retrieval)) => (
            Some(retrieval.code().as_str()),
            retrieval.repository_code().map(|code| code.as_str()),
        ),
        _ => (None, None),
    }
}

fn try_main(cli: Cli) -> Result<()> {
    let command = command_name(&cli.command);
    let output = run_cli(cli).with_context(|| format!("`{command}` failed"))?;
    let mut writer = BufWriter::new(io::stdout().lock());
    render_output(&output, &mut writer)
        .with_context(|| format!("failed to print `{command}` output"))?;
    writer.flush().context("failed to flush stdout")
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse();
    let command = command_name(&cli.command);
    match try_main(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let (code, repository_code) = error_codes(&err);
            error!(
                command,
                error = %format_args!("{err:#}"),
                code = code.map(field::display),
                repository_code = repository_code.map(field::display),
                "graph-miner command failed"
            );
            ExitCode::FAILURE
        }
    }
}

fn report_logging_init_error(err: &LoggingError) {
    eprintln!("graph-miner: failed to initialise logging: {err}");
}
