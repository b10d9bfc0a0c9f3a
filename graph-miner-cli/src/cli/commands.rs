//! Command implementations and argument parsing for the graph-miner CLI.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use graph_miner_core::{
    GraphOptions, GraphRepository, RepositoryError, RepositoryTag, Resources, open_repository,
};
use graph_miner_retrieval::{
    DownloadClient, GraphRetriever, RetrievalError, RetrievalOptions, UreqDownloadClient,
};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use crate::codegen::generate_accessors;

const DEFAULT_VERBOSITY: u8 = 2;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "graph-miner",
    about = "Resolve, fetch, and describe graphs published by public repositories."
)]
pub struct Cli {
    /// Directory of `<repository>.json` tables and `<repository>.bib`
    /// citations replacing the bundled ones.
    #[arg(long, global = true, value_name = "DIR")]
    pub resources: Option<PathBuf>,

    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Print the stored name of every graph in a repository.
    List(ListCommand),
    /// Describe one graph: URLs, storage paths, and citations.
    Show(GraphSelector),
    /// Download a graph and print its build parameters as JSON.
    Fetch(FetchCommand),
    /// Print Rust accessor functions for every graph in a repository.
    Generate(GenerateCommand),
}

/// Options accepted by the `list` command.
#[derive(Debug, Args, Clone)]
pub struct ListCommand {
    /// Repository tag (`kghub`, `string`, `networkrepository`, `yue`, `linqs`).
    pub repository: RepositoryTag,
}

/// A graph within a repository.
#[derive(Debug, Args, Clone)]
pub struct GraphSelector {
    /// Repository tag (`kghub`, `string`, `networkrepository`, `yue`, `linqs`).
    pub repository: RepositoryTag,

    /// Graph name, in stored or display form.
    pub graph: String,
}

/// Options accepted by the `fetch` command.
#[derive(Debug, Args, Clone)]
pub struct FetchCommand {
    /// Graph to fetch.
    #[command(flatten)]
    pub selector: GraphSelector,

    /// Load the graph as directed.
    #[arg(long)]
    pub directed: bool,

    /// Progress verbosity: 0 is quiet, 1 reports downloads, 2 also reports
    /// cache hits.
    #[arg(long, default_value_t = DEFAULT_VERBOSITY)]
    pub verbose: u8,

    /// Directory to cache the graph's files in.
    #[arg(long, value_name = "DIR")]
    pub cache_path: Option<PathBuf>,

    /// Extra constructor option; the value is parsed as JSON and falls back
    /// to a plain string.
    #[arg(long = "option", value_name = "KEY=VALUE", value_parser = parse_option)]
    pub options: Vec<(String, Value)>,
}

/// Options accepted by the `generate` command.
#[derive(Debug, Args, Clone)]
pub struct GenerateCommand {
    /// Repository tag (`kghub`, `string`, `networkrepository`, `yue`, `linqs`).
    pub repository: RepositoryTag,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// A repository could not be opened or queried.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    /// Fetching a graph failed.
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
    /// `--option` values do not form valid constructor options.
    #[error("invalid graph options: {source}")]
    InvalidOptions {
        /// Underlying deserialisation failure.
        #[source]
        source: serde_json::Error,
    },
    /// The build parameters could not be rendered as JSON.
    #[error("failed to serialise build parameters: {source}")]
    Serialise {
        /// Underlying serialisation failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Description of one graph, as printed by `show`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphDetails {
    /// Formatted repository name.
    pub repository: &'static str,
    /// Stored graph name.
    pub name: String,
    /// Download URLs in fetch order.
    pub urls: Vec<String>,
    /// Storage paths relative to the cache, when the repository declares
    /// them.
    pub paths: Option<Vec<String>>,
    /// Citations to credit.
    pub citations: Vec<String>,
}

/// Result of executing a CLI command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    /// Stored graph names, in table order.
    GraphList(Vec<String>),
    /// Details of one graph.
    GraphDetails(GraphDetails),
    /// Build parameters of a fetched graph.
    Parameters(Map<String, Value>),
    /// Generated Rust source.
    Source(String),
}

/// Executes the CLI command represented by `cli`, downloading with `ureq`.
///
/// # Errors
/// Returns [`CliError`] when a repository cannot be opened, a graph is
/// unknown, options are invalid, or a download fails.
///
/// # Examples
/// ```
/// use graph_miner_cli::cli::{Cli, Command, CommandOutput, ListCommand, run_cli};
/// use graph_miner_core::RepositoryTag;
///
/// let cli = Cli {
///     resources: None,
///     command: Command::List(ListCommand { repository: RepositoryTag::Yue }),
/// };
/// let CommandOutput::GraphList(names) = run_cli(cli)? else {
///     panic!("list prints graph names");
/// };
/// assert!(names.iter().any(|name| name == "CTDDDA"));
/// # Ok::<(), graph_miner_cli::cli::CliError>(())
/// ```
pub fn run_cli(cli: Cli) -> Result<CommandOutput, CliError> {
    execute(cli, UreqDownloadClient::new())
}

#[instrument(
    name = "cli.run",
    err,
    skip(cli, client),
    fields(command = field::Empty),
)]
pub(super) fn execute<C: DownloadClient>(cli: Cli, client: C) -> Result<CommandOutput, CliError> {
    let resources = cli.resources.map_or(Resources::Bundled, Resources::Directory);
    let span = Span::current();
    match cli.command {
        Command::List(command) => {
            span.record("command", field::display("list"));
            list_graphs(&*open_repository(command.repository, &resources)?)
        }
        Command::Show(selector) => {
            span.record("command", field::display("show"));
            let repository = open_repository(selector.repository, &resources)?;
            describe_graph(&*repository, &selector.graph)
        }
        Command::Fetch(command) => {
            span.record("command", field::display("fetch"));
            let retriever = GraphRetriever::new()
                .with_resources(resources)
                .with_client(client);
            fetch_graph(&retriever, command)
        }
        Command::Generate(command) => {
            span.record("command", field::display("generate"));
            let repository = open_repository(command.repository, &resources)?;
            Ok(CommandOutput::Source(generate_accessors(&*repository)?))
        }
    }
}

fn list_graphs(repository: &dyn GraphRepository) -> Result<CommandOutput, CliError> {
    let names = repository
        .graph_list()
        .iter()
        .map(|entry| repository.graph_name(entry).to_owned())
        .collect();
    Ok(CommandOutput::GraphList(names))
}

fn describe_graph(
    repository: &dyn GraphRepository,
    graph: &str,
) -> Result<CommandOutput, CliError> {
    let name = repository.build_stored_graph_name(graph);
    let entry = repository.entry(&name)?;
    let urls = repository.graph_urls(entry).to_vec();
    let paths = repository.graph_paths(&name, &urls);
    let citations = repository.graph_citations(entry)?;
    Ok(CommandOutput::GraphDetails(GraphDetails {
        repository: repository.formatted_name(),
        name,
        urls,
        paths,
        citations,
    }))
}

#[instrument(
    name = "cli.fetch",
    err,
    skip(retriever, command),
    fields(repository = %command.selector.repository, graph = %command.selector.graph),
)]
pub(super) fn fetch_graph<C: DownloadClient>(
    retriever: &GraphRetriever<C>,
    command: FetchCommand,
) -> Result<CommandOutput, CliError> {
    let FetchCommand {
        selector,
        directed,
        verbose,
        cache_path,
        options,
    } = command;
    let options = RetrievalOptions {
        directed,
        verbose,
        cache_path,
        additional: graph_options(options)?,
    };
    let graph = retriever.retrieve(selector.repository, &selector.graph, &options)?;
    info!(
        graph = graph.name(),
        cache_dir = %graph.cache_dir().display(),
        "fetch completed"
    );
    let mapping = graph
        .parameters()
        .to_mapping()
        .map_err(|source| CliError::Serialise { source })?;
    Ok(CommandOutput::Parameters(mapping))
}

pub(super) fn graph_options(pairs: Vec<(String, Value)>) -> Result<GraphOptions, CliError> {
    let mapping: Map<String, Value> = pairs.into_iter().collect();
    serde_json::from_value(Value::Object(mapping))
        .map_err(|source| CliError::InvalidOptions { source })
}

pub(super) fn parse_option(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("option `{raw}` has an empty key"));
    }
    let parsed = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_owned()));
    Ok((key.to_owned(), parsed))
}

/// Renders `output` to `writer`: one name per line for lists, a labelled
/// description for graph details, pretty JSON for parameters, and generated
/// source verbatim.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// use graph_miner_cli::cli::{CommandOutput, render_output};
///
/// let mut buffer = Vec::new();
/// render_output(
///     &CommandOutput::GraphList(vec!["Cora".into(), "CiteSeer".into()]),
///     &mut buffer,
/// )?;
/// assert_eq!(String::from_utf8(buffer)?, "Cora\nCiteSeer\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn render_output(output: &CommandOutput, mut writer: impl Write) -> io::Result<()> {
    match output {
        CommandOutput::GraphList(names) => {
            for name in names {
                writeln!(writer, "{name}")?;
            }
        }
        CommandOutput::GraphDetails(details) => render_details(details, &mut writer)?,
        CommandOutput::Parameters(mapping) => {
            serde_json::to_writer_pretty(&mut writer, mapping)?;
            writeln!(writer)?;
        }
        CommandOutput::Source(source) => writer.write_all(source.as_bytes())?,
    }
    Ok(())
}

fn render_details(details: &GraphDetails, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "repository: {}", details.repository)?;
    writeln!(writer, "graph: {}", details.name)?;
    for (position, url) in details.urls.iter().enumerate() {
        let stored = details
            .paths
            .as_ref()
            .and_then(|paths| paths.get(position))
            .map_or("<file name of the URL>", String::as_str);
        writeln!(writer, "url: {url}")?;
        writeln!(writer, "  stored as: {stored}")?;
    }
    for citation in &details.citations {
        writeln!(writer, "citation:")?;
        writeln!(writer, "{}", citation.trim_end())?;
    }
    Ok(())
}
