//! Unit tests for argument parsing, command execution, and rendering.

use super::commands::{execute, graph_options, parse_option};
use super::{
    Cli, CliError, Command, CommandOutput, FetchCommand, GraphDetails, GraphSelector,
    ListCommand, render_output, run_cli,
};

use std::cell::RefCell;

use clap::Parser;
use graph_miner_core::{RepositoryErrorCode, RepositoryTag};
use graph_miner_retrieval::{DownloadClient, RetrievalError, RetrievalErrorCode};
use graph_miner_test_support::fixtures::{
    FIXTURE_CITATION, FOO_GRAPH, FOO_GRAPH_TABLE, FOO_GRAPH_URL, ResourceDir,
};
use rstest::rstest;
use serde_json::{Value, json};
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Default)]
struct FakeClient {
    requested: RefCell<Vec<String>>,
}

impl DownloadClient for FakeClient {
    fn download_bytes(&self, url: &str) -> graph_miner_retrieval::Result<Vec<u8>> {
        self.requested.borrow_mut().push(url.to_owned());
        if url == FOO_GRAPH_URL {
            Ok(b"a\tb\n".to_vec())
        } else {
            Err(RetrievalError::Download {
                url: url.to_owned(),
                message: "offline".to_owned(),
            })
        }
    }
}

fn foo_resources() -> ResourceDir {
    ResourceDir::with_repository("kg_hub", FOO_GRAPH_TABLE).expect("fixture resources")
}

fn fetch_cli(resources: &ResourceDir, cache: &TempDir, extra: &[&str]) -> Cli {
    let resources_arg = resources.path().display().to_string();
    let cache_arg = cache.path().display().to_string();
    let mut args = vec![
        "graph-miner",
        "--resources",
        resources_arg.as_str(),
        "fetch",
        "kghub",
        FOO_GRAPH,
        "--cache-path",
        cache_arg.as_str(),
    ];
    args.extend_from_slice(extra);
    Cli::try_parse_from(args).expect("fetch arguments parse")
}

#[rstest]
fn parses_fetch_arguments() {
    let cli = Cli::try_parse_from([
        "graph-miner",
        "fetch",
        "STRING",
        "homo sapiens",
        "--directed",
        "--verbose",
        "0",
        "--option",
        "weights_column=experimental",
        "--option",
        "default_weight=0.5",
    ])
    .expect("arguments parse");

    let Command::Fetch(FetchCommand {
        selector,
        directed,
        verbose,
        cache_path,
        options,
    }) = cli.command
    else {
        panic!("expected the fetch command");
    };
    assert_eq!(selector.repository, RepositoryTag::String);
    assert_eq!(selector.graph, "homo sapiens");
    assert!(directed);
    assert_eq!(verbose, 0);
    assert_eq!(cache_path, None);
    assert_eq!(
        options,
        [
            ("weights_column".to_owned(), json!("experimental")),
            ("default_weight".to_owned(), json!(0.5)),
        ]
    );
}

#[rstest]
fn fetch_defaults_match_retrieval_defaults() {
    let cli = Cli::try_parse_from(["graph-miner", "fetch", "yue", "CTDDDA"]).expect("parse");
    let Command::Fetch(command) = cli.command else {
        panic!("expected the fetch command");
    };
    assert!(!command.directed);
    assert_eq!(command.verbose, 2);
    assert!(command.options.is_empty());
}

#[rstest]
#[case(&["graph-miner", "list", "zenodo"])]
#[case(&["graph-miner", "fetch", "yue", "CTDDDA", "--option", "novalue"])]
#[case(&["graph-miner", "fetch", "yue", "CTDDDA", "--option", "=1"])]
#[case(&["graph-miner", "show", "yue"])]
fn rejects_invalid_arguments(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}

#[rstest]
#[case("edge_header=true", "edge_header", json!(true))]
#[case("edge_rows_to_skip=2", "edge_rows_to_skip", json!(2))]
#[case("sources_column=subject", "sources_column", json!("subject"))]
#[case("edge_separator=a=b", "edge_separator", json!("a=b"))]
#[case(" nodes_column =\"id\"", "nodes_column", json!("id"))]
fn option_values_parse_as_json_or_text(
    #[case] raw: &str,
    #[case] key: &str,
    #[case] value: Value,
) {
    assert_eq!(
        parse_option(raw).expect("option parses"),
        (key.to_owned(), value)
    );
}

#[rstest]
fn mistyped_options_are_rejected() {
    let err = graph_options(vec![("directed".to_owned(), json!("maybe"))])
        .expect_err("directed must be a boolean");
    assert!(matches!(err, CliError::InvalidOptions { .. }));
}

#[rstest]
#[case("name")]
#[case("edge_path")]
#[case("node_path")]
fn options_cannot_replace_resolved_parameters(#[case] key: &str) {
    let (key, value) = parse_option(&format!("{key}=elsewhere.tsv")).expect("option parses");
    let err = graph_options(vec![(key, value)]).expect_err("reserved key must be rejected");
    assert!(matches!(err, CliError::InvalidOptions { .. }));
}

#[rstest]
fn lists_bundled_graphs_in_table_order() -> TestResult {
    let output = run_cli(Cli {
        resources: None,
        command: Command::List(ListCommand {
            repository: RepositoryTag::Linqs,
        }),
    })?;
    assert_eq!(
        output,
        CommandOutput::GraphList(vec![
            "Cora".to_owned(),
            "CiteSeer".to_owned(),
            "PubMedDiabetes".to_owned(),
        ])
    );
    Ok(())
}

#[rstest]
fn lists_graphs_from_a_resource_directory() -> TestResult {
    let resources = foo_resources();
    let resources_arg = resources.path().display().to_string();
    let cli = Cli::try_parse_from([
        "graph-miner",
        "list",
        "kghub",
        "--resources",
        resources_arg.as_str(),
    ])?;
    assert_eq!(
        run_cli(cli)?,
        CommandOutput::GraphList(vec![FOO_GRAPH.to_owned()])
    );
    Ok(())
}

#[rstest]
fn shows_normalised_graph_details() -> TestResult {
    let output = run_cli(Cli {
        resources: None,
        command: Command::Show(GraphSelector {
            repository: RepositoryTag::String,
            graph: "veillonella parvula".to_owned(),
        }),
    })?;
    let CommandOutput::GraphDetails(details) = output else {
        panic!("show describes a graph");
    };
    assert_eq!(details.repository, "STRING");
    assert_eq!(details.name, "VeillonellaParvula");
    assert_eq!(details.urls.len(), 2);
    assert_eq!(
        details.paths.as_deref().map(<[String]>::len),
        Some(2)
    );
    assert!(details.citations[0].contains("szklarczyk2019string"));
    Ok(())
}

#[rstest]
fn show_reports_unknown_graphs() {
    let err = run_cli(Cli {
        resources: None,
        command: Command::Show(GraphSelector {
            repository: RepositoryTag::Yue,
            graph: "nope".to_owned(),
        }),
    })
    .expect_err("graph is not listed");
    let CliError::Repository(repository) = err else {
        panic!("expected a repository error");
    };
    assert_eq!(repository.code(), RepositoryErrorCode::UnknownGraph);
}

#[rstest]
fn fetch_prints_rebased_parameters() -> TestResult {
    let resources = foo_resources();
    let cache = TempDir::new()?;
    let client = FakeClient::default();
    let cli = fetch_cli(
        &resources,
        &cache,
        &["--directed", "--option", "weights_column=score"],
    );

    let CommandOutput::Parameters(mapping) = execute(cli, &client)? else {
        panic!("fetch prints parameters");
    };
    let edge_path = cache.path().join("foo/edges.tsv");
    assert_eq!(mapping["name"], json!(FOO_GRAPH));
    assert_eq!(mapping["edge_path"], json!(edge_path.display().to_string()));
    assert_eq!(mapping["directed"], json!(true));
    assert_eq!(mapping["weights_column"], json!("score"));
    assert_eq!(*client.requested.borrow(), [FOO_GRAPH_URL]);
    assert!(cache.path().join("foo.tsv").is_file());
    Ok(())
}

#[rstest]
fn fetch_reuses_a_populated_cache() -> TestResult {
    let resources = foo_resources();
    let cache = TempDir::new()?;
    std::fs::write(cache.path().join("foo.tsv"), "a\tb\n")?;
    let client = FakeClient::default();

    execute(fetch_cli(&resources, &cache, &[]), &client)?;
    assert!(client.requested.borrow().is_empty());
    Ok(())
}

#[rstest]
fn fetch_surfaces_download_failures() -> TestResult {
    let resources = ResourceDir::with_repository(
        "kg_hub",
        r#"{"FooGraph": {"urls": ["http://example.com/missing.tsv"], "arguments": {"edge_path": "missing.tsv"}}}"#,
    )?;
    let cache = TempDir::new()?;
    let err = execute(fetch_cli(&resources, &cache, &[]), &FakeClient::default())
        .expect_err("download fails");
    let CliError::Retrieval(retrieval) = err else {
        panic!("expected a retrieval error");
    };
    assert_eq!(retrieval.code(), RetrievalErrorCode::Download);
    Ok(())
}

#[rstest]
fn generate_emits_accessors() -> TestResult {
    let output = run_cli(Cli::try_parse_from(["graph-miner", "generate", "linqs"])?)?;
    let CommandOutput::Source(source) = output else {
        panic!("generate prints source");
    };
    assert!(source.contains("pub fn cora(options: &RetrievalOptions) -> Result<RetrievedGraph> {"));
    assert!(source.contains("pub fn pub_med_diabetes("));
    Ok(())
}

#[rstest]
fn renders_graph_details() -> TestResult {
    let details = GraphDetails {
        repository: "KGHub",
        name: FOO_GRAPH.to_owned(),
        urls: vec![FOO_GRAPH_URL.to_owned()],
        paths: None,
        citations: vec![FIXTURE_CITATION.to_owned()],
    };
    let mut buffer = Vec::new();
    render_output(&CommandOutput::GraphDetails(details), &mut buffer)?;
    assert_eq!(
        String::from_utf8(buffer)?,
        "repository: KGHub\n\
         graph: FooGraph\n\
         url: http://example.com/foo.tsv\n  stored as: <file name of the URL>\n\
         citation:\n\
         @misc{fixture, title={Fixture repository}}\n"
    );
    Ok(())
}

#[rstest]
fn renders_parameters_as_json() -> TestResult {
    let mut mapping = serde_json::Map::new();
    mapping.insert("edge_path".to_owned(), json!("/cache/edges.tsv"));
    let mut buffer = Vec::new();
    render_output(&CommandOutput::Parameters(mapping), &mut buffer)?;
    let parsed: Value = serde_json::from_slice(&buffer)?;
    assert_eq!(parsed, json!({"edge_path": "/cache/edges.tsv"}));
    assert!(buffer.ends_with(b"\n"));
    Ok(())
}
