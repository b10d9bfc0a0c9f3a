//! Generation of per-graph accessor functions.
//!
//! Each graph of a repository becomes one documented function named after
//! its stored name that forwards to `graph_miner_retrieval::retrieve`. The
//! runtime library never depends on the generated code.

use std::collections::HashSet;

use graph_miner_core::{GraphRepository, Result, naming::snake_case};

const RESERVED: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "static", "struct", "super", "trait", "true", "try", "type", "typeof",
    "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Returns Rust source with one accessor per graph of `repository`.
///
/// Function names are the `snake_case` form of the stored graph name. Names
/// that collide with a keyword gain a `_graph` suffix, and later graphs whose
/// names collide with an earlier one gain a numeric suffix.
///
/// # Errors
/// Returns [`graph_miner_core::RepositoryError::Resource`] when a citation
/// file cannot be read.
///
/// # Examples
/// ```
/// use graph_miner_cli::codegen::generate_accessors;
/// use graph_miner_core::YueRepository;
///
/// let source = generate_accessors(&YueRepository::bundled()?)?;
/// assert!(source.contains("pub fn ctddda(options: &RetrievalOptions)"));
/// assert!(source.contains("retrieve(RepositoryTag::Yue, \"CTDDDA\", options)"));
/// # Ok::<(), graph_miner_core::RepositoryError>(())
/// ```
pub fn generate_accessors(repository: &dyn GraphRepository) -> Result<String> {
    let formatted = repository.formatted_name();
    let mut source = String::new();
    let mut used = HashSet::new();

    push_line(&mut source, &format!("//! Accessors for the graphs of the {formatted} repository."));
    push_line(&mut source, "//!");
    push_line(
        &mut source,
        &format!("//! Generated by `graph-miner generate {}`.", repository.tag()),
    );
    push_line(&mut source, "");
    push_line(&mut source, "use graph_miner_core::RepositoryTag;");
    push_line(
        &mut source,
        "use graph_miner_retrieval::{Result, RetrievalOptions, RetrievedGraph, retrieve};",
    );

    for entry in repository.graph_list() {
        let name = repository.graph_name(entry);
        let function = unique_identifier(name, &mut used);
        push_line(&mut source, "");
        push_line(
            &mut source,
            &format!("/// Retrieves the `{name}` graph from the {formatted} repository."),
        );
        let citations = repository.graph_citations(entry)?;
        if !citations.is_empty() {
            push_line(&mut source, "///");
            push_line(&mut source, "/// Please cite:");
            push_line(&mut source, "///");
            push_line(&mut source, "/// ```bib");
            for line in citations.iter().flat_map(|citation| citation.trim_end().lines()) {
                push_doc_line(&mut source, line);
            }
            push_line(&mut source, "/// ```");
        }
        push_line(&mut source, "///");
        push_line(&mut source, "/// # Errors");
        push_line(
            &mut source,
            "/// Returns the retrieval error when downloading or resolving the graph fails.",
        );
        push_line(
            &mut source,
            &format!("pub fn {function}(options: &RetrievalOptions) -> Result<RetrievedGraph> {{"),
        );
        push_line(
            &mut source,
            &format!("    retrieve(RepositoryTag::{:?}, {name:?}, options)", repository.tag()),
        );
        push_line(&mut source, "}");
    }
    Ok(source)
}

fn unique_identifier(name: &str, used: &mut HashSet<String>) -> String {
    let mut base = snake_case(name);
    if base.is_empty() {
        base.push_str("graph");
    } else if RESERVED.contains(&base.as_str()) {
        base.push_str("_graph");
    }
    let mut candidate = base.clone();
    let mut suffix = 2_usize;
    while !used.insert(candidate.clone()) {
        candidate = format!("{base}_{suffix}");
        suffix += 1;
    }
    candidate
}

fn push_line(source: &mut String, line: &str) {
    source.push_str(line);
    source.push('\n');
}

fn push_doc_line(source: &mut String, line: &str) {
    if line.is_empty() {
        push_line(source, "///");
    } else {
        push_line(source, &format!("/// {line}"));
    }
}
