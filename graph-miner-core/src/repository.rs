//! The repository abstraction translating "graph X from repository Y" into
//! the inputs of the external graph constructor.

use std::path::{Path, PathBuf};

use crate::{
    error::{RepositoryError, Result},
    metadata::{GraphEntry, MetadataTable},
    parameters::GraphParameters,
    report::DownloadReport,
    resources::Resources,
    tag::RepositoryTag,
};

/// Name, URL, path, citation, and parameter resolution for one catalogue.
///
/// Implementors provide the loaded table, the resources it came from, and
/// their name normalisation; every other operation has a default that reads
/// the metadata table. Repositories whose files land in places the table does
/// not declare override [`GraphRepository::graph_paths`],
/// [`GraphRepository::edge_list_path`], and
/// [`GraphRepository::node_list_path`].
///
/// # Examples
/// ```
/// use graph_miner_core::{GraphRepository, KgHubRepository};
///
/// let repository = KgHubRepository::bundled()?;
/// let entry = &repository.graph_list()[0];
/// let name = repository.graph_name(entry);
/// assert_eq!(repository.build_stored_graph_name(name), name);
/// assert!(!repository.graph_urls(entry).is_empty());
/// # Ok::<(), graph_miner_core::RepositoryError>(())
/// ```
pub trait GraphRepository: Send + Sync {
    /// Returns the tag identifying this repository.
    fn tag(&self) -> RepositoryTag;

    /// Returns the metadata table loaded at construction.
    fn table(&self) -> &MetadataTable;

    /// Returns the resource source the table was loaded from.
    fn resources(&self) -> &Resources;

    /// Normalises a possibly partial or display-form name into the key used
    /// by the metadata table.
    ///
    /// Implementations must be pure, total, and idempotent.
    fn build_stored_graph_name(&self, partial_graph_name: &str) -> String;

    /// Returns the human-readable repository label.
    fn formatted_name(&self) -> &'static str {
        self.tag().formatted_name()
    }

    /// Returns the canonical name stored in `entry`.
    fn graph_name<'e>(&self, entry: &'e GraphEntry) -> &'e str {
        entry.name()
    }

    /// Returns the download URLs of `entry` in fetch order.
    fn graph_urls<'e>(&self, entry: &'e GraphEntry) -> &'e [String] {
        &entry.metadata().urls
    }

    /// Returns the citations to credit when using the graph: the repository
    /// citation file, followed by the entry's own citation when it has one.
    ///
    /// # Errors
    /// Returns [`RepositoryError::Resource`] when the citation file cannot be
    /// read.
    fn graph_citations(&self, entry: &GraphEntry) -> Result<Vec<String>> {
        let mut citations = vec![self.resources().read_citation(self.tag())?];
        citations.extend(entry.metadata().citation.iter().cloned());
        Ok(citations)
    }

    /// Returns where each URL of `graph_name` should be stored, relative to
    /// the cache directory.
    ///
    /// `None` lets the downloader derive the paths from the URLs.
    fn graph_paths(&self, graph_name: &str, urls: &[String]) -> Option<Vec<String>> {
        let _ = (graph_name, urls);
        None
    }

    /// Assembles the constructor arguments for `graph_name`: the generic
    /// paths, with the repository arguments of the graph merged on top.
    ///
    /// Repository arguments win when both declare the same key.
    ///
    /// # Errors
    /// Returns [`RepositoryError::UnknownGraph`] when `graph_name` is not in
    /// the table.
    fn build_graph_parameters(
        &self,
        graph_name: &str,
        edge_path: &Path,
        node_path: Option<&Path>,
    ) -> Result<GraphParameters> {
        let entry = self.entry(graph_name)?;
        Ok(
            GraphParameters::new(graph_name, edge_path, node_path.map(Path::to_path_buf))
                .with_arguments(&entry.metadata().arguments),
        )
    }

    /// Returns every graph of the repository in table order.
    fn graph_list(&self) -> &[GraphEntry] {
        self.table().entries()
    }

    /// Resolves the node list of `graph_name` after a download.
    ///
    /// The default returns the `node_path` argument verbatim and ignores the
    /// report.
    ///
    /// # Errors
    /// Returns [`RepositoryError::UnknownGraph`] when `graph_name` is not in
    /// the table.
    fn node_list_path(
        &self,
        graph_name: &str,
        download_report: &DownloadReport,
    ) -> Result<Option<PathBuf>> {
        let _ = download_report;
        Ok(self.entry(graph_name)?.metadata().arguments.node_path.clone())
    }

    /// Resolves the edge list of `graph_name` after a download.
    ///
    /// The default returns the `edge_path` argument verbatim and ignores the
    /// report.
    ///
    /// # Errors
    /// Returns [`RepositoryError::UnknownGraph`] when `graph_name` is not in
    /// the table and [`RepositoryError::MissingArgument`] when the graph
    /// declares no edge list.
    fn edge_list_path(&self, graph_name: &str, download_report: &DownloadReport) -> Result<PathBuf> {
        let _ = download_report;
        self.entry(graph_name)?
            .metadata()
            .arguments
            .edge_path
            .clone()
            .ok_or_else(|| RepositoryError::MissingArgument {
                graph: graph_name.to_owned(),
                argument: "edge_path",
            })
    }

    /// Looks up the table entry of `graph_name`.
    ///
    /// # Errors
    /// Returns [`RepositoryError::UnknownGraph`] when `graph_name` is not in
    /// the table.
    fn entry(&self, graph_name: &str) -> Result<&GraphEntry> {
        self.table()
            .get(graph_name)
            .ok_or_else(|| RepositoryError::unknown_graph(self.formatted_name(), graph_name))
    }
}

/// Resolves the file fetched from the `position`-th URL of `graph_name`
/// through `download_report`.
///
/// Returns `Ok(None)` when the graph has fewer URLs than `position + 1`.
///
/// # Errors
/// Returns [`RepositoryError::UnknownGraph`] for graphs outside the table and
/// [`RepositoryError::MissingReportEntry`] when the report has no record for
/// the URL.
pub fn reported_path<R>(
    repository: &R,
    graph_name: &str,
    position: usize,
    download_report: &DownloadReport,
) -> Result<Option<PathBuf>>
where
    R: GraphRepository + ?Sized,
{
    let entry = repository.entry(graph_name)?;
    let Some(url) = repository.graph_urls(entry).get(position) else {
        return Ok(None);
    };
    download_report
        .find_by_url(url)
        .map(|record| Some(record.final_path().to_path_buf()))
        .ok_or_else(|| RepositoryError::MissingReportEntry {
            graph: graph_name.to_owned(),
            url: url.clone(),
        })
}

/// Returns the file name component of `url`, ignoring any query string or
/// fragment.
///
/// # Examples
/// ```
/// use graph_miner_core::file_name_from_url;
///
/// assert_eq!(file_name_from_url("https://host/a/b.tsv.gz?dl=1"), Some("b.tsv.gz"));
/// assert_eq!(file_name_from_url("https://host/a/"), None);
/// ```
#[must_use]
pub fn file_name_from_url(url: &str) -> Option<&str> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let without_query = without_fragment
        .split('?')
        .next()
        .unwrap_or(without_fragment);
    let path = without_query
        .split_once("://")
        .map_or(without_query, |(_, rest)| rest);
    let (_, file_name) = path.rsplit_once('/')?;
    (!file_name.is_empty()).then_some(file_name)
}

/// Stores each URL of `graph_name` under a directory named after the graph.
pub(crate) fn per_graph_paths(graph_name: &str, urls: &[String]) -> Vec<String> {
    urls.iter()
        .map(|url| {
            let file_name = file_name_from_url(url).unwrap_or(graph_name);
            format!("{graph_name}/{file_name}")
        })
        .collect()
}
