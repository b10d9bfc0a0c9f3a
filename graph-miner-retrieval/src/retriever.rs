//! Repository → downloader → parameters pipeline.

use std::path::{Path, PathBuf};

use graph_miner_core::{
    DownloadReport, GraphOptions, GraphParameters, GraphRepository, RepositoryTag, Resources,
    open_repository,
};
use tracing::{info, instrument};

use crate::{
    client::{DownloadClient, UreqDownloadClient},
    config::default_cache_root,
    downloader::Downloader,
    error::{Result, RetrievalError},
};

/// Caller choices for one retrieval.
#[derive(Clone, Debug, PartialEq)]
pub struct RetrievalOptions {
    /// Whether the graph is loaded as directed. Always overrides the
    /// repository metadata.
    pub directed: bool,
    /// Progress verbosity; see [`Downloader::with_verbosity`].
    pub verbose: u8,
    /// Directory the graph's files are cached in. Defaults to
    /// `<cache root>/<repository tag>`.
    pub cache_path: Option<PathBuf>,
    /// Constructor options layered over the repository arguments.
    pub additional: GraphOptions,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self {
            directed: false,
            verbose: 2,
            cache_path: None,
            additional: GraphOptions::default(),
        }
    }
}

/// External builder that turns parameters into a graph.
pub trait GraphConstructor {
    /// Graph type produced by the constructor.
    type Graph;
    /// Error raised when construction fails.
    type Error;

    /// Builds the graph described by `parameters`.
    ///
    /// # Errors
    /// Returns the constructor's own error when the graph cannot be built.
    fn construct(&self, parameters: &GraphParameters) -> core::result::Result<Self::Graph, Self::Error>;
}

/// Outcome of a successful retrieval.
#[derive(Clone, Debug, PartialEq)]
pub struct RetrievedGraph {
    repository: RepositoryTag,
    parameters: GraphParameters,
    report: DownloadReport,
    cache_dir: PathBuf,
    citations: Vec<String>,
}

impl RetrievedGraph {
    /// Returns the repository the graph came from.
    #[must_use]
    pub const fn repository(&self) -> RepositoryTag {
        self.repository
    }

    /// Returns the stored graph name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.parameters.name()
    }

    /// Returns the constructor parameters with paths rooted in the cache.
    #[must_use]
    pub const fn parameters(&self) -> &GraphParameters {
        &self.parameters
    }

    /// Returns what the downloader fetched or reused.
    #[must_use]
    pub const fn report(&self) -> &DownloadReport {
        &self.report
    }

    /// Returns the directory the graph's files are cached in.
    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the citations to credit when using the graph.
    #[must_use]
    pub fn citations(&self) -> &[String] {
        &self.citations
    }

    /// Hands the parameters to `constructor`.
    ///
    /// # Errors
    /// Returns the constructor's error unchanged.
    pub fn build<C: GraphConstructor>(&self, constructor: &C) -> core::result::Result<C::Graph, C::Error> {
        constructor.construct(&self.parameters)
    }
}

/// Retrieves graphs from any repository through one download client.
///
/// # Examples
/// ```no_run
/// use graph_miner_core::RepositoryTag;
/// use graph_miner_retrieval::{GraphRetriever, RetrievalOptions};
///
/// let retriever = GraphRetriever::new().with_cache_root("/tmp/graphs");
/// let graph = retriever.retrieve(RepositoryTag::Linqs, "Cora", &RetrievalOptions::default())?;
/// assert!(graph.parameters().edge_path().starts_with("/tmp/graphs/linqs"));
/// # Ok::<(), graph_miner_retrieval::RetrievalError>(())
/// ```
#[derive(Debug)]
pub struct GraphRetriever<C = UreqDownloadClient> {
    resources: Resources,
    cache_root: PathBuf,
    client: C,
}

impl GraphRetriever {
    /// Creates a retriever over the bundled tables, the `ureq` client, and the
    /// default cache root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resources: Resources::Bundled,
            cache_root: default_cache_root(),
            client: UreqDownloadClient::new(),
        }
    }
}

impl Default for GraphRetriever {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: DownloadClient> GraphRetriever<C> {
    /// Replaces the download client.
    #[must_use]
    pub fn with_client<D: DownloadClient>(self, client: D) -> GraphRetriever<D> {
        GraphRetriever {
            resources: self.resources,
            cache_root: self.cache_root,
            client,
        }
    }

    /// Loads repository tables from `resources`.
    #[must_use]
    pub fn with_resources(mut self, resources: Resources) -> Self {
        self.resources = resources;
        self
    }

    /// Caches each repository under `<cache_root>/<tag>`.
    #[must_use]
    pub fn with_cache_root(mut self, cache_root: impl Into<PathBuf>) -> Self {
        self.cache_root = cache_root.into();
        self
    }

    /// Returns the download client.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Retrieves `graph_name` from the repository identified by `tag`.
    ///
    /// # Errors
    /// Returns [`RetrievalError::Repository`] when the repository cannot be
    /// opened or does not list the graph, and any download error.
    pub fn retrieve(
        &self,
        tag: RepositoryTag,
        graph_name: &str,
        options: &RetrievalOptions,
    ) -> Result<RetrievedGraph> {
        let repository = open_repository(tag, &self.resources)?;
        self.retrieve_from(repository.as_ref(), graph_name, options)
    }

    /// Retrieves `graph_name` from an already opened repository.
    ///
    /// The name is normalised first, so any form accepted by
    /// [`GraphRepository::build_stored_graph_name`] works.
    ///
    /// # Errors
    /// Returns [`RetrievalError::Repository`] when the graph is not listed or
    /// its paths cannot be resolved, and any download error.
    #[instrument(
        name = "retrieval.retrieve",
        err,
        skip(self, repository, options),
        fields(repository = repository.formatted_name(), graph = graph_name),
    )]
    pub fn retrieve_from(
        &self,
        repository: &dyn GraphRepository,
        graph_name: &str,
        options: &RetrievalOptions,
    ) -> Result<RetrievedGraph> {
        let name = repository.build_stored_graph_name(graph_name);
        let entry = repository.entry(&name)?;
        let urls = repository.graph_urls(entry);
        let paths = repository.graph_paths(&name, urls);

        let cache_dir = self.cache_dir_for(repository.tag(), options)?;
        let report = Downloader::new(&cache_dir, &self.client)
            .with_verbosity(options.verbose)
            .download(urls, paths.as_deref())?;

        let edge_path = repository.edge_list_path(&name, &report)?;
        let node_path = repository.node_list_path(&name, &report)?;
        let parameters = repository
            .build_graph_parameters(&name, &edge_path, node_path.as_deref())?
            .with_options(&options.additional)
            .with_directed(options.directed)
            .rebased_onto(&cache_dir);
        let citations = repository.graph_citations(entry)?;

        if options.verbose >= 1 {
            info!(
                graph = %name,
                edge_path = %parameters.edge_path().display(),
                cached = report.cached_count(),
                "graph retrieved"
            );
        }

        Ok(RetrievedGraph {
            repository: repository.tag(),
            parameters,
            report,
            cache_dir,
            citations,
        })
    }

    fn cache_dir_for(&self, tag: RepositoryTag, options: &RetrievalOptions) -> Result<PathBuf> {
        let cache_dir = options
            .cache_path
            .clone()
            .unwrap_or_else(|| self.cache_root.join(tag.as_str()));
        std::path::absolute(&cache_dir).map_err(|source| RetrievalError::io(cache_dir, source))
    }
}

/// Retrieves `graph_name` from the repository identified by `tag` using the
/// bundled tables and the default download client.
///
/// # Errors
/// See [`GraphRetriever::retrieve`].
///
/// # Examples
/// ```no_run
/// use graph_miner_core::RepositoryTag;
/// use graph_miner_retrieval::{RetrievalOptions, retrieve};
///
/// let options = RetrievalOptions { directed: true, ..RetrievalOptions::default() };
/// let graph = retrieve(RepositoryTag::String, "veillonella parvula", &options)?;
/// assert_eq!(graph.name(), "VeillonellaParvula");
/// # Ok::<(), graph_miner_retrieval::RetrievalError>(())
/// ```
pub fn retrieve(
    tag: RepositoryTag,
    graph_name: &str,
    options: &RetrievalOptions,
) -> Result<RetrievedGraph> {
    GraphRetriever::new().retrieve(tag, graph_name, options)
}
