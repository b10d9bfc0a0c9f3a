use std::path::PathBuf;

use crate::{
    error::{RepositoryError, Result},
    metadata::MetadataTable,
    naming::camel_words,
    report::DownloadReport,
    repository::{GraphRepository, per_graph_paths, reported_path},
    resources::Resources,
    tag::RepositoryTag,
};

define_repository! {
    /// Protein-protein association networks from STRING.
    ///
    /// Graphs are keyed by the camel-cased species name. The first URL of a
    /// graph fetches its links and the second its protein information; both
    /// are located through the download report because their file names
    /// depend on the STRING release.
    StringRepository => RepositoryTag::String
}

impl GraphRepository for StringRepository {
    fn tag(&self) -> RepositoryTag {
        RepositoryTag::String
    }

    fn table(&self) -> &MetadataTable {
        &self.table
    }

    fn resources(&self) -> &Resources {
        &self.resources
    }

    fn build_stored_graph_name(&self, partial_graph_name: &str) -> String {
        camel_words(partial_graph_name)
    }

    fn graph_paths(&self, graph_name: &str, urls: &[String]) -> Option<Vec<String>> {
        Some(per_graph_paths(graph_name, urls))
    }

    fn node_list_path(
        &self,
        graph_name: &str,
        download_report: &DownloadReport,
    ) -> Result<Option<PathBuf>> {
        reported_path(self, graph_name, 1, download_report)
    }

    fn edge_list_path(&self, graph_name: &str, download_report: &DownloadReport) -> Result<PathBuf> {
        reported_path(self, graph_name, 0, download_report)?.ok_or_else(|| {
            RepositoryError::MissingArgument {
                graph: graph_name.to_owned(),
                argument: "urls",
            }
        })
    }
}
