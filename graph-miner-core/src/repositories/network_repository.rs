use std::path::PathBuf;

use crate::{
    error::{RepositoryError, Result},
    metadata::{GraphEntry, MetadataTable},
    naming::lower_alphanumeric,
    report::DownloadReport,
    repository::{GraphRepository, reported_path},
    resources::Resources,
    tag::RepositoryTag,
};

define_repository! {
    /// Networks from networkrepository.com.
    ///
    /// Stored names are CamelCase display names; a request matches the graph
    /// whose name has the same lower-cased alphanumerics, so published file
    /// names such as `soc-karate` resolve. Each graph is a single edge list,
    /// found through the download report.
    NetworkRepository => RepositoryTag::NetworkRepository
}

impl GraphRepository for NetworkRepository {
    fn tag(&self) -> RepositoryTag {
        RepositoryTag::NetworkRepository
    }

    fn table(&self) -> &MetadataTable {
        &self.table
    }

    fn resources(&self) -> &Resources {
        &self.resources
    }

    fn build_stored_graph_name(&self, partial_graph_name: &str) -> String {
        let wanted = lower_alphanumeric(partial_graph_name);
        self.table
            .entries()
            .iter()
            .map(GraphEntry::name)
            .find(|name| lower_alphanumeric(name) == wanted)
            .map_or(wanted, str::to_owned)
    }

    fn node_list_path(
        &self,
        graph_name: &str,
        download_report: &DownloadReport,
    ) -> Result<Option<PathBuf>> {
        let _ = download_report;
        self.entry(graph_name)?;
        Ok(None)
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
