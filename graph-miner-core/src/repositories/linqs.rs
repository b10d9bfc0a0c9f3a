use crate::{
    metadata::MetadataTable,
    repository::{GraphRepository, per_graph_paths},
    resources::Resources,
    tag::RepositoryTag,
};

define_repository! {
    /// Citation networks distributed by the LINQS group.
    ///
    /// Each graph's files are stored in a directory named after the graph,
    /// matching the paths its metadata declares.
    LinqsRepository => RepositoryTag::Linqs
}

impl GraphRepository for LinqsRepository {
    fn tag(&self) -> RepositoryTag {
        RepositoryTag::Linqs
    }

    fn table(&self) -> &MetadataTable {
        &self.table
    }

    fn resources(&self) -> &Resources {
        &self.resources
    }

    fn build_stored_graph_name(&self, partial_graph_name: &str) -> String {
        partial_graph_name.to_owned()
    }

    fn graph_paths(&self, graph_name: &str, urls: &[String]) -> Option<Vec<String>> {
        Some(per_graph_paths(graph_name, urls))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::report::DownloadReport;
    use rstest::{fixture, rstest};

    #[fixture]
    fn repository() -> LinqsRepository {
        LinqsRepository::bundled().expect("bundled LINQS table must load")
    }

    #[rstest]
    #[case("Cora")]
    #[case("CiteSeer")]
    #[case("PubMedDiabetes")]
    fn storage_paths_match_declared_paths(repository: LinqsRepository, #[case] name: &str) {
        let entry = repository.entry(name).expect("graph is bundled");
        let paths = repository
            .graph_paths(name, repository.graph_urls(entry))
            .expect("LINQS declares storage paths");
        let report = DownloadReport::default();
        let edge = repository
            .edge_list_path(name, &report)
            .expect("edge path is declared");
        let node = repository
            .node_list_path(name, &report)
            .expect("lookup succeeds")
            .expect("node path is declared");
        assert_eq!(Path::new(&paths[0]), edge);
        assert_eq!(Path::new(&paths[1]), node);
    }

    #[rstest]
    fn pubmed_carries_its_own_citation(repository: LinqsRepository) {
        let entry = repository
            .entry("PubMedDiabetes")
            .expect("graph is bundled");
        let citations = repository
            .graph_citations(entry)
            .expect("bundled citations load");
        assert_eq!(citations.len(), 2);
        assert!(citations[0].contains("sen2008collective"));
        assert!(citations[1].contains("namata2012query"));
    }
}
