use crate::{
    metadata::MetadataTable, naming::upper_alphanumeric, repository::GraphRepository,
    resources::Resources, tag::RepositoryTag,
};

define_repository! {
    /// Biomedical benchmark graphs from "Graph embedding on biomedical
    /// networks" by Yue et al.
    ///
    /// Stored names are the upper-cased alphanumerics of the dataset label,
    /// so `CTD-DDA` is stored as `CTDDDA`.
    YueRepository => RepositoryTag::Yue
}

impl GraphRepository for YueRepository {
    fn tag(&self) -> RepositoryTag {
        RepositoryTag::Yue
    }

    fn table(&self) -> &MetadataTable {
        &self.table
    }

    fn resources(&self) -> &Resources {
        &self.resources
    }

    fn build_stored_graph_name(&self, partial_graph_name: &str) -> String {
        upper_alphanumeric(partial_graph_name)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::{error::RepositoryError, report::DownloadReport};
    use rstest::{fixture, rstest};

    #[fixture]
    fn repository() -> YueRepository {
        YueRepository::bundled().expect("bundled Yue table must load")
    }

    #[rstest]
    #[case("ctd-dda", "CTDDDA")]
    #[case("NDFRT_DDA", "NDFRTDDA")]
    #[case("DrugBank DDI", "DRUGBANKDDI")]
    fn normalises_dataset_labels(
        repository: YueRepository,
        #[case] raw: &str,
        #[case] expected: &str,
    ) {
        let stored = repository.build_stored_graph_name(raw);
        assert_eq!(stored, expected);
        assert!(repository.entry(&stored).is_ok(), "{stored} is bundled");
    }

    #[rstest]
    fn edge_list_comes_from_the_arguments(repository: YueRepository) {
        let path = repository
            .edge_list_path("CTDDDA", &DownloadReport::default())
            .expect("edge path is declared");
        assert_eq!(path, Path::new("CTD_DDA.edgelist"));
        assert_eq!(
            repository
                .node_list_path("CTDDDA", &DownloadReport::default())
                .expect("lookup succeeds"),
            None
        );
    }

    #[rstest]
    fn unknown_graphs_are_reported(repository: YueRepository) {
        let err = repository
            .edge_list_path("PPIGRAPH", &DownloadReport::default())
            .expect_err("unknown graph must fail");
        assert!(matches!(
            err,
            RepositoryError::UnknownGraph { repository: "Yue", ref name } if name == "PPIGRAPH"
        ));
    }
}
