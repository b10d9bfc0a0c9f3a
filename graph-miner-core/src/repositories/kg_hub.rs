use crate::{
    metadata::MetadataTable, repository::GraphRepository, resources::Resources,
    tag::RepositoryTag,
};

define_repository! {
    /// Knowledge graphs published on KG-Hub.
    ///
    /// Graph names are stored exactly as KG-Hub publishes them, and every
    /// path is declared in the metadata table.
    KgHubRepository => RepositoryTag::KgHub
}

impl GraphRepository for KgHubRepository {
    fn tag(&self) -> RepositoryTag {
        RepositoryTag::KgHub
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
}
