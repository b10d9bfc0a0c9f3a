//! Access to the metadata tables and citation files shipped with each
//! repository.
//!
//! The default [`Resources::Bundled`] source serves files compiled into the
//! crate. [`Resources::Directory`] reads `<stem>.json` and `<stem>.bib` from a
//! directory at runtime, which lets deployments refresh catalogues without a
//! rebuild.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    error::{RepositoryError, Result},
    metadata::MetadataTable,
    tag::RepositoryTag,
};

/// Where repository resources are loaded from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Resources {
    /// Files compiled into the crate.
    #[default]
    Bundled,
    /// Files read from the given directory.
    Directory(PathBuf),
}

impl Resources {
    /// Creates a directory-backed resource source.
    #[must_use]
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self::Directory(path.into())
    }

    /// Loads and parses the metadata table of `tag`.
    ///
    /// # Errors
    /// Returns [`RepositoryError::Resource`] if the table file cannot be read
    /// and [`RepositoryError::MalformedMetadata`] if it does not parse.
    pub fn load_table(&self, tag: RepositoryTag) -> Result<MetadataTable> {
        let file_name = format!("{}.json", tag.resource_stem());
        let table = match self {
            Self::Bundled => MetadataTable::from_json_str(&file_name, bundled_table(tag))?,
            Self::Directory(root) => {
                let text = read_resource(&root.join(&file_name))?;
                MetadataTable::from_json_str(&file_name, &text)?
            }
        };
        debug!(
            repository = tag.as_str(),
            graphs = table.len(),
            "loaded metadata table"
        );
        Ok(table)
    }

    /// Returns the citation text of `tag`.
    ///
    /// # Errors
    /// Returns [`RepositoryError::Resource`] if the citation file of a
    /// directory source cannot be read.
    pub fn read_citation(&self, tag: RepositoryTag) -> Result<String> {
        match self {
            Self::Bundled => Ok(bundled_citation(tag).to_owned()),
            Self::Directory(root) => {
                read_resource(&root.join(format!("{}.bib", tag.resource_stem())))
            }
        }
    }
}

fn read_resource(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| RepositoryError::Resource {
        path: path.to_path_buf(),
        source,
    })
}

const fn bundled_table(tag: RepositoryTag) -> &'static str {
    match tag {
        RepositoryTag::KgHub => include_str!("../resources/kg_hub.json"),
        RepositoryTag::String => include_str!("../resources/string.json"),
        RepositoryTag::NetworkRepository => include_str!("../resources/network_repository.json"),
        RepositoryTag::Yue => include_str!("../resources/yue.json"),
        RepositoryTag::Linqs => include_str!("../resources/linqs.json"),
    }
}

const fn bundled_citation(tag: RepositoryTag) -> &'static str {
    match tag {
        RepositoryTag::KgHub => include_str!("../resources/kg_hub.bib"),
        RepositoryTag::String => include_str!("../resources/string.bib"),
        RepositoryTag::NetworkRepository => include_str!("../resources/network_repository.bib"),
        RepositoryTag::Yue => include_str!("../resources/yue.bib"),
        RepositoryTag::Linqs => include_str!("../resources/linqs.bib"),
    }
}
