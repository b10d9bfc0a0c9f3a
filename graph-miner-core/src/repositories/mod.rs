//! Concrete repositories, one per remote catalogue.

/// Declares a repository struct holding its metadata table and resource
/// source, together with its constructors.
macro_rules! define_repository {
    ($(#[$meta:meta])* $name:ident => $tag:expr) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name {
            table: $crate::metadata::MetadataTable,
            resources: $crate::resources::Resources,
        }

        impl $name {
            /// Loads the repository's metadata table from `resources`.
            ///
            /// # Errors
            /// Returns [`crate::RepositoryError`] when the table cannot be read
            /// or parsed.
            pub fn new(resources: &$crate::resources::Resources) -> $crate::error::Result<Self> {
                Ok(Self {
                    table: resources.load_table($tag)?,
                    resources: resources.clone(),
                })
            }

            /// Loads the repository from the tables compiled into the crate.
            ///
            /// # Errors
            /// Returns [`crate::RepositoryError::MalformedMetadata`] if the
            /// bundled table does not parse.
            pub fn bundled() -> $crate::error::Result<Self> {
                Self::new(&$crate::resources::Resources::Bundled)
            }
        }
    };
}

mod kg_hub;
mod linqs;
mod network_repository;
mod string;
mod yue;

pub use kg_hub::KgHubRepository;
pub use linqs::LinqsRepository;
pub use network_repository::NetworkRepository;
pub use string::StringRepository;
pub use yue::YueRepository;

use crate::{error::Result, repository::GraphRepository, resources::Resources, tag::RepositoryTag};

/// Opens the repository identified by `tag`, loading its table from
/// `resources`.
///
/// # Errors
/// Returns [`crate::RepositoryError`] when the table cannot be read or parsed.
///
/// # Examples
/// ```
/// use graph_miner_core::{RepositoryTag, Resources, open_repository};
///
/// let repository = open_repository(RepositoryTag::Yue, &Resources::Bundled)?;
/// assert_eq!(repository.formatted_name(), "Yue");
/// assert_eq!(repository.build_stored_graph_name("ctd-dda"), "CTDDDA");
/// # Ok::<(), graph_miner_core::RepositoryError>(())
/// ```
pub fn open_repository(
    tag: RepositoryTag,
    resources: &Resources,
) -> Result<Box<dyn GraphRepository>> {
    Ok(match tag {
        RepositoryTag::KgHub => Box::new(KgHubRepository::new(resources)?),
        RepositoryTag::String => Box::new(StringRepository::new(resources)?),
        RepositoryTag::NetworkRepository => Box::new(NetworkRepository::new(resources)?),
        RepositoryTag::Yue => Box::new(YueRepository::new(resources)?),
        RepositoryTag::Linqs => Box::new(LinqsRepository::new(resources)?),
    })
}
