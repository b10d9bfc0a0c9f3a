//! Graph repository metadata and path resolution for graph-miner.
//!
//! A [`GraphRepository`] turns "graph X from repository Y" into the inputs a
//! graph constructor needs: download URLs, storage paths, citations, and
//! [`GraphParameters`]. Metadata tables ship with the crate and are loaded
//! once, when a repository is opened.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod metadata;
pub mod naming;
mod options;
mod parameters;
mod report;
mod repositories;
mod repository;
mod resources;
mod tag;

pub use crate::{
    error::{RepositoryError, RepositoryErrorCode, Result},
    metadata::{GraphArguments, GraphEntry, GraphMetadata, MetadataTable},
    options::{GraphOptions, RESERVED_PARAMETER_KEYS},
    parameters::GraphParameters,
    report::{DownloadRecord, DownloadReport},
    repositories::{
        KgHubRepository, LinqsRepository, NetworkRepository, StringRepository, YueRepository,
        open_repository,
    },
    repository::{GraphRepository, file_name_from_url, reported_path},
    resources::Resources,
    tag::RepositoryTag,
};
