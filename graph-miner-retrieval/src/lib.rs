//! Automatic graph retrieval for graph-miner.
//!
//! [`retrieve`] is the single entry point: it opens the repository named by a
//! [`graph_miner_core::RepositoryTag`], downloads (or reuses) the graph's
//! files, and returns the parameters an external constructor needs.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod client;
mod config;
mod downloader;
mod error;
mod retriever;

pub use crate::{
    client::{DownloadClient, UreqDownloadClient},
    config::{CACHE_DIR_ENV, DEFAULT_CACHE_ROOT, default_cache_root},
    downloader::Downloader,
    error::{Result, RetrievalError, RetrievalErrorCode},
    retriever::{GraphConstructor, GraphRetriever, RetrievalOptions, RetrievedGraph, retrieve},
};
