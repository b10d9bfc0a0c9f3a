//! HTTP access used by the downloader.

use std::io::Read;

use crate::error::{Result, RetrievalError};

/// Source of remote file contents.
pub trait DownloadClient {
    /// Downloads the contents of `url`.
    ///
    /// # Errors
    /// Returns [`RetrievalError::Download`] if the request fails.
    fn download_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

impl<C: DownloadClient + ?Sized> DownloadClient for &C {
    fn download_bytes(&self, url: &str) -> Result<Vec<u8>> {
        (**self).download_bytes(url)
    }
}

/// [`DownloadClient`] backed by a `ureq` agent.
#[derive(Debug)]
pub struct UreqDownloadClient {
    agent: ureq::Agent,
}

impl UreqDownloadClient {
    /// Creates a client with `ureq`'s default agent configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
        }
    }
}

impl Default for UreqDownloadClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadClient for UreqDownloadClient {
    fn download_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let failure = |message: String| RetrievalError::Download {
            url: url.to_owned(),
            message,
        };
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|error| failure(error.to_string()))?;

        let mut reader = response.into_body().into_reader();
        let mut buffer = Vec::new();
        reader
            .read_to_end(&mut buffer)
            .map_err(|error| failure(error.to_string()))?;
        Ok(buffer)
    }
}
