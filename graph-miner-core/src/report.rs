//! Download reports describing where fetched files ended up.

use std::path::{Path, PathBuf};

/// One attempted or reused download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadRecord {
    /// URL the file was fetched from.
    pub url: String,
    /// Local path of the downloaded payload.
    pub destination: PathBuf,
    /// Local path of the decompressed payload, when the download was an
    /// archive.
    pub extracted: Option<PathBuf>,
    /// Whether the payload was already present in the cache.
    pub cached: bool,
}

impl DownloadRecord {
    /// Returns the path a loader should read: the decompressed payload when
    /// one exists, the raw download otherwise.
    #[must_use]
    pub fn final_path(&self) -> &Path {
        self.extracted.as_deref().unwrap_or(&self.destination)
    }
}

/// Ordered rows produced by a downloader.
///
/// # Examples
/// ```
/// use std::path::{Path, PathBuf};
/// use graph_miner_core::{DownloadRecord, DownloadReport};
///
/// let report = DownloadReport::new(vec![DownloadRecord {
///     url: "http://example.com/a.tsv.gz".into(),
///     destination: PathBuf::from("cache/a.tsv.gz"),
///     extracted: Some(PathBuf::from("cache/a.tsv")),
///     cached: false,
/// }]);
/// let record = report.find_by_url("http://example.com/a.tsv.gz").expect("record");
/// assert_eq!(record.final_path(), Path::new("cache/a.tsv"));
/// assert!(report.find_by_url("http://example.com/b.tsv").is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DownloadReport {
    records: Vec<DownloadRecord>,
}

impl DownloadReport {
    /// Creates a report from its records.
    #[must_use]
    pub fn new(records: Vec<DownloadRecord>) -> Self {
        Self { records }
    }

    /// Returns the records in download order.
    #[must_use]
    pub fn records(&self) -> &[DownloadRecord] {
        &self.records
    }

    /// Returns the first record fetched from `url`.
    #[must_use]
    pub fn find_by_url(&self, url: &str) -> Option<&DownloadRecord> {
        self.records.iter().find(|record| record.url == url)
    }

    /// Returns how many records were served from the cache.
    #[must_use]
    pub fn cached_count(&self) -> usize {
        self.records.iter().filter(|record| record.cached).count()
    }
}
