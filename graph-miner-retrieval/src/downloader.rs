//! Download-and-cache step producing a [`DownloadReport`].

use std::{
    ffi::OsString,
    fs,
    io::Read,
    path::{Path, PathBuf},
};

use flate2::read::GzDecoder;
use graph_miner_core::{DownloadRecord, DownloadReport, file_name_from_url};
use tracing::{debug, info, instrument, warn};

use crate::{
    client::DownloadClient,
    error::{Result, RetrievalError},
};

const GZIP_EXTENSION: &str = "gz";

/// Fetches URLs into a cache directory, reusing files already present.
///
/// Each payload is stored at `cache_dir/<path>`, where `<path>` is the
/// storage path declared for the URL or, when none is declared, the URL's
/// file name. Payloads ending in `.gz` are also decompressed next to the
/// archive; a payload that does not decompress is never written, and a cached
/// archive that no longer decompresses is downloaded again.
///
/// # Examples
/// ```
/// use graph_miner_retrieval::{DownloadClient, Downloader, Result};
///
/// struct Static;
///
/// impl DownloadClient for Static {
///     fn download_bytes(&self, _url: &str) -> Result<Vec<u8>> {
///         Ok(b"a\tb\n".to_vec())
///     }
/// }
///
/// let cache = tempfile::tempdir()?;
/// let downloader = Downloader::new(cache.path(), Static);
/// let report = downloader.download(&["http://example.com/edges.tsv".to_owned()], None)?;
/// assert_eq!(report.records()[0].final_path(), cache.path().join("edges.tsv"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Downloader<C> {
    cache_dir: PathBuf,
    client: C,
    verbose: u8,
}

impl<C: DownloadClient> Downloader<C> {
    /// Creates a downloader storing files under `cache_dir`.
    pub fn new(cache_dir: impl Into<PathBuf>, client: C) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            client,
            verbose: 0,
        }
    }

    /// Sets how much progress is reported at `info` level.
    ///
    /// `0` keeps progress at `debug`, `1` reports fresh downloads, and `2` or
    /// more also reports cache hits.
    #[must_use]
    pub fn with_verbosity(mut self, verbose: u8) -> Self {
        self.verbose = verbose;
        self
    }

    /// Returns the directory downloads are stored in.
    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Downloads every URL not already cached and describes where each file
    /// ended up.
    ///
    /// # Errors
    /// Returns [`RetrievalError::PathCountMismatch`] when `paths` and `urls`
    /// differ in length, [`RetrievalError::InvalidUrl`] when a URL without a
    /// declared path has no file name, and the client, I/O, or decompression
    /// error of the first file that fails.
    #[instrument(
        name = "retrieval.download",
        err,
        skip(self, urls, paths),
        fields(cache_dir = %self.cache_dir.display(), urls = urls.len()),
    )]
    pub fn download(&self, urls: &[String], paths: Option<&[String]>) -> Result<DownloadReport> {
        if let Some(declared) = paths
            && declared.len() != urls.len()
        {
            return Err(RetrievalError::PathCountMismatch {
                urls: urls.len(),
                paths: declared.len(),
            });
        }

        let mut records = Vec::with_capacity(urls.len());
        for (position, url) in urls.iter().enumerate() {
            let declared = paths.and_then(|declared| declared.get(position));
            let relative = match declared {
                Some(path) => path.as_str(),
                None => file_name_from_url(url)
                    .ok_or_else(|| RetrievalError::InvalidUrl { url: url.clone() })?,
            };
            records.push(self.fetch(url, &self.cache_dir.join(relative))?);
        }
        Ok(DownloadReport::new(records))
    }

    fn fetch(&self, url: &str, destination: &Path) -> Result<DownloadRecord> {
        let extracted = is_gzip(destination).then(|| destination.with_extension(""));
        if destination.is_file() {
            match restore_extracted(destination, extracted.as_deref()) {
                Ok(()) => {
                    self.report_cache_hit(url, destination);
                    return Ok(DownloadRecord {
                        url: url.to_owned(),
                        destination: destination.to_path_buf(),
                        extracted,
                        cached: true,
                    });
                }
                Err(err) => warn!(
                    url,
                    archive = %destination.display(),
                    error = %err,
                    "cached archive is unreadable, downloading again"
                ),
            }
        }

        let payload = self.client.download_bytes(url)?;
        let decompressed = match &extracted {
            Some(_) => Some(gunzip_bytes(destination, &payload)?),
            None => None,
        };
        write_atomic(destination, &payload)?;
        if let (Some(target), Some(bytes)) = (&extracted, &decompressed) {
            write_atomic(target, bytes)?;
            debug!(archive = %destination.display(), target = %target.display(), "decompressed");
        }
        self.report_download(url, destination, payload.len());

        Ok(DownloadRecord {
            url: url.to_owned(),
            destination: destination.to_path_buf(),
            extracted,
            cached: false,
        })
    }

    fn report_download(&self, url: &str, destination: &Path, bytes: usize) {
        if self.verbose >= 1 {
            info!(url, destination = %destination.display(), bytes, "downloaded graph file");
        } else {
            debug!(url, destination = %destination.display(), bytes, "downloaded graph file");
        }
    }

    fn report_cache_hit(&self, url: &str, destination: &Path) {
        if self.verbose >= 2 {
            info!(url, destination = %destination.display(), "reusing cached graph file");
        } else {
            debug!(url, destination = %destination.display(), "reusing cached graph file");
        }
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case(GZIP_EXTENSION))
}

/// Recreates the decompressed copy of a cached archive when it is missing.
fn restore_extracted(archive: &Path, target: Option<&Path>) -> Result<()> {
    let Some(target) = target.filter(|target| !target.is_file()) else {
        return Ok(());
    };
    let compressed = fs::read(archive).map_err(|source| RetrievalError::io(archive, source))?;
    write_atomic(target, &gunzip_bytes(archive, &compressed)?)?;
    debug!(archive = %archive.display(), target = %target.display(), "decompressed");
    Ok(())
}

/// Decompresses a gzip payload in memory, so a corrupt download never
/// reaches the cache.
fn gunzip_bytes(archive: &Path, compressed: &[u8]) -> Result<Vec<u8>> {
    let mut decompressed = Vec::new();
    GzDecoder::new(compressed)
        .read_to_end(&mut decompressed)
        .map_err(|source| RetrievalError::Decompress {
            path: archive.to_path_buf(),
            source,
        })?;
    Ok(decompressed)
}

/// Writes `bytes` to a sibling `.part` file and renames it into place, so an
/// interrupted write never leaves a truncated file at `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| RetrievalError::io(parent, source))?;
    }
    let part_path = part_path(path);
    fs::write(&part_path, bytes).map_err(|source| RetrievalError::io(&part_path, source))?;
    fs::rename(&part_path, path).map_err(|source| RetrievalError::io(path, source))
}

fn part_path(path: &Path) -> PathBuf {
    let mut raw = OsString::from(path.as_os_str());
    raw.push(".part");
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use std::{
        cell::RefCell,
        collections::{HashMap, VecDeque},
        io::Write,
    };

    use super::*;
    use flate2::{Compression, write::GzEncoder};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct FakeClient {
        payloads: HashMap<String, Vec<u8>>,
        call_count: RefCell<usize>,
    }

    impl FakeClient {
        fn new<const N: usize>(payloads: [(&str, Vec<u8>); N]) -> Self {
            Self {
                payloads: payloads
                    .into_iter()
                    .map(|(url, payload)| (url.to_owned(), payload))
                    .collect(),
                call_count: RefCell::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.call_count.borrow()
        }
    }

    impl DownloadClient for FakeClient {
        fn download_bytes(&self, url: &str) -> Result<Vec<u8>> {
            *self.call_count.borrow_mut() += 1;
            self.payloads
                .get(url)
                .cloned()
                .ok_or_else(|| RetrievalError::Download {
                    url: url.to_owned(),
                    message: "missing fake payload".to_owned(),
                })
        }
    }

    /// Serves the queued payloads in order, whatever the URL.
    struct SequenceClient {
        payloads: RefCell<VecDeque<Vec<u8>>>,
        call_count: RefCell<usize>,
    }

    impl SequenceClient {
        fn new<const N: usize>(payloads: [Vec<u8>; N]) -> Self {
            Self {
                payloads: RefCell::new(payloads.into_iter().collect()),
                call_count: RefCell::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.call_count.borrow()
        }
    }

    impl DownloadClient for SequenceClient {
        fn download_bytes(&self, url: &str) -> Result<Vec<u8>> {
            *self.call_count.borrow_mut() += 1;
            self.payloads
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| RetrievalError::Download {
                    url: url.to_owned(),
                    message: "no payload queued".to_owned(),
                })
        }
    }

    fn gzip_bytes(raw: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(raw)
            .expect("gzip payload writing must succeed in tests");
        encoder
            .finish()
            .expect("gzip payload finalization must succeed in tests")
    }

    fn urls(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|url| (*url).to_owned()).collect()
    }

    #[fixture]
    fn cache() -> TempDir {
        TempDir::new().expect("temporary cache directory")
    }

    #[rstest]
    fn reuses_cached_files(cache: TempDir) {
        let client = FakeClient::new([("http://example.com/a.tsv", b"1\t2\n".to_vec())]);
        let downloader = Downloader::new(cache.path(), &client);
        let targets = urls(&["http://example.com/a.tsv"]);

        let first = downloader.download(&targets, None).expect("first download");
        assert_eq!(client.calls(), 1);
        assert!(!first.records()[0].cached);

        let second = downloader.download(&targets, None).expect("second download");
        assert_eq!(client.calls(), 1);
        assert!(second.records()[0].cached);
        assert_eq!(second.cached_count(), 1);
        assert_eq!(
            fs::read(cache.path().join("a.tsv")).expect("cached file"),
            b"1\t2\n"
        );
    }

    #[rstest]
    fn decompresses_gzip_payloads(cache: TempDir) {
        let client = FakeClient::new([(
            "http://example.com/links.txt.gz",
            gzip_bytes(b"protein1 protein2 combined_score\n"),
        )]);
        let downloader = Downloader::new(cache.path(), &client);
        let report = downloader
            .download(
                &urls(&["http://example.com/links.txt.gz"]),
                Some(&urls(&["Species/links.txt.gz"])),
            )
            .expect("download succeeds");

        let record = &report.records()[0];
        assert_eq!(record.destination, cache.path().join("Species/links.txt.gz"));
        assert_eq!(record.final_path(), cache.path().join("Species/links.txt"));
        assert_eq!(
            fs::read_to_string(record.final_path()).expect("decompressed file"),
            "protein1 protein2 combined_score\n"
        );
    }

    #[rstest]
    fn restores_missing_decompressed_files_from_the_cache(cache: TempDir) {
        let client = FakeClient::new([("http://example.com/a.tsv.gz", gzip_bytes(b"x"))]);
        let downloader = Downloader::new(cache.path(), &client);
        let targets = urls(&["http://example.com/a.tsv.gz"]);
        downloader.download(&targets, None).expect("first download");
        fs::remove_file(cache.path().join("a.tsv")).expect("remove extracted file");

        let report = downloader.download(&targets, None).expect("second download");
        assert_eq!(client.calls(), 1);
        assert!(report.records()[0].final_path().is_file());
    }

    #[rstest]
    fn leaves_no_partial_files(cache: TempDir) {
        let client = FakeClient::new([("http://example.com/a.tsv", b"a".to_vec())]);
        Downloader::new(cache.path(), &client)
            .download(&urls(&["http://example.com/a.tsv"]), None)
            .expect("download succeeds");
        let names: Vec<_> = fs::read_dir(cache.path())
            .expect("cache listing")
            .map(|entry| entry.expect("entry").file_name())
            .collect();
        assert_eq!(names, [OsString::from("a.tsv")]);
    }

    #[rstest]
    fn rejects_mismatched_path_counts(cache: TempDir) {
        let client = FakeClient::new([]);
        let err = Downloader::new(cache.path(), &client)
            .download(&urls(&["http://example.com/a", "http://example.com/b"]), Some(&urls(&["a"])))
            .expect_err("counts differ");
        assert!(matches!(
            err,
            RetrievalError::PathCountMismatch { urls: 2, paths: 1 }
        ));
        assert_eq!(client.calls(), 0);
    }

    #[rstest]
    fn rejects_urls_without_file_names(cache: TempDir) {
        let client = FakeClient::new([]);
        let err = Downloader::new(cache.path(), &client)
            .download(&urls(&["http://example.com/"]), None)
            .expect_err("no file name");
        assert!(matches!(err, RetrievalError::InvalidUrl { ref url } if url == "http://example.com/"));
    }

    #[rstest]
    fn propagates_client_failures(cache: TempDir) {
        let client = FakeClient::new([]);
        let err = Downloader::new(cache.path(), &client)
            .download(&urls(&["http://example.com/missing.tsv"]), None)
            .expect_err("payload is missing");
        assert_eq!(err.code().as_str(), "RETRIEVAL_DOWNLOAD_FAILED");
        assert!(!cache.path().join("missing.tsv").exists());
    }

    #[rstest]
    fn reports_corrupt_archives(cache: TempDir) {
        let client = FakeClient::new([("http://example.com/a.tsv.gz", b"not gzip".to_vec())]);
        let err = Downloader::new(cache.path(), &client)
            .download(&urls(&["http://example.com/a.tsv.gz"]), None)
            .expect_err("archive is corrupt");
        assert!(matches!(err, RetrievalError::Decompress { ref path, .. } if path.ends_with("a.tsv.gz")));
        assert!(!cache.path().join("a.tsv.gz").exists());
    }

    #[rstest]
    fn corrupt_archives_are_fetched_again_on_retry(cache: TempDir) {
        let client = SequenceClient::new([b"truncated".to_vec(), gzip_bytes(b"1 2\n")]);
        let downloader = Downloader::new(cache.path(), &client);
        let targets = urls(&["http://example.com/links.txt.gz"]);

        let err = downloader
            .download(&targets, None)
            .expect_err("first payload is corrupt");
        assert!(matches!(err, RetrievalError::Decompress { .. }));

        let report = downloader.download(&targets, None).expect("retry succeeds");
        assert_eq!(client.calls(), 2);
        assert!(!report.records()[0].cached);
        assert_eq!(
            fs::read_to_string(cache.path().join("links.txt")).expect("decompressed file"),
            "1 2\n"
        );
    }

    #[rstest]
    fn unreadable_cached_archives_are_replaced(cache: TempDir) {
        fs::write(cache.path().join("links.txt.gz"), b"stale").expect("seed corrupt archive");
        let client = SequenceClient::new([gzip_bytes(b"fresh\n")]);

        let report = Downloader::new(cache.path(), &client)
            .download(&urls(&["http://example.com/links.txt.gz"]), None)
            .expect("corrupt cache entry is downloaded again");

        assert_eq!(client.calls(), 1);
        assert!(!report.records()[0].cached);
        assert_eq!(
            fs::read_to_string(report.records()[0].final_path()).expect("decompressed file"),
            "fresh\n"
        );
    }

    #[rstest]
    #[case("a.tsv", false)]
    #[case("a.tsv.gz", true)]
    #[case("a.TSV.GZ", true)]
    #[case("gz", false)]
    fn detects_gzip_by_extension(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_gzip(Path::new(name)), expected);
    }
}
