//! Cache location configuration.

use std::{env, ffi::OsString, path::PathBuf};

/// Environment variable overriding the cache root.
pub const CACHE_DIR_ENV: &str = "GRAPH_MINER_CACHE_DIR";

/// Cache root used when [`CACHE_DIR_ENV`] is unset, relative to the working
/// directory.
pub const DEFAULT_CACHE_ROOT: &str = "graphs";

/// Returns the directory under which each repository keeps its downloads.
///
/// Graphs of a repository are cached in `<root>/<tag>`, where `<tag>` is
/// [`graph_miner_core::RepositoryTag::as_str`].
#[must_use]
pub fn default_cache_root() -> PathBuf {
    cache_root_from(env::var_os(CACHE_DIR_ENV))
}

fn cache_root_from(explicit: Option<OsString>) -> PathBuf {
    explicit
        .filter(|value| !value.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_CACHE_ROOT), PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, "graphs")]
    #[case(Some(""), "graphs")]
    #[case(Some("/var/cache/graphs"), "/var/cache/graphs")]
    fn explicit_roots_win_when_set(#[case] explicit: Option<&str>, #[case] expected: &str) {
        assert_eq!(
            cache_root_from(explicit.map(OsString::from)),
            PathBuf::from(expected)
        );
    }
}
