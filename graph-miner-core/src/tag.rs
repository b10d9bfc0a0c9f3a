//! Identifiers for the supported graph repositories.

use std::{fmt, str::FromStr};

use crate::error::RepositoryError;

/// Remote catalogue a graph is published in.
///
/// # Examples
/// ```
/// use graph_miner_core::RepositoryTag;
///
/// let tag: RepositoryTag = "KGHub".parse()?;
/// assert_eq!(tag, RepositoryTag::KgHub);
/// assert_eq!(tag.as_str(), "kghub");
/// assert_eq!(tag.formatted_name(), "KGHub");
/// # Ok::<(), graph_miner_core::RepositoryError>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum RepositoryTag {
    /// Knowledge graphs from KG-Hub.
    KgHub,
    /// Protein-protein association networks from STRING.
    String,
    /// Networks from networkrepository.com.
    NetworkRepository,
    /// Biomedical benchmark graphs collected by Yue et al.
    Yue,
    /// Citation networks from the LINQS group.
    Linqs,
}

impl RepositoryTag {
    /// Every supported repository, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::KgHub,
        Self::String,
        Self::NetworkRepository,
        Self::Yue,
        Self::Linqs,
    ];

    /// Returns the lower-case tag used in cache paths and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::KgHub => "kghub",
            Self::String => "string",
            Self::NetworkRepository => "networkrepository",
            Self::Yue => "yue",
            Self::Linqs => "linqs",
        }
    }

    /// Returns the human-readable repository label.
    #[must_use]
    pub const fn formatted_name(self) -> &'static str {
        match self {
            Self::KgHub => "KGHub",
            Self::String => "STRING",
            Self::NetworkRepository => "NetworkRepository",
            Self::Yue => "Yue",
            Self::Linqs => "LINQS",
        }
    }

    /// Returns the file stem of the repository's bundled resources.
    #[must_use]
    pub const fn resource_stem(self) -> &'static str {
        match self {
            Self::KgHub => "kg_hub",
            Self::String => "string",
            Self::NetworkRepository => "network_repository",
            Self::Yue => "yue",
            Self::Linqs => "linqs",
        }
    }
}

impl fmt::Display for RepositoryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepositoryTag {
    type Err = RepositoryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        Self::ALL
            .into_iter()
            .find(|tag| {
                tag.as_str().eq_ignore_ascii_case(wanted)
                    || tag.resource_stem().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| RepositoryError::UnknownRepository {
                tag: raw.to_owned(),
            })
    }
}
