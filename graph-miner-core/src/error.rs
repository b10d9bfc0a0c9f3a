//! Error types for the graph-miner core library.
//!
//! Defines the repository error enum, its stable error codes, and a convenient
//! result alias.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Generates a code enum mirroring the variants of an error enum, together
/// with `as_str`, `Display`, and a `code()` accessor on the error type.
#[macro_export]
#[doc(hidden)]
macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl ::std::fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error produced while loading or querying a [`crate::GraphRepository`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested graph is not a key of the repository metadata table.
    #[error("graph `{name}` is not available in the {repository} repository")]
    UnknownGraph {
        /// Formatted name of the repository that was queried.
        repository: &'static str,
        /// Graph name that failed the lookup.
        name: String,
    },
    /// The requested repository tag is not recognised.
    #[error("unknown graph repository `{tag}`")]
    UnknownRepository {
        /// Raw tag supplied by the caller.
        tag: String,
    },
    /// A required build argument is absent from the metadata table.
    #[error("graph `{graph}` declares no `{argument}` argument")]
    MissingArgument {
        /// Graph whose metadata lacks the argument.
        graph: String,
        /// Name of the missing argument.
        argument: &'static str,
    },
    /// The download report has no record for a URL the graph depends on.
    #[error("download report for graph `{graph}` has no record for `{url}`")]
    MissingReportEntry {
        /// Graph whose files were being resolved.
        graph: String,
        /// URL without a matching record.
        url: String,
    },
    /// A bundled resource file could not be read.
    #[error("failed to read repository resource `{path}`: {source}")]
    Resource {
        /// Path of the resource that failed to load.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// A metadata table did not match the expected JSON layout.
    #[error("malformed metadata table `{resource}`: {source}")]
    MalformedMetadata {
        /// Resource name of the offending table.
        resource: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

define_error_codes! {
    /// Stable codes describing [`RepositoryError`] variants.
    enum RepositoryErrorCode for RepositoryError {
        /// The requested graph is not a key of the repository metadata table.
        UnknownGraph => UnknownGraph { .. } => "REPOSITORY_UNKNOWN_GRAPH",
        /// The requested repository tag is not recognised.
        UnknownRepository => UnknownRepository { .. } => "REPOSITORY_UNKNOWN_REPOSITORY",
        /// A required build argument is absent from the metadata table.
        MissingArgument => MissingArgument { .. } => "REPOSITORY_MISSING_ARGUMENT",
        /// The download report has no record for a required URL.
        MissingReportEntry => MissingReportEntry { .. } => "REPOSITORY_MISSING_REPORT_ENTRY",
        /// A bundled resource file could not be read.
        Resource => Resource { .. } => "REPOSITORY_RESOURCE_UNAVAILABLE",
        /// A metadata table did not match the expected JSON layout.
        MalformedMetadata => MalformedMetadata { .. } => "REPOSITORY_MALFORMED_METADATA",
    }
}

impl RepositoryError {
    /// Builds an [`RepositoryError::UnknownGraph`] for `name`.
    pub(crate) fn unknown_graph(repository: &'static str, name: &str) -> Self {
        Self::UnknownGraph {
            repository,
            name: name.to_owned(),
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, RepositoryError>;
