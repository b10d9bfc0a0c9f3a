//! Metadata tables describing the graphs a repository publishes.
//!
//! A table maps canonical graph names to download URLs and to the build
//! arguments the external graph constructor consumes. Tables are deserialised
//! from JSON objects and keep the document order of their keys.

use std::{collections::HashMap, fmt, path::PathBuf};

use serde::{
    Deserialize, Deserializer,
    de::{self, MapAccess, Visitor},
};

use crate::options::GraphOptions;

/// Build arguments stored for one graph.
///
/// `edge_path` and `node_path` are kept verbatim; every other recognised key
/// lands in [`GraphOptions`] and anything unrecognised in
/// [`GraphOptions::extra`].
///
/// # Examples
/// ```
/// use graph_miner_core::GraphArguments;
///
/// let arguments: GraphArguments = serde_json::from_str(
///     r#"{"edge_path": "foo/edges.tsv", "directed": false, "holdout": 3}"#,
/// )?;
/// assert_eq!(
///     arguments.edge_path.as_deref(),
///     Some(std::path::Path::new("foo/edges.tsv"))
/// );
/// assert_eq!(arguments.options.directed, Some(false));
/// assert!(arguments.options.extra.contains_key("holdout"));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct GraphArguments {
    /// Path of the edge list, as declared by the repository.
    pub edge_path: Option<PathBuf>,
    /// Path of the node list, as declared by the repository.
    pub node_path: Option<PathBuf>,
    /// Remaining constructor arguments.
    #[serde(flatten)]
    pub options: GraphOptions,
}

/// Metadata record for one graph.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct GraphMetadata {
    /// Download URLs in fetch order.
    #[serde(default)]
    pub urls: Vec<String>,
    /// Arguments forwarded to the graph constructor.
    #[serde(default)]
    pub arguments: GraphArguments,
    /// Optional citation specific to this graph.
    #[serde(default)]
    pub citation: Option<String>,
}

/// One `(name, metadata)` row of a [`MetadataTable`].
#[derive(Clone, Debug, PartialEq)]
pub struct GraphEntry {
    name: String,
    metadata: GraphMetadata,
}

impl GraphEntry {
    /// Creates an entry from its parts.
    #[must_use]
    pub fn new(name: impl Into<String>, metadata: GraphMetadata) -> Self {
        Self {
            name: name.into(),
            metadata,
        }
    }

    /// Returns the canonical graph name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the metadata stored for the graph.
    #[must_use]
    pub fn metadata(&self) -> &GraphMetadata {
        &self.metadata
    }
}

/// Ordered, immutable table of graph metadata keyed by canonical name.
///
/// # Examples
/// ```
/// use graph_miner_core::MetadataTable;
///
/// let table = MetadataTable::from_json_str(
///     "demo",
///     r#"{"B": {"urls": ["http://b"]}, "A": {"urls": []}}"#,
/// )?;
/// let names: Vec<_> = table.entries().iter().map(|entry| entry.name()).collect();
/// assert_eq!(names, ["B", "A"]);
/// assert!(table.get("A").is_some());
/// assert!(table.get("C").is_none());
/// # Ok::<(), graph_miner_core::RepositoryError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetadataTable {
    entries: Vec<GraphEntry>,
    index: HashMap<String, usize>,
}

impl MetadataTable {
    /// Builds a table from entries, returning the first duplicated name on
    /// failure.
    pub(crate) fn from_entries(entries: Vec<GraphEntry>) -> Result<Self, String> {
        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            if index.insert(entry.name.clone(), position).is_some() {
                return Err(entry.name.clone());
            }
        }
        Ok(Self { entries, index })
    }

    /// Parses a table from the JSON text of the resource called `resource`.
    ///
    /// # Errors
    /// Returns [`crate::RepositoryError::MalformedMetadata`] when the text is
    /// not a JSON object of graph records or repeats a graph name.
    pub fn from_json_str(resource: &str, text: &str) -> crate::Result<Self> {
        serde_json::from_str(text).map_err(|source| crate::RepositoryError::MalformedMetadata {
            resource: resource.to_owned(),
            source,
        })
    }

    /// Returns every entry in table order.
    #[must_use]
    pub fn entries(&self) -> &[GraphEntry] {
        &self.entries
    }

    /// Looks up the entry stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&GraphEntry> {
        self.index
            .get(name)
            .and_then(|&position| self.entries.get(position))
    }

    /// Returns the number of graphs in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the table lists no graphs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for MetadataTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(TableVisitor)
    }
}

struct TableVisitor;

impl<'de> Visitor<'de> for TableVisitor {
    type Value = MetadataTable;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map from graph names to graph metadata")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((name, metadata)) = map.next_entry::<String, GraphMetadata>()? {
            entries.push(GraphEntry { name, metadata });
        }
        MetadataTable::from_entries(entries)
            .map_err(|name| de::Error::custom(format!("duplicate graph name `{name}`")))
    }
}
