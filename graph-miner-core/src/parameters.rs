//! Build parameters handed to the external graph constructor.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::{metadata::GraphArguments, options::GraphOptions};

/// Complete argument set for constructing one graph.
///
/// Parameters start from the generic triple (`name`, `edge_path`,
/// `node_path`) and are refined by repository arguments and caller options.
/// Later layers win on collision.
///
/// # Examples
/// ```
/// use graph_miner_core::{GraphArguments, GraphParameters};
///
/// let arguments: GraphArguments =
///     serde_json::from_str(r#"{"edge_path": "declared.tsv", "directed": true}"#)?;
/// let parameters = GraphParameters::new("Demo", "generic.tsv", None)
///     .with_arguments(&arguments);
/// assert_eq!(parameters.edge_path(), std::path::Path::new("declared.tsv"));
/// assert!(parameters.directed());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GraphParameters {
    name: String,
    edge_path: PathBuf,
    node_path: Option<PathBuf>,
    options: GraphOptions,
}

impl GraphParameters {
    /// Creates the generic parameters shared by every repository.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        edge_path: impl Into<PathBuf>,
        node_path: Option<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            edge_path: edge_path.into(),
            node_path,
            options: GraphOptions::default(),
        }
    }

    /// Merges repository-specific `arguments` on top of the current values.
    ///
    /// Declared paths replace the generic ones; undeclared paths are kept.
    #[must_use]
    pub fn with_arguments(mut self, arguments: &GraphArguments) -> Self {
        if let Some(edge_path) = &arguments.edge_path {
            self.edge_path.clone_from(edge_path);
        }
        if let Some(node_path) = &arguments.node_path {
            self.node_path = Some(node_path.clone());
        }
        self.options.overlay(&arguments.options);
        self
    }

    /// Layers caller `options` on top of the current values.
    #[must_use]
    pub fn with_options(mut self, options: &GraphOptions) -> Self {
        self.options.overlay(options);
        self
    }

    /// Sets whether the graph is loaded as directed.
    #[must_use]
    pub fn with_directed(mut self, directed: bool) -> Self {
        self.options.directed = Some(directed);
        self
    }

    /// Joins relative edge and node paths onto `root`.
    ///
    /// # Examples
    /// ```
    /// use std::path::{Path, PathBuf};
    /// use graph_miner_core::GraphParameters;
    ///
    /// let parameters = GraphParameters::new("Demo", "edges.tsv", Some(PathBuf::from("/abs/nodes.tsv")))
    ///     .rebased_onto(Path::new("cache"));
    /// assert_eq!(parameters.edge_path(), Path::new("cache/edges.tsv"));
    /// assert_eq!(parameters.node_path(), Some(Path::new("/abs/nodes.tsv")));
    /// ```
    #[must_use]
    pub fn rebased_onto(mut self, root: &Path) -> Self {
        if self.edge_path.is_relative() {
            self.edge_path = root.join(&self.edge_path);
        }
        if let Some(node_path) = self.node_path.as_mut().filter(|path| path.is_relative()) {
            *node_path = root.join(&*node_path);
        }
        self
    }

    /// Returns the graph name passed to the constructor.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the edge list path.
    #[must_use]
    pub fn edge_path(&self) -> &Path {
        &self.edge_path
    }

    /// Returns the node list path, if any.
    #[must_use]
    pub fn node_path(&self) -> Option<&Path> {
        self.node_path.as_deref()
    }

    /// Returns whether the graph is loaded as directed; unset means undirected.
    #[must_use]
    pub fn directed(&self) -> bool {
        self.options.directed.unwrap_or(false)
    }

    /// Returns the remaining constructor options.
    #[must_use]
    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    /// Flattens the parameters into the keyword mapping the constructor
    /// consumes.
    ///
    /// `name`, `edge_path` and `node_path` always come from the typed fields,
    /// even when an option in [`GraphOptions::extra`] shares the key.
    ///
    /// # Errors
    /// Returns [`serde_json::Error`] when a path is not valid UTF-8.
    pub fn to_mapping(&self) -> Result<Map<String, Value>, serde_json::Error> {
        let mut mapping = match serde_json::to_value(&self.options)? {
            Value::Object(mapping) => mapping,
            other => {
                return Err(serde::ser::Error::custom(format!(
                    "graph options serialised to a non-object value: {other}"
                )));
            }
        };
        mapping.insert("name".to_owned(), Value::String(self.name.clone()));
        mapping.insert("edge_path".to_owned(), serde_json::to_value(&self.edge_path)?);
        match &self.node_path {
            Some(node_path) => {
                mapping.insert("node_path".to_owned(), serde_json::to_value(node_path)?);
            }
            None => {
                mapping.remove("node_path");
            }
        }
        Ok(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn arguments(text: &str) -> GraphArguments {
        serde_json::from_str(text).expect("arguments must parse")
    }

    #[rstest]
    fn generic_paths_survive_silent_arguments() {
        let parameters = GraphParameters::new("G", "e.tsv", Some(PathBuf::from("n.tsv")))
            .with_arguments(&arguments(r#"{"edge_separator": "\t"}"#));
        assert_eq!(parameters.edge_path(), Path::new("e.tsv"));
        assert_eq!(parameters.node_path(), Some(Path::new("n.tsv")));
        assert_eq!(parameters.options().edge_separator.as_deref(), Some("\t"));
    }

    #[rstest]
    fn declared_paths_override_generic_paths() {
        let parameters = GraphParameters::new("G", "e.tsv", None).with_arguments(&arguments(
            r#"{"edge_path": "declared/e.tsv", "node_path": "declared/n.tsv"}"#,
        ));
        assert_eq!(parameters.edge_path(), Path::new("declared/e.tsv"));
        assert_eq!(parameters.node_path(), Some(Path::new("declared/n.tsv")));
    }

    #[rstest]
    fn caller_options_override_repository_arguments() {
        let caller = GraphOptions {
            directed: Some(true),
            weights_column: Some("score".into()),
            ..GraphOptions::default()
        };
        let parameters = GraphParameters::new("G", "e.tsv", None)
            .with_arguments(&arguments(r#"{"directed": false, "weights_column": "w"}"#))
            .with_options(&caller);
        assert!(parameters.directed());
        assert_eq!(parameters.options().weights_column.as_deref(), Some("score"));
    }

    #[rstest]
    fn table_arguments_cannot_rename_the_graph() {
        let err = serde_json::from_str::<GraphArguments>(r#"{"name": "Other"}"#)
            .expect_err("reserved key must fail");
        assert!(err.to_string().contains("`name`"), "{err}");
    }

    #[rstest]
    fn mapping_keeps_typed_fields_over_programmatic_extras() {
        let mut caller = GraphOptions::default();
        caller.extra.insert("edge_path".into(), json!("caller.tsv"));
        caller.extra.insert("name".into(), json!("Other"));
        caller.extra.insert("node_path".into(), json!("caller_nodes.tsv"));
        let parameters = GraphParameters::new("G", "e.tsv", None)
            .with_options(&caller)
            .rebased_onto(Path::new("/cache"));

        let mapping = parameters.to_mapping().expect("mapping must serialise");

        assert_eq!(mapping.get("name"), Some(&json!("G")));
        assert_eq!(
            mapping.get("edge_path"),
            Some(&json!(parameters.edge_path().to_str().expect("utf-8 path")))
        );
        assert!(!mapping.contains_key("node_path"));
    }

    #[rstest]
    fn mapping_is_flat() {
        let parameters = GraphParameters::new("G", "e.tsv", None)
            .with_arguments(&arguments(r#"{"edge_header": true, "numeric_ids": 1}"#))
            .with_directed(false);
        let mapping = parameters.to_mapping().expect("mapping must serialise");
        assert_eq!(
            Value::Object(mapping),
            json!({
                "name": "G",
                "edge_path": "e.tsv",
                "directed": false,
                "edge_header": true,
                "numeric_ids": 1,
            })
        );
    }
}
