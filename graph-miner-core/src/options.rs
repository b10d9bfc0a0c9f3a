//! Typed constructor options shared by metadata tables and callers.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;

/// Parameter keys owned by [`crate::GraphParameters`]; options may not set
/// them.
pub const RESERVED_PARAMETER_KEYS: [&str; 3] = ["name", "edge_path", "node_path"];

/// Optional arguments understood by the external graph constructor.
///
/// Keys without a dedicated field are kept in [`GraphOptions::extra`] so
/// catalogues can carry constructor arguments this crate does not model yet.
///
/// # Examples
/// ```
/// use graph_miner_core::GraphOptions;
///
/// let mut base = GraphOptions {
///     directed: Some(false),
///     edge_separator: Some(",".into()),
///     ..GraphOptions::default()
/// };
/// let overrides = GraphOptions {
///     directed: Some(true),
///     ..GraphOptions::default()
/// };
/// base.overlay(&overrides);
/// assert_eq!(base.directed, Some(true));
/// assert_eq!(base.edge_separator.as_deref(), Some(","));
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct GraphOptions {
    /// Whether the graph is loaded as directed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directed: Option<bool>,
    /// Column of the edge list holding source nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources_column: Option<String>,
    /// Column of the edge list holding destination nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destinations_column: Option<String>,
    /// Column of the edge list holding edge weights.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights_column: Option<String>,
    /// Column of the edge list holding edge types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_types_column: Option<String>,
    /// Column of the node list holding node names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes_column: Option<String>,
    /// Column of the node list holding node types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_types_column: Option<String>,
    /// Field separator of the edge list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_separator: Option<String>,
    /// Field separator of the node list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_separator: Option<String>,
    /// Whether the edge list starts with a header row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_header: Option<bool>,
    /// Whether the node list starts with a header row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_header: Option<bool>,
    /// Weight assigned to edges without one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_weight: Option<f64>,
    /// Edge type assigned to edges without one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_edge_type: Option<String>,
    /// Node type assigned to nodes without one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_node_type: Option<String>,
    /// Whether self-loops are dropped while loading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_self_loops: Option<bool>,
    /// Constructor arguments without a dedicated field.
    ///
    /// Deserialisation rejects the [`RESERVED_PARAMETER_KEYS`].
    #[serde(flatten, deserialize_with = "deserialize_extra")]
    pub extra: BTreeMap<String, Value>,
}

impl GraphOptions {
    /// Layers `other` on top of `self`: every option `other` sets replaces the
    /// current value, options `other` leaves unset are kept.
    pub fn overlay(&mut self, other: &Self) {
        replace_if_set(&mut self.directed, other.directed.as_ref());
        replace_if_set(&mut self.sources_column, other.sources_column.as_ref());
        replace_if_set(
            &mut self.destinations_column,
            other.destinations_column.as_ref(),
        );
        replace_if_set(&mut self.weights_column, other.weights_column.as_ref());
        replace_if_set(&mut self.edge_types_column, other.edge_types_column.as_ref());
        replace_if_set(&mut self.nodes_column, other.nodes_column.as_ref());
        replace_if_set(&mut self.node_types_column, other.node_types_column.as_ref());
        replace_if_set(&mut self.edge_separator, other.edge_separator.as_ref());
        replace_if_set(&mut self.node_separator, other.node_separator.as_ref());
        replace_if_set(&mut self.edge_header, other.edge_header.as_ref());
        replace_if_set(&mut self.node_header, other.node_header.as_ref());
        replace_if_set(&mut self.default_weight, other.default_weight.as_ref());
        replace_if_set(&mut self.default_edge_type, other.default_edge_type.as_ref());
        replace_if_set(&mut self.default_node_type, other.default_node_type.as_ref());
        replace_if_set(&mut self.skip_self_loops, other.skip_self_loops.as_ref());
        self.extra.extend(
            other
                .extra
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
    }

    /// Returns whether no option is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn deserialize_extra<'de, D>(deserializer: D) -> Result<BTreeMap<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let extra = BTreeMap::<String, Value>::deserialize(deserializer)?;
    match extra.keys().find(|key| RESERVED_PARAMETER_KEYS.contains(&key.as_str())) {
        Some(key) => Err(de::Error::custom(format_args!(
            "`{key}` is fixed by the repository and cannot be set as an option"
        ))),
        None => Ok(extra),
    }
}

fn replace_if_set<T: Clone>(slot: &mut Option<T>, value: Option<&T>) {
    if let Some(value) = value {
        *slot = Some(value.clone());
    }
}
