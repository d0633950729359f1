//! Conversions between subtrees and JSON values.

use coordstore_core::{Node, NodePath, Subtree};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};

use crate::{LeafEncoding, Result, SerdeError};

/// Convert a subtree read from `base` into a JSON object.
///
/// Parents become objects, except that a parent whose children are named
/// exactly `0` to `n-1` becomes an array in index order. Leaves are decoded
/// with `encoding`.
pub fn subtree_to_json(
    base: &NodePath,
    subtree: &Subtree,
    encoding: LeafEncoding,
) -> Result<JsonValue> {
    if let Some(indexed) = as_indexed(subtree) {
        let items = indexed
            .into_iter()
            .map(|(name, node)| node_to_json(&base.join(name), node, encoding))
            .collect::<Result<Vec<_>>>()?;
        return Ok(JsonValue::Array(items));
    }

    let mut map = Map::new();
    for (name, node) in subtree.iter() {
        map.insert(name.clone(), node_to_json(&base.join(name), node, encoding)?);
    }
    Ok(JsonValue::Object(map))
}

fn node_to_json(path: &NodePath, node: &Node, encoding: LeafEncoding) -> Result<JsonValue> {
    match node {
        Node::Leaf(data) => encoding.decode(path.as_str(), data),
        Node::Parent(subtree) => subtree_to_json(path, subtree, encoding),
    }
}

/// The children in index order, if every name is a distinct index below the
/// child count.
fn as_indexed(subtree: &Subtree) -> Option<Vec<(&str, &Node)>> {
    if subtree.is_empty() {
        return None;
    }
    let mut slots: Vec<Option<(&str, &Node)>> = vec![None; subtree.len()];
    for (name, node) in subtree.iter() {
        // Reject "01" and friends so names survive the round trip.
        let index: usize = name.parse().ok().filter(|i: &usize| i.to_string() == *name)?;
        let slot = slots.get_mut(index)?;
        *slot = Some((name.as_str(), node));
    }
    slots.into_iter().collect()
}

/// Deserialize a subtree read from `base` into `T`.
pub fn from_subtree<T: DeserializeOwned>(
    base: &NodePath,
    subtree: &Subtree,
    encoding: LeafEncoding,
) -> Result<T> {
    let json = subtree_to_json(base, subtree, encoding)?;
    serde_json::from_value(json).map_err(|e| SerdeError::decode(base.as_str(), e))
}

/// Flatten a JSON value into `(path, leaf value)` writes below `base`.
///
/// Objects and arrays descend (array elements under `0`, `1`, ...). An empty
/// object or array is itself the leaf value, so the node exists and a
/// [`LeafEncoding::Json`] read gives the empty container back. Keys that
/// cannot name a node (empty, `.`, `..`, or containing `/` or NUL) are
/// refused before anything is returned.
pub fn json_to_leaves<'v>(
    base: &NodePath,
    value: &'v JsonValue,
) -> Result<Vec<(NodePath, &'v JsonValue)>> {
    let mut leaves = Vec::new();
    collect_leaves(base, value, &mut leaves)?;
    Ok(leaves)
}

fn collect_leaves<'v>(
    path: &NodePath,
    value: &'v JsonValue,
    leaves: &mut Vec<(NodePath, &'v JsonValue)>,
) -> Result<()> {
    match value {
        JsonValue::Object(map) if map.is_empty() => leaves.push((path.clone(), value)),
        JsonValue::Array(items) if items.is_empty() => leaves.push((path.clone(), value)),
        JsonValue::Object(map) => {
            for (key, child) in map {
                if !is_node_name(key) {
                    return Err(SerdeError::encode(
                        path.as_str(),
                        format!("key {:?} cannot be a node name", key),
                    ));
                }
                collect_leaves(&path.join(key), child, leaves)?;
            }
        }
        JsonValue::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                collect_leaves(&path.join(&i.to_string()), child, leaves)?;
            }
        }
        scalar => leaves.push((path.clone(), scalar)),
    }
    Ok(())
}

fn is_node_name(key: &str) -> bool {
    !(key.is_empty() || key == "." || key == ".." || key.contains(['/', '\0']))
}
