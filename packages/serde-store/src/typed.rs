//! Typed subtree reads and writes on a session.

use coordstore_core::{subtree, writer, NodeClient, NodePath, Session};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::convert::{from_subtree, json_to_leaves, subtree_to_json};
use crate::{LeafEncoding, Result, SerdeError};

/// Extension trait for reading and writing whole subtrees as serde values.
///
/// Implemented for every [`Session`].
///
/// # Example
///
/// ```rust
/// use coordstore_core::{NodePath, Session};
/// use coordstore_node_store::InMemoryClient;
/// use coordstore_serde::{LeafEncoding, TypedSession};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize, Debug, PartialEq)]
/// struct Endpoint {
///     host: String,
///     port: u16,
/// }
///
/// let mut session = Session::new(InMemoryClient::new());
/// let path = NodePath::new("/services/db");
/// let endpoint = Endpoint { host: "db1".into(), port: 5432 };
///
/// session.write_as(&path, &endpoint, LeafEncoding::Json).unwrap();
/// let back: Endpoint = session.read_as(&path, LeafEncoding::Json).unwrap();
/// assert_eq!(back, endpoint);
/// ```
pub trait TypedSession {
    /// Read the subtree below `path` as a JSON object (or array).
    fn read_json(&mut self, path: &NodePath, encoding: LeafEncoding) -> Result<JsonValue>;

    /// Read the subtree below `path` and deserialize it.
    fn read_as<T: DeserializeOwned>(&mut self, path: &NodePath, encoding: LeafEncoding)
        -> Result<T>;

    /// Write `value` below `path`, one leaf node per scalar.
    ///
    /// Missing nodes are created and existing leaves overwritten. Nodes
    /// already present that `value` does not mention are left alone. Writes
    /// are independent, so a failure part way leaves earlier leaves written.
    fn write_json(
        &mut self,
        path: &NodePath,
        value: &JsonValue,
        encoding: LeafEncoding,
    ) -> Result<()>;

    /// Serialize `data` and write it like [`write_json`](Self::write_json).
    fn write_as<T: Serialize + ?Sized>(
        &mut self,
        path: &NodePath,
        data: &T,
        encoding: LeafEncoding,
    ) -> Result<()>;
}

impl<C: NodeClient> TypedSession for Session<C> {
    fn read_json(&mut self, path: &NodePath, encoding: LeafEncoding) -> Result<JsonValue> {
        let tree = subtree::read(self, path)?;
        subtree_to_json(path, &tree, encoding)
    }

    fn read_as<T: DeserializeOwned>(
        &mut self,
        path: &NodePath,
        encoding: LeafEncoding,
    ) -> Result<T> {
        let tree = subtree::read(self, path)?;
        from_subtree(path, &tree, encoding)
    }

    fn write_json(
        &mut self,
        path: &NodePath,
        value: &JsonValue,
        encoding: LeafEncoding,
    ) -> Result<()> {
        if !(value.is_object() || value.is_array()) {
            // A bare scalar is a single leaf at `path` itself.
            let data = encoding.encode(path.as_str(), value)?;
            writer::set_node(self, path, data)?;
            return Ok(());
        }

        // Encode everything before the first write so a bad value leaves the
        // store untouched.
        let writes = json_to_leaves(path, value)?
            .into_iter()
            .map(|(leaf, scalar)| {
                let data = encoding.encode(leaf.as_str(), scalar)?;
                Ok((leaf, data))
            })
            .collect::<Result<Vec<_>>>()?;

        for (leaf, data) in writes {
            writer::set_node(self, &leaf, data)?;
        }
        Ok(())
    }

    fn write_as<T: Serialize + ?Sized>(
        &mut self,
        path: &NodePath,
        data: &T,
        encoding: LeafEncoding,
    ) -> Result<()> {
        let value =
            serde_json::to_value(data).map_err(|e| SerdeError::encode(path.as_str(), e))?;
        self.write_json(path, &value, encoding)
    }
}
