//! Node paths and injection-safe path templates.

use std::fmt;

/// Ordered parameters for a path template.
///
/// Keys are the literal placeholder tokens as they appear in the template
/// (e.g. `:id`). Substitution happens in insertion order, so a key that is a
/// prefix of another (`:id` vs `:id2`) should be bound after it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to the display form of `value`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.insert(key, value);
        self
    }

    /// Bind `key` to the display form of `value`, replacing an earlier binding
    /// in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl fmt::Display) {
        let key = key.into();
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: fmt::Display> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl<K: Into<String>, V: fmt::Display, const N: usize> From<[(K, V); N]> for Params {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Cut a parameter value at its first `/`.
///
/// This is the only thing standing between a caller-supplied value and an
/// extra path segment, so it applies to every parameter without exception.
fn truncate_at_separator(value: &str) -> &str {
    match value.find('/') {
        Some(i) => &value[..i],
        None => value,
    }
}

/// Substitute `params` into `template`.
///
/// Each value is truncated at its first `/` before replacing every occurrence
/// of its key. A single trailing `/` is stripped from the result. Unbound
/// placeholders are left as they are.
///
/// ```rust
/// use coordstore_core::{resolve, Params};
///
/// let params = Params::new().with(":id", "23/secret");
/// assert_eq!(resolve("/clients/:id", &params), "/clients/23");
/// ```
pub fn resolve(template: &str, params: &Params) -> String {
    let mut path = template.to_string();
    for (key, value) in params.iter() {
        if key.is_empty() {
            continue;
        }
        path = path.replace(key, truncate_at_separator(value));
    }
    if path.ends_with('/') {
        path.pop();
    }
    path
}

/// Join segments into an absolute path.
///
/// The result has exactly one leading `/` and no empty segments, whatever
/// separators the inputs carry. Joining nothing yields the root.
pub fn join<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut path = String::new();
    for segment in segments {
        for part in segment.as_ref().split('/').filter(|p| !p.is_empty()) {
            path.push('/');
            path.push_str(part);
        }
    }
    if path.is_empty() {
        path.push('/');
    }
    path
}

/// An absolute node path, as handed to the store.
///
/// `NodePath` does not validate: a malformed path travels to the store and
/// comes back as a remote error. The empty string is read as the root.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodePath(String);

impl NodePath {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        if path.is_empty() {
            return Self::root();
        }
        NodePath(path)
    }

    pub fn root() -> Self {
        NodePath("/".to_string())
    }

    /// Resolve a template into a path. See [`resolve`].
    pub fn resolve(template: &str, params: &Params) -> Self {
        Self::new(resolve(template, params))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// The path of the child `name` below this one.
    #[must_use]
    pub fn join(&self, name: &str) -> NodePath {
        NodePath(join([self.0.as_str(), name]))
    }

    /// The immediate parent; `None` for the root.
    ///
    /// `/a/b` has parent `/a`, and `/a` has parent `/`.
    pub fn parent(&self) -> Option<NodePath> {
        if self.is_root() {
            return None;
        }
        let trimmed = self.0.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(0) => Some(NodePath::root()),
            Some(i) => Some(NodePath(trimmed[..i].to_string())),
            // Relative path with a single segment.
            None => Some(NodePath::root()),
        }
    }

    /// The last segment; empty for the root.
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    /// Number of segments below the root.
    pub fn depth(&self) -> usize {
        self.0.split('/').filter(|s| !s.is_empty()).count()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NodePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodePath {
    fn from(s: &str) -> Self {
        NodePath::new(s)
    }
}

impl From<String> for NodePath {
    fn from(s: String) -> Self {
        NodePath::new(s)
    }
}
