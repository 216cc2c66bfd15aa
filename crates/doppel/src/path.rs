//! Accessor paths from the clone root
//!
//! Rendered the way property access reads: `a.b[0]`, with collection
//! entries shown as `<key#i>`, `<value#i>` and `<entry#i>`. A map key with
//! no entry renders as `<value of "key">`. The root is the empty path `""`.

use std::fmt;

use crate::value::PropertyKey;

/// One step from a container to a contained value
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    /// Own property
    Key(PropertyKey),
    /// Array element
    Index(usize),
    /// Key of the i-th map entry
    MapKey(usize),
    /// Value of the i-th map entry
    MapValue(usize),
    /// The i-th set element
    SetEntry(usize),
    /// Value under a map key with no entry yet, by the key's rendering
    MapValueOf(String),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(PropertyKey::from(key))
    }
}

impl From<PropertyKey> for PathSegment {
    fn from(key: PropertyKey) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Sequence of segments from the root
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path(Vec<PathSegment>);

impl Path {
    /// The root path `""`
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from segments
    pub fn from_segments(segments: impl IntoIterator<Item = PathSegment>) -> Self {
        Path(segments.into_iter().collect())
    }

    /// Check for the root path
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of segments
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// The segments, root first
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// The last segment
    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }

    /// A new path one step deeper
    pub fn child(&self, segment: impl Into<PathSegment>) -> Path {
        let mut path = self.clone();
        path.push(segment.into());
        path
    }

    pub(crate) fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    pub(crate) fn pop(&mut self) -> Option<PathSegment> {
        self.0.pop()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            let dot = if i == 0 { "" } else { "." };
            match segment {
                PathSegment::Key(PropertyKey::String(s)) => write!(f, "{}{}", dot, s)?,
                PathSegment::Key(key) => write!(f, "[{}]", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
                PathSegment::MapKey(i) => write!(f, "{}<key#{}>", dot, i)?,
                PathSegment::MapValue(i) => write!(f, "{}<value#{}>", dot, i)?,
                PathSegment::SetEntry(i) => write!(f, "{}<entry#{}>", dot, i)?,
                PathSegment::MapValueOf(key) => write!(f, "{}<value of {}>", dot, key)?,
            }
        }
        Ok(())
    }
}
