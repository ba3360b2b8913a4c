//! Paths addressing children inside a document node.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One step of a [`NodePath`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PathSegment {
    /// A named child of a map node.
    Key(Arc<str>),
    /// A positional child of a list node.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{key}"),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// Location of a child node relative to some parent node.
///
/// The empty path addresses the node itself. Discriminator locations are
/// usually a single key (`type`), but nested locations such as
/// `parameters.formula` are allowed.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodePath {
    segments: Vec<PathSegment>,
}

impl NodePath {
    /// The empty path, addressing the node itself.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// A path of a single map key.
    #[must_use]
    pub fn key(key: impl Into<Arc<str>>) -> Self {
        Self {
            segments: vec![PathSegment::Key(key.into())],
        }
    }

    /// A path of a single list index.
    #[must_use]
    pub fn index(index: usize) -> Self {
        Self {
            segments: vec![PathSegment::Index(index)],
        }
    }

    /// Parses a dotted path (`a.b.c`). Every segment is a map key; empty
    /// segments are skipped, so `""` is the root path.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .map(|segment| PathSegment::Key(segment.into()))
            .collect()
    }

    /// Returns a new path with a key appended.
    #[must_use]
    pub fn child(&self, key: impl Into<Arc<str>>) -> Self {
        let mut path = self.clone();
        path.segments.push(PathSegment::Key(key.into()));
        path
    }

    /// Returns a new path with an index appended.
    #[must_use]
    pub fn at(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.segments.push(PathSegment::Index(index));
        path
    }

    /// Returns a new path with all of `other`'s segments appended.
    #[must_use]
    pub fn join(&self, other: &NodePath) -> Self {
        let mut path = self.clone();
        path.segments.extend(other.segments.iter().cloned());
        path
    }

    /// Returns true if this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the segments of this path.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(_) if i > 0 => write!(f, ".{segment}")?,
                _ => write!(f, "{segment}")?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodePath({self})")
    }
}

impl FromIterator<PathSegment> for NodePath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl From<&str> for NodePath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl From<String> for NodePath {
    fn from(path: String) -> Self {
        Self::parse(&path)
    }
}

impl From<&NodePath> for NodePath {
    fn from(path: &NodePath) -> Self {
        path.clone()
    }
}

impl<const N: usize> From<[&str; N]> for NodePath {
    fn from(keys: [&str; N]) -> Self {
        keys.into_iter()
            .map(|key| PathSegment::Key(key.into()))
            .collect()
    }
}
