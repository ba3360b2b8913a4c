//! Hierarchical document nodes.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::Result;
use crate::collections::{NodeList, NodeMap};
use crate::error::Error;
use crate::path::{NodePath, PathSegment};

/// A node in a hierarchical configuration document.
///
/// Nodes are immutable values with structural sharing; clones are O(1).
/// [`Node::set`] edits in place, copying only the spine that changes.
/// `Null` doubles as the "virtual" node a serializer starts writing into.
#[derive(Clone, Default)]
pub enum Node {
    /// Empty node (absent value).
    #[default]
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Integer scalar.
    Int(i64),
    /// Floating point scalar.
    Float(f64),
    /// String scalar.
    String(Arc<str>),
    /// Ordered list of children.
    List(NodeList),
    /// Keyed children.
    Map(NodeMap),
}

/// The shape of a [`Node`], used in diagnostics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// See [`Node::Null`].
    Null,
    /// See [`Node::Bool`].
    Bool,
    /// See [`Node::Int`].
    Int,
    /// See [`Node::Float`].
    Float,
    /// See [`Node::String`].
    String,
    /// See [`Node::List`].
    List,
    /// See [`Node::Map`].
    Map,
}

impl NodeKind {
    /// Returns true for the scalar kinds (everything but lists and maps).
    #[must_use]
    pub const fn is_scalar(self) -> bool {
        !matches!(self, Self::List | Self::Map)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::List => "list",
            Self::Map => "map",
        };
        f.write_str(name)
    }
}

impl Node {
    /// Creates an empty map node.
    #[must_use]
    pub fn map() -> Self {
        Self::Map(NodeMap::new())
    }

    /// Creates an empty list node.
    #[must_use]
    pub fn list() -> Self {
        Self::List(NodeList::new())
    }

    /// Creates a numeric node, storing whole numbers as `Int`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn from_number(n: f64) -> Self {
        if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
            Self::Int(n as i64)
        } else {
            Self::Float(n)
        }
    }

    /// Returns the shape of this node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Null => NodeKind::Null,
            Self::Bool(_) => NodeKind::Bool,
            Self::Int(_) => NodeKind::Int,
            Self::Float(_) => NodeKind::Float,
            Self::String(_) => NodeKind::String,
            Self::List(_) => NodeKind::List,
            Self::Map(_) => NodeKind::Map,
        }
    }

    /// Returns true if this node is null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Attempts to extract a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract an integer.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a float.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a number as f64 (converts int to float).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract a list.
    #[must_use]
    pub const fn as_list(&self) -> Option<&NodeList> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    /// Attempts to extract a map.
    #[must_use]
    pub const fn as_map(&self) -> Option<&NodeMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the named child of a map node, if present and not null.
    #[must_use]
    pub fn child(&self, key: &str) -> Option<&Node> {
        self.as_map()
            .and_then(|map| map.get(key))
            .filter(|node| !node.is_null())
    }

    /// Looks up a descendant.
    ///
    /// Returns `None` when the path is absent: a missing key, an index out of
    /// range, a segment that passes through a scalar, or an explicit null.
    /// A present node of the wrong shape is still returned.
    #[must_use]
    pub fn get(&self, path: &NodePath) -> Option<&Node> {
        let mut current = self;
        for segment in path.segments() {
            current = match (segment, current) {
                (PathSegment::Key(key), Self::Map(map)) => map.get(key)?,
                (PathSegment::Index(index), Self::List(list)) => list.get(*index)?,
                _ => return None,
            };
        }
        if current.is_null() { None } else { Some(current) }
    }

    /// Writes `value` at `path`, in place.
    ///
    /// Null nodes along the way become maps (for keys) or lists (for
    /// indices). A list index may replace an element or append at the end.
    /// The root path replaces this node entirely.
    ///
    /// The whole path is checked before anything is written, so a failed
    /// `set` leaves the node unchanged.
    ///
    /// # Errors
    ///
    /// Returns a `NodeShape` error if the path runs through a scalar, through
    /// a node of the wrong container kind, or past the end of a list.
    pub fn set(&mut self, path: impl Into<NodePath>, value: impl Into<Node>) -> Result<()> {
        let path = path.into();
        self.check_writable(&path)?;
        *self.slot_mut(&path)? = value.into();
        Ok(())
    }

    /// Removes the descendant at `path`, returning it if it was present.
    ///
    /// A removed list element shifts the later elements down.
    pub fn remove(&mut self, path: &NodePath) -> Option<Node> {
        let (last, parent) = path.segments().split_last()?;
        let parent: NodePath = parent.iter().cloned().collect();
        let mut current = self;
        for segment in parent.segments() {
            current = match (segment, current) {
                (PathSegment::Key(key), Self::Map(map)) => map.get_mut(key)?,
                (PathSegment::Index(index), Self::List(list)) => list.get_mut(*index)?,
                _ => return None,
            };
        }
        match (last, current) {
            (PathSegment::Key(key), Self::Map(map)) => map.remove(key),
            (PathSegment::Index(index), Self::List(list)) => list.remove(*index),
            _ => None,
        }
    }

    /// Walks `path` as `slot_mut` would, without writing.
    fn check_writable(&self, path: &NodePath) -> Result<()> {
        let mut current = Some(self).filter(|node| !node.is_null());
        for (depth, segment) in path.segments().iter().enumerate() {
            let here = || path.segments()[..=depth].iter().cloned().collect::<NodePath>();
            // `None` stands for a null slot that `slot_mut` will fill in.
            current = match (segment, current) {
                (PathSegment::Key(_), None) => None,
                (PathSegment::Key(key), Some(Self::Map(map))) => map.get(key),
                (PathSegment::Index(0), None) => None,
                (PathSegment::Index(_), None) => {
                    return Err(Error::node_shape(here(), NodeKind::List));
                }
                (PathSegment::Index(index), Some(Self::List(list))) if *index <= list.len() => {
                    list.get(*index)
                }
                (PathSegment::Index(_), Some(Self::List(_))) => {
                    return Err(Error::node_shape(here(), NodeKind::List));
                }
                (_, Some(other)) => return Err(Error::node_shape(here(), other.kind())),
            }
            .filter(|node| !node.is_null());
        }
        Ok(())
    }

    fn slot_mut(&mut self, path: &NodePath) -> Result<&mut Node> {
        let mut current = self;
        for (depth, segment) in path.segments().iter().enumerate() {
            let here = || path.segments()[..=depth].iter().cloned().collect::<NodePath>();
            current = match segment {
                PathSegment::Key(key) => {
                    if current.is_null() {
                        *current = Self::map();
                    }
                    match current {
                        Self::Map(map) => map.entry(key),
                        other => return Err(Error::node_shape(here(), other.kind())),
                    }
                }
                PathSegment::Index(index) => {
                    if current.is_null() {
                        *current = Self::list();
                    }
                    match current {
                        Self::List(list) => {
                            if *index > list.len() {
                                return Err(Error::node_shape(here(), NodeKind::List));
                            }
                            if *index == list.len() {
                                list.push(Self::Null);
                            }
                            list.get_mut(*index)
                                .ok_or_else(|| Error::node_shape(here(), NodeKind::List))?
                        }
                        other => return Err(Error::node_shape(here(), other.kind())),
                    }
                }
            };
        }
        Ok(current)
    }

    // =========================================================================
    // Field access for converters
    // =========================================================================

    /// Returns the descendant at `path`.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` if the path is absent.
    pub fn require(&self, path: impl Into<NodePath>) -> Result<&Node> {
        let path = path.into();
        self.get(&path).ok_or_else(|| Error::missing_field(path))
    }

    /// Returns the string at `path`.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` if absent or `InvalidNode` if not a string.
    pub fn require_str(&self, path: impl Into<NodePath>) -> Result<&str> {
        let path = path.into();
        let node = self.require(&path)?;
        node.as_str()
            .ok_or_else(|| Error::invalid_node(path, "string", node.kind()))
    }

    /// Returns the number (int or float) at `path`.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` if absent or `InvalidNode` if not numeric.
    pub fn require_number(&self, path: impl Into<NodePath>) -> Result<f64> {
        let path = path.into();
        let node = self.require(&path)?;
        node.as_number()
            .ok_or_else(|| Error::invalid_node(path, "number", node.kind()))
    }

    /// Returns the integer at `path`.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` if absent or `InvalidNode` if not an int.
    pub fn require_int(&self, path: impl Into<NodePath>) -> Result<i64> {
        let path = path.into();
        let node = self.require(&path)?;
        node.as_int()
            .ok_or_else(|| Error::invalid_node(path, "int", node.kind()))
    }

    /// Returns the boolean at `path`.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` if absent or `InvalidNode` if not a bool.
    pub fn require_bool(&self, path: impl Into<NodePath>) -> Result<bool> {
        let path = path.into();
        let node = self.require(&path)?;
        node.as_bool()
            .ok_or_else(|| Error::invalid_node(path, "bool", node.kind()))
    }

    /// Returns the list at `path`.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` if absent or `InvalidNode` if not a list.
    pub fn require_list(&self, path: impl Into<NodePath>) -> Result<&NodeList> {
        let path = path.into();
        let node = self.require(&path)?;
        node.as_list()
            .ok_or_else(|| Error::invalid_node(path, "list", node.kind()))
    }
}

// Floats compare by bit pattern so Eq and Hash stay consistent.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(b) => b.hash(state),
            Self::Int(n) => n.hash(state),
            Self::Float(n) => n.to_bits().hash(state),
            Self::String(s) => s.hash(state),
            Self::List(list) => list.hash(state),
            Self::Map(map) => map.hash(state),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n:?}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::List(list) => write!(f, "{list:?}"),
            Self::Map(map) => write!(f, "{map:?}"),
        }
    }
}

/// Flow-style rendering: `{type: "minecraft:uniform", max: 3, min: 1}`.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(list) => {
                write!(f, "[")?;
                for (i, item) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            scalar => fmt::Debug::fmt(scalar, f),
        }
    }
}

// Convenience From implementations

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Node {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<u32> for Node {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Node {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

impl From<Arc<str>> for Node {
    fn from(s: Arc<str>) -> Self {
        Self::String(s)
    }
}

impl From<NodeList> for Node {
    fn from(list: NodeList) -> Self {
        Self::List(list)
    }
}

impl From<NodeMap> for Node {
    fn from(map: NodeMap) -> Self {
        Self::Map(map)
    }
}

impl<T: Into<Node>> From<Vec<T>> for Node {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::{Node, NodeList, NodeMap};
    use serde::de::{self, MapAccess, SeqAccess, Visitor};
    use serde::ser::{SerializeMap, SerializeSeq};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt;

    impl Serialize for Node {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Self::Null => serializer.serialize_unit(),
                Self::Bool(b) => serializer.serialize_bool(*b),
                Self::Int(n) => serializer.serialize_i64(*n),
                Self::Float(n) => serializer.serialize_f64(*n),
                Self::String(s) => serializer.serialize_str(s),
                Self::List(list) => {
                    let mut seq = serializer.serialize_seq(Some(list.len()))?;
                    for item in list {
                        seq.serialize_element(item)?;
                    }
                    seq.end()
                }
                Self::Map(map) => {
                    let mut out = serializer.serialize_map(Some(map.len()))?;
                    for (k, v) in map.iter() {
                        out.serialize_entry(k, v)?;
                    }
                    out.end()
                }
            }
        }
    }

    struct NodeVisitor;

    impl<'de> Visitor<'de> for NodeVisitor {
        type Value = Node;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a document node")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Node, E> {
            Ok(Node::Bool(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Node, E> {
            Ok(Node::Int(v))
        }

        #[allow(clippy::cast_precision_loss)]
        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Node, E> {
            Ok(i64::try_from(v).map_or(Node::Float(v as f64), Node::Int))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Node, E> {
            Ok(Node::Float(v))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Node, E> {
            Ok(Node::from(v))
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Node, E> {
            Ok(Node::from(v))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Node, E> {
            Ok(Node::Null)
        }

        fn visit_none<E: de::Error>(self) -> Result<Node, E> {
            Ok(Node::Null)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Node, D::Error> {
            Node::deserialize(deserializer)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
            let mut list = NodeList::new();
            while let Some(item) = seq.next_element::<Node>()? {
                list.push(item);
            }
            Ok(Node::List(list))
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Node, A::Error> {
            let mut map = NodeMap::new();
            while let Some((key, value)) = access.next_entry::<String, Node>()? {
                map.insert(key, value);
            }
            Ok(Node::Map(map))
        }
    }

    impl<'de> Deserialize<'de> for Node {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(NodeVisitor)
        }
    }
}
