//! Parse tree
//!
//! Optional introspection output of a decode: named value nodes mirroring
//! the record structure. A tree belongs to the call that built it.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::codec::Value;

/// A node of the parse tree
#[derive(Debug, Clone, PartialEq)]
pub enum ParseNode {
    /// A nested record
    Object(ObjectNode),
    /// A single decoded scalar
    Value(Value),
}

impl ParseNode {
    pub fn as_object(&self) -> Option<&ObjectNode> {
        match self {
            ParseNode::Object(node) => Some(node),
            ParseNode::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            ParseNode::Value(value) => Some(value),
            ParseNode::Object(_) => None,
        }
    }

    /// Follow a dotted path such as `"header.flags"`
    pub fn at(&self, path: &str) -> Option<&ParseNode> {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, segment| node.as_object()?.get(segment))
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        match self {
            ParseNode::Value(value) => writeln!(f, " {}", value),
            ParseNode::Object(node) => {
                writeln!(f)?;
                node.write_indented(f, depth + 1)
            }
        }
    }
}

impl Default for ParseNode {
    fn default() -> Self {
        ParseNode::Object(ObjectNode::new())
    }
}

impl From<ObjectNode> for ParseNode {
    fn from(node: ObjectNode) -> Self {
        ParseNode::Object(node)
    }
}

impl Serialize for ParseNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ParseNode::Object(node) => node.serialize(serializer),
            ParseNode::Value(value) => value.serialize(serializer),
        }
    }
}

impl fmt::Display for ParseNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseNode::Value(value) => write!(f, "{}", value),
            ParseNode::Object(node) => write!(f, "{}", node),
        }
    }
}

/// Ordered name → node map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectNode {
    entries: Vec<(String, ParseNode)>,
}

impl ObjectNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a child, replacing an existing child of the same name in place
    pub fn insert(&mut self, name: impl Into<String>, node: ParseNode) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = node,
            None => self.entries.push((name, node)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParseNode> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, node)| node)
    }

    /// Scalar value of a direct child
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.get(name)?.as_value()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParseNode)> {
        self.entries.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        for (name, node) in &self.entries {
            write!(f, "{:width$}{}:", "", name, width = depth * 2)?;
            node.write_indented(f, depth)?;
        }
        Ok(())
    }
}

impl Serialize for ObjectNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, node) in &self.entries {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }
}

impl fmt::Display for ObjectNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
