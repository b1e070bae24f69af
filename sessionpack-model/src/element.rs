//! Nodes and edges of a network.

use crate::error::GraphError;
use crate::value::AttributeValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One attribute row: column name to typed cell.
///
/// Kept sorted so every export of the same row is byte-identical.
pub type AttributeRow = BTreeMap<String, AttributeValue>;

/// Identifier of a node or edge, unique within its network.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ElementId(String);

impl ElementId {
    /// Create an identifier. Empty identifiers are rejected.
    pub fn new(id: impl Into<String>) -> Result<Self, GraphError> {
        let id = id.into();
        if id.is_empty() {
            return Err(GraphError::EmptyId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ElementId {
    type Error = GraphError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ElementId::new(value)
    }
}

impl From<ElementId> for String {
    fn from(id: ElementId) -> Self {
        id.0
    }
}

/// A node and its attribute row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: ElementId,

    #[serde(default)]
    pub attributes: AttributeRow,
}

impl Node {
    pub fn new(id: ElementId) -> Self {
        Self {
            id,
            attributes: AttributeRow::new(),
        }
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// An edge between two nodes of the same network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: ElementId,

    /// Source node
    pub source: ElementId,

    /// Target node
    pub target: ElementId,

    #[serde(default)]
    pub attributes: AttributeRow,
}

impl Edge {
    pub fn new(id: ElementId, source: ElementId, target: ElementId) -> Self {
        Self {
            id,
            source,
            target,
            attributes: AttributeRow::new(),
        }
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}
