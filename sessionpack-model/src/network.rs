//! Network - the graph snapshot container.

use crate::element::{AttributeRow, Edge, ElementId, Node};
use crate::error::GraphError;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

fn default_directed() -> bool {
    true
}

/// JSON-serializable representation of a network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkDocument {
    /// Network name, used as the key in exported sessions
    pub name: String,

    /// Whether edges are directed
    #[serde(default = "default_directed")]
    pub directed: bool,

    /// Network-level attribute row
    #[serde(default)]
    pub attributes: AttributeRow,

    /// All nodes, in insertion order
    #[serde(default)]
    pub nodes: Vec<Node>,

    /// All edges, in insertion order
    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// A named graph of nodes and edges.
///
/// Nodes and edges are never removed, so iteration follows insertion order.
pub struct Network {
    /// Underlying graph from petgraph; undirected networks still store a
    /// source/target pair per edge
    inner: DiGraph<Node, Edge>,

    /// Index from ElementId to petgraph NodeIndex for O(1) lookup
    node_index: HashMap<ElementId, NodeIndex>,

    edge_index: HashMap<ElementId, EdgeIndex>,

    name: String,

    directed: bool,

    /// Network-level attributes
    pub attributes: AttributeRow,
}

impl Network {
    /// Create a new empty directed network.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: DiGraph::new(),
            node_index: HashMap::new(),
            edge_index: HashMap::new(),
            name: name.into(),
            directed: true,
            attributes: AttributeRow::new(),
        }
    }

    /// Create a new empty undirected network.
    pub fn undirected(name: impl Into<String>) -> Self {
        Self {
            directed: false,
            ..Self::new(name)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    // === Node Operations ===

    /// Add a node to the network.
    /// Returns error if a node with the same ID already exists.
    pub fn add_node(&mut self, node: Node) -> Result<NodeIndex, GraphError> {
        if self.node_index.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode(node.id.to_string()));
        }

        let id = node.id.clone();
        let idx = self.inner.add_node(node);
        self.node_index.insert(id, idx);
        Ok(idx)
    }

    /// Get a node by ID.
    pub fn get_node(&self, id: &ElementId) -> Option<&Node> {
        self.node_index.get(id).map(|&idx| &self.inner[idx])
    }

    /// Check if a node exists.
    pub fn contains_node(&self, id: &ElementId) -> bool {
        self.node_index.contains_key(id)
    }

    /// Get count of nodes.
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Iterate over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.inner.node_weights()
    }

    // === Edge Operations ===

    /// Add an edge to the network.
    /// Validates that both endpoints exist and the edge ID is unused.
    pub fn add_edge(&mut self, edge: Edge) -> Result<EdgeIndex, GraphError> {
        if self.edge_index.contains_key(&edge.id) {
            return Err(GraphError::DuplicateEdge(edge.id.to_string()));
        }
        let source_idx = *self
            .node_index
            .get(&edge.source)
            .ok_or_else(|| GraphError::NodeNotFound(edge.source.to_string()))?;
        let target_idx = *self
            .node_index
            .get(&edge.target)
            .ok_or_else(|| GraphError::NodeNotFound(edge.target.to_string()))?;

        let id = edge.id.clone();
        let idx = self.inner.add_edge(source_idx, target_idx, edge);
        self.edge_index.insert(id, idx);
        Ok(idx)
    }

    /// Get an edge by ID.
    pub fn get_edge(&self, id: &ElementId) -> Option<&Edge> {
        self.edge_index.get(id).map(|&idx| &self.inner[idx])
    }

    /// Check if an edge exists.
    pub fn contains_edge(&self, id: &ElementId) -> bool {
        self.edge_index.contains_key(id)
    }

    /// Get edge count.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Iterate over all edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.inner.edge_weights()
    }

    // === Serialization ===

    /// Snapshot the network into its serializable form.
    pub fn to_document(&self) -> NetworkDocument {
        NetworkDocument {
            name: self.name.clone(),
            directed: self.directed,
            attributes: self.attributes.clone(),
            nodes: self.inner.node_weights().cloned().collect(),
            edges: self.inner.edge_weights().cloned().collect(),
        }
    }

    /// Rebuild a network, validating ids and edge endpoints.
    pub fn from_document(document: NetworkDocument) -> Result<Self, GraphError> {
        let mut network = Self::new(document.name);
        network.directed = document.directed;
        network.attributes = document.attributes;

        // Add all nodes first
        for node in document.nodes {
            network.add_node(node)?;
        }

        // Then add all edges
        for edge in document.edges {
            network.add_edge(edge)?;
        }

        Ok(network)
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, GraphError> {
        serde_json::to_string_pretty(&self.to_document())
            .map_err(|e| GraphError::SerializationError(e.to_string()))
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let document: NetworkDocument = serde_json::from_str(json)
            .map_err(|e| GraphError::DeserializationError(e.to_string()))?;
        Self::from_document(document)
    }

    /// Load a network from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let file = std::fs::File::open(path.as_ref())?;
        let reader = std::io::BufReader::new(file);
        let document: NetworkDocument = serde_json::from_reader(reader)
            .map_err(|e| GraphError::DeserializationError(e.to_string()))?;
        Self::from_document(document)
    }
}

impl std::fmt::Debug for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Network")
            .field("name", &self.name)
            .field("directed", &self.directed)
            .field("node_count", &self.node_count())
            .field("edge_count", &self.edge_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::AttributeValue;
    use pretty_assertions::assert_eq;

    fn id(s: &str) -> ElementId {
        ElementId::new(s).unwrap()
    }

    fn create_test_network() -> Network {
        let mut network = Network::new("G1");
        for name in ["a", "b", "c"] {
            network
                .add_node(Node::new(id(name)).with_attribute("label", name.to_uppercase()))
                .unwrap();
        }
        network
            .add_edge(Edge::new(id("ab"), id("a"), id("b")))
            .unwrap();
        network
            .add_edge(Edge::new(id("bc"), id("b"), id("c")).with_attribute("weight", 2.5))
            .unwrap();
        network
    }

    #[test]
    fn test_add_and_get_node() {
        let network = create_test_network();
        let node = network.get_node(&id("b")).unwrap();
        assert_eq!(
            node.attributes.get("label"),
            Some(&AttributeValue::String("B".to_string()))
        );
        assert!(network.contains_node(&id("c")));
        assert!(!network.contains_node(&id("z")));
    }

    #[test]
    fn test_duplicate_node_error() {
        let mut network = create_test_network();
        let result = network.add_node(Node::new(id("a")));
        assert!(matches!(result, Err(GraphError::DuplicateNode(_))));
    }

    #[test]
    fn test_add_edge_missing_endpoint() {
        let mut network = create_test_network();
        let result = network.add_edge(Edge::new(id("ax"), id("a"), id("x")));
        assert!(matches!(result, Err(GraphError::NodeNotFound(n)) if n == "x"));
    }

    #[test]
    fn test_duplicate_edge_id() {
        let mut network = create_test_network();
        let result = network.add_edge(Edge::new(id("ab"), id("c"), id("a")));
        assert!(matches!(result, Err(GraphError::DuplicateEdge(_))));
    }

    #[test]
    fn test_parallel_edges_allowed() {
        let mut network = create_test_network();
        network
            .add_edge(Edge::new(id("ab2"), id("a"), id("b")))
            .unwrap();
        assert_eq!(network.edge_count(), 3);
    }

    #[test]
    fn test_iteration_preserves_insertion_order() {
        let mut network = Network::new("order");
        for name in ["z", "m", "a", "q"] {
            network.add_node(Node::new(id(name))).unwrap();
        }
        let order: Vec<&str> = network.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(order, vec!["z", "m", "a", "q"]);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut network = create_test_network();
        network
            .attributes
            .insert("organism".to_string(), "yeast".into());

        let json = network.to_json().unwrap();
        let loaded = Network::from_json(&json).unwrap();

        assert_eq!(loaded.name(), "G1");
        assert!(loaded.is_directed());
        assert_eq!(loaded.node_count(), 3);
        assert_eq!(loaded.edge_count(), 2);
        assert_eq!(loaded.get_edge(&id("bc")).unwrap().source, id("b"));
        assert_eq!(loaded.attributes.len(), 1);
    }

    #[test]
    fn test_from_document_rejects_dangling_edge() {
        let json = r#"{
            "name": "broken",
            "nodes": [{"id": "a"}],
            "edges": [{"id": "e", "source": "a", "target": "missing"}]
        }"#;
        let result = Network::from_json(json);
        assert!(matches!(result, Err(GraphError::NodeNotFound(_))));
    }

    #[test]
    fn test_load_from_file() {
        let network = create_test_network();
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("network.json");
        std::fs::write(&path, network.to_json().unwrap()).unwrap();

        let loaded = Network::load_from_file(&path).unwrap();
        assert_eq!(loaded.node_count(), network.node_count());
    }

    #[test]
    fn test_undirected() {
        let network = Network::undirected("u");
        assert!(!network.is_directed());
        assert_eq!(network.node_count(), 0);
    }
}
