//! Rendered views of a network: node positions and bypass overrides.

use crate::element::ElementId;
use crate::error::GraphError;
use crate::lexicon::VisualPropertyId;
use crate::network::{Network, NetworkDocument};
use crate::value::VisualValue;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Per-element overrides, keyed by visual property.
pub type Bypasses = BTreeMap<VisualPropertyId, VisualValue>;

/// 2D position of a node in a view.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// JSON-serializable representation of a view and its network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewDocument {
    #[serde(flatten)]
    pub network: NetworkDocument,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub positions: BTreeMap<ElementId, Position>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub node_bypasses: BTreeMap<ElementId, Bypasses>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub edge_bypasses: BTreeMap<ElementId, Bypasses>,
}

/// A network paired with its rendering state.
#[derive(Debug, Clone)]
pub struct NetworkView {
    network: Arc<Network>,
    positions: HashMap<ElementId, Position>,
    node_bypasses: HashMap<ElementId, Bypasses>,
    edge_bypasses: HashMap<ElementId, Bypasses>,
}

impl NetworkView {
    pub fn new(network: Arc<Network>) -> Self {
        Self {
            network,
            positions: HashMap::new(),
            node_bypasses: HashMap::new(),
            edge_bypasses: HashMap::new(),
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Name of the underlying network.
    pub fn name(&self) -> &str {
        self.network.name()
    }

    pub fn set_position(&mut self, node: &ElementId, position: Position) -> Result<(), GraphError> {
        if !self.network.contains_node(node) {
            return Err(GraphError::NodeNotFound(node.to_string()));
        }
        self.positions.insert(node.clone(), position);
        Ok(())
    }

    /// Position of a node; unplaced nodes sit at the origin.
    pub fn position(&self, node: &ElementId) -> Position {
        self.positions.get(node).copied().unwrap_or_default()
    }

    pub fn set_node_bypass(
        &mut self,
        node: &ElementId,
        property: impl Into<VisualPropertyId>,
        value: impl Into<VisualValue>,
    ) -> Result<(), GraphError> {
        if !self.network.contains_node(node) {
            return Err(GraphError::NodeNotFound(node.to_string()));
        }
        self.node_bypasses
            .entry(node.clone())
            .or_default()
            .insert(property.into(), value.into());
        Ok(())
    }

    pub fn set_edge_bypass(
        &mut self,
        edge: &ElementId,
        property: impl Into<VisualPropertyId>,
        value: impl Into<VisualValue>,
    ) -> Result<(), GraphError> {
        if !self.network.contains_edge(edge) {
            return Err(GraphError::EdgeNotFound(edge.to_string()));
        }
        self.edge_bypasses
            .entry(edge.clone())
            .or_default()
            .insert(property.into(), value.into());
        Ok(())
    }

    pub fn node_bypasses(&self, node: &ElementId) -> Option<&Bypasses> {
        self.node_bypasses.get(node)
    }

    pub fn edge_bypasses(&self, edge: &ElementId) -> Option<&Bypasses> {
        self.edge_bypasses.get(edge)
    }

    pub fn to_document(&self) -> ViewDocument {
        ViewDocument {
            network: self.network.to_document(),
            positions: self.positions.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            node_bypasses: self
                .node_bypasses
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            edge_bypasses: self
                .edge_bypasses
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Rebuild a view; positions and bypasses must refer to existing elements.
    pub fn from_document(document: ViewDocument) -> Result<Self, GraphError> {
        let network = Network::from_document(document.network)?;
        let mut view = NetworkView::new(Arc::new(network));

        for (node, position) in document.positions {
            view.set_position(&node, position)?;
        }
        for (node, bypasses) in document.node_bypasses {
            for (property, value) in bypasses {
                view.set_node_bypass(&node, property, value)?;
            }
        }
        for (edge, bypasses) in document.edge_bypasses {
            for (property, value) in bypasses {
                view.set_edge_bypass(&edge, property, value)?;
            }
        }

        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Edge, Node};
    use crate::value::Color;
    use pretty_assertions::assert_eq;

    fn id(s: &str) -> ElementId {
        ElementId::new(s).unwrap()
    }

    fn create_test_view() -> NetworkView {
        let mut network = Network::new("G1");
        network.add_node(Node::new(id("a"))).unwrap();
        network.add_node(Node::new(id("b"))).unwrap();
        network
            .add_edge(Edge::new(id("ab"), id("a"), id("b")))
            .unwrap();
        NetworkView::new(Arc::new(network))
    }

    #[test]
    fn test_positions() {
        let mut view = create_test_view();
        view.set_position(&id("a"), Position::new(10.0, -4.5)).unwrap();

        assert_eq!(view.position(&id("a")), Position::new(10.0, -4.5));
        assert_eq!(view.position(&id("b")), Position::default());
        assert!(matches!(
            view.set_position(&id("zz"), Position::default()),
            Err(GraphError::NodeNotFound(_))
        ));
    }

    #[test]
    fn test_bypasses_require_existing_elements() {
        let mut view = create_test_view();
        view.set_node_bypass(&id("a"), "NODE_FILL_COLOR", Color::BLACK)
            .unwrap();
        view.set_edge_bypass(&id("ab"), "EDGE_WIDTH", 4.0).unwrap();

        assert_eq!(view.node_bypasses(&id("a")).unwrap().len(), 1);
        assert!(view.node_bypasses(&id("b")).is_none());
        assert!(matches!(
            view.set_edge_bypass(&id("ba"), "EDGE_WIDTH", 1.0),
            Err(GraphError::EdgeNotFound(_))
        ));
    }

    #[test]
    fn test_document_roundtrip() {
        let mut view = create_test_view();
        view.set_position(&id("b"), Position::new(1.0, 2.0)).unwrap();
        view.set_node_bypass(&id("b"), "NODE_LABEL", "Bee").unwrap();

        let json = serde_json::to_string(&view.to_document()).unwrap();
        assert!(json.contains("\"name\":\"G1\""));

        let document: ViewDocument = serde_json::from_str(&json).unwrap();
        let loaded = NetworkView::from_document(document).unwrap();

        assert_eq!(loaded.name(), "G1");
        assert_eq!(loaded.network().edge_count(), 1);
        assert_eq!(loaded.position(&id("b")), Position::new(1.0, 2.0));
        assert_eq!(
            loaded
                .node_bypasses(&id("b"))
                .and_then(|b| b.get(&VisualPropertyId::from("NODE_LABEL"))),
            Some(&VisualValue::from("Bee"))
        );
    }
}
