//! Network/view serializer.
//!
//! Produces one graph-exchange document per view:
//!
//! ```json
//! {
//!   "data": { "name": "G1", ... },
//!   "elements": {
//!     "nodes": [ { "data": { "id": "a", ... }, "position": { "x": 0.0, "y": 0.0 } } ],
//!     "edges": [ { "data": { "id": "ab", "source": "a", "target": "b" } } ]
//!   }
//! }
//! ```
//!
//! Bypass values are keyed by the lexicon field name the viewer reads.

use crate::error::SerializationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sessionpack_model::{
    AttributeRow, Bypasses, ElementId, ElementTarget, NetworkView, Position, VisualLexicon,
    VisualValue,
};
use std::collections::BTreeMap;

/// Serialized view of one network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkJson {
    /// Network-level attributes plus its name
    pub data: Map<String, Value>,

    pub elements: Elements,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Elements {
    pub nodes: Vec<NodeJson>,
    pub edges: Vec<EdgeJson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeJson {
    pub data: Map<String, Value>,

    pub position: Position,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub bypass: BTreeMap<String, VisualValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeJson {
    pub data: Map<String, Value>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub bypass: BTreeMap<String, VisualValue>,
}

/// Network/view serializer bound to one lexicon.
#[derive(Debug, Clone, Copy)]
pub struct NetworkSerializer<'a> {
    lexicon: &'a VisualLexicon,
}

impl<'a> NetworkSerializer<'a> {
    pub fn new(lexicon: &'a VisualLexicon) -> Self {
        Self { lexicon }
    }

    /// Build the document for a view. Reads the view only.
    pub fn build_document(&self, view: &NetworkView) -> Result<NetworkJson, SerializationError> {
        let network = view.network();

        let mut data = attribute_map(&network.attributes)?;
        data.insert("name".to_string(), Value::String(network.name().to_string()));
        data.insert("directed".to_string(), Value::Bool(network.is_directed()));

        let nodes = network
            .nodes()
            .map(|node| -> Result<NodeJson, SerializationError> {
                let mut data = attribute_map(&node.attributes)?;
                data.insert("id".to_string(), id_value(&node.id));
                Ok(NodeJson {
                    data,
                    position: view.position(&node.id),
                    bypass: self.bypass_fields(
                        view,
                        &node.id,
                        ElementTarget::Node,
                        view.node_bypasses(&node.id),
                    )?,
                })
            })
            .collect::<Result<Vec<_>, SerializationError>>()?;

        let edges = network
            .edges()
            .map(|edge| -> Result<EdgeJson, SerializationError> {
                let mut data = attribute_map(&edge.attributes)?;
                data.insert("id".to_string(), id_value(&edge.id));
                data.insert("source".to_string(), id_value(&edge.source));
                data.insert("target".to_string(), id_value(&edge.target));
                Ok(EdgeJson {
                    data,
                    bypass: self.bypass_fields(
                        view,
                        &edge.id,
                        ElementTarget::Edge,
                        view.edge_bypasses(&edge.id),
                    )?,
                })
            })
            .collect::<Result<Vec<_>, SerializationError>>()?;

        tracing::debug!(
            "Serialized network '{}' ({} nodes, {} edges)",
            network.name(),
            nodes.len(),
            edges.len()
        );

        Ok(NetworkJson {
            data,
            elements: Elements { nodes, edges },
        })
    }

    /// Serialize a view to compact JSON.
    pub fn serialize_view(&self, view: &NetworkView) -> Result<String, SerializationError> {
        let document = self.build_document(view)?;
        Ok(serde_json::to_string(&document)?)
    }

    fn bypass_fields(
        &self,
        view: &NetworkView,
        element: &ElementId,
        target: ElementTarget,
        bypasses: Option<&Bypasses>,
    ) -> Result<BTreeMap<String, VisualValue>, SerializationError> {
        let mut fields = BTreeMap::new();
        for (id, value) in bypasses.into_iter().flatten() {
            let Some(property) = self.lexicon.get(id).filter(|p| p.target == target) else {
                tracing::warn!(
                    "Skipping bypass {} on '{}': not a {:?} property of lexicon '{}'",
                    id,
                    element,
                    target,
                    self.lexicon.name()
                );
                continue;
            };
            let value = value
                .coerce(property.value_type)
                .map_err(|source| SerializationError::Bypass {
                    network: view.name().to_string(),
                    element: element.to_string(),
                    property: id.to_string(),
                    source,
                })?;
            fields.insert(property.field.clone(), value);
        }
        Ok(fields)
    }
}

fn attribute_map(row: &AttributeRow) -> Result<Map<String, Value>, SerializationError> {
    row.iter()
        .map(|(key, value)| -> Result<(String, Value), SerializationError> {
            Ok((key.clone(), serde_json::to_value(value)?))
        })
        .collect()
}

fn id_value(id: &ElementId) -> Value {
    Value::String(id.as_str().to_string())
}
