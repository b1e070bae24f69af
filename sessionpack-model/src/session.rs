//! Session registry: open network views, registered styles and the
//! current-style pointer.

use crate::error::{SessionError, StyleError};
use crate::lexicon::VisualLexicon;
use crate::style::VisualStyle;
use crate::view::{NetworkView, ViewDocument};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// JSON-serializable representation of a whole session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionDocument {
    #[serde(default)]
    pub networks: Vec<ViewDocument>,

    #[serde(default)]
    pub styles: Vec<VisualStyle>,

    /// Name of the current style; the first style when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_style: Option<String>,

    /// Identifier of the active rendering engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renderer: Option<String>,
}

/// Everything a host has open at one point in time.
#[derive(Debug, Clone, Default)]
pub struct Session {
    views: Vec<Arc<NetworkView>>,
    styles: Vec<Arc<VisualStyle>>,
    current_style: Option<usize>,
    renderer: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a view. Network names must be unique within a session.
    pub fn add_view(&mut self, view: NetworkView) -> Result<(), SessionError> {
        if self.views.iter().any(|v| v.name() == view.name()) {
            return Err(SessionError::DuplicateNetwork(view.name().to_string()));
        }
        self.views.push(Arc::new(view));
        Ok(())
    }

    /// Register a style. The first registered style becomes current.
    pub fn add_style(&mut self, style: VisualStyle) -> Result<(), SessionError> {
        if self.style(style.name()).is_some() {
            return Err(SessionError::DuplicateStyle(style.name().to_string()));
        }
        self.styles.push(Arc::new(style));
        if self.current_style.is_none() {
            self.current_style = Some(0);
        }
        Ok(())
    }

    pub fn set_current_style(&mut self, name: &str) -> Result<(), SessionError> {
        let index = self
            .styles
            .iter()
            .position(|s| s.name() == name)
            .ok_or_else(|| SessionError::StyleNotFound(name.to_string()))?;
        self.current_style = Some(index);
        Ok(())
    }

    pub fn current_style(&self) -> Option<&Arc<VisualStyle>> {
        self.current_style.and_then(|i| self.styles.get(i))
    }

    pub fn style(&self, name: &str) -> Option<&Arc<VisualStyle>> {
        self.styles.iter().find(|s| s.name() == name)
    }

    /// Views in registration order.
    pub fn views(&self) -> &[Arc<NetworkView>] {
        &self.views
    }

    /// Styles in registration order.
    pub fn styles(&self) -> &[Arc<VisualStyle>] {
        &self.styles
    }

    pub fn view(&self, name: &str) -> Option<&Arc<NetworkView>> {
        self.views.iter().find(|v| v.name() == name)
    }

    pub fn renderer(&self) -> Option<&str> {
        self.renderer.as_deref()
    }

    pub fn set_renderer(&mut self, renderer: Option<String>) {
        self.renderer = renderer;
    }

    /// Check every mapping against the property types of a lexicon.
    ///
    /// Mappings for properties the lexicon does not declare are ignored.
    pub fn validate_styles(&self, lexicon: &VisualLexicon) -> Result<(), SessionError> {
        for style in &self.styles {
            for (id, mapping) in style.mappings() {
                let Some(property) = lexicon.get(id) else {
                    continue;
                };
                mapping
                    .coerced(property.value_type)
                    .map_err(|source| style_error(style, source))?;
            }
        }
        Ok(())
    }

    // === Serialization ===

    pub fn to_document(&self) -> SessionDocument {
        SessionDocument {
            networks: self.views.iter().map(|v| v.to_document()).collect(),
            styles: self.styles.iter().map(|s| VisualStyle::clone(s)).collect(),
            current_style: self.current_style().map(|s| s.name().to_string()),
            renderer: self.renderer.clone(),
        }
    }

    pub fn from_document(document: SessionDocument) -> Result<Self, SessionError> {
        let mut session = Session::new();
        session.renderer = document.renderer;

        for network in document.networks {
            session.add_view(NetworkView::from_document(network)?)?;
        }
        for style in document.styles {
            session.add_style(style)?;
        }
        if let Some(name) = document.current_style {
            session.set_current_style(&name)?;
        }

        Ok(session)
    }

    pub fn to_json(&self) -> Result<String, SessionError> {
        serde_json::to_string_pretty(&self.to_document())
            .map_err(|e| SessionError::SerializationError(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        let document: SessionDocument = serde_json::from_str(json)
            .map_err(|e| SessionError::DeserializationError(e.to_string()))?;
        Self::from_document(document)
    }

    /// Load a session from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let file = std::fs::File::open(path.as_ref())?;
        let reader = std::io::BufReader::new(file);
        let document: SessionDocument = serde_json::from_reader(reader)
            .map_err(|e| SessionError::DeserializationError(e.to_string()))?;
        Self::from_document(document)
    }
}

fn style_error(style: &VisualStyle, source: StyleError) -> SessionError {
    SessionError::Style {
        style: style.name().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Edge, ElementId, Node};
    use crate::network::Network;
    use crate::style::{ContinuousMapping, ControlPoint, Mapping};
    use crate::value::NodeShape;
    use pretty_assertions::assert_eq;

    fn id(s: &str) -> ElementId {
        ElementId::new(s).unwrap()
    }

    fn view(name: &str) -> NetworkView {
        let mut network = Network::new(name);
        network.add_node(Node::new(id("a"))).unwrap();
        network.add_node(Node::new(id("b"))).unwrap();
        network
            .add_edge(Edge::new(id("ab"), id("a"), id("b")))
            .unwrap();
        NetworkView::new(Arc::new(network))
    }

    #[test]
    fn test_duplicate_network_names_rejected() {
        let mut session = Session::new();
        session.add_view(view("G1")).unwrap();
        assert!(matches!(
            session.add_view(view("G1")),
            Err(SessionError::DuplicateNetwork(n)) if n == "G1"
        ));
        assert_eq!(session.views().len(), 1);
    }

    #[test]
    fn test_current_style_defaults_to_first() {
        let mut session = Session::new();
        assert!(session.current_style().is_none());

        session.add_style(VisualStyle::new("default")).unwrap();
        session.add_style(VisualStyle::new("dark")).unwrap();
        assert_eq!(session.current_style().unwrap().name(), "default");

        session.set_current_style("dark").unwrap();
        assert_eq!(session.current_style().unwrap().name(), "dark");

        assert!(matches!(
            session.set_current_style("missing"),
            Err(SessionError::StyleNotFound(_))
        ));
        assert!(matches!(
            session.add_style(VisualStyle::new("dark")),
            Err(SessionError::DuplicateStyle(_))
        ));
    }

    #[test]
    fn test_validate_styles_reports_style_name() {
        let mut style = VisualStyle::new("broken");
        style.set_mapping(
            "NODE_SHAPE",
            ContinuousMapping::new("degree", vec![ControlPoint::new(1.0, NodeShape::Diamond)])
                .unwrap(),
        );
        let mut session = Session::new();
        session.add_style(style).unwrap();

        let err = session
            .validate_styles(&VisualLexicon::standard())
            .unwrap_err();
        assert!(matches!(err, SessionError::Style { style, .. } if style == "broken"));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut session = Session::new();
        session.add_view(view("G1")).unwrap();
        session.add_view(view("G2")).unwrap();
        let mut style = VisualStyle::new("default");
        style.set_mapping("NODE_LABEL", Mapping::passthrough("name"));
        session.add_style(style).unwrap();
        session.add_style(VisualStyle::new("dark")).unwrap();
        session.set_current_style("dark").unwrap();
        session.set_renderer(Some("cyjs".to_string()));

        let json = session.to_json().unwrap();
        let loaded = Session::from_json(&json).unwrap();

        let names: Vec<&str> = loaded.views().iter().map(|v| v.name()).collect();
        assert_eq!(names, vec!["G1", "G2"]);
        assert_eq!(loaded.styles().len(), 2);
        assert_eq!(loaded.current_style().unwrap().name(), "dark");
        assert_eq!(loaded.renderer(), Some("cyjs"));
        assert_eq!(loaded.style("default").unwrap().mapping_count(), 1);
    }

    #[test]
    fn test_load_rejects_invalid_continuous_mapping() {
        let json = r#"{
            "styles": [{
                "name": "s",
                "mappings": {
                    "NODE_WIDTH": {"mappingType": "continuous", "attribute": "x", "points": []}
                }
            }]
        }"#;
        assert!(matches!(
            Session::from_json(json),
            Err(SessionError::DeserializationError(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("session.json");
        let mut session = Session::new();
        session.add_view(view("G1")).unwrap();
        std::fs::write(&path, session.to_json().unwrap()).unwrap();

        let loaded = Session::load_from_file(&path).unwrap();
        assert_eq!(loaded.view("G1").unwrap().network().node_count(), 2);
        assert!(loaded.current_style().is_none());
    }
}
