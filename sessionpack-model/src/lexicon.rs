//! The visual lexicon: which visual properties a renderer understands.
//!
//! Each rendering engine may expose its own lexicon. A [`LexiconRegistry`]
//! resolves the lexicon for the active renderer and falls back to
//! [`VisualLexicon::standard`] when the renderer is unknown or unset.

use crate::error::LexiconError;
use crate::value::{Color, NodeShape, ValueType, VisualValue};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Identifier of a visual property, e.g. `NODE_FILL_COLOR`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisualPropertyId(String);

impl VisualPropertyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VisualPropertyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VisualPropertyId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Which kind of element a visual property applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementTarget {
    Node,
    Edge,
    Network,
}

/// A visual property as declared by a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualProperty {
    pub id: VisualPropertyId,

    /// Field name the web viewer reads, e.g. `background-color`
    pub field: String,

    pub target: ElementTarget,

    pub value_type: ValueType,

    /// Value used when a style neither maps nor sets a default
    pub default: VisualValue,
}

impl VisualProperty {
    pub fn new(
        id: impl Into<String>,
        field: impl Into<String>,
        target: ElementTarget,
        value_type: ValueType,
        default: impl Into<VisualValue>,
    ) -> Self {
        Self {
            id: VisualPropertyId::new(id),
            field: field.into(),
            target,
            value_type,
            default: default.into(),
        }
    }
}

/// Ordered registry of visual properties for one renderer.
#[derive(Debug, Clone, Default)]
pub struct VisualLexicon {
    name: String,
    properties: Vec<VisualProperty>,
    by_id: HashMap<VisualPropertyId, usize>,
}

impl VisualLexicon {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The lexicon used when the active renderer does not supply one.
    pub fn standard() -> Self {
        use ElementTarget::{Edge, Network, Node};
        use ValueType::{Color as C, Number as N, Shape as S, Text as T};

        let properties = [
            VisualProperty::new("NODE_FILL_COLOR", "background-color", Node, C, Color::new(0x89, 0xD0, 0xF5)),
            VisualProperty::new("NODE_BORDER_PAINT", "border-color", Node, C, Color::new(0xCC, 0xCC, 0xCC)),
            VisualProperty::new("NODE_BORDER_WIDTH", "border-width", Node, N, 0.0),
            VisualProperty::new("NODE_SHAPE", "shape", Node, S, NodeShape::RoundRectangle),
            VisualProperty::new("NODE_WIDTH", "width", Node, N, 75.0),
            VisualProperty::new("NODE_HEIGHT", "height", Node, N, 35.0),
            VisualProperty::new("NODE_TRANSPARENCY", "background-opacity", Node, N, 1.0),
            VisualProperty::new("NODE_LABEL", "content", Node, T, ""),
            VisualProperty::new("NODE_LABEL_COLOR", "color", Node, C, Color::BLACK),
            VisualProperty::new("NODE_LABEL_FONT_SIZE", "font-size", Node, N, 12.0),
            VisualProperty::new("EDGE_STROKE_UNSELECTED_PAINT", "line-color", Edge, C, Color::new(0x84, 0x84, 0x84)),
            VisualProperty::new("EDGE_WIDTH", "width", Edge, N, 2.0),
            VisualProperty::new("EDGE_LINE_TYPE", "line-style", Edge, T, "solid"),
            VisualProperty::new("EDGE_TARGET_ARROW_SHAPE", "target-arrow-shape", Edge, T, "none"),
            VisualProperty::new("EDGE_LABEL", "content", Edge, T, ""),
            VisualProperty::new("EDGE_LABEL_COLOR", "color", Edge, C, Color::BLACK),
            VisualProperty::new("EDGE_LABEL_FONT_SIZE", "font-size", Edge, N, 10.0),
            VisualProperty::new("NETWORK_BACKGROUND_PAINT", "background-color", Network, C, Color::WHITE),
        ];

        let mut lexicon = Self::new("standard");
        lexicon.properties.extend(properties);
        lexicon.reindex();
        lexicon
    }

    fn reindex(&mut self) {
        self.by_id = self
            .properties
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a property. Identifiers must be unique.
    pub fn add(&mut self, property: VisualProperty) -> Result<(), LexiconError> {
        if self.by_id.contains_key(&property.id) {
            return Err(LexiconError::DuplicateProperty(property.id.to_string()));
        }
        self.by_id.insert(property.id.clone(), self.properties.len());
        self.properties.push(property);
        Ok(())
    }

    pub fn get(&self, id: &VisualPropertyId) -> Option<&VisualProperty> {
        self.by_id.get(id).map(|&i| &self.properties[i])
    }

    /// Look a property up by the field name the viewer uses.
    pub fn by_field(&self, target: ElementTarget, field: &str) -> Option<&VisualProperty> {
        self.properties
            .iter()
            .find(|p| p.target == target && p.field == field)
    }

    /// All properties, in registration order.
    pub fn properties(&self) -> impl Iterator<Item = &VisualProperty> {
        self.properties.iter()
    }

    pub fn properties_for(&self, target: ElementTarget) -> impl Iterator<Item = &VisualProperty> {
        self.properties.iter().filter(move |p| p.target == target)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Lexicons keyed by renderer identifier, with a default fallback.
#[derive(Debug, Clone)]
pub struct LexiconRegistry {
    default: Arc<VisualLexicon>,
    by_renderer: HashMap<String, Arc<VisualLexicon>>,
}

impl Default for LexiconRegistry {
    fn default() -> Self {
        Self::new(VisualLexicon::standard())
    }
}

impl LexiconRegistry {
    pub fn new(default: VisualLexicon) -> Self {
        Self {
            default: Arc::new(default),
            by_renderer: HashMap::new(),
        }
    }

    /// Register the lexicon exposed by a renderer, replacing any previous one.
    pub fn register(&mut self, renderer: impl Into<String>, lexicon: VisualLexicon) {
        self.by_renderer.insert(renderer.into(), Arc::new(lexicon));
    }

    pub fn default_lexicon(&self) -> Arc<VisualLexicon> {
        Arc::clone(&self.default)
    }

    /// Lexicon of the given renderer, or the default one.
    pub fn resolve(&self, renderer: Option<&str>) -> Arc<VisualLexicon> {
        renderer
            .and_then(|r| self.by_renderer.get(r))
            .map(Arc::clone)
            .unwrap_or_else(|| self.default_lexicon())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_standard_lexicon_ids_are_unique() {
        let lexicon = VisualLexicon::standard();
        let mut ids: Vec<&str> = lexicon.properties().map(|p| p.id.as_str()).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
        assert_eq!(lexicon.len(), total);
    }

    #[test]
    fn test_standard_defaults_match_types() {
        let lexicon = VisualLexicon::standard();
        for property in lexicon.properties() {
            assert_eq!(
                property.default.value_type(),
                property.value_type,
                "{} default has the wrong type",
                property.id
            );
        }
    }

    #[test]
    fn test_add_duplicate_property() {
        let mut lexicon = VisualLexicon::new("custom");
        let prop = VisualProperty::new("X", "x", ElementTarget::Node, ValueType::Number, 1.0);
        lexicon.add(prop.clone()).unwrap();
        assert!(matches!(
            lexicon.add(prop),
            Err(LexiconError::DuplicateProperty(id)) if id == "X"
        ));
        assert_eq!(lexicon.len(), 1);
    }

    #[test]
    fn test_lookup_by_field_respects_target() {
        let lexicon = VisualLexicon::standard();
        let node_width = lexicon.by_field(ElementTarget::Node, "width").unwrap();
        let edge_width = lexicon.by_field(ElementTarget::Edge, "width").unwrap();
        assert_eq!(node_width.id.as_str(), "NODE_WIDTH");
        assert_eq!(edge_width.id.as_str(), "EDGE_WIDTH");
        assert!(lexicon.by_field(ElementTarget::Network, "width").is_none());
    }

    #[test]
    fn test_registry_falls_back_to_default() {
        let mut registry = LexiconRegistry::default();
        let mut custom = VisualLexicon::new("webgl");
        custom
            .add(VisualProperty::new("GLOW", "glow", ElementTarget::Node, ValueType::Number, 0.0))
            .unwrap();
        registry.register("webgl", custom);

        assert_eq!(registry.resolve(Some("webgl")).name(), "webgl");
        assert_eq!(registry.resolve(Some("canvas")).name(), "standard");
        assert_eq!(registry.resolve(None).name(), "standard");
    }
}
