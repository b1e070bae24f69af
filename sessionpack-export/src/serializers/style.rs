//! Style serializer.
//!
//! Converts a visual style into a mapping-rule document for one lexicon.
//! Every lexicon property gets exactly one entry, mapped or not.
//!
//! ## Output Schema
//!
//! ```json
//! {
//!   "format_version": "1.0",
//!   "generated_by": "sessionpack-0.1.0",
//!   "target_renderer_version": "~2.1",
//!   "title": "default",
//!   "properties": [
//!     {
//!       "visualProperty": "NODE_LABEL",
//!       "field": "content",
//!       "target": "node",
//!       "default": "",
//!       "mapping": { "mappingType": "passthrough", "attribute": "name" }
//!     }
//!   ]
//! }
//! ```

use crate::error::SerializationError;
use serde::{Deserialize, Serialize};
use sessionpack_model::{
    ElementTarget, Mapping, StyleError, VisualLexicon, VisualPropertyId, VisualStyle, VisualValue,
};

/// Version of the style document layout.
pub const FORMAT_VERSION: &str = "1.0";

const GENERATED_BY: &str = concat!("sessionpack-", env!("CARGO_PKG_VERSION"));

/// Mapping rules of one style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleDocument {
    pub format_version: String,

    pub generated_by: String,

    /// Viewer version range the document targets
    pub target_renderer_version: String,

    /// Style name
    pub title: String,

    /// One entry per lexicon property, in lexicon order
    pub properties: Vec<PropertyEntry>,
}

/// Default value and optional mapping of one visual property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyEntry {
    pub visual_property: VisualPropertyId,

    pub field: String,

    pub target: ElementTarget,

    pub default: VisualValue,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<Mapping>,
}

/// Style serializer bound to one lexicon.
#[derive(Debug, Clone)]
pub struct StyleSerializer<'a> {
    lexicon: &'a VisualLexicon,
    renderer_version: String,
}

impl<'a> StyleSerializer<'a> {
    pub fn new(lexicon: &'a VisualLexicon, renderer_version: impl Into<String>) -> Self {
        Self {
            lexicon,
            renderer_version: renderer_version.into(),
        }
    }

    /// Build the document for a style.
    ///
    /// Defaults and mapping outputs are coerced to each property's type. A
    /// value that cannot be coerced fails the whole document.
    pub fn build_document(&self, style: &VisualStyle) -> Result<StyleDocument, SerializationError> {
        let properties = self
            .lexicon
            .properties()
            .map(|property| {
                let error = |source: StyleError| SerializationError::Style {
                    style: style.name().to_string(),
                    property: property.id.to_string(),
                    source,
                };

                let default = style
                    .default_for(property)
                    .coerce(property.value_type)
                    .map_err(|e| error(StyleError::from(e)))?;
                let mapping = style
                    .mapping(&property.id)
                    .map(|m| m.coerced(property.value_type))
                    .transpose()
                    .map_err(error)?;

                Ok(PropertyEntry {
                    visual_property: property.id.clone(),
                    field: property.field.clone(),
                    target: property.target,
                    default,
                    mapping,
                })
            })
            .collect::<Result<Vec<_>, SerializationError>>()?;

        let unknown = style
            .mappings()
            .filter(|(id, _)| self.lexicon.get(id).is_none())
            .count();
        if unknown > 0 {
            tracing::debug!(
                "Style '{}' maps {} properties unknown to lexicon '{}'",
                style.name(),
                unknown,
                self.lexicon.name()
            );
        }

        Ok(StyleDocument {
            format_version: FORMAT_VERSION.to_string(),
            generated_by: GENERATED_BY.to_string(),
            target_renderer_version: self.renderer_version.clone(),
            title: style.name().to_string(),
            properties,
        })
    }

    /// Serialize a style to pretty-printed JSON.
    pub fn serialize_style(&self, style: &VisualStyle) -> Result<String, SerializationError> {
        let document = self.build_document(style)?;
        Ok(serde_json::to_string_pretty(&document)?)
    }
}
