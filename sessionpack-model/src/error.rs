//! Error types for the sessionpack-model crate.

use crate::value::ValueType;
use thiserror::Error;

/// Errors related to building or loading a network.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Element identifier cannot be empty")]
    EmptyId,

    #[error("Node already exists: {0}")]
    DuplicateNode(String),

    #[error("Edge already exists: {0}")]
    DuplicateEdge(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Edge not found: {0}")]
    EdgeNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

/// Errors raised when a visual value cannot be read or converted.
#[derive(Debug, Error)]
pub enum ValueError {
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Unknown node shape: {0}")]
    InvalidShape(String),

    #[error("Cannot coerce {value} to {target:?}")]
    Coercion { value: String, target: ValueType },
}

/// Errors related to visual style mappings.
#[derive(Debug, Error)]
pub enum StyleError {
    #[error("Continuous mapping on '{0}' has no control points")]
    EmptyContinuous(String),

    #[error("Continuous mapping on '{attribute}' has a non-finite control point ({value})")]
    NonFiniteControlPoint { attribute: String, value: f64 },

    #[error("Cannot interpolate between {lower:?} and {upper:?} values")]
    NotInterpolable { lower: ValueType, upper: ValueType },

    #[error("Cannot evaluate a continuous mapping at a non-finite value")]
    NonFiniteInput,

    #[error("Continuous mappings cannot produce {0:?} values")]
    UnsupportedContinuous(ValueType),

    #[error("Value error: {0}")]
    Value(#[from] ValueError),
}

/// Errors related to the visual lexicon.
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("Visual property already registered: {0}")]
    DuplicateProperty(String),
}

/// Errors related to the session registry and session files.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("A network named '{0}' is already open")]
    DuplicateNetwork(String),

    #[error("A visual style named '{0}' is already registered")]
    DuplicateStyle(String),

    #[error("Visual style not found: {0}")]
    StyleNotFound(String),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Style error in '{style}': {source}")]
    Style {
        style: String,
        #[source]
        source: StyleError,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}
