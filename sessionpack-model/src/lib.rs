//! # sessionpack-model
//!
//! Session data model read by the sessionpack exporter.
//!
//! This crate provides:
//!
//! - **Networks**: named graph snapshots with attribute rows, backed by petgraph
//! - **Views**: node positions and per-element bypass values over a network
//! - **Visual values**: colors, numbers, text and node shapes, with coercion
//! - **Lexicons**: the visual properties a renderer understands
//! - **Styles**: passthrough, discrete and continuous mappings plus defaults
//! - **Sessions**: the registry of open views and styles, persisted as JSON
//!
//! ## Example
//!
//! ```rust
//! use sessionpack_model::{
//!     ContinuousMapping, ControlPoint, Edge, ElementId, Network, NetworkView, Node, Session,
//!     VisualLexicon, VisualPropertyId, VisualStyle, VisualValue,
//! };
//! use std::sync::Arc;
//!
//! let mut network = Network::new("G1");
//! network
//!     .add_node(Node::new(ElementId::new("a").unwrap()).with_attribute("degree", 1))
//!     .unwrap();
//! network
//!     .add_node(Node::new(ElementId::new("b").unwrap()).with_attribute("degree", 3))
//!     .unwrap();
//! network
//!     .add_edge(Edge::new(
//!         ElementId::new("ab").unwrap(),
//!         ElementId::new("a").unwrap(),
//!         ElementId::new("b").unwrap(),
//!     ))
//!     .unwrap();
//!
//! let mut style = VisualStyle::new("default");
//! style.set_mapping(
//!     "NODE_WIDTH",
//!     ContinuousMapping::new(
//!         "degree",
//!         vec![ControlPoint::new(1.0, 20.0), ControlPoint::new(3.0, 60.0)],
//!     )
//!     .unwrap(),
//! );
//!
//! let lexicon = VisualLexicon::standard();
//! let width = lexicon.get(&VisualPropertyId::from("NODE_WIDTH")).unwrap();
//! let node = network.get_node(&ElementId::new("b").unwrap()).unwrap();
//! assert_eq!(
//!     style.resolve(width, &node.attributes, None).unwrap(),
//!     VisualValue::Number(60.0)
//! );
//!
//! let mut session = Session::new();
//! session.add_view(NetworkView::new(Arc::new(network))).unwrap();
//! session.add_style(style).unwrap();
//! assert_eq!(session.current_style().unwrap().name(), "default");
//! ```

pub mod element;
pub mod error;
pub mod lexicon;
pub mod network;
pub mod session;
pub mod style;
pub mod value;
pub mod view;

// Re-exports for convenient access
pub use element::{AttributeRow, Edge, ElementId, Node};
pub use error::{GraphError, LexiconError, SessionError, StyleError, ValueError};
pub use lexicon::{ElementTarget, LexiconRegistry, VisualLexicon, VisualProperty, VisualPropertyId};
pub use network::{Network, NetworkDocument};
pub use session::{Session, SessionDocument};
pub use style::{
    ContinuousMapping, ControlPoint, DiscreteEntry, DiscreteMapping, Mapping, PassthroughMapping,
    VisualStyle, interpolate,
};
pub use value::{AttributeValue, Color, NodeShape, ValueType, VisualValue};
pub use view::{Bypasses, NetworkView, Position, ViewDocument};
