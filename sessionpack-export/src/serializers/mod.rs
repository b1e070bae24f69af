//! Serializers for the data files of an exported session.
//!
//! - **Style**: one mapping-rule document per visual style
//! - **Network**: one node/edge/position document per network view
//! - **Script**: the `var networks = ...;` and `var styles = ...;` wrappers
//!   the web viewer loads

pub mod network;
pub mod script;
pub mod style;

pub use network::{EdgeJson, Elements, NetworkJson, NetworkSerializer, NodeJson};
pub use script::{NetworksScript, write_styles_script};
pub use style::{FORMAT_VERSION, PropertyEntry, StyleDocument, StyleSerializer};
