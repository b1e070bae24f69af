//! Fixtures shared by the export integration tests.

#![allow(dead_code)]

use sessionpack_model::{
    Color, ContinuousMapping, ControlPoint, DiscreteMapping, Edge, ElementId, Mapping, Network,
    NetworkView, Node, Position, Session, VisualStyle,
};
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::Arc;
use zip::ZipArchive;

pub fn id(s: &str) -> ElementId {
    ElementId::new(s).unwrap()
}

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// The two-node "G1" network.
pub fn g1_view() -> NetworkView {
    let mut network = Network::new("G1");
    network.add_node(Node::new(id("a"))).unwrap();
    network.add_node(Node::new(id("b"))).unwrap();
    network
        .add_edge(Edge::new(id("ab"), id("a"), id("b")))
        .unwrap();
    NetworkView::new(Arc::new(network))
}

/// A scored network with positions and a bypass.
pub fn scored_view(name: &str, nodes: usize) -> NetworkView {
    let mut network = Network::undirected(name);
    for i in 0..nodes {
        network
            .add_node(
                Node::new(id(&format!("n{i}")))
                    .with_attribute("name", format!("Node {i}"))
                    .with_attribute("score", i as f64)
                    .with_attribute("kind", if i % 2 == 0 { "even" } else { "odd" }),
            )
            .unwrap();
    }
    for i in 1..nodes {
        network
            .add_edge(Edge::new(
                id(&format!("e{i}")),
                id(&format!("n{}", i - 1)),
                id(&format!("n{i}")),
            ))
            .unwrap();
    }

    let mut view = NetworkView::new(Arc::new(network));
    for i in 0..nodes {
        view.set_position(&id(&format!("n{i}")), Position::new(i as f64 * 10.0, 0.0))
            .unwrap();
    }
    view.set_node_bypass(&id("n0"), "NODE_FILL_COLOR", Color::new(255, 0, 0))
        .unwrap();
    view
}

pub fn mapped_style(name: &str) -> VisualStyle {
    let mut style = VisualStyle::new(name);
    style.set_mapping("NODE_LABEL", Mapping::passthrough("name"));
    style.set_mapping(
        "NODE_FILL_COLOR",
        DiscreteMapping::new("kind")
            .with_entry("even", "#00f")
            .with_entry("odd", "#0f0"),
    );
    style.set_mapping(
        "NODE_WIDTH",
        ContinuousMapping::new(
            "score",
            vec![ControlPoint::new(0.0, 20.0), ControlPoint::new(10.0, 80.0)],
        )
        .unwrap(),
    );
    style
}

pub fn g1_session() -> Session {
    let mut session = Session::new();
    session.add_view(g1_view()).unwrap();
    session.add_style(VisualStyle::new("default")).unwrap();
    session
}

/// Create a bundled viewer tree with `files` files.
pub fn resource_tree(root: &Path) -> usize {
    let files = [
        ("index.html", "<html><script src=\"data/networks.js\"></script></html>"),
        ("js/main.js", "console.log(networks);"),
        ("js/lib/viewer.min.js", "/* viewer */"),
        ("css/style.css", "body { margin: 0; }"),
    ];
    for (path, content) in files {
        write_file(&root.join(path), content);
    }
    files.len()
}

pub fn entry_names(bytes: &[u8]) -> Vec<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

pub fn read_entry(bytes: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut content = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    content
}

/// Parse the JSON assigned by a `var <name> = ...;` script.
pub fn script_json(script: &str, variable: &str) -> serde_json::Value {
    let body = script
        .trim_end()
        .strip_prefix(&format!("var {variable} = "))
        .and_then(|s| s.strip_suffix(';'))
        .unwrap();
    serde_json::from_str(body).unwrap()
}
