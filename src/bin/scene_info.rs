//! Loads a scene document and prints its node tree and statistics.
//!
//! Usage: `scene_info <scene.json> [node-name]`
//!
//! With a node name, also prints that node's world transform.

use anyhow::{bail, Context, Result};
use log::info;

use arbor::gfx::scene::{DrawLog, NodeId, SceneGraph};
use arbor::{init_logging, Viewer};

fn print_tree(graph: &SceneGraph, id: NodeId, depth: usize) {
    let node = graph.node(id);
    let t = graph.world_transform(id).w;
    println!(
        "{:indent$}{} [{:?}{}] world T=({:.3}, {:.3}, {:.3})",
        "",
        node.name(),
        node.kind(),
        node.model_name()
            .map(|m| format!(": {}", m))
            .unwrap_or_default(),
        t.x,
        t.y,
        t.z,
        indent = depth * 2
    );
    for &child in node.children() {
        print_tree(graph, child, depth + 1);
    }
}

fn main() -> Result<()> {
    init_logging();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: scene_info <scene.json> [node-name]");
    };

    let mut viewer = Viewer::default();
    viewer
        .load_scene(&path)
        .with_context(|| format!("loading scene {}", path))?;
    let graph = viewer.scene().context("no scene installed")?;

    print_tree(graph, graph.root(), 0);

    let stats = graph.statistics();
    println!("---");
    println!(
        "nodes: {}  model nodes: {}  meshes: {}  vertices: {}  triangles: {}",
        stats.node_count,
        stats.model_node_count,
        stats.model_count,
        stats.total_vertices,
        stats.total_triangles
    );

    if let Some(name) = args.next() {
        let id = viewer.select_node(&name)?;
        let graph = viewer.scene().context("no scene installed")?;
        println!("{} world transform: {:?}", name, graph.world_transform(id));
    }

    let mut draws = DrawLog::default();
    viewer.render(&mut draws);
    info!("Frame would issue {} draw calls", draws.calls.len());
    Ok(())
}
