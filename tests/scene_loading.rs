use std::path::PathBuf;

use arbor::gfx::mesh;
use arbor::gfx::scene::{transform, DrawLog, DrawMode, NodeKind, SceneBuilder, TransformDesc};
use arbor::{SceneError, Viewer};
use cgmath::Matrix4;

const EPS: f32 = 1e-4;

fn asset(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets").join(name)
}

#[test]
fn test_load_demo_scene() {
    let graph = SceneBuilder::load(asset("scene.json"), DrawMode::Triangles).unwrap();

    assert_eq!(graph.len(), 5);
    assert_eq!(graph.models().len(), 2);

    let names: Vec<&str> = graph
        .get_nodes()
        .into_iter()
        .map(|id| graph.node(id).name())
        .collect();
    assert_eq!(names, vec!["root", "base", "arm", "forearm", "tip"]);

    let arm = graph.get_node("arm").unwrap();
    assert_eq!(graph.node(arm).kind(), NodeKind::Generic);
    let tip = graph.get_node("tip").unwrap();
    assert_eq!(graph.node(tip).model_name(), Some("pyramid"));

    for id in graph.get_nodes() {
        let expected = graph.compute_world_from_ancestors(id);
        assert!(transform::approx_eq(graph.world_transform(id), &expected, EPS));
    }
}

#[test]
fn test_world_transform_of_nested_model() {
    let graph = SceneBuilder::load(asset("scene.json"), DrawMode::Triangles).unwrap();
    let forearm = graph.get_node("forearm").unwrap();

    let arm = TransformDesc {
        translation: [0.0, 0.5, 0.0],
        rotation: [0.0, 0.0, 30.0],
        scale: [1.0, 1.0, 1.0],
    };
    let forearm_local = TransformDesc {
        translation: [1.5, 0.0, 0.0],
        rotation: [0.0, 0.0, 0.0],
        scale: [1.5, 0.2, 0.2],
    };
    let expected: Matrix4<f32> = arm.to_matrix() * forearm_local.to_matrix();
    assert!(transform::approx_eq(graph.world_transform(forearm), &expected, EPS));
}

#[test]
fn test_meshes_are_normalized() {
    for name in ["meshes/cube.obj", "meshes/pyramid.obj"] {
        let mesh = mesh::load_file(asset(name)).unwrap();
        let bounds = mesh.bounds().unwrap();
        assert!((bounds.max_extent() - 2.0).abs() < 1e-5, "{}", name);
        let c = bounds.center();
        assert!(c.x.abs() < 1e-5 && c.y.abs() < 1e-5 && c.z.abs() < 1e-5, "{}", name);
    }
}

#[test]
fn test_quad_mesh_triangulation() {
    let cube = mesh::load_file(asset("meshes/cube.obj")).unwrap();
    assert_eq!(cube.vertex_count(), 8);
    assert_eq!(cube.triangle_count(), 12);
    // f 1//1 2//1 3//1 4//1
    assert_eq!(&cube.indices()[..6], &[0, 1, 2, 0, 2, 3]);
}

#[test]
fn test_render_order_and_placement() {
    let graph = SceneBuilder::load(asset("scene.json"), DrawMode::Triangles).unwrap();
    let mut draws = DrawLog::default();
    graph.render(&mut draws);

    let names: Vec<&str> = draws.calls.iter().map(|c| c.node.as_str()).collect();
    assert_eq!(names, vec!["base", "forearm", "tip"]);
    for call in &draws.calls {
        let id = graph.get_node(&call.node).unwrap();
        assert_eq!(&call.world, graph.world_transform(id));
    }
}

#[test]
fn test_unsupported_face_aborts_without_touching_active_scene() {
    let mut viewer = Viewer::default();
    viewer.load_scene(asset("scene.json")).unwrap();
    let forearm = viewer.select_node("forearm").unwrap();
    let before = *viewer.scene().unwrap().world_transform(forearm);

    let err = viewer.load_scene(asset("broken_scene.json")).unwrap_err();
    assert!(matches!(
        err,
        SceneError::UnsupportedFaceFormat { arity: 5, .. }
    ));

    let scene = viewer.scene().unwrap();
    assert_eq!(scene.len(), 5);
    assert_eq!(scene.world_transform(forearm), &before);
    assert!(scene.find_node("p").is_none());
}

#[test]
fn test_undeclared_model_is_rejected() {
    match SceneBuilder::load(asset("missing_model_scene.json"), DrawMode::Triangles) {
        Err(SceneError::ModelNotFound { node, model }) => {
            assert_eq!(node, "t");
            assert_eq!(model, "teapot");
        }
        Err(other) => panic!("expected ModelNotFound, got {}", other),
        Ok(_) => panic!("expected ModelNotFound, scene built"),
    }
}

#[test]
fn test_missing_scene_file() {
    let err = SceneBuilder::load(asset("no_such_scene.json"), DrawMode::Triangles)
        .err()
        .unwrap();
    assert!(matches!(err, SceneError::Io { .. }));
}

#[test]
fn test_scene_switch_replaces_tree() {
    let dir = std::env::temp_dir().join(format!("arbor-switch-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("tri.obj"), "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
    std::fs::write(
        dir.join("small.json"),
        r#"{
            "models": [{ "name": "tri", "path": "tri.obj" }],
            "scenegraph": { "name": "world", "type": "node", "children": [
                { "name": "only", "type": "model", "content": "tri" }
            ] }
        }"#,
    )
    .unwrap();

    let mut viewer = Viewer::default();
    viewer.load_scene(asset("scene.json")).unwrap();
    viewer.select_node("tip").unwrap();

    viewer.load_scene(dir.join("small.json")).unwrap();
    let scene = viewer.scene().unwrap();
    assert_eq!(scene.len(), 2);
    assert!(scene.find_node("tip").is_none());
    assert_eq!(viewer.mode(), arbor::ManipulationMode::Camera);

    std::fs::remove_dir_all(&dir).ok();
}
