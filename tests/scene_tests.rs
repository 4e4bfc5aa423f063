//! Scene Integration Tests
//!
//! Tests for:
//! - Scene: add/remove nodes, attach hierarchy, subtree removal
//! - Node query: names, parent names, pre-order descendants
//! - Bundle instantiation: groups, meshes, shared authored materials
//! - World transforms and raycasting

mod common;

use glam::{Quat, Vec2, Vec3};

use gift_reveal::resources::Mesh;
use gift_reveal::scene::{Camera, Node, NodeHandle, Ray, Scene};

use common::{approx, approx_vec3, present_bundle, test_config};

fn mesh_node(scene: &mut Scene, name: &str, position: Vec3) -> Node {
    let mut node = Node::new(name);
    node.transform.position = position;
    node.mesh = Some(scene.add_mesh(Mesh::unit_cube(name)));
    node
}

fn names(scene: &Scene, handles: &[NodeHandle]) -> Vec<String> {
    handles
        .iter()
        .map(|&h| scene.get_node(h).unwrap().name.clone())
        .collect()
}

// ============================================================================
// Node Creation & Removal
// ============================================================================

#[test]
fn scene_add_node_to_root() {
    let mut scene = Scene::new();
    let handle = scene.add_node(Node::new("A"));
    assert!(scene.root_nodes.contains(&handle));
    assert_eq!(scene.node_count(), 1);
}

#[test]
fn scene_add_to_parent_links_both_ways() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new("Parent"));
    let child = scene.add_to_parent(Node::new("Child"), parent);

    assert_eq!(scene.get_node(child).unwrap().parent(), Some(parent));
    assert_eq!(scene.get_node(parent).unwrap().children(), &[child]);
    assert!(!scene.root_nodes.contains(&child));
}

#[test]
fn scene_attach_moves_root_under_parent() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::new("A"));
    let b = scene.add_node(Node::new("B"));

    scene.attach(b, a);
    assert!(!scene.root_nodes.contains(&b));
    assert_eq!(scene.parent_name(b), Some("A"));

    // Self-attach is refused.
    scene.attach(a, a);
    assert!(scene.get_node(a).unwrap().parent().is_none());
}

#[test]
fn scene_remove_node_removes_subtree_and_meshes() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("Root"));
    let group = scene.add_to_parent(Node::new("Group"), root);
    let leaf = mesh_node(&mut scene, "Leaf", Vec3::ZERO);
    let leaf = scene.add_to_parent(leaf, group);
    let keep = scene.add_node(Node::new("Keep"));
    assert_eq!(scene.meshes.len(), 1);

    assert_eq!(scene.remove_node(group), 2);
    assert!(!scene.contains(group));
    assert!(!scene.contains(leaf));
    assert!(scene.contains(keep));
    assert!(scene.meshes.is_empty());
    assert!(scene.get_node(root).unwrap().children().is_empty());

    assert_eq!(scene.remove_node(group), 0);
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn descendants_are_pre_order() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("R"));
    let a = scene.add_to_parent(Node::new("A"), root);
    scene.add_to_parent(Node::new("A1"), a);
    scene.add_to_parent(Node::new("A2"), a);
    scene.add_to_parent(Node::new("B"), root);

    assert_eq!(names(&scene, &scene.descendants(root)), ["R", "A", "A1", "A2", "B"]);
}

#[test]
fn find_by_name_returns_first_in_traversal_order() {
    let mut scene = Scene::new();
    let first_root = scene.add_node(Node::new("Scene"));
    let deep = scene.add_to_parent(Node::new("Group"), first_root);
    let early = scene.add_to_parent(Node::new("Dup"), deep);
    let second_root = scene.add_node(Node::new("Scene"));
    scene.add_to_parent(Node::new("Dup"), second_root);

    assert_eq!(scene.find_by_name("Dup"), Some(early));
    assert_eq!(scene.find_by_name("Scene"), Some(first_root));
    assert_eq!(scene.find_by_name("Nope"), None);
}

#[test]
fn parent_name_of_root_is_none() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("Root"));
    assert_eq!(scene.parent_name(root), None);
}

// ============================================================================
// Instantiation
// ============================================================================

#[test]
fn instantiate_wraps_bundle_in_a_group() {
    let mut scene = Scene::new();
    let bundle = present_bundle("present.glb");
    let root = scene.instantiate(&bundle);

    assert!(scene.root_nodes.contains(&root));
    assert_eq!(scene.get_node(root).unwrap().name, "Scene");
    assert_eq!(scene.node_count(), bundle.nodes.len() + 1);
    assert_eq!(scene.materials.len(), bundle.materials.len());

    let mesh = scene.find_by_name("Present_Box_Mesh").unwrap();
    assert_eq!(scene.parent_name(mesh), Some("Present_Box"));
    assert_eq!(scene.node_material(mesh).unwrap().name, "Box Wrapping");

    let top = scene.find_by_name("Present_Top").unwrap();
    assert!(approx_vec3(
        scene.get_node(top).unwrap().transform.position,
        Vec3::new(0.0, 0.75, 0.0)
    ));
    assert!(scene.get_node(scene.find_by_name("Empty").unwrap()).unwrap().mesh.is_none());
}

#[test]
fn instantiate_twice_gives_independent_copies() {
    let mut scene = Scene::new();
    let bundle = present_bundle("present.glb");
    let first = scene.instantiate(&bundle);
    let second = scene.instantiate(&bundle);

    scene.remove_node(first);
    assert!(scene.contains(second));
    assert!(scene.find_by_name("Present_Box_Mesh").is_some());
}

// ============================================================================
// Transforms
// ============================================================================

#[test]
fn world_position_composes_hierarchy() {
    let mut scene = Scene::new();
    let mut parent = Node::new("Parent");
    parent.transform.position = Vec3::new(1.0, 0.0, 0.0);
    parent.transform.rotation = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
    parent.transform.scale = Vec3::splat(2.0);
    let parent = scene.add_node(parent);

    let mut child = Node::new("Child");
    child.transform.position = Vec3::new(1.0, 0.0, 0.0);
    let child = scene.add_to_parent(child, parent);

    scene.update_matrix_world();
    let world = scene.world_position(child).unwrap();
    assert!(approx_vec3(world, Vec3::new(1.0, 2.0, 0.0)), "got {world}");
}

#[test]
fn world_position_follows_parent_changes() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new("Parent"));
    let child = scene.add_to_parent(Node::new("Child"), parent);
    scene.update_matrix_world();

    scene.get_node_mut(parent).unwrap().transform.position = Vec3::new(0.0, 3.0, 0.0);
    scene.update_matrix_world();
    assert!(approx(scene.world_position(child).unwrap().y, 3.0));
}

// ============================================================================
// Raycasting
// ============================================================================

#[test]
fn raycast_sorts_hits_nearest_first() {
    let mut scene = Scene::new();
    let far = mesh_node(&mut scene, "Far", Vec3::new(0.0, 0.0, -5.0));
    let far = scene.add_node(far);
    let near = mesh_node(&mut scene, "Near", Vec3::ZERO);
    let near = scene.add_node(near);
    scene.update_matrix_world();

    let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
    let hits = scene.raycast(&ray);
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].node, near);
    assert!(approx(hits[0].distance, 9.5));
    assert_eq!(hits[1].node, far);
}

#[test]
fn raycast_skips_hidden_subtrees() {
    let mut scene = Scene::new();
    let group = scene.add_node(Node::new("Group"));
    let cube = mesh_node(&mut scene, "Cube", Vec3::ZERO);
    scene.add_to_parent(cube, group);
    scene.update_matrix_world();
    scene.get_node_mut(group).unwrap().visible = false;

    let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
    assert!(scene.raycast_nearest(&ray).is_none());
}

#[test]
fn raycast_respects_rotation() {
    let mut scene = Scene::new();
    let mut slab = Node::new("Slab");
    slab.transform.scale = Vec3::new(4.0, 0.2, 0.2);
    slab.transform.rotation = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
    slab.mesh = Some(scene.add_mesh(Mesh::unit_cube("Slab")));
    scene.add_node(slab);
    scene.update_matrix_world();

    // Rotated upright: a ray at y = 1.5 hits, one at x = 1.5 misses.
    let hit = Ray::new(Vec3::new(0.0, 1.5, 10.0), Vec3::NEG_Z);
    let miss = Ray::new(Vec3::new(1.5, 0.0, 10.0), Vec3::NEG_Z);
    assert!(scene.raycast_nearest(&hit).is_some());
    assert!(scene.raycast_nearest(&miss).is_none());
}

#[test]
fn camera_center_ray_hits_present() {
    let mut scene = Scene::new();
    scene.instantiate(&present_bundle("present.glb"));
    scene.update_matrix_world();
    let camera = Camera::from_options(&test_config().camera);

    let hit = scene
        .raycast_nearest(&camera.ray_from_ndc(Vec2::ZERO))
        .expect("hit");
    assert_eq!(scene.parent_name(hit.node), Some("Present_Box"));
}
