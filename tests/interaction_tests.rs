//! Interaction Router Tests
//!
//! Tests for:
//! - Client to NDC mapping
//! - Hover highlighting of the whole outline set
//! - The open latch: one qualifying click, outline cleared
//! - Hit qualification by parent name, nearest hit only

mod common;

use glam::{Vec2, Vec3};

use gift_reveal::gift::interaction::is_selectable_hit;
use gift_reveal::gift::{ContainerRect, InteractionRouter, OutlineSet, PointerOutcome};
use gift_reveal::resources::Mesh;
use gift_reveal::scene::{Camera, Node, Scene};

use common::{CENTER, CONTAINER, approx, present_bundle, test_config};

fn camera() -> Camera {
    Camera::from_options(&test_config().camera)
}

fn present_scene() -> Scene {
    let mut scene = Scene::new();
    scene.instantiate(&present_bundle("present.glb"));
    scene.update_matrix_world();
    scene
}

fn outline_of(scene: &Scene, names: &[&str]) -> OutlineSet {
    let mut outline = OutlineSet::new();
    for name in names {
        outline.insert(scene.find_by_name(name).expect(name));
    }
    outline
}

fn mesh_node(name: &str, position: Vec3) -> Node {
    let mut node = Node::new(name);
    node.transform.position = position;
    node
}

// ============================================================================
// NDC mapping
// ============================================================================

#[test]
fn container_center_maps_to_origin() {
    let ndc = CONTAINER.to_ndc(CENTER.0, CENTER.1);
    assert!(approx(ndc.x, 0.0) && approx(ndc.y, 0.0), "got {ndc}");
}

#[test]
fn container_corners() {
    let rect = ContainerRect::new(10.0, 20.0, 200.0, 100.0);
    let bottom_right = rect.to_ndc(210.0, 120.0);
    assert!(approx(bottom_right.x, 1.0));
    assert!(approx(bottom_right.y, -1.0));

    let quarter = rect.to_ndc(60.0, 45.0);
    assert!(approx(quarter.x, -0.5));
    assert!(approx(quarter.y, 0.5));
}

// ============================================================================
// Hover
// ============================================================================

#[test]
fn hover_highlights_whole_outline_set() {
    let scene = present_scene();
    let cam = camera();
    let mut outline = outline_of(&scene, &["Present_Box_Mesh", "Present_Top_Mesh", "Ribbon_Bow_Mesh"]);
    let mut router = InteractionRouter::new(CONTAINER);

    let outcome = router.pointer_move(CENTER.0, CENTER.1, &scene, &cam, &mut outline);
    assert_eq!(outcome, PointerOutcome::Hover);
    assert_eq!(outline.highlighted(), outline.members());
    assert!(router.state().hovered_selectable);
    assert!(!router.state().opened);
}

#[test]
fn moving_off_clears_highlight() {
    let scene = present_scene();
    let cam = camera();
    let mut outline = outline_of(&scene, &["Present_Box_Mesh"]);
    let mut router = InteractionRouter::new(CONTAINER);

    router.pointer_move(CENTER.0, CENTER.1, &scene, &cam, &mut outline);
    let outcome = router.pointer_move(5.0, 5.0, &scene, &cam, &mut outline);

    assert_eq!(outcome, PointerOutcome::Miss);
    assert!(outline.highlighted().is_empty());
    assert_eq!(outline.len(), 1);
    assert!(!router.state().hovered_selectable);
    assert!(approx(router.pointer().x, -1.0 + 10.0 / 800.0));
}

// ============================================================================
// Open latch
// ============================================================================

#[test]
fn first_click_opens_once() {
    let scene = present_scene();
    let cam = camera();
    let mut outline = outline_of(&scene, &["Present_Box_Mesh", "Ribbon_Bow_Mesh"]);
    let mut router = InteractionRouter::new(CONTAINER);

    assert_eq!(
        router.pointer_up(CENTER.0, CENTER.1, &scene, &cam, &mut outline),
        PointerOutcome::Open
    );
    assert!(router.state().opened);
    assert!(outline.is_empty());
    assert!(outline.highlighted().is_empty());

    assert_eq!(
        router.pointer_up(CENTER.0, CENTER.1, &scene, &cam, &mut outline),
        PointerOutcome::Hover
    );
    assert!(outline.highlighted().is_empty());
}

#[test]
fn click_off_present_does_not_open() {
    let scene = present_scene();
    let cam = camera();
    let mut outline = OutlineSet::new();
    let mut router = InteractionRouter::new(CONTAINER);

    assert_eq!(
        router.pointer_up(790.0, 10.0, &scene, &cam, &mut outline),
        PointerOutcome::Miss
    );
    assert!(!router.state().opened);
}

#[test]
fn pointer_up_updates_pointer_position() {
    let scene = present_scene();
    let cam = camera();
    let mut outline = OutlineSet::new();
    let mut router = InteractionRouter::new(CONTAINER);

    router.pointer_move(0.0, 0.0, &scene, &cam, &mut outline);
    assert_eq!(
        router.pointer_up(CENTER.0, CENTER.1, &scene, &cam, &mut outline),
        PointerOutcome::Open
    );
    assert!(router.pointer().length() < 1e-4);
}

// ============================================================================
// Hit qualification
// ============================================================================

#[test]
fn root_mesh_never_qualifies() {
    let mut scene = Scene::new();
    let mut node = mesh_node("Present_Box", Vec3::ZERO);
    node.mesh = Some(scene.add_mesh(Mesh::unit_cube("Present_Box")));
    scene.add_node(node);
    scene.update_matrix_world();

    assert!(!is_selectable_hit(&scene, &camera(), Vec2::ZERO));
}

#[test]
fn unlisted_parent_does_not_qualify() {
    let mut scene = Scene::new();
    let group = scene.add_node(Node::new("Decoration"));
    let mut node = mesh_node("Bauble", Vec3::ZERO);
    node.mesh = Some(scene.add_mesh(Mesh::unit_cube("Bauble")));
    scene.add_to_parent(node, group);
    scene.update_matrix_world();

    assert!(!is_selectable_hit(&scene, &camera(), Vec2::ZERO));
}

#[test]
fn nearest_hit_decides() {
    let mut scene = present_scene();
    let group = scene.add_node(Node::new("Decoration"));
    let mut node = mesh_node("Bauble", Vec3::new(0.0, 0.0, 3.0));
    node.mesh = Some(scene.add_mesh(Mesh::unit_cube("Bauble")));
    scene.add_to_parent(node, group);
    scene.update_matrix_world();

    assert!(!is_selectable_hit(&scene, &camera(), Vec2::ZERO));
}

#[test]
fn hidden_present_is_not_hit() {
    let mut scene = present_scene();
    for name in ["Present_Box_Mesh", "Present_Box_Outline"] {
        let handle = scene.find_by_name(name).unwrap();
        scene.get_node_mut(handle).unwrap().visible = false;
    }

    assert!(!is_selectable_hit(&scene, &camera(), Vec2::ZERO));
}

#[test]
fn every_present_part_qualifies() {
    let mut scene = Scene::new();
    let cam = camera();
    let group = scene.add_node(Node::new("Ribbon_Knot"));
    let mut node = mesh_node("Knot", Vec3::ZERO);
    node.mesh = Some(scene.add_mesh(Mesh::unit_cube("Knot")));
    scene.add_to_parent(node, group);
    scene.update_matrix_world();

    assert!(is_selectable_hit(&scene, &cam, Vec2::ZERO));
}
