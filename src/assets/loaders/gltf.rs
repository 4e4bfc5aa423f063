use glam::{Quat, Vec3};
use gltf::animation::util::ReadOutputs;

use crate::animation::binding::TargetPath;
use crate::animation::clip::{AnimationClip, Track, TrackData, TrackMeta};
use crate::animation::tracks::{InterpolationMode, KeyframeTrack};
use crate::assets::bundle::{AssetBundle, BundleNode};
use crate::errors::{GiftError, Result};
use crate::resources::color::Color;
use crate::resources::mesh::{BoundingBox, Mesh};

/// Parses binary glTF (`.glb`) into an [`AssetBundle`].
///
/// Only the embedded binary chunk is supported as a buffer source. Vertex
/// data is not kept: each primitive contributes its bounds and vertex count.
pub struct GltfLoader;

impl GltfLoader {
    pub fn load_from_bytes(path: &str, bytes: &[u8]) -> Result<AssetBundle> {
        let gltf = gltf::Gltf::from_slice(bytes)?;
        let buffers = Self::load_buffers(&gltf)?;

        let mut bundle = AssetBundle::new(path);

        for material in gltf.materials() {
            let [r, g, b, _] = material.pbr_metallic_roughness().base_color_factor();
            bundle.add_material(material.name().unwrap_or(""), Color::new(r, g, b));
        }

        // glTF node `i` lands at bundle index `i`; primitive children are
        // appended after all of them.
        for node in gltf.nodes() {
            let (t, r, s) = node.transform().decomposed();
            let mut bundle_node = BundleNode::new(&node_name(&node));
            bundle_node.translation = Vec3::from_array(t);
            bundle_node.rotation = Quat::from_array(r);
            bundle_node.scale = Vec3::from_array(s);
            bundle_node.children = node.children().map(|c| c.index()).collect();
            bundle.nodes.push(bundle_node);
        }

        for node in gltf.nodes() {
            let Some(mesh) = node.mesh() else {
                continue;
            };
            let primitives: Vec<_> = mesh.primitives().collect();

            if let [primitive] = primitives.as_slice() {
                let mesh_name = mesh.name().unwrap_or(&bundle.nodes[node.index()].name).to_string();
                let target = &mut bundle.nodes[node.index()];
                target.mesh = Some(primitive_mesh(&mesh_name, primitive));
                target.material = primitive.material().index();
                continue;
            }

            // Several primitives: the node becomes a group with one mesh
            // child per primitive.
            for (i, primitive) in primitives.iter().enumerate() {
                let name = match mesh.name() {
                    Some(n) => format!("{n}_{i}"),
                    None => format!("mesh_{}_{i}", mesh.index()),
                };
                let mut child = BundleNode::new(&name).with_mesh(primitive_mesh(&name, primitive));
                child.material = primitive.material().index();
                bundle.add_child(node.index(), child);
            }
        }

        if let Some(scene) = gltf.default_scene().or_else(|| gltf.scenes().next()) {
            if let Some(name) = scene.name() {
                bundle.scene_name = name.to_string();
            }
            bundle.roots = scene.nodes().map(|n| n.index()).collect();
        }

        bundle.clips = Self::load_animations(&gltf, &buffers);

        log::debug!(
            "Parsed '{path}': {} nodes, {} materials, {} clips",
            bundle.nodes.len(),
            bundle.materials.len(),
            bundle.clips.len()
        );

        Ok(bundle)
    }

    fn load_buffers(gltf: &gltf::Gltf) -> Result<Vec<Vec<u8>>> {
        let mut buffer_data = Vec::new();
        for buffer in gltf.buffers() {
            match buffer.source() {
                gltf::buffer::Source::Bin => {
                    let blob = gltf
                        .blob
                        .as_deref()
                        .ok_or_else(|| GiftError::Gltf("Missing GLB binary chunk".to_string()))?;
                    buffer_data.push(blob.to_vec());
                }
                gltf::buffer::Source::Uri(uri) => {
                    return Err(GiftError::Gltf(format!(
                        "External buffer '{uri}' is not supported, use a .glb file"
                    )));
                }
            }
        }
        Ok(buffer_data)
    }

    fn load_animations(gltf: &gltf::Gltf, buffers: &[Vec<u8>]) -> Vec<AnimationClip> {
        let mut animations = Vec::new();

        for anim in gltf.animations() {
            let mut tracks = Vec::new();

            for channel in anim.channels() {
                let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
                let target = channel.target();
                let node_name = node_name(&target.node());

                let (Some(inputs), Some(outputs)) = (reader.read_inputs(), reader.read_outputs())
                else {
                    log::warn!("Animation channel for '{node_name}' has no readable data");
                    continue;
                };
                let times: Vec<f32> = inputs.collect();

                let interpolation = match channel.sampler().interpolation() {
                    gltf::animation::Interpolation::Linear => InterpolationMode::Linear,
                    gltf::animation::Interpolation::Step => InterpolationMode::Step,
                    gltf::animation::Interpolation::CubicSpline => InterpolationMode::CubicSpline,
                };

                let (target_path, data) = match outputs {
                    ReadOutputs::Translations(iter) => (
                        TargetPath::Translation,
                        TrackData::Vector3(KeyframeTrack::new(
                            times,
                            iter.map(Vec3::from_array).collect(),
                            interpolation,
                        )),
                    ),
                    ReadOutputs::Rotations(iter) => (
                        TargetPath::Rotation,
                        TrackData::Quaternion(KeyframeTrack::new(
                            times,
                            iter.into_f32().map(Quat::from_array).collect(),
                            interpolation,
                        )),
                    ),
                    ReadOutputs::Scales(iter) => (
                        TargetPath::Scale,
                        TrackData::Vector3(KeyframeTrack::new(
                            times,
                            iter.map(Vec3::from_array).collect(),
                            interpolation,
                        )),
                    ),
                    ReadOutputs::MorphTargetWeights(_) => {
                        log::debug!("Skipping morph weight track on '{node_name}'");
                        continue;
                    }
                };

                tracks.push(Track {
                    meta: TrackMeta {
                        node_name,
                        target: target_path,
                    },
                    data,
                });
            }

            let name = anim
                .name()
                .map_or_else(|| format!("Animation_{}", anim.index()), str::to_string);
            animations.push(AnimationClip::new(name, tracks));
        }

        animations
    }
}

fn node_name(node: &gltf::Node) -> String {
    node.name()
        .map_or_else(|| format!("Node_{}", node.index()), str::to_string)
}

fn primitive_mesh(name: &str, primitive: &gltf::Primitive) -> Mesh {
    let bounds = primitive.bounding_box();
    let vertex_count = primitive
        .get(&gltf::Semantic::Positions)
        .map_or(0, |accessor| accessor.count());
    Mesh::new(
        name,
        BoundingBox::new(Vec3::from_array(bounds.min), Vec3::from_array(bounds.max)),
        vertex_count,
    )
}
