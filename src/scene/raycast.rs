use glam::{Affine3A, Vec3};

use crate::resources::mesh::BoundingBox;
use crate::scene::{NodeHandle, Scene};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub node: NodeHandle,
    pub distance: f32,
}

/// Slab test in the box's own space. Returns the entry distance and point.
#[must_use]
pub fn ray_aabb_intersection(origin: Vec3, dir: Vec3, min: Vec3, max: Vec3) -> Option<(f32, Vec3)> {
    let mut t_min: f32 = 0.0;
    let mut t_max: f32 = f32::INFINITY;
    let origin_arr = origin.to_array();
    let dir_arr = dir.to_array();
    let min_arr = min.to_array();
    let max_arr = max.to_array();
    for i in 0..3 {
        let o = origin_arr[i];
        let d = dir_arr[i];
        if d.abs() < 1e-6 {
            if o < min_arr[i] || o > max_arr[i] {
                return None;
            }
        } else {
            let inv_d = 1.0 / d;
            let mut t1 = (min_arr[i] - o) * inv_d;
            let mut t2 = (max_arr[i] - o) * inv_d;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return None;
            }
        }
    }
    if t_max < 0.0 {
        return None;
    }
    let t_hit = if t_min >= 0.0 { t_min } else { t_max };
    Some((t_hit, origin + dir * t_hit))
}

/// Distance along `ray` to a box transformed by `world`, treated as an
/// oriented box.
#[must_use]
pub fn ray_hit_obb(ray: &Ray, world: &Affine3A, bounds: &BoundingBox) -> Option<f32> {
    if world.matrix3.determinant().abs() <= f32::EPSILON {
        return None;
    }
    let inv = world.inverse();
    let origin_local = inv.transform_point3(ray.origin);
    let dir_local = inv.transform_vector3(ray.direction);
    if dir_local.length_squared() <= f32::EPSILON {
        return None;
    }
    let (_, hit_local) =
        ray_aabb_intersection(origin_local, dir_local.normalize(), bounds.min, bounds.max)?;
    let hit_world = world.transform_point3(hit_local);
    Some((hit_world - ray.origin).length())
}

impl Scene {
    /// Intersects `ray` with every visible mesh node, recursively from the
    /// scene roots. Hits are sorted nearest first.
    #[must_use]
    pub fn raycast(&self, ray: &Ray) -> Vec<RayHit> {
        let mut hits = Vec::new();
        let mut stack: Vec<NodeHandle> = self.root_nodes.iter().rev().copied().collect();

        while let Some(handle) = stack.pop() {
            let Some(node) = self.get_node(handle) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            if let Some(mesh) = node.mesh.and_then(|key| self.meshes.get(key))
                && let Some(distance) = ray_hit_obb(ray, node.world_matrix(), &mesh.bounding_box)
            {
                hits.push(RayHit {
                    node: handle,
                    distance,
                });
            }
            stack.extend(node.children.iter().rev().copied());
        }

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// Nearest mesh hit along `ray`.
    #[must_use]
    pub fn raycast_nearest(&self, ray: &Ray) -> Option<RayHit> {
        self.raycast(ray).into_iter().next()
    }
}
