use glam::{Affine3A, EulerRot, Mat4, Quat, Vec2, Vec3, Vec4};

use crate::config::CameraOptions;
use crate::scene::raycast::Ray;

/// Perspective camera.
///
/// The camera is not part of the node hierarchy; its placement comes straight
/// from the configuration and never animates.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub rotation: Quat,

    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    pub(crate) world_matrix: Affine3A,
    pub(crate) view_matrix: Mat4,
    pub(crate) projection_matrix: Mat4,
    pub(crate) view_projection_matrix: Mat4,
}

impl Camera {
    /// `fov` is in degrees.
    #[must_use]
    pub fn new_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov: fov.to_radians(),
            aspect,
            near,
            far,
            world_matrix: Affine3A::IDENTITY,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            view_projection_matrix: Mat4::IDENTITY,
        };
        cam.update_projection_matrix();
        cam
    }

    #[must_use]
    pub fn from_options(options: &CameraOptions) -> Self {
        let mut cam = Self::new_perspective(
            options.fov,
            options.aspect_ratio,
            options.near,
            options.far,
        );
        cam.position = Vec3::from_array(options.position);
        let [x, y, z] = options.rotation;
        cam.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
        cam.update_view_projection();
        cam
    }

    pub fn update_projection_matrix(&mut self) {
        // glam's perspective_rh maps depth to [0, 1]
        self.projection_matrix = Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far);
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    pub fn update_view_projection(&mut self) {
        self.world_matrix =
            Affine3A::from_scale_rotation_translation(Vec3::ONE, self.rotation, self.position);
        self.view_matrix = Mat4::from(self.world_matrix).inverse();
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    #[must_use]
    pub fn view_projection_matrix(&self) -> &Mat4 {
        &self.view_projection_matrix
    }

    /// Builds a world-space ray through a point in normalized device
    /// coordinates (`x`, `y` in `[-1, 1]`, `+y` up).
    #[must_use]
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection_matrix.inverse();
        let unproject = |z: f32| {
            let p = inverse * Vec4::new(ndc.x, ndc.y, z, 1.0);
            p.truncate() / p.w
        };
        let near = unproject(0.0);
        let far = unproject(1.0);
        Ray::new(near, far - near)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_ray_points_forward() {
        let cam = Camera::new_perspective(60.0, 1.0, 0.1, 100.0);
        let ray = cam.ray_from_ndc(Vec2::ZERO);
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);
    }
}
