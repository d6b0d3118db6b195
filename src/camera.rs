/// Perspective camera for cursor raycasting
///
/// Only what the placement cursor needs: a pose, view/projection matrices
/// and screen-point-to-ray unprojection.

use glam::{Mat4, Quat, Vec2, Vec3};

use crate::cursor::Ray;

pub struct Camera {
    /// Camera position in world space
    position: Vec3,
    /// Camera rotation (pitch, yaw in radians)
    pitch: f32,
    yaw: f32,
    /// Field of view in radians
    fov: f32,
    near_plane: f32,
    far_plane: f32,
}

impl Camera {
    /// Create a new camera at the given position with default projection settings
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            pitch: 0.0,
            yaw: 0.0,
            fov: 45.0_f32.to_radians(),
            near_plane: 0.1,
            far_plane: 1000.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Set rotation in radians
    pub fn set_rotation(&mut self, pitch: f32, yaw: f32) {
        self.pitch = pitch;
        self.yaw = yaw;
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(glam::EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }

    pub fn view_matrix(&self) -> Mat4 {
        let rotation = self.rotation();
        let forward = rotation * Vec3::NEG_Z;
        let target = self.position + forward;
        let up = rotation * Vec3::Y;

        Mat4::look_at_rh(self.position, target, up)
    }

    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect_ratio, self.near_plane, self.far_plane)
    }

    /// Build a world-space picking ray through a screen point.
    /// `viewport` is the surface size in pixels, screen y grows downward.
    pub fn screen_to_ray(&self, screen: Vec2, viewport: Vec2) -> Ray {
        let view = self.view_matrix();
        let proj = self.projection_matrix(viewport.x / viewport.y);
        Ray::from_screen(screen, viewport, view, proj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_of_screen_looks_forward() {
        let mut camera = Camera::new(Vec3::new(0.0, 2.0, 5.0));
        camera.set_rotation(0.0, 0.0);
        let viewport = Vec2::new(1280.0, 720.0);

        let ray = camera.screen_to_ray(viewport * 0.5, viewport);

        assert!((ray.origin - camera.position()).length() < 1e-3);
        assert!(ray.direction.dot(camera.forward()) > 0.999);
    }
}
