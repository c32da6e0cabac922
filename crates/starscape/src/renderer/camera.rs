use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use serde::Serialize;

/// Perspective camera looking down -z from `position`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

/// Combined view-projection matrix as the host uploads it.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_projection: [[f32; 4]; 4],
}

impl CameraUniform {
    pub const FLOATS: usize = 16;
}

impl PerspectiveCamera {
    pub const FOV_Y: f32 = 60.0;
    pub const NEAR: f32 = 0.1;
    pub const FAR: f32 = 2000.0;
    pub const DISTANCE: f32 = 100.0;

    pub fn new(aspect: f32) -> Self {
        Self {
            fov_y: Self::FOV_Y,
            aspect,
            near: Self::NEAR,
            far: Self::FAR,
            position: Vec3::new(0.0, 0.0, Self::DISTANCE),
        }
    }

    /// Update the aspect ratio on viewport resize. Non-positive or
    /// non-finite values are ignored.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, Vec3::new(self.position.x, self.position.y, 0.0), Vec3::Y)
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_projection: (self.projection_matrix() * self.view_matrix()).to_cols_array_2d(),
        }
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(1.0)
    }
}
