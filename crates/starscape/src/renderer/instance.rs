use bytemuck::{Pod, Zeroable};

use crate::api::types::ResourceId;
use crate::scene::bodies::Body;
use crate::systems::shooting_stars::ShootingStar;

/// Per-frame body transform. 12 floats = 48 bytes stride.
///
/// Resource ids are encoded as floats; `-1` marks an absent ring.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BodyInstance {
    pub geometry: f32,
    pub material: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Self-rotation about x.
    pub spin_x: f32,
    /// Self-rotation about y.
    pub spin_y: f32,
    pub ring_geometry: f32,
    pub ring_material: f32,
    /// Body radius in world units.
    pub size: f32,
    pub _pad: [f32; 2],
}

impl BodyInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn from_body(body: &Body) -> Self {
        let p = body.position();
        Self {
            geometry: body.handles.geometry.0 as f32,
            material: body.handles.material.0 as f32,
            x: p.x,
            y: p.y,
            z: p.z,
            spin_x: body.spin.x,
            spin_y: body.spin.y,
            ring_geometry: ResourceId::to_wire(body.handles.ring_geometry),
            ring_material: ResourceId::to_wire(body.handles.ring_material),
            size: body.spec().size,
            _pad: [0.0; 2],
        }
    }
}

/// Per-frame shooting-star streak. 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct StreakInstance {
    pub geometry: f32,
    pub material: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Rotation about z, radians.
    pub angle: f32,
    pub opacity: f32,
    pub _pad: f32,
}

impl StreakInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn from_star(star: &ShootingStar) -> Self {
        Self {
            geometry: star.geometry.0 as f32,
            material: star.material.0 as f32,
            x: star.position.x,
            y: star.position.y,
            z: star.position.z,
            angle: star.angle,
            opacity: star.opacity(),
            _pad: 0.0,
        }
    }
}
