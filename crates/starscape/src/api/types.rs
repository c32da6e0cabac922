use bytemuck::{Pod, Zeroable};
use serde::Serialize;

/// Handle to a graphics resource (geometry, material or texture) owned by the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ResourceId(pub u32);

impl ResourceId {
    /// Wire encoding for float buffers. `-1.0` means "no resource".
    pub fn to_wire(id: Option<ResourceId>) -> f32 {
        id.map(|r| r.0 as f32).unwrap_or(-1.0)
    }
}

/// Identifier of a clickable target in the star-collector game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TargetId(pub u32);

/// Size of the drawable surface in CSS pixels, plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio: 1.0,
        }
    }

    pub fn with_pixel_ratio(mut self, pixel_ratio: f32) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }

    /// Width / height. A degenerate viewport reports 1.0 so the projection stays finite.
    pub fn aspect(&self) -> f32 {
        if self.width > 0.0 && self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

/// A mini-game notification read by the host from a flat float buffer.
/// `kind` identifies the event; `a/b/c` carry its payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct HostEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl HostEvent {
    pub const FLOATS: usize = 4;
}
