//! Procedural textures: every bitmap the backdrop needs is synthesized at
//! startup, so the scene ships without binary assets.

mod recipes;
mod surface;

pub use recipes::{generate, TextureKind};
pub use surface::{Gradient, Paint, Surface, MAX_SURFACE_DIM};

use image::RgbaImage;

/// A finished RGBA8 bitmap, row-major, straight alpha.
#[derive(Debug, Clone)]
pub struct Texture {
    label: &'static str,
    image: RgbaImage,
}

impl Texture {
    pub(crate) fn new(label: &'static str, image: RgbaImage) -> Self {
        Self { label, image }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Raw RGBA bytes, `width * height * 4` long.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }
}
