use std::ops::Range;

use image::{Rgba, RgbaImage};

use super::Texture;
use crate::api::error::TextureError;

/// Largest edge length a drawing surface may have.
pub const MAX_SURFACE_DIM: u32 = 4096;

/// Straight-alpha colour: 8-bit channels, alpha in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Paint {
    pub const TRANSPARENT: Paint = Paint::rgba(0, 0, 0, 0.0);
    pub const WHITE: Paint = Paint::rgba(255, 255, 255, 1.0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour from a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
            a: 1.0,
        }
    }

    pub fn with_alpha(mut self, a: f32) -> Self {
        self.a = a;
        self
    }

    pub fn lerp(self, other: Paint, t: f32) -> Paint {
        let ch = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round().clamp(0.0, 255.0) as u8;
        Paint {
            r: ch(self.r, other.r),
            g: ch(self.g, other.g),
            b: ch(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }
}

/// Colour ramp with stops at offsets in [0, 1].
#[derive(Debug, Clone, Copy)]
pub enum Gradient<'a> {
    Linear {
        from: [f32; 2],
        to: [f32; 2],
        stops: &'a [(f32, Paint)],
    },
    /// Starts at the centre with radius 0.
    Radial {
        center: [f32; 2],
        radius: f32,
        stops: &'a [(f32, Paint)],
    },
}

impl Gradient<'_> {
    pub fn sample(&self, p: [f32; 2]) -> Paint {
        match *self {
            Gradient::Linear { from, to, stops } => {
                let d = [to[0] - from[0], to[1] - from[1]];
                let len_sq = d[0] * d[0] + d[1] * d[1];
                let t = if len_sq > 0.0 {
                    ((p[0] - from[0]) * d[0] + (p[1] - from[1]) * d[1]) / len_sq
                } else {
                    0.0
                };
                sample_stops(stops, t)
            }
            Gradient::Radial { center, radius, stops } => {
                let dx = p[0] - center[0];
                let dy = p[1] - center[1];
                let t = if radius > 0.0 {
                    (dx * dx + dy * dy).sqrt() / radius
                } else {
                    1.0
                };
                sample_stops(stops, t)
            }
        }
    }
}

fn sample_stops(stops: &[(f32, Paint)], t: f32) -> Paint {
    let t = t.clamp(0.0, 1.0);
    let (first, last) = match (stops.first(), stops.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return Paint::TRANSPARENT,
    };
    if t <= first.0 {
        return first.1;
    }
    if t >= last.0 {
        return last.1;
    }
    for pair in stops.windows(2) {
        let (o0, c0) = pair[0];
        let (o1, c1) = pair[1];
        if t <= o1 {
            let span = o1 - o0;
            let local = if span > 0.0 { (t - o0) / span } else { 1.0 };
            return c0.lerp(c1, local);
        }
    }
    last.1
}

/// Software 2D drawing surface with source-over blending.
///
/// Shapes cover a pixel when the pixel centre lies inside them.
pub struct Surface {
    image: RgbaImage,
}

impl Surface {
    /// Obtain a transparent surface.
    pub fn new(width: u32, height: u32) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::EmptySurface { width, height });
        }
        if width > MAX_SURFACE_DIM || height > MAX_SURFACE_DIM {
            return Err(TextureError::SurfaceTooLarge {
                width,
                height,
                max: MAX_SURFACE_DIM,
            });
        }
        Ok(Self {
            image: RgbaImage::new(width, height),
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    pub fn into_texture(self, label: &'static str) -> Texture {
        Texture::new(label, self.image)
    }

    fn blend(&mut self, x: u32, y: u32, paint: Paint) {
        let sa = paint.a.clamp(0.0, 1.0);
        if sa <= 0.0 {
            return;
        }
        let dst = self.image.get_pixel_mut(x, y);
        let [dr, dg, db, da] = dst.0;
        let da = da as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        let mix = |s: u8, d: u8| {
            ((s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        *dst = Rgba([
            mix(paint.r, dr),
            mix(paint.g, dg),
            mix(paint.b, db),
            (out_a * 255.0).round() as u8,
        ]);
    }

    fn span(lo: f32, hi: f32, max: u32) -> Range<u32> {
        let start = lo.floor().max(0.0) as u32;
        let end = (hi.ceil().max(0.0) as u32).min(max);
        start..end
    }

    pub fn fill(&mut self, paint: Paint) {
        let (w, h) = (self.width() as f32, self.height() as f32);
        self.fill_rect(0.0, 0.0, w, h, paint);
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: Paint) {
        for py in Self::span(y, y + h, self.height()) {
            let cy = py as f32 + 0.5;
            if cy < y || cy >= y + h {
                continue;
            }
            for px in Self::span(x, x + w, self.width()) {
                let cx = px as f32 + 0.5;
                if cx >= x && cx < x + w {
                    self.blend(px, py, paint);
                }
            }
        }
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, paint: Paint) {
        self.fill_ellipse(cx, cy, radius, radius, 0.0, paint);
    }

    /// Filled ellipse with radii `rx`, `ry`, rotated by `rotation` radians.
    pub fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, rotation: f32, paint: Paint) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let reach = rx.max(ry);
        let (sin, cos) = rotation.sin_cos();
        for py in Self::span(cy - reach, cy + reach, self.height()) {
            for px in Self::span(cx - reach, cx + reach, self.width()) {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                let u = dx * cos + dy * sin;
                let v = -dx * sin + dy * cos;
                if (u / rx).powi(2) + (v / ry).powi(2) <= 1.0 {
                    self.blend(px, py, paint);
                }
            }
        }
    }

    /// Fill a rectangle with a gradient evaluated at each pixel centre.
    pub fn fill_gradient(&mut self, x: f32, y: f32, w: f32, h: f32, gradient: &Gradient) {
        for py in Self::span(y, y + h, self.height()) {
            for px in Self::span(x, x + w, self.width()) {
                let p = [px as f32 + 0.5, py as f32 + 0.5];
                let paint = gradient.sample(p);
                self.blend(px, py, paint);
            }
        }
    }

    /// Stroke a quadratic curve running the full surface width from `(0, y)`
    /// to `(width, y)`, with its control point at mid-width displaced by `bulge`.
    pub fn stroke_wave(&mut self, y: f32, bulge: f32, line_width: f32, paint: Paint) {
        let w = self.width() as f32;
        let half = line_width / 2.0;
        for px in 0..self.width() {
            let t = (px as f32 + 0.5) / w;
            let cy = y + 2.0 * (1.0 - t) * t * bulge;
            for py in Self::span(cy - half, cy + half, self.height()) {
                let centre = py as f32 + 0.5;
                if centre >= cy - half && centre < cy + half {
                    self.blend(px, py, paint);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_surface_is_an_error() {
        assert_eq!(
            Surface::new(0, 16).err(),
            Some(TextureError::EmptySurface { width: 0, height: 16 })
        );
    }

    #[test]
    fn oversized_surface_is_an_error() {
        assert!(matches!(
            Surface::new(MAX_SURFACE_DIM + 1, 4),
            Err(TextureError::SurfaceTooLarge { .. })
        ));
    }

    #[test]
    fn new_surface_is_transparent() {
        let s = Surface::new(4, 4).unwrap();
        assert_eq!(s.pixel(2, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn opaque_fill_replaces_pixels() {
        let mut s = Surface::new(8, 8).unwrap();
        s.fill(Paint::hex(0x8c7853));
        assert_eq!(s.pixel(3, 5), [0x8c, 0x78, 0x53, 255]);
    }

    #[test]
    fn translucent_over_opaque_mixes() {
        let mut s = Surface::new(2, 2).unwrap();
        s.fill(Paint::rgba(0, 0, 0, 1.0));
        s.fill(Paint::rgba(255, 255, 255, 0.5));
        let [r, _, _, a] = s.pixel(0, 0);
        assert!((127..=128).contains(&r), "r = {r}");
        assert_eq!(a, 255);
    }

    #[test]
    fn circle_covers_centre_not_corner() {
        let mut s = Surface::new(16, 16).unwrap();
        s.fill_circle(8.0, 8.0, 4.0, Paint::WHITE);
        assert_eq!(s.pixel(8, 8)[3], 255);
        assert_eq!(s.pixel(0, 0)[3], 0);
    }

    #[test]
    fn rotated_ellipse_follows_rotation() {
        let mut s = Surface::new(32, 32).unwrap();
        // Long axis rotated onto the vertical.
        s.fill_ellipse(16.0, 16.0, 12.0, 2.0, std::f32::consts::FRAC_PI_2, Paint::WHITE);
        assert_eq!(s.pixel(16, 5)[3], 255);
        assert_eq!(s.pixel(5, 16)[3], 0);
    }

    #[test]
    fn radial_gradient_fades_outward() {
        let stops = [(0.0, Paint::WHITE), (1.0, Paint::rgba(255, 255, 255, 0.0))];
        let mut s = Surface::new(32, 32).unwrap();
        s.fill_gradient(0.0, 0.0, 32.0, 32.0, &Gradient::Radial {
            center: [16.0, 16.0],
            radius: 16.0,
            stops: &stops,
        });
        assert!(s.pixel(16, 16)[3] > 240);
        assert_eq!(s.pixel(0, 0)[3], 0);
    }

    #[test]
    fn linear_gradient_samples_between_stops() {
        let stops = [(0.0, Paint::rgba(0, 0, 0, 1.0)), (1.0, Paint::rgba(200, 0, 0, 1.0))];
        let g = Gradient::Linear { from: [0.0, 0.0], to: [100.0, 0.0], stops: &stops };
        assert_eq!(g.sample([50.0, 3.0]).r, 100);
        assert_eq!(g.sample([-10.0, 0.0]).r, 0);
        assert_eq!(g.sample([500.0, 0.0]).r, 200);
    }

    #[test]
    fn wave_stroke_stays_in_its_band() {
        let mut s = Surface::new(64, 64).unwrap();
        s.stroke_wave(32.0, 0.0, 4.0, Paint::WHITE);
        assert_eq!(s.pixel(10, 31)[3], 255);
        assert_eq!(s.pixel(10, 20)[3], 0);
    }
}
