use super::{Gradient, Paint, Surface, Texture};
use crate::api::config::SceneConfig;
use crate::api::error::TextureError;
use crate::scene::bodies::BodyKind;
use crate::systems::rng::Rng;

/// Which bitmap to synthesize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    Star,
    Planet(BodyKind),
    Nebula,
    Streak,
}

impl TextureKind {
    pub fn label(self) -> &'static str {
        match self {
            TextureKind::Star => "star",
            TextureKind::Planet(kind) => kind.name(),
            TextureKind::Nebula => "nebula",
            TextureKind::Streak => "streak",
        }
    }
}

/// Planet recipes are authored in this coordinate space and scaled to the
/// configured texture size.
const PLANET_SPACE: f32 = 512.0;
const NEBULA_SPACE: f32 = 1024.0;

const STAR_STOPS: [(f32, Paint); 5] = [
    (0.0, Paint::rgba(255, 255, 255, 1.0)),
    (0.1, Paint::rgba(255, 255, 255, 0.8)),
    (0.3, Paint::rgba(255, 255, 255, 0.4)),
    (0.6, Paint::rgba(200, 220, 255, 0.1)),
    (1.0, Paint::rgba(100, 150, 255, 0.0)),
];

const STREAK_STOPS: [(f32, Paint); 6] = [
    (0.0, Paint::rgba(255, 255, 255, 1.0)),
    (0.05, Paint::rgba(255, 250, 230, 0.95)),
    (0.15, Paint::rgba(255, 240, 200, 0.8)),
    (0.4, Paint::rgba(200, 220, 255, 0.4)),
    (0.7, Paint::rgba(150, 180, 255, 0.15)),
    (1.0, Paint::rgba(100, 150, 255, 0.0)),
];

const STREAK_CORE_STOPS: [(f32, Paint); 3] = [
    (0.0, Paint::rgba(255, 255, 255, 1.0)),
    (0.5, Paint::rgba(255, 255, 255, 0.5)),
    (1.0, Paint::rgba(255, 255, 255, 0.0)),
];

const NEBULA_CLOUDS: [Paint; 4] = [
    Paint::rgba(60, 40, 120, 0.15),
    Paint::rgba(80, 20, 80, 0.12),
    Paint::rgba(20, 60, 100, 0.1),
    Paint::rgba(100, 50, 120, 0.08),
];

/// Synthesize the bitmap for `kind`.
///
/// Output depends on `rng` but callers should treat the pixels as opaque.
pub fn generate(kind: TextureKind, config: &SceneConfig, rng: &mut Rng) -> Result<Texture, TextureError> {
    let surface = match kind {
        TextureKind::Star => star(config.star_texture_size)?,
        TextureKind::Planet(body) => planet(body, config.planet_texture_size, rng)?,
        TextureKind::Nebula => nebula(config.nebula_texture_size, rng)?,
        TextureKind::Streak => {
            let [w, h] = config.streak_texture_size;
            streak(w, h)?
        }
    };
    Ok(surface.into_texture(kind.label()))
}

fn star(size: u32) -> Result<Surface, TextureError> {
    let mut s = Surface::new(size, size)?;
    let half = size as f32 / 2.0;
    s.fill_gradient(0.0, 0.0, size as f32, size as f32, &Gradient::Radial {
        center: [half, half],
        radius: half,
        stops: &STAR_STOPS,
    });
    Ok(s)
}

fn streak(width: u32, height: u32) -> Result<Surface, TextureError> {
    let mut s = Surface::new(width, height)?;
    let (w, h) = (width as f32, height as f32);
    s.fill_gradient(0.0, 0.0, w, h, &Gradient::Linear {
        from: [0.0, h / 2.0],
        to: [w, h / 2.0],
        stops: &STREAK_STOPS,
    });
    // Bright head at the leading edge.
    s.fill_gradient(0.0, 0.0, h, h, &Gradient::Radial {
        center: [h / 2.0, h / 2.0],
        radius: h / 2.0,
        stops: &STREAK_CORE_STOPS,
    });
    Ok(s)
}

fn nebula(size: u32, rng: &mut Rng) -> Result<Surface, TextureError> {
    let mut s = Surface::new(size, size)?;
    let k = size as f32 / NEBULA_SPACE;
    for color in NEBULA_CLOUDS {
        let x = (256.0 + rng.next_f32() * 512.0) * k;
        let y = (256.0 + rng.next_f32() * 512.0) * k;
        let radius = (300.0 + rng.next_f32() * 400.0) * k;
        let stops = [
            (0.0, color),
            (0.5, color.with_alpha(color.a * 0.5)),
            (1.0, Paint::TRANSPARENT),
        ];
        s.fill_gradient(0.0, 0.0, size as f32, size as f32, &Gradient::Radial {
            center: [x, y],
            radius,
            stops: &stops,
        });
    }
    Ok(s)
}

/// Horizontal bands: one row at a time, colour from `band_at(t)`, t in [0, 1).
fn banded(s: &mut Surface, mut band_at: impl FnMut(f32) -> Paint) {
    let h = s.height();
    let w = s.width() as f32;
    for row in 0..h {
        let t = row as f32 / h as f32;
        s.fill_rect(0.0, row as f32, w, 1.0, band_at(t));
    }
}

fn radial_wash(s: &mut Surface, stops: &[(f32, Paint)]) {
    let (w, h) = (s.width() as f32, s.height() as f32);
    s.fill_gradient(0.0, 0.0, w, h, &Gradient::Radial {
        center: [w / 2.0, h / 2.0],
        radius: w / 2.0,
        stops,
    });
}

fn planet(kind: BodyKind, size: u32, rng: &mut Rng) -> Result<Surface, TextureError> {
    let mut s = Surface::new(size, size)?;
    let k = size as f32 / PLANET_SPACE;
    let channel = |v: f32| v.floor().clamp(0.0, 255.0) as u8;

    match kind {
        BodyKind::Mercury => {
            s.fill(Paint::hex(0x8c7853));
            for _ in 0..3000 {
                let paint = Paint::rgba(
                    channel(100.0 + rng.next_f32() * 50.0),
                    channel(90.0 + rng.next_f32() * 40.0),
                    channel(70.0 + rng.next_f32() * 30.0),
                    0.4,
                );
                let (x, y) = (rng.next_f32() * PLANET_SPACE, rng.next_f32() * PLANET_SPACE);
                s.fill_circle(x * k, y * k, rng.next_f32() * 3.0 * k, paint);
            }
        }
        BodyKind::Venus => {
            radial_wash(&mut s, &[
                (0.0, Paint::hex(0xffd89d)),
                (0.6, Paint::hex(0xe6c485)),
                (1.0, Paint::hex(0xc9a86a)),
            ]);
            let mut y = 0.0_f32;
            while y < PLANET_SPACE {
                let paint = Paint::WHITE.with_alpha(0.1 + rng.next_f32() * 0.1);
                s.stroke_wave(y * k, y.sin() * 20.0 * k, 20.0 * k, paint);
                y += 30.0;
            }
        }
        BodyKind::Earth => {
            s.fill(Paint::hex(0x1a5f9f));
            let land = Paint::hex(0x3d8f3d);
            for _ in 0..12 {
                let (x, y) = (rng.next_f32() * PLANET_SPACE, rng.next_f32() * PLANET_SPACE);
                let rx = rng.range(40.0, 100.0);
                let ry = rng.range(30.0, 70.0);
                s.fill_ellipse(x * k, y * k, rx * k, ry * k, rng.angle(), land);
            }
            let cloud = Paint::rgba(255, 255, 255, 0.3);
            for _ in 0..50 {
                let (x, y) = (rng.next_f32() * PLANET_SPACE, rng.next_f32() * PLANET_SPACE);
                s.fill_circle(x * k, y * k, rng.range(5.0, 25.0) * k, cloud);
            }
        }
        BodyKind::Mars => {
            s.fill(Paint::hex(0xcd5c5c));
            let crater = Paint::hex(0x8b4513);
            for _ in 0..20 {
                let (x, y) = (rng.next_f32() * PLANET_SPACE, rng.next_f32() * PLANET_SPACE);
                s.fill_circle(x * k, y * k, rng.range(10.0, 50.0) * k, crater);
            }
            s.fill_circle(256.0 * k, 50.0 * k, 40.0 * k, Paint::rgba(255, 255, 255, 0.7));
        }
        BodyKind::Jupiter => {
            banded(&mut s, |t| {
                let band = (t * 15.0 + rng.next_f32() * 0.5).sin() * 0.5 + 0.5;
                Paint::rgba(
                    channel(180.0 + band * 75.0),
                    channel(120.0 + band * 60.0),
                    channel(80.0 + band * 40.0),
                    1.0,
                )
            });
            s.fill_ellipse(350.0 * k, 300.0 * k, 60.0 * k, 40.0 * k, 0.0, Paint::rgba(200, 100, 80, 0.8));
        }
        BodyKind::Saturn => {
            banded(&mut s, |t| {
                let band = (t * 12.0).sin() * 0.3 + 0.7;
                Paint::rgba(channel(230.0 * band), channel(220.0 * band), channel(180.0 * band), 1.0)
            });
        }
        BodyKind::Uranus => {
            radial_wash(&mut s, &[
                (0.0, Paint::hex(0x7dd3e8)),
                (0.7, Paint::hex(0x5fb8cc)),
                (1.0, Paint::hex(0x4a9fb3)),
            ]);
        }
        BodyKind::Neptune => {
            radial_wash(&mut s, &[
                (0.0, Paint::hex(0x4f6bcc)),
                (0.6, Paint::hex(0x3f5bb8)),
                (1.0, Paint::hex(0x2d4a9e)),
            ]);
            s.fill_ellipse(300.0 * k, 250.0 * k, 50.0 * k, 35.0 * k, 0.0, Paint::rgba(30, 40, 80, 0.5));
        }
        BodyKind::Pluto => {
            s.fill(Paint::hex(0xa67c52));
            let heart = Paint::hex(0xd4a574);
            s.fill_circle(220.0 * k, 256.0 * k, 60.0 * k, heart);
            s.fill_circle(292.0 * k, 256.0 * k, 60.0 * k, heart);
        }
    }
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SceneConfig {
        SceneConfig {
            star_texture_size: 32,
            planet_texture_size: 64,
            nebula_texture_size: 64,
            streak_texture_size: [64, 8],
            ..SceneConfig::default()
        }
    }

    #[test]
    fn star_is_bright_core_transparent_edge() {
        let tex = generate(TextureKind::Star, &small_config(), &mut Rng::new(1)).unwrap();
        assert_eq!((tex.width(), tex.height()), (32, 32));
        assert!(tex.pixel(16, 16)[3] > 200);
        assert_eq!(tex.pixel(0, 0)[3], 0);
    }

    #[test]
    fn every_planet_covers_its_surface() {
        let config = small_config();
        let mut rng = Rng::new(7);
        for kind in BodyKind::ALL {
            let tex = generate(TextureKind::Planet(kind), &config, &mut rng).unwrap();
            assert_eq!(tex.label(), kind.name());
            assert_eq!(tex.pixels().len(), 64 * 64 * 4);
            // Solid base fills and radial washes leave the centre opaque.
            assert_eq!(tex.pixel(32, 32)[3], 255, "{kind:?}");
        }
    }

    #[test]
    fn banded_planets_are_fully_opaque() {
        let config = small_config();
        let mut rng = Rng::new(3);
        for kind in [BodyKind::Jupiter, BodyKind::Saturn] {
            let tex = generate(TextureKind::Planet(kind), &config, &mut rng).unwrap();
            assert!(tex.pixels().chunks(4).all(|p| p[3] == 255), "{kind:?}");
        }
    }

    #[test]
    fn nebula_stays_faint() {
        let tex = generate(TextureKind::Nebula, &small_config(), &mut Rng::new(9)).unwrap();
        let max_alpha = tex.pixels().chunks(4).map(|p| p[3]).max().unwrap_or(0);
        assert!(max_alpha > 0);
        assert!(max_alpha < 128, "nebula alpha {max_alpha}");
    }

    #[test]
    fn streak_fades_toward_the_tail() {
        let tex = generate(TextureKind::Streak, &small_config(), &mut Rng::new(2)).unwrap();
        assert!(tex.pixel(2, 4)[3] > tex.pixel(60, 4)[3]);
    }

    #[test]
    fn empty_texture_size_is_an_error() {
        let config = SceneConfig {
            star_texture_size: 0,
            ..SceneConfig::default()
        };
        assert!(matches!(
            generate(TextureKind::Star, &config, &mut Rng::new(1)),
            Err(TextureError::EmptySurface { .. })
        ));
    }
}
