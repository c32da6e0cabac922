//! Orbiting planet bodies.
//!
//! Bodies come from a fixed static table and are stored as a small array of
//! records. Positions are a pure function of orbit phase.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use serde::Serialize;

use crate::api::types::ResourceId;

/// The nine planet kinds, in orbit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl BodyKind {
    pub const ALL: [BodyKind; 9] = [
        BodyKind::Mercury,
        BodyKind::Venus,
        BodyKind::Earth,
        BodyKind::Mars,
        BodyKind::Jupiter,
        BodyKind::Saturn,
        BodyKind::Uranus,
        BodyKind::Neptune,
        BodyKind::Pluto,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BodyKind::Mercury => "mercury",
            BodyKind::Venus => "venus",
            BodyKind::Earth => "earth",
            BodyKind::Mars => "mars",
            BodyKind::Jupiter => "jupiter",
            BodyKind::Saturn => "saturn",
            BodyKind::Uranus => "uranus",
            BodyKind::Neptune => "neptune",
            BodyKind::Pluto => "pluto",
        }
    }

    pub fn spec(self) -> &'static BodySpec {
        &BODY_TABLE[self as usize]
    }

    /// Only Saturn carries a ring.
    pub fn has_ring(self) -> bool {
        self == BodyKind::Saturn
    }
}

/// Static orbit and appearance parameters for one body kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySpec {
    pub kind: BodyKind,
    pub size: f32,
    pub orbit_radius: f32,
    /// Radians per 60 Hz frame.
    pub orbit_speed: f32,
    /// Radians per 60 Hz frame.
    pub rotation_speed: f32,
    pub emissive: u32,
    pub depth: f32,
    pub start_angle: f32,
    pub y_offset: f32,
}

#[allow(clippy::too_many_arguments)]
const fn body(
    kind: BodyKind,
    size: f32,
    orbit_radius: f32,
    orbit_speed: f32,
    rotation_speed: f32,
    emissive: u32,
    depth: f32,
    start_angle: f32,
    y_offset: f32,
) -> BodySpec {
    BodySpec {
        kind,
        size,
        orbit_radius,
        orbit_speed,
        rotation_speed,
        emissive,
        depth,
        start_angle,
        y_offset,
    }
}

pub static BODY_TABLE: [BodySpec; 9] = [
    body(BodyKind::Mercury, 3.0, 60.0, 0.0008, 0.001, 0x3a3a3a, -120.0, 0.0, 40.0),
    body(BodyKind::Venus, 5.0, 80.0, 0.0006, 0.0005, 0x4a3a1a, -140.0, 0.7, -30.0),
    body(BodyKind::Earth, 5.5, 100.0, 0.0005, 0.001, 0x0a2a4a, -160.0, 1.4, 60.0),
    body(BodyKind::Mars, 4.0, 120.0, 0.0004, 0.0009, 0x3a1a1a, -180.0, 2.1, -50.0),
    body(BodyKind::Jupiter, 14.0, 160.0, 0.0002, 0.0015, 0x2a1a0a, -220.0, 2.8, 20.0),
    body(BodyKind::Saturn, 12.0, 190.0, 0.00015, 0.0012, 0x2a2a1a, -250.0, 3.5, -70.0),
    body(BodyKind::Uranus, 8.0, 220.0, 0.00012, 0.0008, 0x1a2a3a, -280.0, 4.2, 80.0),
    body(BodyKind::Neptune, 8.0, 250.0, 0.0001, 0.0007, 0x0a1a2a, -310.0, 4.9, -40.0),
    body(BodyKind::Pluto, 2.5, 280.0, 0.00008, 0.0004, 0x2a2a2a, -340.0, 5.6, 50.0),
];

pub const SPHERE_SEGMENTS: u32 = 64;

/// Saturn's ring geometry, relative to the body size.
pub const RING_INNER_SCALE: f32 = 1.5;
pub const RING_OUTER_SCALE: f32 = 2.5;
pub const RING_SEGMENTS: u32 = 64;
pub const RING_TILT: f32 = std::f32::consts::PI / 2.3;
pub const RING_COLOR: u32 = 0xc9b18a;
pub const RING_OPACITY: f32 = 0.6;

/// Orbit z is squashed so paths read as ellipses from the camera.
const ORBIT_SQUASH: f32 = 0.5;

/// World position of a body at the given orbit phase.
pub fn orbit_position(spec: &BodySpec, phase: f32) -> Vec3 {
    let (sin, cos) = phase.sin_cos();
    Vec3::new(
        cos * spec.orbit_radius,
        spec.y_offset,
        sin * spec.orbit_radius * ORBIT_SQUASH + spec.depth,
    )
}

/// GPU resources owned by one body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyHandles {
    pub geometry: ResourceId,
    pub material: ResourceId,
    pub texture: ResourceId,
    pub ring_geometry: Option<ResourceId>,
    pub ring_material: Option<ResourceId>,
}

/// A live body: static spec plus mutable orbit phase and spin.
#[derive(Debug, Clone)]
pub struct Body {
    pub kind: BodyKind,
    /// Orbit angle, kept in `[0, 2pi)`.
    pub phase: f32,
    /// Total orbit angle travelled since creation.
    pub orbit_travel: f64,
    /// Self-rotation about x and y, each kept in `[0, 2pi)`.
    pub spin: Vec2,
    pub handles: BodyHandles,
}

impl Body {
    pub fn new(kind: BodyKind, handles: BodyHandles) -> Self {
        Self {
            kind,
            phase: kind.spec().start_angle.rem_euclid(TAU),
            orbit_travel: 0.0,
            spin: Vec2::ZERO,
            handles,
        }
    }

    pub fn spec(&self) -> &'static BodySpec {
        self.kind.spec()
    }

    pub fn position(&self) -> Vec3 {
        orbit_position(self.spec(), self.phase)
    }

    /// Advance spin and orbit by `delta` seconds, scaled to a 60 Hz baseline.
    ///
    /// Angles wrap every turn so a one-frame step never drops below f32
    /// resolution, however long the page stays open.
    pub fn advance(&mut self, delta: f32) {
        let spec = self.spec();
        let frames = delta * 60.0;
        let orbit_step = spec.orbit_speed * frames;
        self.spin.x = wrap_angle(self.spin.x + spec.rotation_speed * frames);
        self.spin.y = wrap_angle(self.spin.y + spec.rotation_speed * frames * 1.3);
        self.phase = wrap_angle(self.phase + orbit_step);
        self.orbit_travel += orbit_step as f64;
    }
}

/// Reduce an angle to `[0, 2pi)`.
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handles() -> BodyHandles {
        BodyHandles {
            geometry: ResourceId(0),
            material: ResourceId(1),
            texture: ResourceId(2),
            ring_geometry: None,
            ring_material: None,
        }
    }

    #[test]
    fn table_is_indexed_by_kind() {
        for kind in BodyKind::ALL {
            assert_eq!(kind.spec().kind, kind);
        }
    }

    #[test]
    fn only_saturn_has_a_ring() {
        let ringed: Vec<_> = BodyKind::ALL.iter().filter(|k| k.has_ring()).collect();
        assert_eq!(ringed, vec![&BodyKind::Saturn]);
    }

    #[test]
    fn orbit_phase_strictly_increases() {
        for kind in BodyKind::ALL {
            let mut b = Body::new(kind, handles());
            let mut last = b.orbit_travel;
            for _ in 0..100 {
                b.advance(1.0 / 60.0);
                assert!(b.orbit_travel > last, "{kind:?}");
                assert!((0.0..TAU).contains(&b.phase), "{kind:?}");
                last = b.orbit_travel;
            }
        }
    }

    #[test]
    fn orbit_is_periodic() {
        for spec in BODY_TABLE.iter() {
            let a = orbit_position(spec, spec.start_angle);
            let b = orbit_position(spec, spec.start_angle + TAU);
            assert!((a.x - b.x).abs() < 1e-2, "{:?}", spec.kind);
            assert!((a.z - b.z).abs() < 1e-2, "{:?}", spec.kind);
            assert_eq!(a.y, b.y);
        }
    }

    #[test]
    fn full_revolution_returns_home() {
        // Mercury completes 2pi of phase after 2pi / speed frames.
        let mut b = Body::new(BodyKind::Mercury, handles());
        let start = b.position();
        let frames = TAU / BodyKind::Mercury.spec().orbit_speed;
        b.advance(frames / 60.0);
        let end = b.position();
        assert!((start.x - end.x).abs() < 0.05);
        assert!((start.z - end.z).abs() < 0.05);
    }

    #[test]
    fn orbit_stays_on_its_ellipse() {
        let spec = BodyKind::Jupiter.spec();
        for i in 0..16 {
            let p = orbit_position(spec, i as f32 * 0.4);
            let nx = p.x / spec.orbit_radius;
            let nz = (p.z - spec.depth) / (spec.orbit_radius * 0.5);
            assert!((nx * nx + nz * nz - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn spin_is_frame_rate_independent() {
        let mut a = Body::new(BodyKind::Earth, handles());
        let mut b = Body::new(BodyKind::Earth, handles());
        a.advance(1.0 / 30.0);
        b.advance(1.0 / 60.0);
        b.advance(1.0 / 60.0);
        assert!((a.spin - b.spin).length() < 1e-6);
        assert!((a.spin.y / a.spin.x - 1.3).abs() < 1e-4);
    }

    #[test]
    fn orbits_keep_moving_after_days_of_frames() {
        for (kind, hz) in [(BodyKind::Mercury, 60.0), (BodyKind::Pluto, 144.0)] {
            let mut b = Body::new(kind, handles());
            // Several days of frames in one step.
            b.advance(5.0 * 86_400.0);
            assert!((0.0..TAU).contains(&b.phase), "{kind:?}");
            let (phase, spin, travel) = (b.phase, b.spin, b.orbit_travel);
            let pos = b.position();
            b.advance(1.0 / hz);
            assert_ne!(b.phase, phase, "{kind:?}");
            assert_ne!(b.spin, spin, "{kind:?}");
            assert!(b.orbit_travel > travel, "{kind:?}");
            assert_ne!(b.position(), pos, "{kind:?}");
        }
    }

    #[test]
    fn wrap_angle_stays_in_one_turn() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!((wrap_angle(TAU + 1.0) - 1.0).abs() < 1e-5);
        assert!((wrap_angle(-1.0) - (TAU - 1.0)).abs() < 1e-5);
        assert!(wrap_angle(-1e-9) < TAU);
    }
}
