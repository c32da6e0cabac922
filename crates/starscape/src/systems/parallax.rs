//! Pointer-driven parallax.
//!
//! The pointer offset is normalized to [-1, 1] per axis about the viewport
//! centre (+y up). Scene groups ease toward a rotation proportional to it.

use glam::Vec2;

use crate::api::config::SceneConfig;

/// Last observed pointer position, normalized.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerOffset {
    pub x: f32,
    pub y: f32,
}

impl PointerOffset {
    pub const ORIGIN: PointerOffset = PointerOffset { x: 0.0, y: 0.0 };

    /// Map client coordinates inside a `width` x `height` viewport.
    ///
    /// Degenerate viewports map to the origin; out-of-window positions clamp.
    pub fn from_client(client_x: f32, client_y: f32, width: f32, height: f32) -> Self {
        if !(width > 0.0 && height > 0.0) || !client_x.is_finite() || !client_y.is_finite() {
            return Self::ORIGIN;
        }
        Self {
            x: ((client_x / width - 0.5) * 2.0).clamp(-1.0, 1.0),
            y: (-(client_y / height - 0.5) * 2.0).clamp(-1.0, 1.0),
        }
    }
}

/// One exponential smoothing step: `current + (target - current) * k`.
pub fn ease_toward(current: f32, target: f32, k: f32) -> f32 {
    current + (target - current) * k
}

/// Group rotation (x = pitch, y = yaw) eased toward the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupTilt {
    pub rotation: Vec2,
    /// Radians of rotation per unit of pointer offset.
    pub strength: f32,
    pub smoothing: f32,
}

impl GroupTilt {
    pub fn new(strength: f32, smoothing: f32) -> Self {
        Self {
            rotation: Vec2::ZERO,
            strength,
            smoothing,
        }
    }

    pub fn target(&self, pointer: PointerOffset) -> Vec2 {
        Vec2::new(pointer.y * self.strength, pointer.x * self.strength)
    }

    pub fn step(&mut self, pointer: PointerOffset) {
        let target = self.target(pointer);
        self.rotation.x = ease_toward(self.rotation.x, target.x, self.smoothing);
        self.rotation.y = ease_toward(self.rotation.y, target.y, self.smoothing);
    }
}

/// Star and planet groups tilt independently; planets swing further.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxRig {
    pub stars: GroupTilt,
    pub planets: GroupTilt,
}

impl ParallaxRig {
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            stars: GroupTilt::new(config.parallax_strength, config.star_smoothing),
            planets: GroupTilt::new(
                config.parallax_strength * config.planet_parallax_factor,
                config.planet_smoothing,
            ),
        }
    }

    pub fn step(&mut self, pointer: PointerOffset) {
        self.stars.step(pointer);
        self.planets.step(pointer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_mapping() {
        let centre = PointerOffset::from_client(400.0, 300.0, 800.0, 600.0);
        assert_eq!(centre, PointerOffset::ORIGIN);
        let top_left = PointerOffset::from_client(0.0, 0.0, 800.0, 600.0);
        assert_eq!(top_left, PointerOffset { x: -1.0, y: 1.0 });
        let bottom_right = PointerOffset::from_client(800.0, 600.0, 800.0, 600.0);
        assert_eq!(bottom_right, PointerOffset { x: 1.0, y: -1.0 });
    }

    #[test]
    fn mapping_clamps_and_handles_degenerate_viewport() {
        let outside = PointerOffset::from_client(5000.0, -100.0, 800.0, 600.0);
        assert_eq!(outside, PointerOffset { x: 1.0, y: 1.0 });
        assert_eq!(PointerOffset::from_client(10.0, 10.0, 0.0, 600.0), PointerOffset::ORIGIN);
    }

    #[test]
    fn ease_converges_without_overshoot() {
        let mut v = 0.0;
        for _ in 0..500 {
            let next = ease_toward(v, 1.0, 0.05);
            assert!(next >= v && next <= 1.0);
            v = next;
        }
        assert!((v - 1.0).abs() < 1e-3);
    }

    #[test]
    fn planets_tilt_further_and_faster() {
        let mut rig = ParallaxRig::from_config(&SceneConfig::default());
        let pointer = PointerOffset { x: 1.0, y: 0.5 };
        rig.step(pointer);
        assert!(rig.planets.rotation.y > rig.stars.rotation.y);
        for _ in 0..2000 {
            rig.step(pointer);
        }
        assert!((rig.stars.rotation.y - 0.15).abs() < 1e-4);
        assert!((rig.stars.rotation.x - 0.075).abs() < 1e-4);
        assert!((rig.planets.rotation.y - 0.225).abs() < 1e-4);
    }

    #[test]
    fn rotation_stays_bounded_for_bounded_input() {
        let mut tilt = GroupTilt::new(0.15, 0.08);
        for i in 0..1000 {
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            tilt.step(PointerOffset { x: sign, y: -sign });
            assert!(tilt.rotation.abs().max_element() <= 0.15 + 1e-6);
        }
    }
}
