//! Scene lighting: one ambient term plus persistent directional and point
//! lights, described to the host once per mount.

use glam::Vec3;
use serde::Serialize;

/// Convert a `0xRRGGBB` literal to linear-ish [0, 1] channels.
pub fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Light {
    Directional {
        color: [f32; 3],
        intensity: f32,
        position: Vec3,
    },
    Point {
        color: [f32; 3],
        intensity: f32,
        /// Falloff distance in world units; 0 means unbounded.
        range: f32,
        position: Vec3,
    },
}

impl Light {
    pub fn directional(hex: u32, intensity: f32, position: Vec3) -> Self {
        Light::Directional {
            color: rgb(hex),
            intensity,
            position,
        }
    }

    pub fn point(hex: u32, intensity: f32, range: f32, position: Vec3) -> Self {
        Light::Point {
            color: rgb(hex),
            intensity,
            range,
            position,
        }
    }
}

/// Ambient colour and the active light list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightState {
    ambient: [f32; 3],
    ambient_intensity: f32,
    lights: Vec<Light>,
}

impl LightState {
    pub fn new() -> Self {
        Self {
            ambient: [1.0, 1.0, 1.0],
            ambient_intensity: 1.0,
            lights: Vec::new(),
        }
    }

    /// Dim blue ambient, a white key light and a blue rim light.
    pub fn backdrop() -> Self {
        let mut state = Self::new();
        state.set_ambient(0x202040, 0.8);
        state.add(Light::directional(0xffffff, 1.2, Vec3::new(100.0, 50.0, 200.0)));
        state.add(Light::point(0x4466ff, 0.4, 400.0, Vec3::new(-100.0, -50.0, 100.0)));
        state
    }

    pub fn add(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn set_ambient(&mut self, hex: u32, intensity: f32) {
        self.ambient = rgb(hex);
        self.ambient_intensity = intensity;
    }

    pub fn ambient(&self) -> ([f32; 3], f32) {
        (self.ambient, self.ambient_intensity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Light> {
        self.lights.iter()
    }

    pub fn count(&self) -> usize {
        self.lights.len()
    }

    pub fn clear(&mut self) {
        self.lights.clear();
    }
}

impl Default for LightState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_splits_channels() {
        assert_eq!(rgb(0xff0000), [1.0, 0.0, 0.0]);
        assert_eq!(rgb(0x000000), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn default_ambient_is_unlit_white() {
        assert_eq!(LightState::new().ambient(), ([1.0, 1.0, 1.0], 1.0));
    }

    #[test]
    fn backdrop_rig() {
        let state = LightState::backdrop();
        assert_eq!(state.count(), 2);
        let (color, intensity) = state.ambient();
        assert_eq!(color, rgb(0x202040));
        assert_eq!(intensity, 0.8);
        assert!(matches!(state.iter().next(), Some(Light::Directional { intensity, .. }) if *intensity == 1.2));
    }

    #[test]
    fn clear_removes_lights() {
        let mut state = LightState::backdrop();
        state.clear();
        assert_eq!(state.count(), 0);
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_string(&Light::point(0x4466ff, 0.4, 400.0, Vec3::ZERO)).unwrap();
        assert!(json.contains("\"type\":\"point\""));
        assert!(json.contains("\"range\":400.0"));
    }
}
