use serde::{Deserialize, Serialize};

use crate::api::error::SceneError;

/// Configuration for the animated backdrop.
///
/// Every field has a default; hosts may override any subset from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Number of stars in the point cloud (default: 1200).
    pub star_count: usize,
    /// Edge length of the soft star sprite (default: 64).
    pub star_texture_size: u32,
    /// Edge length of each planet surface texture (default: 512).
    pub planet_texture_size: u32,
    /// Edge length of the nebula texture (default: 1024).
    pub nebula_texture_size: u32,
    /// Shooting-star streak sprite size (default: 256 x 16).
    pub streak_texture_size: [u32; 2],
    /// Seconds between shooting-star spawns (default: 3.0).
    pub shooting_star_interval: f32,
    /// Starting life of a shooting star (default: 1.5).
    pub shooting_star_life: f32,
    /// Speed range in world units per 60 Hz frame (default: 3..5).
    pub shooting_star_speed: [f32; 2],
    /// Upper bound on concurrently live shooting stars (default: 16).
    pub max_shooting_stars: usize,
    /// Pointer offset to rotation scale, in radians (default: 0.15).
    pub parallax_strength: f32,
    /// Extra parallax applied to the planet group (default: 1.5).
    pub planet_parallax_factor: f32,
    /// Exponential smoothing factor for the star group (default: 0.05).
    pub star_smoothing: f32,
    /// Exponential smoothing factor for the planet group (default: 0.08).
    pub planet_smoothing: f32,
    /// Longest frame delta the simulation will accept, in seconds (default: 0.25).
    pub max_frame_delta: f32,
    /// Device pixel ratio ceiling (default: 2.0).
    pub max_pixel_ratio: f32,
    /// RNG seed for star placement, textures and shooting stars.
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            star_count: 1200,
            star_texture_size: 64,
            planet_texture_size: 512,
            nebula_texture_size: 1024,
            streak_texture_size: [256, 16],
            shooting_star_interval: 3.0,
            shooting_star_life: 1.5,
            shooting_star_speed: [3.0, 5.0],
            max_shooting_stars: 16,
            parallax_strength: 0.15,
            planet_parallax_factor: 1.5,
            star_smoothing: 0.05,
            planet_smoothing: 0.08,
            max_frame_delta: 0.25,
            max_pixel_ratio: 2.0,
            seed: 42,
        }
    }
}

impl SceneConfig {
    /// Parse a config from a JSON string. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reject values the frame loop cannot work with.
    pub fn validate(&self) -> Result<(), SceneError> {
        if !(self.shooting_star_interval > 0.0) {
            return Err(SceneError::Config("shooting_star_interval must be positive"));
        }
        if !(self.shooting_star_life > 0.0) {
            return Err(SceneError::Config("shooting_star_life must be positive"));
        }
        let [lo, hi] = self.shooting_star_speed;
        if !(lo > 0.0 && lo <= hi) {
            return Err(SceneError::Config("shooting_star_speed must be an ascending positive range"));
        }
        if self.max_shooting_stars == 0 {
            return Err(SceneError::Config("max_shooting_stars must be at least 1"));
        }
        if !(self.max_frame_delta > 0.0) {
            return Err(SceneError::Config("max_frame_delta must be positive"));
        }
        for k in [self.star_smoothing, self.planet_smoothing] {
            if !(k > 0.0 && k <= 1.0) {
                return Err(SceneError::Config("smoothing factors must lie in (0, 1]"));
            }
        }
        Ok(())
    }
}

/// Configuration for the star-collector mini-game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Length of a round in seconds (default: 30).
    pub round_secs: u32,
    /// Milliseconds between target spawns (default: 600).
    pub spawn_interval_ms: u32,
    /// Targets keep this far from the right and bottom edges (default: 60).
    pub target_margin: f32,
    /// Target size range in pixels (default: 25..45).
    pub target_size: [f32; 2],
    /// Viewports at most this wide count as mobile (default: 768).
    pub mobile_breakpoint: f32,
    /// Target lifetime range on mobile, in ms (default: 700..1700).
    pub despawn_mobile_ms: [f32; 2],
    /// Target lifetime range on larger screens, in ms (default: 700..2200).
    pub despawn_desktop_ms: [f32; 2],
    /// Key of the best score in durable storage.
    pub storage_key: String,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            round_secs: 30,
            spawn_interval_ms: 600,
            target_margin: 60.0,
            target_size: [25.0, 45.0],
            mobile_breakpoint: 768.0,
            despawn_mobile_ms: [700.0, 1700.0],
            despawn_desktop_ms: [700.0, 2200.0],
            storage_key: "starCollectorBestScore".to_string(),
        }
    }
}

impl CollectorConfig {
    /// Parse a config from a JSON string. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
