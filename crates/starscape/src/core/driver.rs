//! Per-display-frame driver: turns host timestamps into scene ticks and
//! contains tick failures so the loop keeps running.

use crate::api::error::SceneError;
use crate::core::time::FrameClock;
use crate::scene::Scene;
use crate::systems::parallax::PointerOffset;

/// What one driven frame did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub delta: f32,
    pub time: f64,
    pub shooting_stars: usize,
    /// The tick failed; spawning has been halted.
    pub degraded: bool,
}

pub struct FrameDriver {
    clock: FrameClock,
    running: bool,
    frames: u64,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self {
            clock: FrameClock::new(),
            running: false,
            frames: 0,
        }
    }

    /// Begin driving. The first frame after a start has a zero delta.
    /// Returns false if already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.clock.reset();
        self.running = true;
        true
    }

    /// Stop driving. Returns false if already stopped.
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame at host time `now_ms`.
    ///
    /// Returns None when stopped. A torn-down scene stops the driver; any
    /// other tick error halts spawning and the frame still counts.
    pub fn frame(&mut self, now_ms: f64, scene: &mut Scene, pointer: PointerOffset) -> Option<FrameStats> {
        if !self.running {
            return None;
        }
        let mut delta = 0.0;
        let result = self.clock.tick(now_ms).and_then(|d| {
            delta = d;
            scene.tick(d, pointer)
        });

        let degraded = match result {
            Ok(()) => false,
            Err(SceneError::TornDown) => {
                self.stop();
                return None;
            }
            Err(e) => {
                log::warn!("frame {} degraded: {}", self.frames, e);
                scene.halt_spawning();
                true
            }
        };

        self.frames += 1;
        Some(FrameStats {
            delta,
            time: scene.time(),
            shooting_stars: scene.shooting_stars().len(),
            degraded,
        })
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}
