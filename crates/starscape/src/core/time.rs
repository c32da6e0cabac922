use crate::api::error::SceneError;

/// Converts host frame timestamps (milliseconds) into frame deltas (seconds).
///
/// The first timestamp after construction or `reset` yields a zero delta,
/// so a paused loop does not replay the time it spent stopped.
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last_ms: None }
    }

    /// Record a timestamp and return seconds elapsed since the previous one.
    /// Timestamps that go backwards produce a zero delta.
    pub fn tick(&mut self, now_ms: f64) -> Result<f32, SceneError> {
        if !now_ms.is_finite() {
            return Err(SceneError::NonFiniteDelta(now_ms as f32));
        }
        let delta = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0).max(0.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        Ok(delta)
    }

    /// Forget the previous timestamp.
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
