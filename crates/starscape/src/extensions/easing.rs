// extensions/easing.rs
//
// Timing curves for the stat counters.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    /// Fast start, long settle. The counters' default.
    #[default]
    QuartOut,
}

impl Easing {
    /// Map normalized progress to eased progress. Input is clamped to [0, 1].
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuartOut => 1.0 - (1.0 - t).powi(4),
        }
    }
}

/// Fraction of `duration_ms` covered since `start_ms`, in [0, 1].
/// A non-positive duration is already complete.
pub fn progress(start_ms: f64, now_ms: f64, duration_ms: f64) -> f64 {
    if duration_ms > 0.0 {
        ((now_ms - start_ms) / duration_ms).clamp(0.0, 1.0)
    } else {
        1.0
    }
}
