// extensions/counter.rs
//
// Count-up animation for the stats section: eases from 0 to a target value
// once started, then holds the target.

use super::easing::{progress, Easing};

/// Insert `,` between thousands groups of the integer part.
pub fn format_thousands(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if value < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') {
        out.push('-');
    }
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedCounter {
    end: f64,
    duration_ms: f64,
    easing: Easing,
    decimals: usize,
    prefix: String,
    suffix: String,
    started_at: Option<f64>,
    value: f64,
}

impl AnimatedCounter {
    pub const DEFAULT_DURATION_MS: f64 = 2000.0;

    pub fn new(end: f64) -> Self {
        Self {
            end,
            duration_ms: Self::DEFAULT_DURATION_MS,
            easing: Easing::QuartOut,
            decimals: 0,
            prefix: String::new(),
            suffix: String::new(),
            started_at: None,
            value: 0.0,
        }
    }

    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn with_affixes(mut self, prefix: &str, suffix: &str) -> Self {
        self.prefix = prefix.to_string();
        self.suffix = suffix.to_string();
        self
    }

    /// Begin counting at `now_ms`. Only the first call has an effect.
    pub fn start(&mut self, now_ms: f64) -> bool {
        if self.started_at.is_some() {
            return false;
        }
        self.started_at = Some(now_ms);
        true
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Recompute the displayed value at `now_ms` and return it.
    pub fn update(&mut self, now_ms: f64) -> f64 {
        let Some(start) = self.started_at else {
            return self.value;
        };
        let progress = progress(start, now_ms, self.duration_ms);
        self.value = if progress >= 1.0 {
            self.end
        } else {
            let raw = self.end * self.easing.apply(progress as f32) as f64;
            let scale = 10f64.powi(self.decimals as i32);
            (raw * scale).floor() / scale
        };
        self.value
    }

    pub fn is_finished(&self) -> bool {
        self.started_at.is_some() && self.value == self.end
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Current value with thousands separators and affixes.
    pub fn formatted(&self) -> String {
        format!(
            "{}{}{}",
            self.prefix,
            format_thousands(self.value, self.decimals),
            self.suffix
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_groups() {
        assert_eq!(format_thousands(0.0, 0), "0");
        assert_eq!(format_thousands(999.0, 0), "999");
        assert_eq!(format_thousands(1000.0, 0), "1,000");
        assert_eq!(format_thousands(1234567.0, 0), "1,234,567");
        assert_eq!(format_thousands(12345.678, 2), "12,345.68");
        assert_eq!(format_thousands(-4500.0, 0), "-4,500");
    }

    #[test]
    fn idle_counter_shows_zero() {
        let mut c = AnimatedCounter::new(500.0);
        assert_eq!(c.update(10_000.0), 0.0);
        assert!(!c.is_finished());
    }

    #[test]
    fn eases_out_quart_and_floors() {
        let mut c = AnimatedCounter::new(1000.0);
        c.start(0.0);
        assert_eq!(c.update(0.0), 0.0);
        // Halfway: 1 - 0.5^4 = 0.9375.
        assert_eq!(c.update(1000.0), 937.0);
        assert_eq!(c.update(2000.0), 1000.0);
        assert!(c.is_finished());
    }

    #[test]
    fn snaps_to_end_after_duration() {
        let mut c = AnimatedCounter::new(7.0).with_duration(100.0);
        c.start(50.0);
        assert_eq!(c.update(10_000.0), 7.0);
    }

    #[test]
    fn linear_counter_tracks_elapsed_fraction() {
        let mut c = AnimatedCounter::new(400.0).with_easing(Easing::Linear);
        c.start(0.0);
        assert_eq!(c.update(500.0), 100.0);
        assert_eq!(c.update(1000.0), 200.0);
    }

    #[test]
    fn start_only_once() {
        let mut c = AnimatedCounter::new(10.0);
        assert!(c.start(0.0));
        assert!(!c.start(500.0));
        assert_eq!(c.update(2000.0), 10.0);
    }

    #[test]
    fn value_never_decreases() {
        let mut c = AnimatedCounter::new(250.0);
        c.start(0.0);
        let mut last = 0.0;
        for ms in (0..=2100).step_by(16) {
            let v = c.update(ms as f64);
            assert!(v >= last);
            last = v;
        }
        assert_eq!(last, 250.0);
    }

    #[test]
    fn formatted_with_affixes() {
        let mut c = AnimatedCounter::new(15000.0).with_affixes("$", "+");
        c.start(0.0);
        c.update(5000.0);
        assert_eq!(c.formatted(), "$15,000+");
    }
}
