//! Batched star point cloud, stored as structure-of-arrays.
//!
//! Positions and colours are fixed at creation. Only `sizes` changes per
//! frame, recomputed from elapsed time by [`twinkle_size`].

use crate::systems::rng::Rng;

const SHELL_INNER: f32 = 100.0;
const SHELL_OUTER: f32 = 600.0;
const SHELL_Z_SHIFT: f32 = -200.0;

/// Displayed size of a star at elapsed time `t` seconds.
///
/// Always lies within `[0.7 * base, 1.3 * base]`. The argument is formed in
/// f64 so the wave keeps moving on long-lived pages.
pub fn twinkle_size(base: f32, speed: f32, phase: f32, t: f64) -> f32 {
    let wave = 0.5 + 0.5 * (t * speed as f64 + phase as f64).sin() as f32;
    base * (0.7 + 0.6 * wave)
}

#[derive(Debug, Clone, Default)]
pub struct StarCloud {
    /// xyz triples.
    pub positions: Vec<f32>,
    /// rgb triples in [0, 1].
    pub colors: Vec<f32>,
    pub base_sizes: Vec<f32>,
    pub phases: Vec<f32>,
    pub speeds: Vec<f32>,
    pub sizes: Vec<f32>,
}

impl StarCloud {
    pub fn generate(count: usize, rng: &mut Rng) -> Self {
        let mut cloud = StarCloud {
            positions: Vec::with_capacity(count * 3),
            colors: Vec::with_capacity(count * 3),
            base_sizes: Vec::with_capacity(count),
            phases: Vec::with_capacity(count),
            speeds: Vec::with_capacity(count),
            sizes: Vec::with_capacity(count),
        };

        for _ in 0..count {
            let radius = rng.range(SHELL_INNER, SHELL_OUTER);
            let theta = rng.angle();
            let phi = (2.0 * rng.next_f32() - 1.0).clamp(-1.0, 1.0).acos();
            let (sin_phi, cos_phi) = phi.sin_cos();
            cloud.positions.extend_from_slice(&[
                radius * sin_phi * theta.cos(),
                radius * sin_phi * theta.sin(),
                radius * cos_phi + SHELL_Z_SHIFT,
            ]);

            cloud.colors.extend_from_slice(&star_color(rng));

            let base = rng.range(0.5, 3.0);
            cloud.base_sizes.push(base);
            cloud.phases.push(rng.angle());
            cloud.speeds.push(rng.range(0.5, 2.0));
            cloud.sizes.push(base);
        }
        cloud
    }

    pub fn len(&self) -> usize {
        self.base_sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base_sizes.is_empty()
    }

    /// Recompute every displayed size for elapsed time `t`.
    pub fn update(&mut self, t: f64) {
        for i in 0..self.sizes.len() {
            self.sizes[i] = twinkle_size(self.base_sizes[i], self.speeds[i], self.phases[i], t);
        }
    }
}

/// 5% warm, 10% blue-white, the rest near-white.
fn star_color(rng: &mut Rng) -> [f32; 3] {
    let class = rng.next_f32();
    if class < 0.05 {
        [1.0, rng.range(0.7, 0.9), rng.range(0.4, 0.6)]
    } else if class < 0.15 {
        [rng.range(0.7, 1.0), rng.range(0.85, 1.0), 1.0]
    } else {
        let v = rng.range(0.9, 1.0);
        [v, v, v]
    }
}
