//! Star-collector mini-game: a timed click-the-target round with a
//! persisted best score.
//!
//! The session is driven by two host timers (a 1 s countdown and a spawn
//! interval) plus one despawn timeout per target. It never touches the
//! backdrop scene.

pub mod store;

use serde::Serialize;

use crate::api::config::CollectorConfig;
use crate::api::error::GameError;
use crate::api::types::TargetId;
use crate::systems::rng::Rng;

use store::{parse_best_score, ScoreStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Active,
    Over,
}

impl Phase {
    /// Wire encoding for the host.
    pub fn code(self) -> u32 {
        match self {
            Phase::Idle => 0,
            Phase::Active => 1,
            Phase::Over => 2,
        }
    }
}

/// Size of the container targets are placed in, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Target {
    pub id: TargetId,
    /// Top-left corner within the play area.
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub spawned_at_ms: f64,
    /// The host should call `despawn` after this long.
    pub despawn_after_ms: f32,
}

impl Target {
    pub const FLOATS: usize = 5;

    /// `[id, x, y, size, despawn_after_ms]`.
    pub fn to_floats(&self) -> [f32; 5] {
        [self.id.0 as f32, self.x, self.y, self.size, self.despawn_after_ms]
    }
}

pub struct GameSession<S: ScoreStore> {
    config: CollectorConfig,
    store: S,
    rng: Rng,
    phase: Phase,
    score: u32,
    best: u32,
    time_remaining: u32,
    targets: Vec<Target>,
    next_id: u32,
}

impl<S: ScoreStore> GameSession<S> {
    /// Create an idle session, reading the best score once.
    /// Missing, corrupt or unreadable values count as 0.
    pub fn new(config: CollectorConfig, store: S, seed: u64) -> Self {
        let best = match store.load(&config.storage_key) {
            Ok(Some(raw)) => parse_best_score(&raw),
            Ok(None) => 0,
            Err(e) => {
                log::warn!("best score unavailable: {}", e);
                0
            }
        };
        Self {
            time_remaining: config.round_secs,
            config,
            store,
            rng: Rng::new(seed),
            phase: Phase::Idle,
            score: 0,
            best,
            targets: Vec::new(),
            next_id: 0,
        }
    }

    fn require_active(&self, op: &'static str) -> Result<(), GameError> {
        if self.phase == Phase::Active {
            Ok(())
        } else {
            Err(GameError::WrongPhase { op, phase: self.phase })
        }
    }

    /// Begin a round from Idle or Over.
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.phase == Phase::Active {
            return Err(GameError::WrongPhase {
                op: "start",
                phase: self.phase,
            });
        }
        self.score = 0;
        self.time_remaining = self.config.round_secs;
        self.targets.clear();
        self.next_id = 0;
        self.phase = Phase::Active;
        log::info!("collector round started ({} s)", self.time_remaining);
        Ok(())
    }

    /// One second of countdown. Ends the round when time runs out.
    pub fn tick_1s(&mut self) -> Result<Phase, GameError> {
        self.require_active("tick_1s")?;
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            self.phase = Phase::Over;
            self.targets.clear();
            log::info!("collector round over: score {}, best {}", self.score, self.best);
        }
        Ok(self.phase)
    }

    /// Place a new target in `area`. Its lifetime is shorter when
    /// `viewport_width` is at or below the mobile breakpoint.
    pub fn spawn_target(&mut self, area: PlayArea, viewport_width: f32, now_ms: f64) -> Result<Target, GameError> {
        self.require_active("spawn_target")?;
        let margin = self.config.target_margin;
        let [min_size, max_size] = self.config.target_size;
        let [lo, hi] = if viewport_width <= self.config.mobile_breakpoint {
            self.config.despawn_mobile_ms
        } else {
            self.config.despawn_desktop_ms
        };

        let target = Target {
            id: TargetId(self.next_id),
            x: self.rng.next_f32() * (area.width - margin).max(0.0),
            y: self.rng.next_f32() * (area.height - margin).max(0.0),
            size: self.rng.range(min_size, max_size),
            spawned_at_ms: now_ms,
            despawn_after_ms: self.rng.range(lo, hi),
        };
        self.next_id += 1;
        self.targets.push(target);
        Ok(target)
    }

    /// Drop a target whose timer fired. Returns false if it was already gone.
    pub fn despawn(&mut self, id: TargetId) -> bool {
        match self.targets.iter().position(|t| t.id == id) {
            Some(idx) => {
                self.targets.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Collect a live target: +1 score, and a new best is written through
    /// immediately. Returns Ok(false) if the target is not present.
    pub fn collect(&mut self, id: TargetId) -> Result<bool, GameError> {
        self.require_active("collect")?;
        if !self.despawn(id) {
            return Ok(false);
        }
        self.score += 1;
        if self.score > self.best {
            self.best = self.score;
            self.persist_best();
        }
        Ok(true)
    }

    fn persist_best(&mut self) {
        if self.best == 0 {
            return;
        }
        let value = self.best.to_string();
        if let Err(e) = self.store.save(&self.config.storage_key, &value) {
            log::warn!("failed to persist best score {}: {}", self.best, e);
        }
    }

    /// True at game over when the score matched or beat the best.
    pub fn is_new_high_score(&self) -> bool {
        self.phase == Phase::Over && self.score > 0 && self.score == self.best
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
