use starscape::{
    CollectorConfig, GameError, GameSession, HostEvent, Phase, PlayArea, ScoreStore, Target,
    TargetId,
};

/// Event kinds written to the host event buffer.
pub const EVENT_SPAWNED: f32 = 1.0;
pub const EVENT_DESPAWNED: f32 = 2.0;
/// `a` = target id, `b` = new score, `c` = best score.
pub const EVENT_COLLECTED: f32 = 3.0;
/// `a` = phase code, `b` = final score, `c` = 1 if a new high score.
pub const EVENT_PHASE: f32 = 4.0;

/// Unacknowledged events kept for the host; older ones are dropped first.
pub const MAX_PENDING_EVENTS: usize = 128;

/// Mini-game session plus the flat target buffer and change counter the
/// host polls. Timers live in the browser glue; this type only reacts.
pub struct CollectorRunner<S: ScoreStore> {
    session: GameSession<S>,
    area: PlayArea,
    viewport_width: f32,
    target_buffer: Vec<f32>,
    events: Vec<HostEvent>,
    version: u32,
}

impl<S: ScoreStore> CollectorRunner<S> {
    pub fn new(config: CollectorConfig, store: S, seed: u64, area: PlayArea, viewport_width: f32) -> Self {
        Self {
            session: GameSession::new(config, store, seed),
            area,
            viewport_width,
            target_buffer: Vec::new(),
            events: Vec::with_capacity(16),
            version: 0,
        }
    }

    fn changed(&mut self) {
        self.target_buffer.clear();
        for t in self.session.targets() {
            self.target_buffer.extend_from_slice(&t.to_floats());
        }
        self.version = self.version.wrapping_add(1);
    }

    pub fn resize(&mut self, area: PlayArea, viewport_width: f32) {
        self.area = area;
        self.viewport_width = viewport_width;
    }

    fn emit(&mut self, kind: f32, a: f32, b: f32, c: f32) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.remove(0);
        }
        self.events.push(HostEvent { kind, a, b, c });
    }

    fn emit_phase(&mut self) {
        let s = &self.session;
        let (phase, score, fresh) = (s.phase().code(), s.score(), s.is_new_high_score());
        self.emit(EVENT_PHASE, phase as f32, score as f32, if fresh { 1.0 } else { 0.0 });
    }

    pub fn start(&mut self) -> Result<(), GameError> {
        self.session.start()?;
        self.emit_phase();
        self.changed();
        Ok(())
    }

    pub fn tick_1s(&mut self) -> Result<Phase, GameError> {
        let phase = self.session.tick_1s()?;
        if phase == Phase::Over {
            self.emit_phase();
        }
        self.changed();
        Ok(phase)
    }

    pub fn spawn(&mut self, now_ms: f64) -> Result<Target, GameError> {
        let target = self.session.spawn_target(self.area, self.viewport_width, now_ms)?;
        self.emit(EVENT_SPAWNED, target.id.0 as f32, target.size, target.despawn_after_ms);
        self.changed();
        Ok(target)
    }

    pub fn despawn(&mut self, id: TargetId) -> bool {
        let removed = self.session.despawn(id);
        if removed {
            self.emit(EVENT_DESPAWNED, id.0 as f32, 0.0, 0.0);
            self.changed();
        }
        removed
    }

    pub fn collect(&mut self, id: TargetId) -> Result<bool, GameError> {
        let collected = self.session.collect(id)?;
        if collected {
            let (score, best) = (self.session.score(), self.session.best());
            self.emit(EVENT_COLLECTED, id.0 as f32, score as f32, best as f32);
            self.changed();
        }
        Ok(collected)
    }

    /// Drop events the host has consumed.
    pub fn ack_events(&mut self) {
        self.events.clear();
    }

    pub fn session(&self) -> &GameSession<S> {
        &self.session
    }

    pub fn spawn_interval_ms(&self) -> i32 {
        self.session.config().spawn_interval_ms as i32
    }

    // ---- Accessors for host reads ----

    pub fn phase_code(&self) -> u32 {
        self.session.phase().code()
    }

    pub fn targets_ptr(&self) -> *const f32 {
        self.target_buffer.as_ptr()
    }

    pub fn target_count(&self) -> u32 {
        (self.target_buffer.len() / Target::FLOATS) as u32
    }

    pub fn events_ptr(&self) -> *const f32 {
        bytemuck::cast_slice::<HostEvent, f32>(&self.events).as_ptr()
    }

    pub fn events_len(&self) -> u32 {
        (self.events.len() * HostEvent::FLOATS) as u32
    }

    /// Bumped on every state change the host should re-render for.
    pub fn version(&self) -> u32 {
        self.version
    }
}
