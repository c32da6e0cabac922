use starscape::{
    write_commands, FrameDriver, FrameLayout, InputEvent, InputQueue, InputState, ResourceCommand,
    ResourceId, Scene, SceneConfig, SceneError, Viewport,
};

/// Owns the backdrop scene and the flat buffers the host reads.
///
/// Browser glue pushes input and calls `frame` once per display frame; the
/// host then reads the frame and command buffers through raw pointers.
pub struct BackdropRunner {
    scene: Scene,
    driver: FrameDriver,
    input: InputQueue,
    input_state: InputState,
    layout: FrameLayout,
    frame_buffer: Vec<f32>,
    /// Commands the host has not acknowledged yet.
    pending: Vec<ResourceCommand>,
    /// `pending`, flattened for the host.
    command_buffer: Vec<f32>,
    frame_counter: u64,
}

impl BackdropRunner {
    pub fn new(viewport: Viewport, config: SceneConfig) -> Result<Self, SceneError> {
        let scene = Scene::initialize(viewport, config)?;
        let layout = FrameLayout::for_scene(&scene);
        let mut runner = Self {
            frame_buffer: Vec::with_capacity(layout.total_floats),
            pending: Vec::new(),
            command_buffer: Vec::new(),
            input_state: InputState::new(scene.viewport()),
            scene,
            driver: FrameDriver::new(),
            input: InputQueue::new(),
            layout,
            frame_counter: 0,
        };
        runner.flush_commands();
        runner.layout.write_frame(&runner.scene, 0, &mut runner.frame_buffer);
        Ok(runner)
    }

    pub fn start(&mut self) -> bool {
        self.driver.start()
    }

    pub fn stop(&mut self) -> bool {
        self.driver.stop()
    }

    pub fn is_running(&self) -> bool {
        self.driver.is_running()
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Apply queued input, advance the scene and rewrite the frame buffer.
    /// Returns false when no frame was produced.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        let events = self.input.drain();
        if self.input_state.apply_all(events) {
            if let Err(e) = self.scene.resize(self.input_state.viewport) {
                log::warn!("resize ignored: {}", e);
            }
        }

        if self.driver.frame(now_ms, &mut self.scene, self.input_state.pointer).is_none() {
            return false;
        }
        self.frame_counter += 1;
        self.layout.write_frame(&self.scene, self.frame_counter, &mut self.frame_buffer);
        self.flush_commands();
        true
    }

    /// Move new scene commands into the pending list. A release whose create
    /// is still pending cancels both, so the list stays bounded by the live
    /// resource count even when the host acknowledges rarely.
    fn flush_commands(&mut self) {
        let commands = self.scene.resources_mut().drain_commands();
        if commands.is_empty() {
            return;
        }
        for command in commands {
            if let ResourceCommand::Release(id) = command {
                let unseen = self
                    .pending
                    .iter()
                    .position(|c| matches!(c, ResourceCommand::Create(created, _) if *created == id));
                if let Some(idx) = unseen {
                    self.pending.remove(idx);
                    continue;
                }
            }
            self.pending.push(command);
        }
        self.command_buffer.clear();
        write_commands(&self.pending, &mut self.command_buffer);
    }

    /// The host has applied every pending command.
    pub fn ack_commands(&mut self) {
        self.pending.clear();
        self.command_buffer.clear();
    }

    /// Stop and release every scene resource. Returns the final command list
    /// (including releases) for the host to apply; empty on repeat calls.
    pub fn teardown(&mut self) -> Vec<f32> {
        self.driver.stop();
        if self.scene.teardown() > 0 {
            self.flush_commands();
        }
        self.pending.clear();
        std::mem::take(&mut self.command_buffer)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    // ---- Pointer accessors for host reads ----

    pub fn frame_ptr(&self) -> *const f32 {
        self.frame_buffer.as_ptr()
    }

    pub fn frame_len(&self) -> u32 {
        self.frame_buffer.len() as u32
    }

    pub fn commands_ptr(&self) -> *const f32 {
        self.command_buffer.as_ptr()
    }

    pub fn commands_len(&self) -> u32 {
        self.command_buffer.len() as u32
    }

    pub fn star_positions_ptr(&self) -> *const f32 {
        self.scene.stars().positions.as_ptr()
    }

    pub fn star_colors_ptr(&self) -> *const f32 {
        self.scene.stars().colors.as_ptr()
    }

    pub fn star_count(&self) -> u32 {
        self.scene.stars().len() as u32
    }

    pub fn manifest_json(&self) -> Option<String> {
        self.scene.manifest_json().ok()
    }

    pub fn resource_json(&self, id: u32) -> Option<String> {
        self.scene.resources().describe_json(ResourceId(id))
    }

    /// RGBA pixels of a live texture, or null.
    pub fn texture_ptr(&self, id: u32) -> *const u8 {
        self.scene
            .resources()
            .texture(ResourceId(id))
            .map_or(std::ptr::null(), |t| t.pixels().as_ptr())
    }

    pub fn texture_len(&self, id: u32) -> u32 {
        self.scene
            .resources()
            .texture(ResourceId(id))
            .map_or(0, |t| t.pixels().len() as u32)
    }

    pub fn live_resources(&self) -> u32 {
        self.scene.resources().live_count() as u32
    }

    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }
}
