//! Browser bindings for the starscape backdrop and the star-collector game.
//!
//! Both components live in thread-local slots and are mounted and unmounted
//! explicitly by the host page. Frame data is exposed as raw pointers into
//! wasm memory; the host reads it after each render callback.

mod animation;
mod collector;
mod listener;
mod runner;
mod storage;
mod timers;

pub use collector::CollectorRunner;
pub use runner::BackdropRunner;
pub use storage::LocalStorageStore;

use std::cell::RefCell;
use std::collections::HashMap;

use starscape::{
    format_thousands, AnimatedCounter, CollectorConfig, InputEvent, Phase, PlayArea, SceneConfig,
    TargetId, Viewport,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::MouseEvent;

use animation::AnimationLoop;
use listener::EventListener;
use timers::{Interval, Timeout};

const COUNTDOWN_PERIOD_MS: i32 = 1000;

pub(crate) fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

fn random_seed() -> u64 {
    (js_sys::Math::random() * u32::MAX as f64) as u64
}

fn current_viewport() -> Result<Viewport, JsValue> {
    let w = window()?;
    let width = w.inner_width()?.as_f64().unwrap_or(0.0) as f32;
    let height = w.inner_height()?.as_f64().unwrap_or(0.0) as f32;
    Ok(Viewport::new(width, height).with_pixel_ratio(w.device_pixel_ratio() as f32))
}

// ---- Backdrop ----

struct BackdropMount {
    runner: BackdropRunner,
    _listeners: Vec<EventListener>,
    animation: Option<AnimationLoop>,
}

thread_local! {
    static BACKDROP: RefCell<Option<BackdropMount>> = const { RefCell::new(None) };
}

fn with_backdrop<R>(f: impl FnOnce(&mut BackdropRunner) -> R) -> Option<R> {
    BACKDROP.with(|cell| {
        let mut borrow = cell.try_borrow_mut().ok()?;
        borrow.as_mut().map(|m| f(&mut m.runner))
    })
}

fn push_backdrop_input(event: InputEvent) {
    with_backdrop(|r| r.push_input(event));
}

/// Build the scene and start the frame loop. `render_callback` is invoked
/// after every produced frame. Mounting twice is a no-op.
#[wasm_bindgen]
pub fn backdrop_mount(render_callback: js_sys::Function, config_json: Option<String>) -> Result<(), JsValue> {
    init_logging();
    if BACKDROP.with(|cell| cell.borrow().is_some()) {
        return Ok(());
    }

    let config = match config_json {
        Some(json) => SceneConfig::from_json(&json).map_err(to_js)?,
        None => SceneConfig {
            seed: random_seed(),
            ..SceneConfig::default()
        },
    };
    let mut runner = BackdropRunner::new(current_viewport()?, config).map_err(to_js)?;
    runner.start();

    let w = window()?;
    let pointer = EventListener::new(&w, "mousemove", |event| {
        if let Some(e) = event.dyn_ref::<MouseEvent>() {
            push_backdrop_input(InputEvent::PointerMove {
                client_x: e.client_x() as f32,
                client_y: e.client_y() as f32,
            });
        }
    })?;
    let resize = EventListener::new(&w, "resize", |_| match current_viewport() {
        Ok(v) => push_backdrop_input(InputEvent::Resize {
            width: v.width,
            height: v.height,
            pixel_ratio: v.pixel_ratio,
        }),
        Err(e) => log::warn!("viewport unreadable: {:?}", e),
    })?;

    let animation = AnimationLoop::start(move |now| {
        // The borrow must end before the host callback runs; it may unmount.
        if with_backdrop(|r| r.frame(now)) == Some(true) {
            if let Err(e) = render_callback.call0(&JsValue::NULL) {
                log::error!("render callback failed: {:?}", e);
            }
        }
    })?;

    BACKDROP.with(|cell| {
        *cell.borrow_mut() = Some(BackdropMount {
            runner,
            _listeners: vec![pointer, resize],
            animation: Some(animation),
        });
    });
    log::info!("backdrop mounted");
    Ok(())
}

/// Stop the loop, detach listeners and release every scene resource.
/// Returns the final command list; empty when nothing was mounted.
#[wasm_bindgen]
pub fn backdrop_unmount() -> js_sys::Float32Array {
    let mount = BACKDROP.with(|cell| cell.borrow_mut().take());
    let Some(mut mount) = mount else {
        return js_sys::Float32Array::new_with_length(0);
    };
    if let Some(animation) = mount.animation.take() {
        animation.stop();
    }
    let commands = mount.runner.teardown();
    log::info!("backdrop unmounted");
    js_sys::Float32Array::from(commands.as_slice())
}

#[wasm_bindgen]
pub fn backdrop_is_mounted() -> bool {
    BACKDROP.with(|cell| cell.borrow().is_some())
}

#[wasm_bindgen]
pub fn backdrop_frame_ptr() -> *const f32 {
    with_backdrop(|r| r.frame_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn backdrop_frame_len() -> u32 {
    with_backdrop(|r| r.frame_len()).unwrap_or(0)
}

/// Create/release commands not yet acknowledged. The host applies them in
/// order, then calls `backdrop_ack_commands`. A create and its release that
/// were never acknowledged cancel out, so the buffer stays bounded.
#[wasm_bindgen]
pub fn backdrop_commands_ptr() -> *const f32 {
    with_backdrop(|r| r.commands_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn backdrop_commands_len() -> u32 {
    with_backdrop(|r| r.commands_len()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn backdrop_ack_commands() {
    with_backdrop(|r| r.ack_commands());
}

#[wasm_bindgen]
pub fn backdrop_star_positions_ptr() -> *const f32 {
    with_backdrop(|r| r.star_positions_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn backdrop_star_colors_ptr() -> *const f32 {
    with_backdrop(|r| r.star_colors_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn backdrop_star_count() -> u32 {
    with_backdrop(|r| r.star_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn backdrop_manifest() -> Option<String> {
    with_backdrop(|r| r.manifest_json()).flatten()
}

#[wasm_bindgen]
pub fn backdrop_resource(id: u32) -> Option<String> {
    with_backdrop(|r| r.resource_json(id)).flatten()
}

#[wasm_bindgen]
pub fn backdrop_texture_ptr(id: u32) -> *const u8 {
    with_backdrop(|r| r.texture_ptr(id)).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn backdrop_texture_len(id: u32) -> u32 {
    with_backdrop(|r| r.texture_len(id)).unwrap_or(0)
}

#[wasm_bindgen]
pub fn backdrop_buffer_total_floats() -> u32 {
    with_backdrop(|r| r.layout().total_floats as u32).unwrap_or(0)
}

// ---- Star collector ----

struct CollectorMount {
    runner: CollectorRunner<LocalStorageStore>,
    countdown: Option<Interval>,
    spawner: Option<Interval>,
    despawns: HashMap<TargetId, Timeout>,
}

impl CollectorMount {
    /// Detach every timer. The handles are returned so they drop outside the borrow.
    fn take_timers(&mut self) -> (Option<Interval>, Option<Interval>, HashMap<TargetId, Timeout>) {
        (
            self.countdown.take(),
            self.spawner.take(),
            std::mem::take(&mut self.despawns),
        )
    }
}

thread_local! {
    static COLLECTOR: RefCell<Option<CollectorMount>> = const { RefCell::new(None) };
}

fn with_collector<R>(f: impl FnOnce(&mut CollectorMount) -> R) -> Option<R> {
    COLLECTOR.with(|cell| {
        let mut borrow = cell.try_borrow_mut().ok()?;
        borrow.as_mut().map(f)
    })
}

fn not_mounted() -> JsValue {
    JsValue::from_str("collector not mounted")
}

fn countdown_tick() {
    let stale = with_collector(|m| match m.runner.tick_1s() {
        Ok(Phase::Over) => Some(m.take_timers()),
        Ok(_) => None,
        Err(e) => {
            log::warn!("countdown tick ignored: {}", e);
            Some(m.take_timers())
        }
    });
    drop(stale);
}

fn spawn_tick() {
    with_collector(|m| {
        let target = match m.runner.spawn(js_sys::Date::now()) {
            Ok(t) => t,
            Err(e) => {
                log::warn!("spawn ignored: {}", e);
                return;
            }
        };
        let id = target.id;
        match Timeout::new(target.despawn_after_ms as i32, move || despawn_tick(id)) {
            Ok(timeout) => {
                m.despawns.insert(id, timeout);
            }
            Err(e) => log::error!("despawn timer failed: {:?}", e),
        }
    });
}

fn despawn_tick(id: TargetId) {
    let fired = with_collector(|m| {
        m.runner.despawn(id);
        m.despawns.remove(&id)
    });
    drop(fired);
}

/// Create an idle session sized to the play area. Replaces any previous session.
#[wasm_bindgen]
pub fn collector_mount(width: f32, height: f32, viewport_width: f32, config_json: Option<String>) -> Result<(), JsValue> {
    init_logging();
    let config = match config_json {
        Some(json) => CollectorConfig::from_json(&json).map_err(to_js)?,
        None => CollectorConfig::default(),
    };
    let runner = CollectorRunner::new(
        config,
        LocalStorageStore::open(),
        random_seed(),
        PlayArea { width, height },
        viewport_width,
    );
    let previous = COLLECTOR.with(|cell| {
        cell.borrow_mut().replace(CollectorMount {
            runner,
            countdown: None,
            spawner: None,
            despawns: HashMap::new(),
        })
    });
    drop(previous);
    Ok(())
}

#[wasm_bindgen]
pub fn collector_resize(width: f32, height: f32, viewport_width: f32) {
    with_collector(|m| m.runner.resize(PlayArea { width, height }, viewport_width));
}

/// Begin a round and arm the countdown and spawn timers.
#[wasm_bindgen]
pub fn collector_start() -> Result<(), JsValue> {
    let stale = with_collector(|m| -> Result<_, JsValue> {
        m.runner.start().map_err(to_js)?;
        let stale = m.take_timers();
        m.countdown = Some(Interval::new(COUNTDOWN_PERIOD_MS, countdown_tick)?);
        m.spawner = Some(Interval::new(m.runner.spawn_interval_ms(), spawn_tick)?);
        Ok(stale)
    })
    .ok_or_else(not_mounted)??;
    drop(stale);
    Ok(())
}

/// Click on a target. Returns true if it was live and scored.
#[wasm_bindgen]
pub fn collector_collect(id: u32) -> Result<bool, JsValue> {
    let id = TargetId(id);
    let (collected, timeout) = with_collector(|m| -> Result<_, JsValue> {
        let collected = m.runner.collect(id).map_err(to_js)?;
        let timeout = if collected { m.despawns.remove(&id) } else { None };
        Ok((collected, timeout))
    })
    .ok_or_else(not_mounted)??;
    drop(timeout);
    Ok(collected)
}

/// Cancel every timer and drop the session.
#[wasm_bindgen]
pub fn collector_unmount() {
    let mount = COLLECTOR.with(|cell| cell.borrow_mut().take());
    if let Some(mut mount) = mount {
        drop(mount.take_timers());
        log::info!("collector unmounted");
    }
}

#[wasm_bindgen]
pub fn collector_phase() -> u32 {
    with_collector(|m| m.runner.phase_code()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn collector_score() -> u32 {
    with_collector(|m| m.runner.session().score()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn collector_best() -> u32 {
    with_collector(|m| m.runner.session().best()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn collector_time_remaining() -> u32 {
    with_collector(|m| m.runner.session().time_remaining()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn collector_is_new_high_score() -> bool {
    with_collector(|m| m.runner.session().is_new_high_score()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn collector_targets_ptr() -> *const f32 {
    with_collector(|m| m.runner.targets_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn collector_target_count() -> u32 {
    with_collector(|m| m.runner.target_count()).unwrap_or(0)
}

/// Events since the last `collector_ack_events`, four floats each. Only the
/// newest `MAX_PENDING_EVENTS` are kept.
#[wasm_bindgen]
pub fn collector_events_ptr() -> *const f32 {
    with_collector(|m| m.runner.events_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn collector_events_len() -> u32 {
    with_collector(|m| m.runner.events_len()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn collector_ack_events() {
    with_collector(|m| m.runner.ack_events());
}

#[wasm_bindgen]
pub fn collector_version() -> u32 {
    with_collector(|m| m.runner.version()).unwrap_or(0)
}

// ---- Stat counters ----

/// Format a number with thousands separators.
#[wasm_bindgen]
pub fn format_count(value: f64, decimals: u32) -> String {
    format_thousands(value, decimals as usize)
}

/// Value an eased stat counter shows `elapsed_ms` into its animation.
#[wasm_bindgen]
pub fn counter_value_at(end: f64, elapsed_ms: f64, duration_ms: f64, decimals: u32) -> f64 {
    let mut counter = AnimatedCounter::new(end)
        .with_duration(duration_ms)
        .with_decimals(decimals as usize);
    counter.start(0.0);
    counter.update(elapsed_ms)
}
