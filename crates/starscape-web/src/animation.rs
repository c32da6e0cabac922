use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::window;

struct LoopState {
    running: Cell<bool>,
    handle: Cell<Option<i32>>,
    callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl LoopState {
    fn schedule(&self) -> Result<(), JsValue> {
        let slot = self.callback.borrow();
        let Some(callback) = slot.as_ref() else {
            return Ok(());
        };
        let handle = window()?.request_animation_frame(callback.as_ref().unchecked_ref())?;
        self.handle.set(Some(handle));
        Ok(())
    }
}

/// `requestAnimationFrame` loop.
///
/// The next frame is requested only after the current callback returns, so
/// ticks never overlap. Stopping (or dropping) cancels the pending request.
pub struct AnimationLoop {
    state: Rc<LoopState>,
}

impl AnimationLoop {
    pub fn start(mut on_frame: impl FnMut(f64) + 'static) -> Result<Self, JsValue> {
        let state = Rc::new(LoopState {
            running: Cell::new(true),
            handle: Cell::new(None),
            callback: RefCell::new(None),
        });

        let weak = Rc::downgrade(&state);
        let callback = Closure::wrap(Box::new(move |now: f64| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            state.handle.set(None);
            if !state.running.get() {
                return;
            }
            on_frame(now);
            if state.running.get() {
                if let Err(e) = state.schedule() {
                    log::error!("animation frame request failed: {:?}", e);
                    state.running.set(false);
                }
            }
        }) as Box<dyn FnMut(f64)>);

        *state.callback.borrow_mut() = Some(callback);
        state.schedule()?;
        Ok(Self { state })
    }

    /// Cancel the pending frame. No callback runs after this returns.
    pub fn stop(&self) {
        self.state.running.set(false);
        if let Some(handle) = self.state.handle.take() {
            if let Ok(w) = window() {
                let _ = w.cancel_animation_frame(handle);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.running.get()
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
