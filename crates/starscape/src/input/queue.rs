use crate::api::types::Viewport;
use crate::systems::parallax::PointerOffset;

/// Host input the backdrop reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to client (CSS pixel) coordinates.
    PointerMove { client_x: f32, client_y: f32 },
    /// The window changed size.
    Resize { width: f32, height: f32, pixel_ratio: f32 },
}

/// A queue of input events.
/// Host listeners push; the frame loop drains once per frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide pointer offset and viewport, folded from input events.
///
/// The offset is never reset explicitly; it holds the last observed position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputState {
    pub pointer: PointerOffset,
    pub viewport: Viewport,
}

impl InputState {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            pointer: PointerOffset::ORIGIN,
            viewport,
        }
    }

    /// Apply one event. Returns true if the viewport changed.
    pub fn apply(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::PointerMove { client_x, client_y } => {
                self.pointer = PointerOffset::from_client(
                    client_x,
                    client_y,
                    self.viewport.width,
                    self.viewport.height,
                );
                false
            }
            InputEvent::Resize { width, height, pixel_ratio } => {
                let next = Viewport::new(width, height).with_pixel_ratio(pixel_ratio);
                let changed = next != self.viewport;
                self.viewport = next;
                changed
            }
        }
    }

    /// Apply every event in order. Returns true if any resized the viewport.
    pub fn apply_all(&mut self, events: impl IntoIterator<Item = InputEvent>) -> bool {
        events.into_iter().fold(false, |resized, e| self.apply(e) || resized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerMove { client_x: 10.0, client_y: 20.0 });
        q.push(InputEvent::Resize { width: 800.0, height: 600.0, pixel_ratio: 1.0 });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn pointer_uses_current_viewport() {
        let mut state = InputState::new(Viewport::new(800.0, 600.0));
        state.apply(InputEvent::PointerMove { client_x: 800.0, client_y: 0.0 });
        assert_eq!(state.pointer, PointerOffset { x: 1.0, y: 1.0 });
    }

    #[test]
    fn resize_then_move_in_one_batch() {
        let mut state = InputState::new(Viewport::new(800.0, 600.0));
        let resized = state.apply_all([
            InputEvent::Resize { width: 400.0, height: 300.0, pixel_ratio: 2.0 },
            InputEvent::PointerMove { client_x: 200.0, client_y: 150.0 },
        ]);
        assert!(resized);
        assert_eq!(state.pointer, PointerOffset::ORIGIN);
        assert_eq!(state.viewport.pixel_ratio, 2.0);
    }

    #[test]
    fn same_size_is_not_a_resize() {
        let mut state = InputState::new(Viewport::new(800.0, 600.0));
        assert!(!state.apply(InputEvent::Resize { width: 800.0, height: 600.0, pixel_ratio: 1.0 }));
    }

    #[test]
    fn offset_persists_without_events() {
        let mut state = InputState::new(Viewport::new(100.0, 100.0));
        state.apply(InputEvent::PointerMove { client_x: 0.0, client_y: 100.0 });
        let before = state.pointer;
        state.apply_all(std::iter::empty());
        assert_eq!(state.pointer, before);
    }
}
