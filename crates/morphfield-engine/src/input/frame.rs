use std::collections::HashSet;

use super::types::{InputEvent, Key};

/// Per-frame input deltas.
///
/// `InputState` provides the current state (held keys, focus).
/// `InputFrame` provides events and transition sets for the current frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,

    /// Keys pressed this frame (including key-repeat presses).
    pub keys_pressed: Vec<Key>,

    /// Keys released this frame.
    pub keys_released: HashSet<Key>,

    /// Accumulated wheel deltas this frame, in arrival order.
    pub wheel: Vec<super::types::MouseWheelDelta>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.wheel.clear();
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    /// Sum of this frame's vertical wheel scrolling in logical pixels.
    pub fn scroll_pixels(&self, line_height: f32) -> f32 {
        self.wheel.iter().map(|d| d.scroll_pixels(line_height)).sum()
    }
}
