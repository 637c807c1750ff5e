use glam::Vec2;

use crate::events::{KeyEvent, MouseEvent};
use crate::keys::{MouseButton, MOUSE_BUTTON_COUNT};

/// Input observed during one pump cycle, as handed to the consumer.
///
/// Discrete sequences (keys, buttons, text) hold only what happened since the
/// previous publish. Position and button-down state are continuous and always
/// carry the newest known value.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSnapshot {
    pub(crate) key_events: Vec<KeyEvent>,
    pub(crate) mouse_events: Vec<MouseEvent>,
    pub(crate) key_chars: Vec<char>,
    pub(crate) mouse_position: Vec2,
    pub(crate) mouse_down: [bool; MOUSE_BUTTON_COUNT],
    pub(crate) wheel_delta: f32,
    pub(crate) mouse_delta: Vec2,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            key_events: Vec::new(),
            mouse_events: Vec::new(),
            key_chars: Vec::new(),
            mouse_position: Vec2::ZERO,
            mouse_down: [false; MOUSE_BUTTON_COUNT],
            wheel_delta: 0.0,
            mouse_delta: Vec2::ZERO,
        }
    }
}

impl InputSnapshot {
    #[inline]
    pub fn key_events(&self) -> &[KeyEvent] {
        &self.key_events
    }

    #[inline]
    pub fn mouse_events(&self) -> &[MouseEvent] {
        &self.mouse_events
    }

    /// Text characters in arrival order.
    #[inline]
    pub fn key_char_presses(&self) -> &[char] {
        &self.key_chars
    }

    #[inline]
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    #[inline]
    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        self.mouse_down[button.index()]
    }

    #[inline]
    pub fn wheel_delta(&self) -> f32 {
        self.wheel_delta
    }

    /// Relative mouse motion of this cycle, as reported by the native layer.
    #[inline]
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// True when no discrete input arrived this cycle.
    #[inline]
    pub fn is_quiet(&self) -> bool {
        self.key_events.is_empty()
            && self.mouse_events.is_empty()
            && self.key_chars.is_empty()
            && self.wheel_delta == 0.0
    }
}
