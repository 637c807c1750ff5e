use glam::Vec2;

use crate::events::{KeyEvent, MouseEvent};
use crate::keys::{MouseButton, MOUSE_BUTTON_COUNT};
use crate::snapshot::InputSnapshot;
use crate::text::decode_text_input;

/// Mutable per-cycle working buffer written by the event pump.
///
/// Two of these alternate inside `SnapshotExchange`, so continuous state
/// (position, button-down) is tracked together with a "changed since clear"
/// mark: only values this buffer actually observed are published, and a
/// stale backbuffer never rolls the public snapshot back.
#[derive(Debug, Clone)]
pub struct InputAccumulator {
    key_events: Vec<KeyEvent>,
    mouse_events: Vec<MouseEvent>,
    key_chars: Vec<char>,
    wheel_delta: f32,
    mouse_delta: Vec2,

    mouse_position: Vec2,
    position_changed: bool,

    mouse_down: [bool; MOUSE_BUTTON_COUNT],
    down_changed: u16,
}

impl Default for InputAccumulator {
    fn default() -> Self {
        Self {
            key_events: Vec::new(),
            mouse_events: Vec::new(),
            key_chars: Vec::new(),
            wheel_delta: 0.0,
            mouse_delta: Vec2::ZERO,
            mouse_position: Vec2::ZERO,
            position_changed: false,
            mouse_down: [false; MOUSE_BUTTON_COUNT],
            down_changed: 0,
        }
    }
}

impl InputAccumulator {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size the sequences so steady-state cycles do not allocate.
    pub fn with_capacity(events: usize) -> Self {
        let mut acc = Self::default();
        acc.key_events.reserve(events);
        acc.mouse_events.reserve(events);
        acc.key_chars.reserve(events);
        acc
    }

    #[inline]
    pub fn record_key_event(&mut self, event: KeyEvent) {
        self.key_events.push(event);
    }

    #[inline]
    pub fn record_mouse_button(&mut self, event: MouseEvent) {
        let i = event.button.index();
        self.mouse_down[i] = event.down;
        self.down_changed |= 1 << i;
        self.mouse_events.push(event);
    }

    /// Last write in a cycle wins.
    #[inline]
    pub fn record_mouse_position(&mut self, position: Vec2) {
        self.mouse_position = position;
        self.position_changed = true;
    }

    /// Position plus the native relative motion; deltas sum across the cycle.
    #[inline]
    pub fn record_mouse_motion(&mut self, position: Vec2, delta: Vec2) {
        self.record_mouse_position(position);
        self.mouse_delta += delta;
    }

    /// Wheel deltas sum across the cycle.
    #[inline]
    pub fn record_wheel(&mut self, delta_y: f32) {
        self.wheel_delta += delta_y;
    }

    /// Transcode a native text-input buffer; see `decode_text_input`.
    #[inline]
    pub fn record_text(&mut self, buf: &[u8], max_len: usize) -> usize {
        decode_text_input(buf, max_len, &mut self.key_chars)
    }

    /// Drop per-cycle events. Position and button-down state are kept.
    pub fn clear(&mut self) {
        self.key_events.clear();
        self.mouse_events.clear();
        self.key_chars.clear();
        self.wheel_delta = 0.0;
        self.mouse_delta = Vec2::ZERO;
        self.position_changed = false;
        self.down_changed = 0;
    }

    /// Copy this buffer into the public snapshot, reusing its allocations.
    pub fn publish_into(&self, out: &mut InputSnapshot) {
        out.key_events.clone_from(&self.key_events);
        out.mouse_events.clone_from(&self.mouse_events);
        out.key_chars.clone_from(&self.key_chars);
        out.wheel_delta = self.wheel_delta;
        out.mouse_delta = self.mouse_delta;

        if self.position_changed {
            out.mouse_position = self.mouse_position;
        }

        if self.down_changed != 0 {
            for i in 0..MOUSE_BUTTON_COUNT {
                if self.down_changed & (1 << i) != 0 {
                    out.mouse_down[i] = self.mouse_down[i];
                }
            }
        }
    }

    #[inline]
    pub fn key_events(&self) -> &[KeyEvent] {
        &self.key_events
    }

    #[inline]
    pub fn mouse_events(&self) -> &[MouseEvent] {
        &self.mouse_events
    }

    #[inline]
    pub fn key_chars(&self) -> &[char] {
        &self.key_chars
    }

    #[inline]
    pub fn wheel_delta(&self) -> f32 {
        self.wheel_delta
    }

    #[inline]
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    #[inline]
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    #[inline]
    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        self.mouse_down[button.index()]
    }
}
