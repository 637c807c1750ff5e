use glam::IVec2;

use crate::keys::{MouseButton, MOUSE_BUTTON_COUNT};
use crate::mouse::MouseState;

/// Pump-local mouse state used to build `MouseState` for notifications.
///
/// Lives on the pump thread only; the consumer sees button state through the
/// published snapshot instead.
#[derive(Debug, Clone)]
pub struct MouseTracker {
    position: IVec2,
    down: [bool; MOUSE_BUTTON_COUNT],
    seen_motion: bool,
}

impl Default for MouseTracker {
    fn default() -> Self {
        Self {
            position: IVec2::ZERO,
            down: [false; MOUSE_BUTTON_COUNT],
            seen_motion: false,
        }
    }
}

impl MouseTracker {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a motion event.
    ///
    /// Returns `false` for the first motion after creation: there is no prior
    /// position, so the caller must not emit a delta or a move notification.
    #[inline]
    pub fn record_motion(&mut self, position: IVec2) -> bool {
        self.position = position;
        let had_prior = self.seen_motion;
        self.seen_motion = true;
        had_prior
    }

    #[inline]
    pub fn set_button(&mut self, button: MouseButton, down: bool) {
        self.down[button.index()] = down;
    }

    #[inline]
    pub fn position(&self) -> IVec2 {
        self.position
    }

    #[inline]
    pub fn state(&self) -> MouseState {
        MouseState::new(self.position, self.down)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_motion_is_suppressed() {
        let mut t = MouseTracker::new();
        assert!(!t.record_motion(IVec2::new(10, 10)));
        assert!(t.record_motion(IVec2::new(12, 9)));
        assert!(t.record_motion(IVec2::new(12, 9)));
        assert_eq!(t.position(), IVec2::new(12, 9));
    }

    #[test]
    fn state_reflects_buttons() {
        let mut t = MouseTracker::new();
        t.set_button(MouseButton::Middle, true);
        let s = t.state();
        assert!(s.is_button_down(MouseButton::Middle));
        t.set_button(MouseButton::Middle, false);
        assert!(!t.state().is_button_down(MouseButton::Middle));
        // The earlier value is a copy.
        assert!(s.is_button_down(MouseButton::Middle));
    }
}
