use glam::{IVec2, Vec2};

use crate::keys::{MouseButton, MOUSE_BUTTON_COUNT};

/// Point-in-time mouse state: integer position plus one down flag per button slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct MouseState {
    position: IVec2,
    down: [bool; MOUSE_BUTTON_COUNT],
}

impl MouseState {
    #[inline]
    pub fn new(position: IVec2, down: [bool; MOUSE_BUTTON_COUNT]) -> Self {
        Self { position, down }
    }

    #[inline]
    pub fn position(&self) -> IVec2 {
        self.position
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.position.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.position.y
    }

    #[inline]
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.down[button.index()]
    }

    /// Raw slot lookup.
    ///
    /// Panics if `index` is outside `0..MOUSE_BUTTON_COUNT`; that is a caller bug.
    #[inline]
    pub fn is_index_down(&self, index: usize) -> bool {
        assert!(
            index < MOUSE_BUTTON_COUNT,
            "mouse button index {index} out of range 0..{MOUSE_BUTTON_COUNT}"
        );
        self.down[index]
    }
}

/// Payload of the mouse wheel notification.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MouseWheelArgs {
    pub state: MouseState,
    pub delta: f32,
}

/// Payload of the mouse move notification.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MouseMoveArgs {
    pub state: MouseState,
    pub position: Vec2,
}
