use crate::keys::{Key, ModifierKeys, MouseButton};

/// A key transition observed during one pump cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyEvent {
    pub key: Key,
    pub down: bool,
    pub modifiers: ModifierKeys,
    /// Native auto-repeat.
    pub repeat: bool,
}

impl KeyEvent {
    #[inline]
    pub fn new(key: Key, down: bool, modifiers: ModifierKeys) -> Self {
        Self {
            key,
            down,
            modifiers,
            repeat: false,
        }
    }

    #[inline]
    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }
}

/// A mouse button transition observed during one pump cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MouseEvent {
    pub button: MouseButton,
    pub down: bool,
}

impl MouseEvent {
    #[inline]
    pub fn new(button: MouseButton, down: bool) -> Self {
        Self { button, down }
    }
}
