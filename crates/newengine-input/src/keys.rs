use bitflags::bitflags;

/// Logical keyboard key.
///
/// Layout-independent: values describe the physical key position (scancode
/// semantics), not the character it produces.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum Key {
    Unknown = 0,

    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    AltLeft,
    AltRight,
    WinLeft,
    WinRight,
    Menu,

    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    F13,
    F14,
    F15,
    F16,
    F17,
    F18,
    F19,
    F20,
    F21,
    F22,
    F23,
    F24,

    Up,
    Down,
    Left,
    Right,

    Enter,
    Escape,
    Space,
    Tab,
    BackSpace,
    Insert,
    Delete,
    PageUp,
    PageDown,
    Home,
    End,
    CapsLock,
    ScrollLock,
    PrintScreen,
    Pause,
    NumLock,
    Clear,
    Sleep,

    Keypad0,
    Keypad1,
    Keypad2,
    Keypad3,
    Keypad4,
    Keypad5,
    Keypad6,
    Keypad7,
    Keypad8,
    Keypad9,
    KeypadDivide,
    KeypadMultiply,
    KeypadSubtract,
    KeypadAdd,
    KeypadDecimal,
    KeypadEnter,
    KeypadEquals,

    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    Number0,
    Number1,
    Number2,
    Number3,
    Number4,
    Number5,
    Number6,
    Number7,
    Number8,
    Number9,

    Tilde,
    Minus,
    Plus,
    BracketLeft,
    BracketRight,
    Semicolon,
    Quote,
    Comma,
    Period,
    Slash,
    BackSlash,
    NonUsBackSlash,

    Mute,
    VolumeUp,
    VolumeDown,
}

bitflags! {
    /// Logical modifier set. Left/right variants collapse into one flag.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ModifierKeys: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2;
        const GUI = 1 << 3;
    }
}

/// Number of logical mouse button slots (including the `Unknown` sentinel slot).
pub const MOUSE_BUTTON_COUNT: usize = 13;

/// Logical mouse button.
///
/// The discriminant is the slot index used by `MouseState` and the snapshot
/// down-set. `Unknown` occupies the last slot so an unmapped native button
/// still has somewhere to land.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MouseButton {
    Left = 0,
    Middle = 1,
    Right = 2,
    X1 = 3,
    X2 = 4,
    Button6 = 5,
    Button7 = 6,
    Button8 = 7,
    Button9 = 8,
    Button10 = 9,
    Button11 = 10,
    Button12 = 11,
    Unknown = 12,
}

impl MouseButton {
    pub const ALL: [MouseButton; MOUSE_BUTTON_COUNT] = [
        MouseButton::Left,
        MouseButton::Middle,
        MouseButton::Right,
        MouseButton::X1,
        MouseButton::X2,
        MouseButton::Button6,
        MouseButton::Button7,
        MouseButton::Button8,
        MouseButton::Button9,
        MouseButton::Button10,
        MouseButton::Button11,
        MouseButton::Button12,
        MouseButton::Unknown,
    ];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(index: usize) -> Option<MouseButton> {
        Self::ALL.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_button_indices_are_dense() {
        for (i, b) in MouseButton::ALL.iter().enumerate() {
            assert_eq!(b.index(), i);
            assert_eq!(MouseButton::from_index(i), Some(*b));
        }
        assert_eq!(MouseButton::from_index(MOUSE_BUTTON_COUNT), None);
    }

    #[test]
    fn modifier_flags_combine() {
        let m = ModifierKeys::SHIFT | ModifierKeys::CONTROL;
        assert!(m.contains(ModifierKeys::SHIFT));
        assert!(!m.contains(ModifierKeys::ALT));
    }
}
