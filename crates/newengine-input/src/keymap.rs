//! Native code translation.
//!
//! Native scancodes follow the USB HID usage table (the numbering SDL uses),
//! native mouse buttons are 1-based, native modifiers are the SDL keymod bits.
//! Everything here is total: unmapped input becomes a sentinel.

use crate::keys::{Key, ModifierKeys, MouseButton};

/// Native keymod bits.
pub mod native_mod {
    pub const LSHIFT: u16 = 0x0001;
    pub const RSHIFT: u16 = 0x0002;
    pub const LCTRL: u16 = 0x0040;
    pub const RCTRL: u16 = 0x0080;
    pub const LALT: u16 = 0x0100;
    pub const RALT: u16 = 0x0200;
    pub const LGUI: u16 = 0x0400;
    pub const RGUI: u16 = 0x0800;
    pub const NUM: u16 = 0x1000;
    pub const CAPS: u16 = 0x2000;
    pub const MODE: u16 = 0x4000;
}

/// Native 1-based mouse button numbers.
pub mod native_button {
    pub const LEFT: u8 = 1;
    pub const MIDDLE: u8 = 2;
    pub const RIGHT: u8 = 3;
    pub const X1: u8 = 4;
    pub const X2: u8 = 5;
}

pub fn map_scancode(scancode: u32) -> Key {
    let key = match scancode {
        4..=29 => LETTERS[(scancode - 4) as usize],
        30..=38 => DIGITS[(scancode - 30 + 1) as usize],
        39 => Key::Number0,
        40 => Key::Enter,
        41 => Key::Escape,
        42 => Key::BackSpace,
        43 => Key::Tab,
        44 => Key::Space,
        45 => Key::Minus,
        46 => Key::Plus,
        47 => Key::BracketLeft,
        48 => Key::BracketRight,
        49 => Key::BackSlash,
        // Non-US '#' sits where backslash is on ANSI boards.
        50 => Key::BackSlash,
        51 => Key::Semicolon,
        52 => Key::Quote,
        53 => Key::Tilde,
        54 => Key::Comma,
        55 => Key::Period,
        56 => Key::Slash,
        57 => Key::CapsLock,
        58..=69 => FUNCTION[(scancode - 58) as usize],
        70 => Key::PrintScreen,
        71 => Key::ScrollLock,
        72 => Key::Pause,
        73 => Key::Insert,
        74 => Key::Home,
        75 => Key::PageUp,
        76 => Key::Delete,
        77 => Key::End,
        78 => Key::PageDown,
        79 => Key::Right,
        80 => Key::Left,
        81 => Key::Down,
        82 => Key::Up,
        83 => Key::NumLock,
        84 => Key::KeypadDivide,
        85 => Key::KeypadMultiply,
        86 => Key::KeypadSubtract,
        87 => Key::KeypadAdd,
        88 => Key::KeypadEnter,
        89..=97 => KEYPAD[(scancode - 89 + 1) as usize],
        98 => Key::Keypad0,
        99 => Key::KeypadDecimal,
        100 => Key::NonUsBackSlash,
        101 => Key::Menu,
        103 => Key::KeypadEquals,
        104..=115 => FUNCTION[(scancode - 104 + 12) as usize],
        118 => Key::Menu,
        127 => Key::Mute,
        128 => Key::VolumeUp,
        129 => Key::VolumeDown,
        133 => Key::KeypadDecimal,
        156 => Key::Clear,
        224 => Key::ControlLeft,
        225 => Key::ShiftLeft,
        226 => Key::AltLeft,
        227 => Key::WinLeft,
        228 => Key::ControlRight,
        229 => Key::ShiftRight,
        230 => Key::AltRight,
        231 => Key::WinRight,
        282 => Key::Sleep,
        _ => Key::Unknown,
    };

    if key == Key::Unknown {
        log::trace!("input: unmapped native scancode {}", scancode);
    }
    key
}

pub fn map_mouse_button(native: u8) -> MouseButton {
    match native {
        1..=12 => MouseButton::from_index((native - 1) as usize).unwrap_or(MouseButton::Unknown),
        _ => {
            log::trace!("input: unmapped native mouse button {}", native);
            MouseButton::Unknown
        }
    }
}

pub fn map_modifiers(native: u16) -> ModifierKeys {
    let mut m = ModifierKeys::empty();
    if native & (native_mod::LSHIFT | native_mod::RSHIFT) != 0 {
        m |= ModifierKeys::SHIFT;
    }
    if native & (native_mod::LCTRL | native_mod::RCTRL) != 0 {
        m |= ModifierKeys::CONTROL;
    }
    if native & (native_mod::LALT | native_mod::RALT) != 0 {
        m |= ModifierKeys::ALT;
    }
    if native & (native_mod::LGUI | native_mod::RGUI) != 0 {
        m |= ModifierKeys::GUI;
    }
    m
}

const LETTERS: [Key; 26] = [
    Key::A,
    Key::B,
    Key::C,
    Key::D,
    Key::E,
    Key::F,
    Key::G,
    Key::H,
    Key::I,
    Key::J,
    Key::K,
    Key::L,
    Key::M,
    Key::N,
    Key::O,
    Key::P,
    Key::Q,
    Key::R,
    Key::S,
    Key::T,
    Key::U,
    Key::V,
    Key::W,
    Key::X,
    Key::Y,
    Key::Z,
];

const DIGITS: [Key; 10] = [
    Key::Number0,
    Key::Number1,
    Key::Number2,
    Key::Number3,
    Key::Number4,
    Key::Number5,
    Key::Number6,
    Key::Number7,
    Key::Number8,
    Key::Number9,
];

const KEYPAD: [Key; 10] = [
    Key::Keypad0,
    Key::Keypad1,
    Key::Keypad2,
    Key::Keypad3,
    Key::Keypad4,
    Key::Keypad5,
    Key::Keypad6,
    Key::Keypad7,
    Key::Keypad8,
    Key::Keypad9,
];

const FUNCTION: [Key; 24] = [
    Key::F1,
    Key::F2,
    Key::F3,
    Key::F4,
    Key::F5,
    Key::F6,
    Key::F7,
    Key::F8,
    Key::F9,
    Key::F10,
    Key::F11,
    Key::F12,
    Key::F13,
    Key::F14,
    Key::F15,
    Key::F16,
    Key::F17,
    Key::F18,
    Key::F19,
    Key::F20,
    Key::F21,
    Key::F22,
    Key::F23,
    Key::F24,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_digits_and_function_keys() {
        assert_eq!(map_scancode(4), Key::A);
        assert_eq!(map_scancode(29), Key::Z);
        assert_eq!(map_scancode(30), Key::Number1);
        assert_eq!(map_scancode(38), Key::Number9);
        assert_eq!(map_scancode(39), Key::Number0);
        assert_eq!(map_scancode(58), Key::F1);
        assert_eq!(map_scancode(69), Key::F12);
        assert_eq!(map_scancode(104), Key::F13);
        assert_eq!(map_scancode(115), Key::F24);
    }

    #[test]
    fn keypad_and_navigation() {
        assert_eq!(map_scancode(89), Key::Keypad1);
        assert_eq!(map_scancode(97), Key::Keypad9);
        assert_eq!(map_scancode(98), Key::Keypad0);
        assert_eq!(map_scancode(82), Key::Up);
        assert_eq!(map_scancode(41), Key::Escape);
        assert_eq!(map_scancode(225), Key::ShiftLeft);
        assert_eq!(map_scancode(231), Key::WinRight);
    }

    #[test]
    fn unknown_scancodes_map_to_sentinel() {
        assert_eq!(map_scancode(0), Key::Unknown);
        assert_eq!(map_scancode(3), Key::Unknown);
        assert_eq!(map_scancode(0xFFFF_FFFF), Key::Unknown);
    }

    #[test]
    fn mouse_buttons() {
        assert_eq!(map_mouse_button(native_button::LEFT), MouseButton::Left);
        assert_eq!(map_mouse_button(native_button::MIDDLE), MouseButton::Middle);
        assert_eq!(map_mouse_button(native_button::RIGHT), MouseButton::Right);
        assert_eq!(map_mouse_button(native_button::X1), MouseButton::X1);
        assert_eq!(map_mouse_button(native_button::X2), MouseButton::X2);
        assert_eq!(map_mouse_button(12), MouseButton::Button12);
        assert_eq!(map_mouse_button(0), MouseButton::Unknown);
        assert_eq!(map_mouse_button(13), MouseButton::Unknown);
        assert_eq!(map_mouse_button(255), MouseButton::Unknown);
    }

    #[test]
    fn modifiers_collapse_sides() {
        assert_eq!(map_modifiers(0), ModifierKeys::empty());
        assert_eq!(map_modifiers(native_mod::RSHIFT), ModifierKeys::SHIFT);
        assert_eq!(
            map_modifiers(native_mod::LCTRL | native_mod::RALT | native_mod::LGUI),
            ModifierKeys::CONTROL | ModifierKeys::ALT | ModifierKeys::GUI
        );
        // Lock states are not modifiers.
        let locks = native_mod::NUM | native_mod::CAPS | native_mod::MODE;
        assert_eq!(map_modifiers(locks), ModifierKeys::empty());
    }
}
