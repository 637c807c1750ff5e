use bitflags::bitflags;
use glam::IVec2;

use crate::error::WindowResult;

/// Identifier the native layer assigns to a window. Used for event routing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeWindowId(pub u32);

/// Opaque handle of a window created outside this crate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct NativeHandle(pub u64);

bitflags! {
    /// Native window flags (SDL bit layout).
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
    pub struct WindowFlags: u32 {
        const FULLSCREEN = 0x0000_0001;
        const OPENGL = 0x0000_0002;
        const SHOWN = 0x0000_0004;
        const HIDDEN = 0x0000_0008;
        const BORDERLESS = 0x0000_0010;
        const RESIZABLE = 0x0000_0020;
        const MINIMIZED = 0x0000_0040;
        const MAXIMIZED = 0x0000_0080;
        const INPUT_GRABBED = 0x0000_0100;
        const INPUT_FOCUS = 0x0000_0200;
        const MOUSE_FOCUS = 0x0000_0400;
        const FOREIGN = 0x0000_0800;
        const FULLSCREEN_DESKTOP = 0x0000_1000 | 0x0000_0001;
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FullscreenMode {
    Windowed,
    Fullscreen,
    /// Borderless window covering the desktop at desktop resolution.
    Desktop,
}

/// Parameters for native window creation.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowDesc {
    pub title: String,
    pub position: IVec2,
    pub size: IVec2,
    pub flags: WindowFlags,
}

/// Window event sub-kind (SDL window event ids).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WindowEventKind {
    Shown,
    Hidden,
    Exposed,
    Moved,
    Resized,
    SizeChanged,
    Minimized,
    Maximized,
    Restored,
    Enter,
    Leave,
    FocusGained,
    FocusLost,
    Close,
    TakeFocus,
    HitTest,
    Unknown(u8),
}

impl WindowEventKind {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::Shown,
            2 => Self::Hidden,
            3 => Self::Exposed,
            4 => Self::Moved,
            5 => Self::Resized,
            6 => Self::SizeChanged,
            7 => Self::Minimized,
            8 => Self::Maximized,
            9 => Self::Restored,
            10 => Self::Enter,
            11 => Self::Leave,
            12 => Self::FocusGained,
            13 => Self::FocusLost,
            14 => Self::Close,
            15 => Self::TakeFocus,
            16 => Self::HitTest,
            other => Self::Unknown(other),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DropKind {
    File,
    Text,
    Begin,
    Complete,
}

/// One event drained from the native queue.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeEvent {
    Quit,
    Terminating,
    Window {
        window: NativeWindowId,
        kind: WindowEventKind,
        data1: i32,
        data2: i32,
    },
    Keyboard {
        window: NativeWindowId,
        scancode: u32,
        down: bool,
        repeat: bool,
        modifiers: u16,
    },
    TextEditing {
        window: NativeWindowId,
    },
    /// NUL-terminated UTF-8 in a fixed native buffer.
    TextInput {
        window: NativeWindowId,
        text: [u8; newengine_input::TEXT_INPUT_SIZE],
    },
    MouseMotion {
        window: NativeWindowId,
        x: i32,
        y: i32,
        xrel: i32,
        yrel: i32,
    },
    MouseButton {
        window: NativeWindowId,
        button: u8,
        down: bool,
    },
    MouseWheel {
        window: NativeWindowId,
        x: f32,
        y: f32,
    },
    /// `file` is the native-owned string; it is released when the event is dropped.
    Drop {
        window: NativeWindowId,
        kind: DropKind,
        file: Option<Vec<u8>>,
    },
    Other {
        window: Option<NativeWindowId>,
        code: u32,
    },
}

impl NativeEvent {
    /// Target window, or `None` for application-wide events.
    pub fn window_id(&self) -> Option<NativeWindowId> {
        match self {
            NativeEvent::Quit | NativeEvent::Terminating => None,
            NativeEvent::Window { window, .. }
            | NativeEvent::Keyboard { window, .. }
            | NativeEvent::TextEditing { window }
            | NativeEvent::TextInput { window, .. }
            | NativeEvent::MouseMotion { window, .. }
            | NativeEvent::MouseButton { window, .. }
            | NativeEvent::MouseWheel { window, .. }
            | NativeEvent::Drop { window, .. } => Some(*window),
            NativeEvent::Other { window, .. } => *window,
        }
    }

    /// Build a text-input event, truncating `text` to fit the native buffer.
    pub fn text_input(window: NativeWindowId, text: &str) -> Self {
        let mut buf = [0u8; newengine_input::TEXT_INPUT_SIZE];
        let mut len = text.len().min(buf.len() - 1);
        while !text.is_char_boundary(len) {
            len -= 1;
        }
        buf[..len].copy_from_slice(&text.as_bytes()[..len]);
        NativeEvent::TextInput { window, text: buf }
    }
}

/// The native windowing substrate.
///
/// Thin delegations only; all pump logic lives above this trait. Implementations
/// must be callable from any thread because a threaded window creates and
/// polls on its own thread while the consumer reads properties from another.
pub trait NativeSystem: Send + Sync {
    fn create_window(&self, desc: &WindowDesc) -> WindowResult<NativeWindowId>;

    /// Wrap a window created elsewhere.
    fn adopt_window(&self, handle: NativeHandle) -> WindowResult<NativeWindowId>;

    fn destroy_window(&self, id: NativeWindowId);

    /// Refresh the native queue and move every pending event into `out`.
    fn poll_events(&self, out: &mut Vec<NativeEvent>);

    fn window_position(&self, id: NativeWindowId) -> IVec2;
    fn set_window_position(&self, id: NativeWindowId, position: IVec2);

    fn window_size(&self, id: NativeWindowId) -> IVec2;
    fn set_window_size(&self, id: NativeWindowId, size: IVec2);

    fn set_window_title(&self, id: NativeWindowId, title: &str);

    fn window_flags(&self, id: NativeWindowId) -> WindowFlags;

    fn show_window(&self, id: NativeWindowId);
    fn hide_window(&self, id: NativeWindowId);
    fn maximize_window(&self, id: NativeWindowId);
    fn minimize_window(&self, id: NativeWindowId);
    fn set_fullscreen(&self, id: NativeWindowId, mode: FullscreenMode);
    fn set_resizable(&self, id: NativeWindowId, resizable: bool);
    fn set_bordered(&self, id: NativeWindowId, bordered: bool);

    fn window_opacity(&self, id: NativeWindowId) -> WindowResult<f32>;
    fn set_window_opacity(&self, id: NativeWindowId, opacity: f32);

    fn cursor_visible(&self) -> bool;
    fn set_cursor_visible(&self, visible: bool);

    fn warp_mouse(&self, id: NativeWindowId, position: IVec2);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_event_kind_decoding() {
        assert_eq!(WindowEventKind::from_raw(4), WindowEventKind::Moved);
        assert_eq!(WindowEventKind::from_raw(14), WindowEventKind::Close);
        assert_eq!(WindowEventKind::from_raw(0), WindowEventKind::Unknown(0));
        assert_eq!(WindowEventKind::from_raw(200), WindowEventKind::Unknown(200));
    }

    #[test]
    fn text_input_truncates_on_char_boundary() {
        let long = "é".repeat(40);
        let ev = NativeEvent::text_input(NativeWindowId(1), &long);
        let NativeEvent::TextInput { text, .. } = ev else {
            panic!("expected text input");
        };
        // 31 usable bytes -> 15 two-byte chars, then NUL padding.
        assert_eq!(&text[..30], "é".repeat(15).as_bytes());
        assert_eq!(text[30], 0);
        assert_eq!(text[31], 0);
    }

    #[test]
    fn app_wide_events_have_no_window() {
        assert_eq!(NativeEvent::Quit.window_id(), None);
        assert_eq!(
            NativeEvent::MouseWheel { window: NativeWindowId(3), x: 0.0, y: 1.0 }.window_id(),
            Some(NativeWindowId(3))
        );
    }
}
