use std::collections::{HashMap, VecDeque};

use glam::IVec2;
use parking_lot::Mutex;

use crate::error::{WindowError, WindowResult};
use crate::native::{
    DropKind, FullscreenMode, NativeEvent, NativeHandle, NativeSystem, NativeWindowId, WindowDesc,
    WindowEventKind, WindowFlags,
};

#[derive(Debug, Clone)]
struct HeadlessWindow {
    title: String,
    position: IVec2,
    size: IVec2,
    flags: WindowFlags,
    opacity: f32,
}

#[derive(Debug)]
struct Inner {
    next_id: u32,
    windows: HashMap<NativeWindowId, HeadlessWindow>,
    queue: VecDeque<NativeEvent>,
    fail_next_create: Option<String>,
    opacity_supported: bool,
    cursor_visible: bool,
    mouse: IVec2,
}

/// In-memory native system.
///
/// Behaves like the SDL backend as far as the pump can observe: state changes
/// made through the trait enqueue the window events SDL would report, and
/// everything else arrives through `push_event` from any thread.
#[derive(Debug)]
pub struct HeadlessSystem {
    inner: Mutex<Inner>,
}

impl Default for HeadlessSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessSystem {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 1,
                windows: HashMap::new(),
                queue: VecDeque::new(),
                fail_next_create: None,
                opacity_supported: true,
                cursor_visible: true,
                mouse: IVec2::ZERO,
            }),
        }
    }

    pub fn push_event(&self, event: NativeEvent) {
        self.inner.lock().queue.push_back(event);
    }

    /// Enqueue a motion event; the relative motion is derived from the last
    /// pushed or warped position.
    pub fn push_mouse_motion(&self, window: NativeWindowId, position: IVec2) {
        let mut g = self.inner.lock();
        let rel = position - g.mouse;
        g.mouse = position;
        g.queue.push_back(NativeEvent::MouseMotion {
            window,
            x: position.x,
            y: position.y,
            xrel: rel.x,
            yrel: rel.y,
        });
    }

    pub fn push_key(&self, window: NativeWindowId, scancode: u32, down: bool, modifiers: u16) {
        self.push_event(NativeEvent::Keyboard {
            window,
            scancode,
            down,
            repeat: false,
            modifiers,
        });
    }

    pub fn push_mouse_button(&self, window: NativeWindowId, button: u8, down: bool) {
        self.push_event(NativeEvent::MouseButton { window, button, down });
    }

    pub fn push_wheel(&self, window: NativeWindowId, delta_y: f32) {
        self.push_event(NativeEvent::MouseWheel {
            window,
            x: 0.0,
            y: delta_y,
        });
    }

    pub fn push_text(&self, window: NativeWindowId, text: &str) {
        self.push_event(NativeEvent::text_input(window, text));
    }

    pub fn push_window_event(&self, window: NativeWindowId, kind: WindowEventKind) {
        self.push_event(NativeEvent::Window {
            window,
            kind,
            data1: 0,
            data2: 0,
        });
    }

    /// Enqueue a file drop; the path is stored NUL-terminated like a native string.
    pub fn push_drop_file(&self, window: NativeWindowId, path: &str) {
        let mut file = path.as_bytes().to_vec();
        file.push(0);
        self.push_event(NativeEvent::Drop {
            window,
            kind: DropKind::File,
            file: Some(file),
        });
    }

    /// Make the next `create_window` / `adopt_window` fail with `reason`.
    pub fn fail_next_create(&self, reason: impl Into<String>) {
        self.inner.lock().fail_next_create = Some(reason.into());
    }

    pub fn set_opacity_supported(&self, supported: bool) {
        self.inner.lock().opacity_supported = supported;
    }

    /// Create a window outside any `Window`, as a host toolkit would, and
    /// return the handle to adopt it with.
    pub fn create_foreign(&self, desc: &WindowDesc) -> NativeHandle {
        let mut g = self.inner.lock();
        let id = Self::insert(&mut g, desc, WindowFlags::FOREIGN);
        NativeHandle(u64::from(id.0))
    }

    pub fn window_title(&self, id: NativeWindowId) -> Option<String> {
        self.inner.lock().windows.get(&id).map(|w| w.title.clone())
    }

    #[inline]
    pub fn window_count(&self) -> usize {
        self.inner.lock().windows.len()
    }

    #[inline]
    pub fn is_alive(&self, id: NativeWindowId) -> bool {
        self.inner.lock().windows.contains_key(&id)
    }

    #[inline]
    pub fn pending_events(&self) -> usize {
        self.inner.lock().queue.len()
    }

    fn insert(g: &mut Inner, desc: &WindowDesc, extra: WindowFlags) -> NativeWindowId {
        let id = NativeWindowId(g.next_id);
        g.next_id += 1;

        let mut flags = desc.flags | extra;
        if flags.contains(WindowFlags::SHOWN) {
            flags.remove(WindowFlags::HIDDEN);
        } else {
            flags.insert(WindowFlags::HIDDEN);
        }

        g.windows.insert(
            id,
            HeadlessWindow {
                title: desc.title.clone(),
                position: desc.position,
                size: desc.size.max(IVec2::ONE),
                flags,
                opacity: 1.0,
            },
        );
        if flags.contains(WindowFlags::SHOWN) {
            Self::enqueue(&mut g.queue, id, WindowEventKind::Shown, 0, 0);
        }
        id
    }

    #[inline]
    fn enqueue(
        queue: &mut VecDeque<NativeEvent>,
        window: NativeWindowId,
        kind: WindowEventKind,
        data1: i32,
        data2: i32,
    ) {
        queue.push_back(NativeEvent::Window {
            window,
            kind,
            data1,
            data2,
        });
    }

    fn with_window(
        &self,
        id: NativeWindowId,
        f: impl FnOnce(&mut VecDeque<NativeEvent>, &mut HeadlessWindow),
    ) {
        let mut g = self.inner.lock();
        let Inner { windows, queue, .. } = &mut *g;
        match windows.get_mut(&id) {
            Some(w) => f(queue, w),
            None => log::trace!("headless: call on missing window id={}", id.0),
        }
    }

    fn read<T>(&self, id: NativeWindowId, default: T, f: impl FnOnce(&HeadlessWindow) -> T) -> T {
        self.inner.lock().windows.get(&id).map(f).unwrap_or(default)
    }
}

impl NativeSystem for HeadlessSystem {
    fn create_window(&self, desc: &WindowDesc) -> WindowResult<NativeWindowId> {
        let mut g = self.inner.lock();
        if let Some(reason) = g.fail_next_create.take() {
            return Err(WindowError::Native(reason));
        }
        Ok(Self::insert(&mut g, desc, WindowFlags::empty()))
    }

    fn adopt_window(&self, handle: NativeHandle) -> WindowResult<NativeWindowId> {
        let mut g = self.inner.lock();
        if let Some(reason) = g.fail_next_create.take() {
            return Err(WindowError::Native(reason));
        }
        let id = u32::try_from(handle.0)
            .map(NativeWindowId)
            .map_err(|_| WindowError::Native(format!("invalid handle {:#x}", handle.0)))?;
        if g.windows.contains_key(&id) {
            Ok(id)
        } else {
            Err(WindowError::Native(format!("no window for handle {:#x}", handle.0)))
        }
    }

    fn destroy_window(&self, id: NativeWindowId) {
        let mut g = self.inner.lock();
        g.windows.remove(&id);
        g.queue.retain(|e| e.window_id() != Some(id));
    }

    fn poll_events(&self, out: &mut Vec<NativeEvent>) {
        out.extend(self.inner.lock().queue.drain(..));
    }

    fn window_position(&self, id: NativeWindowId) -> IVec2 {
        self.read(id, IVec2::ZERO, |w| w.position)
    }

    fn set_window_position(&self, id: NativeWindowId, position: IVec2) {
        self.with_window(id, |q, w| {
            if w.position != position {
                w.position = position;
                Self::enqueue(q, id, WindowEventKind::Moved, position.x, position.y);
            }
        });
    }

    fn window_size(&self, id: NativeWindowId) -> IVec2 {
        self.read(id, IVec2::ZERO, |w| w.size)
    }

    fn set_window_size(&self, id: NativeWindowId, size: IVec2) {
        let size = size.max(IVec2::ONE);
        self.with_window(id, |q, w| {
            if w.size != size {
                w.size = size;
                Self::enqueue(q, id, WindowEventKind::SizeChanged, size.x, size.y);
            }
        });
    }

    fn set_window_title(&self, id: NativeWindowId, title: &str) {
        self.with_window(id, |_, w| w.title = title.to_owned());
    }

    fn window_flags(&self, id: NativeWindowId) -> WindowFlags {
        self.read(id, WindowFlags::empty(), |w| w.flags)
    }

    fn show_window(&self, id: NativeWindowId) {
        self.with_window(id, |q, w| {
            if !w.flags.contains(WindowFlags::SHOWN) {
                w.flags.remove(WindowFlags::HIDDEN);
                w.flags.insert(WindowFlags::SHOWN);
                Self::enqueue(q, id, WindowEventKind::Shown, 0, 0);
            }
        });
    }

    fn hide_window(&self, id: NativeWindowId) {
        self.with_window(id, |q, w| {
            if !w.flags.contains(WindowFlags::HIDDEN) {
                w.flags.remove(WindowFlags::SHOWN);
                w.flags.insert(WindowFlags::HIDDEN);
                Self::enqueue(q, id, WindowEventKind::Hidden, 0, 0);
            }
        });
    }

    fn maximize_window(&self, id: NativeWindowId) {
        self.with_window(id, |q, w| {
            w.flags.remove(WindowFlags::MINIMIZED);
            w.flags.insert(WindowFlags::MAXIMIZED);
            Self::enqueue(q, id, WindowEventKind::Maximized, 0, 0);
        });
    }

    fn minimize_window(&self, id: NativeWindowId) {
        self.with_window(id, |q, w| {
            w.flags.remove(WindowFlags::MAXIMIZED);
            w.flags.insert(WindowFlags::MINIMIZED);
            Self::enqueue(q, id, WindowEventKind::Minimized, 0, 0);
        });
    }

    fn set_fullscreen(&self, id: NativeWindowId, mode: FullscreenMode) {
        self.with_window(id, |_, w| {
            w.flags.remove(WindowFlags::FULLSCREEN_DESKTOP);
            match mode {
                FullscreenMode::Windowed => {}
                FullscreenMode::Fullscreen => w.flags.insert(WindowFlags::FULLSCREEN),
                FullscreenMode::Desktop => w.flags.insert(WindowFlags::FULLSCREEN_DESKTOP),
            }
        });
    }

    fn set_resizable(&self, id: NativeWindowId, resizable: bool) {
        self.with_window(id, |_, w| w.flags.set(WindowFlags::RESIZABLE, resizable));
    }

    fn set_bordered(&self, id: NativeWindowId, bordered: bool) {
        self.with_window(id, |_, w| w.flags.set(WindowFlags::BORDERLESS, !bordered));
    }

    fn window_opacity(&self, id: NativeWindowId) -> WindowResult<f32> {
        let g = self.inner.lock();
        if !g.opacity_supported {
            return Err(WindowError::Native("opacity not supported".into()));
        }
        g.windows
            .get(&id)
            .map(|w| w.opacity)
            .ok_or_else(|| WindowError::Native(format!("invalid window id={}", id.0)))
    }

    fn set_window_opacity(&self, id: NativeWindowId, opacity: f32) {
        self.with_window(id, |_, w| w.opacity = opacity.clamp(0.0, 1.0));
    }

    fn cursor_visible(&self) -> bool {
        self.inner.lock().cursor_visible
    }

    fn set_cursor_visible(&self, visible: bool) {
        self.inner.lock().cursor_visible = visible;
    }

    fn warp_mouse(&self, id: NativeWindowId, position: IVec2) {
        if !self.is_alive(id) {
            return;
        }
        self.push_mouse_motion(id, position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(flags: WindowFlags) -> WindowDesc {
        WindowDesc {
            title: "headless".into(),
            position: IVec2::new(10, 20),
            size: IVec2::new(640, 480),
            flags,
        }
    }

    fn drain(sys: &HeadlessSystem) -> Vec<NativeEvent> {
        let mut out = Vec::new();
        sys.poll_events(&mut out);
        out
    }

    #[test]
    fn shown_window_reports_shown_event() {
        let sys = HeadlessSystem::new();
        let id = sys.create_window(&desc(WindowFlags::SHOWN)).expect("create");
        assert!(sys.window_flags(id).contains(WindowFlags::SHOWN));
        assert_eq!(
            drain(&sys),
            vec![NativeEvent::Window {
                window: id,
                kind: WindowEventKind::Shown,
                data1: 0,
                data2: 0
            }]
        );
    }

    #[test]
    fn hidden_by_default_and_create_failure() {
        let sys = HeadlessSystem::new();
        let id = sys.create_window(&desc(WindowFlags::empty())).expect("create");
        assert!(sys.window_flags(id).contains(WindowFlags::HIDDEN));
        assert!(drain(&sys).is_empty());

        sys.fail_next_create("no display");
        let err = sys.create_window(&desc(WindowFlags::empty())).unwrap_err();
        assert!(matches!(err, WindowError::Native(ref m) if m == "no display"));
        assert!(sys.create_window(&desc(WindowFlags::empty())).is_ok());
    }

    #[test]
    fn warp_generates_relative_motion() {
        let sys = HeadlessSystem::new();
        let id = sys.create_window(&desc(WindowFlags::empty())).expect("create");
        sys.push_mouse_motion(id, IVec2::new(5, 5));
        sys.warp_mouse(id, IVec2::new(8, 1));

        let ev = drain(&sys);
        assert_eq!(
            ev[1],
            NativeEvent::MouseMotion {
                window: id,
                x: 8,
                y: 1,
                xrel: 3,
                yrel: -4
            }
        );
    }

    #[test]
    fn destroy_purges_window_and_its_events() {
        let sys = HeadlessSystem::new();
        let a = sys.create_window(&desc(WindowFlags::empty())).expect("create");
        let b = sys.create_window(&desc(WindowFlags::empty())).expect("create");
        sys.push_wheel(a, 1.0);
        sys.push_wheel(b, 1.0);

        sys.destroy_window(a);
        assert!(!sys.is_alive(a));
        assert_eq!(sys.window_count(), 1);
        assert_eq!(drain(&sys).len(), 1);
        assert!(sys.window_opacity(a).is_err());
    }

    #[test]
    fn adopt_foreign_window() {
        let sys = HeadlessSystem::new();
        let handle = sys.create_foreign(&desc(WindowFlags::SHOWN));
        let id = sys.adopt_window(handle).expect("adopt");
        assert!(sys.window_flags(id).contains(WindowFlags::FOREIGN));
        assert!(sys.adopt_window(NativeHandle(999)).is_err());
    }
}
