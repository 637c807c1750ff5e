use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::bounded;
use glam::{IVec2, Vec2};

use newengine_input::InputSnapshot;

use crate::config::{interval_from_ms, WindowConfig};
use crate::error::{WindowError, WindowResult};
use crate::events::WindowEvents;
use crate::native::{
    FullscreenMode, NativeEvent, NativeHandle, NativeSystem, NativeWindowId, WindowFlags,
};
use crate::pump::EventPump;
use crate::state::{CloseHandle, PollRate, WindowShared};
use crate::system::WindowSystem;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WindowState {
    Normal,
    FullScreen,
    Maximized,
    Minimized,
    BorderlessFullScreen,
    Hidden,
}

impl WindowState {
    /// Classify native flags. Borderless fullscreen wins over everything, then
    /// minimized, fullscreen, maximized, hidden.
    pub fn from_flags(flags: WindowFlags) -> Self {
        let borderless_fs = WindowFlags::BORDERLESS | WindowFlags::FULLSCREEN;
        if flags.contains(WindowFlags::FULLSCREEN_DESKTOP) || flags.contains(borderless_fs) {
            WindowState::BorderlessFullScreen
        } else if flags.contains(WindowFlags::MINIMIZED) {
            WindowState::Minimized
        } else if flags.contains(WindowFlags::FULLSCREEN) {
            WindowState::FullScreen
        } else if flags.contains(WindowFlags::MAXIMIZED) {
            WindowState::Maximized
        } else if flags.contains(WindowFlags::HIDDEN) {
            WindowState::Hidden
        } else {
            WindowState::Normal
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    #[inline]
    pub fn new(position: IVec2, size: IVec2) -> Self {
        Self {
            x: position.x,
            y: position.y,
            width: size.x,
            height: size.y,
        }
    }

    #[inline]
    pub fn position(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> IVec2 {
        IVec2::new(self.width, self.height)
    }
}

enum Mode {
    Inline(EventPump),
    Threaded(Option<JoinHandle<()>>),
}

/// A native window plus its input pipeline.
///
/// Inline windows pump on the caller's thread inside `pump_events`. Threaded
/// windows pump on their own thread and `pump_events` only publishes what has
/// accumulated since the last call.
pub struct Window {
    system: WindowSystem,
    shared: Arc<WindowShared>,
    mode: Mode,
    snapshot: InputSnapshot,
}

impl Window {
    pub fn create(system: WindowSystem, config: &WindowConfig) -> WindowResult<Self> {
        let desc = config.to_desc();
        let shared = WindowShared::new(config.threaded, desc.title.clone(), config.poll_rate());

        if config.threaded {
            Self::spawn(system, shared, move |system, shared| {
                EventPump::create(system, shared, &desc)
            })
        } else {
            let pump = EventPump::create(system.clone(), shared.clone(), &desc)?;
            Ok(Self::new(system, shared, Mode::Inline(pump)))
        }
    }

    /// Wrap a native window created elsewhere.
    pub fn adopt(system: WindowSystem, handle: NativeHandle, threaded: bool) -> WindowResult<Self> {
        let poll = PollRate {
            limit: false,
            interval: Duration::ZERO,
        };
        let shared = WindowShared::new(threaded, String::new(), poll);

        let window = if threaded {
            Self::spawn(system, shared, move |system, shared| {
                EventPump::adopt(system, shared, handle)
            })?
        } else {
            let pump = EventPump::adopt(system.clone(), shared.clone(), handle)?;
            Self::new(system, shared, Mode::Inline(pump))
        };
        Ok(window)
    }

    fn new(system: WindowSystem, shared: Arc<WindowShared>, mode: Mode) -> Self {
        Self {
            system,
            shared,
            mode,
            snapshot: InputSnapshot::default(),
        }
    }

    /// Create the native window on a dedicated thread and block until it exists.
    fn spawn<F>(system: WindowSystem, shared: Arc<WindowShared>, make: F) -> WindowResult<Self>
    where
        F: FnOnce(WindowSystem, Arc<WindowShared>) -> WindowResult<EventPump> + Send + 'static,
    {
        let (tx, rx) = bounded::<WindowResult<()>>(1);
        let thread_system = system.clone();
        let thread_shared = shared.clone();

        let handle = std::thread::Builder::new()
            .name("newengine-window".into())
            .spawn(move || match make(thread_system, thread_shared) {
                Ok(pump) => {
                    let _ = tx.send(Ok(()));
                    pump.run();
                }
                Err(e) => {
                    let _ = tx.send(Err(e));
                }
            })
            .map_err(WindowError::Spawn)?;

        match rx.recv() {
            Ok(Ok(())) => Ok(Self::new(system, shared, Mode::Threaded(Some(handle)))),
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(WindowError::CreationAborted)
            }
        }
    }

    /// Run one input cycle and return the input observed since the previous call.
    ///
    /// The returned snapshot stays unchanged until the next call.
    pub fn pump_events(&mut self) -> &InputSnapshot {
        self.cycle(None)
    }

    /// Like `pump_events`, but each raw native event is handed to `handler`
    /// instead of the built-in dispatch, so the snapshot carries no new input.
    ///
    /// Threaded windows dispatch on their own thread; for them the handler is
    /// never called and this behaves like `pump_events`.
    pub fn pump_events_with<F>(&mut self, mut handler: F) -> &InputSnapshot
    where
        F: FnMut(&NativeEvent),
    {
        let handler: &mut dyn FnMut(&NativeEvent) = &mut handler;
        self.cycle(Some(handler))
    }

    fn cycle(&mut self, handler: Option<&mut dyn FnMut(&NativeEvent)>) -> &InputSnapshot {
        if let Mode::Inline(pump) = &mut self.mode {
            match handler {
                Some(h) => pump.process_events_with(h),
                None => pump.process_events(),
            }
            if self.shared.close_pending() {
                pump.destroy();
            }
        }

        self.shared.exchange.publish(&mut self.snapshot);
        &self.snapshot
    }

    /// Last published snapshot.
    #[inline]
    pub fn snapshot(&self) -> &InputSnapshot {
        &self.snapshot
    }

    /// Close the window. Inline windows are destroyed immediately; threaded
    /// windows are destroyed by their own thread at the next cycle.
    pub fn close(&mut self) {
        self.shared.request_close();
        if let Mode::Inline(pump) = &mut self.mode {
            pump.destroy();
        }
    }

    #[inline]
    pub fn close_handle(&self) -> CloseHandle {
        CloseHandle::new(self.shared.clone())
    }

    #[inline]
    pub fn exists(&self) -> bool {
        self.shared.exists()
    }

    #[inline]
    pub fn is_threaded(&self) -> bool {
        self.shared.threaded
    }

    #[inline]
    pub fn events(&self) -> &WindowEvents {
        &self.shared.events
    }

    /// Relative mouse motion published by the last pump cycle.
    #[inline]
    pub fn mouse_delta(&self) -> Vec2 {
        self.snapshot.mouse_delta()
    }

    #[inline]
    pub fn native_id(&self) -> Option<NativeWindowId> {
        self.shared.native_id()
    }

    /// Native id while the window exists.
    #[inline]
    fn live_id(&self) -> Option<NativeWindowId> {
        if self.shared.exists() {
            self.shared.native_id()
        } else {
            None
        }
    }

    #[inline]
    fn native(&self) -> &dyn NativeSystem {
        self.system.native()
    }

    pub fn position(&self) -> IVec2 {
        self.shared.position.get()
    }

    pub fn set_position(&self, position: IVec2) {
        if let Some(id) = self.live_id() {
            self.native().set_window_position(id, position);
            self.shared.position.set(position);
        }
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.position().x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.position().y
    }

    pub fn set_x(&self, x: i32) {
        self.set_position(IVec2::new(x, self.y()));
    }

    pub fn set_y(&self, y: i32) {
        self.set_position(IVec2::new(self.x(), y));
    }

    pub fn size(&self) -> IVec2 {
        self.shared.size.get()
    }

    pub fn set_size(&self, size: IVec2) {
        if let Some(id) = self.live_id() {
            self.native().set_window_size(id, size);
            self.shared.size.set(self.native().window_size(id));
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.size().x
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.size().y
    }

    pub fn set_width(&self, width: i32) {
        self.set_size(IVec2::new(width, self.height()));
    }

    pub fn set_height(&self, height: i32) {
        self.set_size(IVec2::new(self.width(), height));
    }

    /// Cached position and size.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.position(), self.size())
    }

    pub fn title(&self) -> String {
        self.shared.title.lock().text.clone()
    }

    /// Cached immediately; pushed to the native window by the next pump cycle.
    pub fn set_title(&self, title: impl Into<String>) {
        let mut t = self.shared.title.lock();
        t.text = title.into();
        t.dirty = true;
    }

    fn flags(&self) -> WindowFlags {
        match self.live_id() {
            Some(id) => self.native().window_flags(id),
            None => WindowFlags::empty(),
        }
    }

    pub fn window_state(&self) -> WindowState {
        WindowState::from_flags(self.flags())
    }

    pub fn set_window_state(&self, state: WindowState) {
        let Some(id) = self.live_id() else {
            return;
        };
        let native = self.native();
        match state {
            WindowState::Normal => native.set_fullscreen(id, FullscreenMode::Windowed),
            WindowState::FullScreen => native.set_fullscreen(id, FullscreenMode::Fullscreen),
            WindowState::Maximized => native.maximize_window(id),
            WindowState::Minimized => native.minimize_window(id),
            WindowState::BorderlessFullScreen => native.set_fullscreen(id, FullscreenMode::Desktop),
            WindowState::Hidden => native.hide_window(id),
        }
    }

    pub fn visible(&self) -> bool {
        self.flags().contains(WindowFlags::SHOWN)
    }

    pub fn set_visible(&self, visible: bool) {
        if let Some(id) = self.live_id() {
            if visible {
                self.native().show_window(id);
            } else {
                self.native().hide_window(id);
            }
        }
    }

    pub fn resizable(&self) -> bool {
        self.flags().contains(WindowFlags::RESIZABLE)
    }

    pub fn set_resizable(&self, resizable: bool) {
        if let Some(id) = self.live_id() {
            self.native().set_resizable(id, resizable);
        }
    }

    pub fn border_visible(&self) -> bool {
        !self.flags().contains(WindowFlags::BORDERLESS)
    }

    pub fn set_border_visible(&self, visible: bool) {
        if let Some(id) = self.live_id() {
            self.native().set_bordered(id, visible);
        }
    }

    pub fn focused(&self) -> bool {
        self.flags().contains(WindowFlags::INPUT_FOCUS)
    }

    /// `NaN` when the native layer cannot report opacity.
    pub fn opacity(&self) -> f32 {
        let Some(id) = self.live_id() else {
            return f32::NAN;
        };
        match self.native().window_opacity(id) {
            Ok(o) => o,
            Err(e) => {
                log::debug!("window: opacity query failed: {}", e);
                f32::NAN
            }
        }
    }

    pub fn set_opacity(&self, opacity: f32) {
        if let Some(id) = self.live_id() {
            self.native().set_window_opacity(id, opacity);
        }
    }

    pub fn cursor_visible(&self) -> bool {
        self.native().cursor_visible()
    }

    pub fn set_cursor_visible(&self, visible: bool) {
        self.native().set_cursor_visible(visible);
    }

    /// Warp the cursor to a client-space position. The native layer reports
    /// the jump as ordinary motion.
    pub fn set_mouse_position(&self, position: IVec2) {
        if let Some(id) = self.live_id() {
            self.native().warp_mouse(id, position);
        }
    }

    #[inline]
    pub fn client_to_screen(&self, p: IVec2) -> IVec2 {
        p + self.position()
    }

    #[inline]
    pub fn screen_to_client(&self, p: IVec2) -> IVec2 {
        p - self.position()
    }

    #[inline]
    pub fn scale_factor(&self) -> Vec2 {
        Vec2::ONE
    }

    pub fn limit_poll_rate(&self) -> bool {
        self.shared.poll.lock().limit
    }

    pub fn set_limit_poll_rate(&self, limit: bool) {
        self.shared.poll.lock().limit = limit;
    }

    pub fn poll_interval_ms(&self) -> f32 {
        self.shared.poll.lock().interval.as_secs_f32() * 1000.0
    }

    pub fn set_poll_interval_ms(&self, ms: f32) {
        self.shared.poll.lock().interval = interval_from_ms(ms);
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        match &mut self.mode {
            Mode::Inline(pump) => pump.destroy(),
            Mode::Threaded(handle) => {
                self.shared.request_close();
                if let Some(h) = handle.take() {
                    if h.join().is_err() {
                        log::warn!("window: pump thread panicked");
                    }
                }
            }
        }
    }
}
