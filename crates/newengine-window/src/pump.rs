use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use glam::IVec2;

use newengine_input::keymap::{map_modifiers, map_mouse_button, map_scancode};
use newengine_input::{
    decode_native_string, KeyEvent, MouseEvent, MouseMoveArgs, MouseTracker, MouseWheelArgs,
    TEXT_INPUT_SIZE,
};

use crate::error::WindowResult;
use crate::events::{DragDropEvent, WindowNotification};
use crate::native::{
    DropKind, NativeEvent, NativeHandle, NativeWindowId, WindowDesc, WindowEventKind, WindowFlags,
};
use crate::state::{LifecycleState, WindowShared};
use crate::system::WindowSystem;

/// Drains native events for one window and turns them into input state and
/// notifications.
///
/// Owned by whichever thread drives the window: the consumer in inline mode,
/// the window thread in threaded mode. Nothing here is shared except through
/// `WindowShared`.
pub struct EventPump {
    system: WindowSystem,
    shared: Arc<WindowShared>,
    id: NativeWindowId,
    tracker: MouseTracker,
    scratch: Vec<NativeEvent>,
}

impl EventPump {
    pub(crate) fn create(
        system: WindowSystem,
        shared: Arc<WindowShared>,
        desc: &WindowDesc,
    ) -> WindowResult<Self> {
        let id = system.native().create_window(desc)?;
        log::info!(
            "window: created id={} '{}' {}x{} at ({}, {})",
            id.0,
            desc.title,
            desc.size.x,
            desc.size.y,
            desc.position.x,
            desc.position.y
        );
        let pump = Self::attach(system, shared, id);
        if desc.flags.contains(WindowFlags::SHOWN) {
            pump.system.native().show_window(id);
        }
        pump.shared.lifecycle.store(LifecycleState::Running);
        Ok(pump)
    }

    pub(crate) fn adopt(
        system: WindowSystem,
        shared: Arc<WindowShared>,
        handle: NativeHandle,
    ) -> WindowResult<Self> {
        let id = system.native().adopt_window(handle)?;
        log::info!("window: adopted handle={:#x} as id={}", handle.0, id.0);
        let pump = Self::attach(system, shared, id);
        pump.shared.lifecycle.store(LifecycleState::Running);
        Ok(pump)
    }

    fn attach(system: WindowSystem, shared: Arc<WindowShared>, id: NativeWindowId) -> Self {
        let native = system.native();
        if shared.id.set(id).is_err() {
            log::warn!("window: native id already assigned, keeping the first");
        }
        shared.position.set(native.window_position(id));
        shared.size.set(native.window_size(id));
        system.registry().register(id);

        Self {
            system,
            shared,
            id,
            tracker: MouseTracker::new(),
            scratch: Vec::with_capacity(64),
        }
    }

    #[inline]
    pub fn id(&self) -> NativeWindowId {
        self.id
    }

    #[inline]
    pub fn shared(&self) -> &Arc<WindowShared> {
        &self.shared
    }

    /// One dispatch cycle: flush the pending title, poll, drain, dispatch.
    pub fn process_events(&mut self) {
        self.cycle(None);
    }

    /// Same cycle, but every drained event goes to `handler` instead of the
    /// built-in dispatch. Nothing reaches the accumulator or the notifications,
    /// and close events are left to the handler.
    pub fn process_events_with(&mut self, handler: &mut dyn FnMut(&NativeEvent)) {
        self.cycle(Some(handler));
    }

    fn cycle(&mut self, mut handler: Option<&mut dyn FnMut(&NativeEvent)>) {
        if !self.shared.exists() {
            return;
        }

        self.flush_title();

        let mut events = std::mem::take(&mut self.scratch);
        {
            let registry = self.system.registry();
            registry.process_events(self.system.native());
            registry.drain_into(self.id, &mut events);
        }

        for ev in events.drain(..) {
            if !self.shared.exists() {
                break;
            }
            match handler.as_deref_mut() {
                Some(h) => h(&ev),
                None => self.handle_event(ev),
            }
        }
        events.clear();
        self.scratch = events;
    }

    fn flush_title(&self) {
        let mut title = self.shared.title.lock();
        if !title.dirty {
            return;
        }
        // SDL drops title updates on minimized windows on some platforms.
        let flags = self.system.native().window_flags(self.id);
        if flags.contains(WindowFlags::MINIMIZED) {
            return;
        }
        self.system.native().set_window_title(self.id, &title.text);
        title.dirty = false;
    }

    fn handle_event(&mut self, ev: NativeEvent) {
        match ev {
            NativeEvent::Quit | NativeEvent::Terminating => self.initiate_close(),
            NativeEvent::Window {
                kind, data1, data2, ..
            } => self.handle_window_event(kind, data1, data2),
            NativeEvent::Keyboard {
                scancode,
                down,
                repeat,
                modifiers,
                ..
            } => {
                let event = KeyEvent::new(map_scancode(scancode), down, map_modifiers(modifiers))
                    .with_repeat(repeat);
                self.shared.exchange.write(|acc| acc.record_key_event(event));
                self.shared.events.fire(if down {
                    WindowNotification::KeyDown(event)
                } else {
                    WindowNotification::KeyUp(event)
                });
            }
            NativeEvent::TextInput { text, .. } => {
                self.shared
                    .exchange
                    .write(|acc| acc.record_text(&text, TEXT_INPUT_SIZE));
            }
            NativeEvent::MouseMotion {
                x, y, xrel, yrel, ..
            } => self.handle_mouse_motion(IVec2::new(x, y), IVec2::new(xrel, yrel)),
            NativeEvent::MouseButton { button, down, .. } => {
                let event = MouseEvent::new(map_mouse_button(button), down);
                self.tracker.set_button(event.button, down);
                self.shared.exchange.write(|acc| acc.record_mouse_button(event));
                self.shared.events.fire(if down {
                    WindowNotification::MouseDown(event)
                } else {
                    WindowNotification::MouseUp(event)
                });
            }
            NativeEvent::MouseWheel { y, .. } => {
                self.shared.exchange.write(|acc| acc.record_wheel(y));
                self.shared.events.fire(WindowNotification::MouseWheel(MouseWheelArgs {
                    state: self.tracker.state(),
                    delta: y,
                }));
            }
            NativeEvent::Drop { kind, file, .. } => {
                let path = file.as_deref().map(decode_native_string);
                match (kind, path) {
                    (DropKind::File, Some(path)) => {
                        log::debug!("window: file dropped '{}'", path);
                        self.shared
                            .events
                            .fire(WindowNotification::DragDrop(DragDropEvent::new(path)));
                    }
                    (kind, _) => log::trace!("window: drop {:?} ignored", kind),
                }
            }
            NativeEvent::TextEditing { .. } => {}
            NativeEvent::Other { code, .. } => {
                log::trace!("window: unhandled native event {:#x}", code);
            }
        }
    }

    fn handle_window_event(&mut self, kind: WindowEventKind, data1: i32, data2: i32) {
        let n = match kind {
            WindowEventKind::Resized
            | WindowEventKind::SizeChanged
            | WindowEventKind::Minimized
            | WindowEventKind::Maximized
            | WindowEventKind::Restored => {
                self.shared.size.set(self.system.native().window_size(self.id));
                WindowNotification::Resized
            }
            WindowEventKind::FocusGained => WindowNotification::FocusGained,
            WindowEventKind::FocusLost => WindowNotification::FocusLost,
            WindowEventKind::Shown => WindowNotification::Shown,
            WindowEventKind::Hidden => WindowNotification::Hidden,
            WindowEventKind::Enter => WindowNotification::MouseEntered,
            WindowEventKind::Leave => WindowNotification::MouseLeft,
            WindowEventKind::Exposed => WindowNotification::Exposed,
            WindowEventKind::Moved => {
                let position = IVec2::new(data1, data2);
                self.shared.position.set(position);
                WindowNotification::Moved(position)
            }
            WindowEventKind::Close => {
                self.initiate_close();
                return;
            }
            other => {
                log::debug!("window: unhandled window event {:?}", other);
                return;
            }
        };
        self.shared.events.fire(n);
    }

    /// `delta` is the native relative motion. It still moves while the cursor
    /// is pinned in relative mouse mode.
    fn handle_mouse_motion(&mut self, position: IVec2, delta: IVec2) {
        let had_prior = self.tracker.record_motion(position);
        let position_f = position.as_vec2();

        if !had_prior {
            self.shared
                .exchange
                .write(|acc| acc.record_mouse_position(position_f));
            return;
        }

        self.shared
            .exchange
            .write(|acc| acc.record_mouse_motion(position_f, delta.as_vec2()));
        self.shared.events.fire(WindowNotification::MouseMove(MouseMoveArgs {
            state: self.tracker.state(),
            position: position_f,
        }));
    }

    fn initiate_close(&mut self) {
        self.shared.request_close();
        if !self.shared.threaded {
            self.destroy();
        }
    }

    /// Tear the window down. Runs at most once per window.
    pub fn destroy(&mut self) {
        if !self.shared.exists() || self.shared.destroying.swap(true, Ordering::AcqRel) {
            return;
        }

        self.system.registry().unregister(self.id);
        self.shared.events.fire(WindowNotification::Closing);
        self.system.native().destroy_window(self.id);
        self.shared.lifecycle.store(LifecycleState::Destroyed);
        self.shared.events.fire(WindowNotification::Closed);

        log::info!("window: destroyed id={}", self.id.0);
    }

    /// Background loop of a threaded window. Returns once the window is gone.
    pub(crate) fn run(mut self) {
        log::debug!("window: pump thread started id={}", self.id.0);

        let mut last_cycle = Instant::now();
        while self.shared.exists() {
            if self.shared.close_pending() {
                self.destroy();
                break;
            }

            let poll = *self.shared.poll.lock();
            if poll.limit {
                let elapsed = last_cycle.elapsed();
                if elapsed < poll.interval {
                    std::thread::sleep(poll.interval - elapsed);
                }
            }
            last_cycle = Instant::now();

            self.process_events();

            if !poll.limit {
                std::thread::yield_now();
            }
        }

        log::debug!("window: pump thread exiting id={}", self.id.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessSystem;
    use crate::native::NativeSystem;
    use crate::state::PollRate;
    use newengine_input::{InputSnapshot, Key, MouseButton};
    use parking_lot::Mutex;
    use std::time::Duration;

    fn setup() -> (Arc<HeadlessSystem>, EventPump) {
        let native = Arc::new(HeadlessSystem::new());
        let system = WindowSystem::new(native.clone());
        let shared = WindowShared::new(
            false,
            "pump".into(),
            PollRate {
                limit: false,
                interval: Duration::ZERO,
            },
        );
        let desc = WindowDesc {
            title: "pump".into(),
            position: IVec2::new(0, 0),
            size: IVec2::new(320, 240),
            flags: WindowFlags::empty(),
        };
        let pump = EventPump::create(system, shared, &desc).expect("create");
        (native, pump)
    }

    fn publish(pump: &EventPump) -> InputSnapshot {
        let mut snap = InputSnapshot::default();
        pump.shared().exchange.publish(&mut snap);
        snap
    }

    #[test]
    fn first_motion_is_position_only() {
        let (native, mut pump) = setup();
        let moves = Arc::new(Mutex::new(Vec::new()));
        {
            let moves = moves.clone();
            pump.shared()
                .events
                .mouse_move
                .connect(move |a| moves.lock().push(a.position));
        }

        native.push_mouse_motion(pump.id(), IVec2::new(10, 10));
        pump.process_events();
        let snap = publish(&pump);
        assert_eq!(snap.mouse_delta(), glam::Vec2::ZERO);
        assert_eq!(snap.mouse_position(), glam::Vec2::new(10.0, 10.0));
        assert!(moves.lock().is_empty());

        native.push_mouse_motion(pump.id(), IVec2::new(13, 6));
        pump.process_events();
        assert_eq!(publish(&pump).mouse_delta(), glam::Vec2::new(3.0, -4.0));
        assert_eq!(*moves.lock(), vec![glam::Vec2::new(13.0, 6.0)]);
    }

    fn motion(window: NativeWindowId, at: i32, rel: IVec2) -> NativeEvent {
        NativeEvent::MouseMotion {
            window,
            x: at,
            y: at,
            xrel: rel.x,
            yrel: rel.y,
        }
    }

    #[test]
    fn pinned_cursor_still_accumulates_relative_motion() {
        let (native, mut pump) = setup();

        native.push_event(motion(pump.id(), 50, IVec2::ZERO));
        native.push_event(motion(pump.id(), 50, IVec2::new(7, -3)));
        native.push_event(motion(pump.id(), 50, IVec2::new(1, 1)));
        pump.process_events();

        let snap = publish(&pump);
        assert_eq!(snap.mouse_position(), glam::Vec2::new(50.0, 50.0));
        assert_eq!(snap.mouse_delta(), glam::Vec2::new(8.0, -2.0));
    }

    #[test]
    fn custom_handler_replaces_dispatch() {
        let (native, mut pump) = setup();
        let rx = pump.shared().events.subscribe();

        native.push_key(pump.id(), 4, true, 0);
        native.push_window_event(pump.id(), WindowEventKind::Close);

        let mut seen = Vec::new();
        pump.process_events_with(&mut |ev| seen.push(ev.clone()));

        assert_eq!(seen.len(), 2);
        assert!(matches!(seen[0], NativeEvent::Keyboard { scancode: 4, .. }));
        assert!(pump.shared().exists());
        assert!(rx.try_recv().is_err());
        assert!(publish(&pump).key_events().is_empty());

        native.push_key(pump.id(), 4, true, 0);
        pump.process_events();
        assert_eq!(publish(&pump).key_events()[0].key, Key::A);
    }

    #[test]
    fn running_only_after_shown() {
        let native = Arc::new(HeadlessSystem::new());
        let shared = WindowShared::new(
            false,
            "shown".into(),
            PollRate {
                limit: false,
                interval: Duration::ZERO,
            },
        );
        let desc = WindowDesc {
            title: "shown".into(),
            position: IVec2::ZERO,
            size: IVec2::new(64, 64),
            flags: WindowFlags::SHOWN,
        };
        let pump = EventPump::create(WindowSystem::new(native.clone()), shared, &desc)
            .expect("create");

        assert_eq!(pump.shared().state(), LifecycleState::Running);
        assert!(native.window_flags(pump.id()).contains(WindowFlags::SHOWN));
    }

    #[test]
    fn accumulator_is_updated_before_notification() {
        let (native, mut pump) = setup();
        let seen = Arc::new(Mutex::new(0usize));
        {
            let shared = pump.shared().clone();
            let seen = seen.clone();
            pump.shared().events.key_down.connect(move |_| {
                *seen.lock() = shared.exchange.write(|acc| acc.key_events().len());
            });
        }

        native.push_key(pump.id(), 4, true, 0);
        pump.process_events();

        assert_eq!(*seen.lock(), 1);
        assert_eq!(publish(&pump).key_events()[0].key, Key::A);
    }

    #[test]
    fn button_state_flows_into_wheel_notification() {
        let (native, mut pump) = setup();
        let states = Arc::new(Mutex::new(Vec::new()));
        {
            let states = states.clone();
            pump.shared()
                .events
                .mouse_wheel
                .connect(move |a| {
                    states
                        .lock()
                        .push((a.state.is_button_down(MouseButton::Right), a.delta))
                });
        }

        native.push_mouse_button(pump.id(), 3, true);
        native.push_wheel(pump.id(), 2.0);
        pump.process_events();

        assert_eq!(*states.lock(), vec![(true, 2.0)]);
    }

    #[test]
    fn moved_updates_cache_and_drop_fires_path() {
        let (native, mut pump) = setup();
        let rx = pump.shared().events.subscribe();

        native.push_event(NativeEvent::Window {
            window: pump.id(),
            kind: WindowEventKind::Moved,
            data1: 40,
            data2: 50,
        });
        native.push_drop_file(pump.id(), "/tmp/scene.gltf");
        native.push_event(NativeEvent::Drop {
            window: pump.id(),
            kind: DropKind::Begin,
            file: None,
        });
        pump.process_events();

        assert_eq!(pump.shared().position.get(), IVec2::new(40, 50));
        let got: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            got,
            vec![
                WindowNotification::Moved(IVec2::new(40, 50)),
                WindowNotification::DragDrop(DragDropEvent::new("/tmp/scene.gltf")),
            ]
        );
    }

    #[test]
    fn inline_close_stops_dispatch() {
        let (native, mut pump) = setup();
        let rx = pump.shared().events.subscribe();

        native.push_window_event(pump.id(), WindowEventKind::Close);
        native.push_key(pump.id(), 5, true, 0);
        pump.process_events();

        assert!(!pump.shared().exists());
        assert!(!native.is_alive(pump.id()));
        let got: Vec<_> = rx.try_iter().collect();
        assert_eq!(got, vec![WindowNotification::Closing, WindowNotification::Closed]);

        pump.destroy();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn title_waits_while_minimized() {
        let (native, mut pump) = setup();
        native.minimize_window(pump.id());
        {
            let mut t = pump.shared().title.lock();
            t.text = "renamed".into();
            t.dirty = true;
        }

        pump.process_events();
        assert_eq!(native.window_title(pump.id()).as_deref(), Some("pump"));

        native.maximize_window(pump.id());
        pump.process_events();
        pump.process_events();
        assert_eq!(native.window_title(pump.id()).as_deref(), Some("renamed"));
    }
}
