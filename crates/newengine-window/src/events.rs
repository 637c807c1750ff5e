use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use glam::IVec2;
use parking_lot::{Mutex, RwLock};

use newengine_input::{KeyEvent, MouseEvent, MouseMoveArgs, MouseWheelArgs};

/// A file dropped onto the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragDropEvent {
    pub path: PathBuf,
}

impl DragDropEvent {
    #[inline]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Every notification a window fires, in one type.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowNotification {
    Resized,
    Closing,
    Closed,
    FocusGained,
    FocusLost,
    Shown,
    Hidden,
    MouseEntered,
    MouseLeft,
    Exposed,
    Moved(IVec2),
    DragDrop(DragDropEvent),
    MouseWheel(MouseWheelArgs),
    MouseMove(MouseMoveArgs),
    MouseDown(MouseEvent),
    MouseUp(MouseEvent),
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Ordered list of subscribers for one notification kind.
///
/// Handlers run on the pump thread. The list is snapshotted before a call, so
/// a handler may connect or disconnect others without deadlocking.
pub struct Signal<T> {
    next_id: AtomicU64,
    handlers: RwLock<Vec<(SubscriptionId, Handler<T>)>>,
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            handlers: RwLock::new(Vec::new()),
        }
    }
}

impl<T> Signal<T> {
    pub fn connect<F>(&self, f: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.write().push((id, Arc::new(f)));
        id
    }

    pub fn disconnect(&self, id: SubscriptionId) -> bool {
        let mut g = self.handlers.write();
        let before = g.len();
        g.retain(|(h, _)| *h != id);
        g.len() != before
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.handlers.read().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handlers.read().is_empty()
    }

    pub fn emit(&self, value: &T) {
        let handlers: Vec<Handler<T>> = {
            let g = self.handlers.read();
            if g.is_empty() {
                return;
            }
            g.iter().map(|(_, h)| h.clone()).collect()
        };

        for h in handlers {
            h(value);
        }
    }
}

/// Notification hub of one window.
///
/// Two ways to listen: per-kind `Signal`s, or `subscribe()` for a channel that
/// carries every notification in firing order.
#[derive(Default)]
pub struct WindowEvents {
    pub resized: Signal<()>,
    pub closing: Signal<()>,
    pub closed: Signal<()>,
    pub focus_gained: Signal<()>,
    pub focus_lost: Signal<()>,
    pub shown: Signal<()>,
    pub hidden: Signal<()>,
    pub mouse_entered: Signal<()>,
    pub mouse_left: Signal<()>,
    pub exposed: Signal<()>,
    pub moved: Signal<IVec2>,
    pub drag_drop: Signal<DragDropEvent>,
    pub mouse_wheel: Signal<MouseWheelArgs>,
    pub mouse_move: Signal<MouseMoveArgs>,
    pub mouse_down: Signal<MouseEvent>,
    pub mouse_up: Signal<MouseEvent>,
    pub key_down: Signal<KeyEvent>,
    pub key_up: Signal<KeyEvent>,

    listeners: Mutex<Vec<Sender<WindowNotification>>>,
}

impl WindowEvents {
    /// Channel of every notification fired from now on.
    ///
    /// Dropping the receiver unsubscribes it on the next fire.
    pub fn subscribe(&self) -> Receiver<WindowNotification> {
        let (tx, rx) = unbounded();
        self.listeners.lock().push(tx);
        rx
    }

    pub fn fire(&self, n: WindowNotification) {
        match &n {
            WindowNotification::Resized => self.resized.emit(&()),
            WindowNotification::Closing => self.closing.emit(&()),
            WindowNotification::Closed => self.closed.emit(&()),
            WindowNotification::FocusGained => self.focus_gained.emit(&()),
            WindowNotification::FocusLost => self.focus_lost.emit(&()),
            WindowNotification::Shown => self.shown.emit(&()),
            WindowNotification::Hidden => self.hidden.emit(&()),
            WindowNotification::MouseEntered => self.mouse_entered.emit(&()),
            WindowNotification::MouseLeft => self.mouse_left.emit(&()),
            WindowNotification::Exposed => self.exposed.emit(&()),
            WindowNotification::Moved(p) => self.moved.emit(p),
            WindowNotification::DragDrop(e) => self.drag_drop.emit(e),
            WindowNotification::MouseWheel(a) => self.mouse_wheel.emit(a),
            WindowNotification::MouseMove(a) => self.mouse_move.emit(a),
            WindowNotification::MouseDown(e) => self.mouse_down.emit(e),
            WindowNotification::MouseUp(e) => self.mouse_up.emit(e),
            WindowNotification::KeyDown(e) => self.key_down.emit(e),
            WindowNotification::KeyUp(e) => self.key_up.emit(e),
        }

        let mut listeners = self.listeners.lock();
        if !listeners.is_empty() {
            listeners.retain(|tx| tx.send(n.clone()).is_ok());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newengine_input::MouseButton;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn subscribers_run_in_connection_order() {
        let sig: Signal<u32> = Signal::default();
        let log = Arc::new(Mutex::new(Vec::new()));

        for tag in ["a", "b", "c"] {
            let log = log.clone();
            sig.connect(move |v| log.lock().push(format!("{tag}{v}")));
        }
        sig.emit(&7);

        assert_eq!(*log.lock(), vec!["a7", "b7", "c7"]);
    }

    #[test]
    fn disconnect_removes_only_that_handler() {
        let sig: Signal<()> = Signal::default();
        let hits = Arc::new(AtomicUsize::new(0));

        let h1 = hits.clone();
        let first = sig.connect(move |_| {
            h1.fetch_add(1, Ordering::Relaxed);
        });
        let h2 = hits.clone();
        sig.connect(move |_| {
            h2.fetch_add(10, Ordering::Relaxed);
        });

        assert!(sig.disconnect(first));
        assert!(!sig.disconnect(first));
        sig.emit(&());
        assert_eq!(hits.load(Ordering::Relaxed), 10);
        assert_eq!(sig.len(), 1);
    }

    #[test]
    fn handler_may_connect_from_inside_emit() {
        let sig: Arc<Signal<()>> = Arc::new(Signal::default());
        let inner = sig.clone();
        sig.connect(move |_| {
            inner.connect(|_| {});
        });

        sig.emit(&());
        assert_eq!(sig.len(), 2);
    }

    #[test]
    fn channel_sees_all_kinds_in_order() {
        let ev = WindowEvents::default();
        let rx = ev.subscribe();

        let down = MouseEvent::new(MouseButton::Left, true);
        ev.fire(WindowNotification::MouseDown(down));
        ev.fire(WindowNotification::Moved(IVec2::new(4, 5)));
        ev.fire(WindowNotification::Closing);

        let got: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            got,
            vec![
                WindowNotification::MouseDown(down),
                WindowNotification::Moved(IVec2::new(4, 5)),
                WindowNotification::Closing,
            ]
        );
    }

    #[test]
    fn dropped_receiver_is_pruned() {
        let ev = WindowEvents::default();
        drop(ev.subscribe());
        ev.fire(WindowNotification::Shown);
        assert!(ev.listeners.lock().is_empty());
    }
}
