use std::collections::HashMap;

use parking_lot::Mutex;

use crate::native::{NativeEvent, NativeSystem, NativeWindowId};

/// Routes the process-wide native queue to per-window buffers.
///
/// Any window may trigger the poll; whoever polls distributes everything that
/// arrived, so events for other windows wait in their buffers until their own
/// pump drains them. Events for unregistered windows are dropped.
#[derive(Default)]
pub struct EventRegistry {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    queues: HashMap<NativeWindowId, Vec<NativeEvent>>,
    scratch: Vec<NativeEvent>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, id: NativeWindowId) {
        let mut g = self.inner.lock();
        g.queues.entry(id).or_default();
        log::trace!("window: registry add id={}", id.0);
    }

    /// Remove the window; its undrained events are discarded.
    pub fn unregister(&self, id: NativeWindowId) {
        let mut g = self.inner.lock();
        if let Some(q) = g.queues.remove(&id) {
            if !q.is_empty() {
                log::debug!("window: dropping {} undrained events for id={}", q.len(), id.0);
            }
        }
    }

    #[inline]
    pub fn is_registered(&self, id: NativeWindowId) -> bool {
        self.inner.lock().queues.contains_key(&id)
    }

    /// Poll the native queue once and route everything to the window buffers.
    ///
    /// Application-wide events (no window id) go to every registered window.
    pub fn process_events(&self, native: &dyn NativeSystem) {
        let mut g = self.inner.lock();
        let Inner { queues, scratch } = &mut *g;

        native.poll_events(scratch);
        for ev in scratch.drain(..) {
            match ev.window_id() {
                Some(id) => match queues.get_mut(&id) {
                    Some(q) => q.push(ev),
                    None => log::trace!("window: event for unknown id={} dropped", id.0),
                },
                None => {
                    for q in queues.values_mut() {
                        q.push(ev.clone());
                    }
                }
            }
        }
    }

    /// Move the buffered events of `id` into `out`, in arrival order.
    pub fn drain_into(&self, id: NativeWindowId, out: &mut Vec<NativeEvent>) {
        let mut g = self.inner.lock();
        if let Some(q) = g.queues.get_mut(&id) {
            out.append(q);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessSystem;

    fn wheel(id: u32, y: f32) -> NativeEvent {
        NativeEvent::MouseWheel {
            window: NativeWindowId(id),
            x: 0.0,
            y,
        }
    }

    #[test]
    fn routes_by_window_and_broadcasts_quit() {
        let sys = HeadlessSystem::new();
        let reg = EventRegistry::new();
        reg.register(NativeWindowId(1));
        reg.register(NativeWindowId(2));

        sys.push_event(wheel(1, 1.0));
        sys.push_event(wheel(2, 2.0));
        sys.push_event(wheel(9, 3.0));
        sys.push_event(NativeEvent::Quit);
        reg.process_events(&sys);

        let mut a = Vec::new();
        reg.drain_into(NativeWindowId(1), &mut a);
        assert_eq!(a, vec![wheel(1, 1.0), NativeEvent::Quit]);

        let mut b = Vec::new();
        reg.drain_into(NativeWindowId(2), &mut b);
        assert_eq!(b, vec![wheel(2, 2.0), NativeEvent::Quit]);

        let mut again = Vec::new();
        reg.drain_into(NativeWindowId(1), &mut again);
        assert!(again.is_empty());
    }

    #[test]
    fn unregister_discards_buffer() {
        let sys = HeadlessSystem::new();
        let reg = EventRegistry::new();
        reg.register(NativeWindowId(4));
        sys.push_event(wheel(4, 1.0));
        reg.process_events(&sys);

        reg.unregister(NativeWindowId(4));
        assert!(!reg.is_registered(NativeWindowId(4)));

        let mut out = Vec::new();
        reg.drain_into(NativeWindowId(4), &mut out);
        assert!(out.is_empty());
    }
}
