use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use glam::IVec2;
use parking_lot::Mutex;

use newengine_input::SnapshotExchange;

use crate::buffered::BufferedValue;
use crate::events::WindowEvents;
use crate::native::NativeWindowId;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum LifecycleState {
    Uninitialized = 0,
    Running = 1,
    ClosePending = 2,
    Destroyed = 3,
}

impl LifecycleState {
    #[inline]
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Uninitialized,
            1 => Self::Running,
            2 => Self::ClosePending,
            _ => Self::Destroyed,
        }
    }
}

#[derive(Debug)]
pub struct AtomicLifecycle(AtomicU8);

impl AtomicLifecycle {
    #[inline]
    pub fn new(state: LifecycleState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    #[inline]
    pub fn load(&self) -> LifecycleState {
        LifecycleState::from_u8(self.0.load(Ordering::Acquire))
    }

    #[inline]
    pub fn store(&self, state: LifecycleState) {
        self.0.store(state as u8, Ordering::Release);
    }

    /// Move `from -> to`; false if the current state was not `from`.
    #[inline]
    pub fn transition(&self, from: LifecycleState, to: LifecycleState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

#[derive(Debug, Default)]
pub(crate) struct PendingTitle {
    pub text: String,
    pub dirty: bool,
}

#[derive(Debug, Copy, Clone)]
pub(crate) struct PollRate {
    pub limit: bool,
    pub interval: Duration,
}

/// State shared between a window's consumer side and its event pump.
pub struct WindowShared {
    pub(crate) lifecycle: AtomicLifecycle,
    pub(crate) destroying: AtomicBool,
    pub(crate) threaded: bool,
    pub(crate) id: OnceLock<NativeWindowId>,

    pub(crate) position: BufferedValue<IVec2>,
    pub(crate) size: BufferedValue<IVec2>,
    pub(crate) title: Mutex<PendingTitle>,
    pub(crate) poll: Mutex<PollRate>,

    pub(crate) exchange: SnapshotExchange,
    pub(crate) events: WindowEvents,
}

impl WindowShared {
    pub(crate) fn new(threaded: bool, title: String, poll: PollRate) -> Arc<Self> {
        Arc::new(Self {
            lifecycle: AtomicLifecycle::new(LifecycleState::Uninitialized),
            destroying: AtomicBool::new(false),
            threaded,
            id: OnceLock::new(),
            position: BufferedValue::default(),
            size: BufferedValue::default(),
            title: Mutex::new(PendingTitle { text: title, dirty: false }),
            poll: Mutex::new(poll),
            exchange: SnapshotExchange::new(),
            events: WindowEvents::default(),
        })
    }

    #[inline]
    pub fn state(&self) -> LifecycleState {
        self.lifecycle.load()
    }

    /// True from creation until destruction completes.
    #[inline]
    pub fn exists(&self) -> bool {
        matches!(self.state(), LifecycleState::Running | LifecycleState::ClosePending)
    }

    #[inline]
    pub fn close_pending(&self) -> bool {
        self.state() == LifecycleState::ClosePending
    }

    /// Flag the window for closing. Idempotent; false if it was not running.
    #[inline]
    pub fn request_close(&self) -> bool {
        self.lifecycle
            .transition(LifecycleState::Running, LifecycleState::ClosePending)
    }

    #[inline]
    pub fn native_id(&self) -> Option<NativeWindowId> {
        self.id.get().copied()
    }
}

/// Clonable close request usable from any thread.
///
/// A threaded window tears itself down on its own thread at the next cycle; an
/// inline window does it on the next `pump_events`.
#[derive(Clone)]
pub struct CloseHandle {
    shared: Arc<WindowShared>,
}

impl CloseHandle {
    pub(crate) fn new(shared: Arc<WindowShared>) -> Self {
        Self { shared }
    }

    #[inline]
    pub fn request(&self) {
        if self.shared.request_close() {
            log::debug!("window: close requested from handle");
        }
    }

    #[inline]
    pub fn is_requested(&self) -> bool {
        !matches!(self.shared.state(), LifecycleState::Running | LifecycleState::Uninitialized)
    }

    #[inline]
    pub fn exists(&self) -> bool {
        self.shared.exists()
    }
}
