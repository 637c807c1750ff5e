//! NewEngine window subsystem.
//!
//! A `Window` owns one native window and an `EventPump` that drains the native
//! queue, feeds the input accumulator and fires notifications. Consumers call
//! `Window::pump_events` once per frame and get an immutable `InputSnapshot`.
//!
//! The native layer is abstracted by `NativeSystem`; `HeadlessSystem` is the
//! in-memory implementation used by tests and tools.

pub mod buffered;
pub mod config;
pub mod error;
pub mod events;
pub mod headless;
pub mod native;
pub mod pump;
pub mod registry;
pub mod state;
pub mod system;
pub mod window;

pub use buffered::BufferedValue;
pub use config::WindowConfig;
pub use error::{WindowError, WindowResult};
pub use events::{DragDropEvent, Signal, SubscriptionId, WindowEvents, WindowNotification};
pub use headless::HeadlessSystem;
pub use native::{
    DropKind, FullscreenMode, NativeEvent, NativeHandle, NativeSystem, NativeWindowId, WindowDesc,
    WindowEventKind, WindowFlags,
};
pub use pump::EventPump;
pub use registry::EventRegistry;
pub use state::{CloseHandle, LifecycleState};
pub use system::WindowSystem;
pub use window::{Rect, Window, WindowState};

pub use newengine_input as input;
