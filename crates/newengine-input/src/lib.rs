//! NewEngine input core.
//!
//! Backend-agnostic pieces of the input pipeline:
//! - `keymap`: native scancode / button / modifier translation,
//! - `InputAccumulator`: per-cycle working buffer written by the event pump,
//! - `SnapshotExchange`: double-buffered hand-off to the consumer,
//! - `InputSnapshot`: the published, read-only view.
//!
//! Threading: exactly one thread writes through `SnapshotExchange::write`,
//! exactly one thread calls `SnapshotExchange::publish`. They may differ.

pub mod accumulator;
pub mod events;
pub mod exchange;
pub mod keymap;
pub mod keys;
pub mod mouse;
pub mod snapshot;
pub mod text;
pub mod tracker;

pub use accumulator::InputAccumulator;
pub use events::{KeyEvent, MouseEvent};
pub use exchange::SnapshotExchange;
pub use keys::{Key, ModifierKeys, MouseButton, MOUSE_BUTTON_COUNT};
pub use mouse::{MouseMoveArgs, MouseState, MouseWheelArgs};
pub use snapshot::InputSnapshot;
pub use text::{decode_native_string, decode_text_input, TEXT_INPUT_SIZE};
pub use tracker::MouseTracker;

pub use glam::{IVec2, Vec2};
