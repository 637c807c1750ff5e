use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::accumulator::InputAccumulator;
use crate::snapshot::InputSnapshot;

/// Two-slot hand-off between the event pump (single writer) and the consumer
/// (single publisher).
///
/// `private` names the slot the pump writes into; the other slot is the
/// backbuffer. Publishing flips the index with one atomic RMW, then copies the
/// retired slot out and clears it. The per-slot mutex is never contended on the
/// hot path: the writer only touches the private slot, the publisher only the
/// retired one. It exists so a write that was already in flight when the flip
/// happened finishes before the retired slot is read.
pub struct SnapshotExchange {
    slots: [Mutex<InputAccumulator>; 2],
    private: AtomicUsize,
}

impl Default for SnapshotExchange {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotExchange {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(events: usize) -> Self {
        Self {
            slots: [
                Mutex::new(InputAccumulator::with_capacity(events)),
                Mutex::new(InputAccumulator::with_capacity(events)),
            ],
            private: AtomicUsize::new(0),
        }
    }

    /// Mutate the private buffer.
    ///
    /// The index is re-read after the slot is claimed; if a publish retired the
    /// slot in between, the write moves to the new private slot instead of
    /// landing in a buffer that is about to be cleared.
    #[inline]
    pub fn write<R>(&self, f: impl FnOnce(&mut InputAccumulator) -> R) -> R {
        loop {
            let idx = self.private.load(Ordering::Acquire);
            let mut slot = self.slots[idx].lock();
            if self.private.load(Ordering::Acquire) == idx {
                return f(&mut slot);
            }
        }
    }

    /// Retire the private buffer into `out` and recycle it as the backbuffer.
    pub fn publish(&self, out: &mut InputSnapshot) {
        let retired = self.private.fetch_xor(1, Ordering::AcqRel);
        let mut slot = self.slots[retired].lock();
        slot.publish_into(out);
        slot.clear();
    }
}
