use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

/// A value published from one thread and read from another.
///
/// Writes go to the back slot, then the front index flips with one atomic
/// swap; readers always load the front slot. Same exchange as the input
/// snapshot buffers, sized for small `Copy` values like geometry.
pub struct BufferedValue<T: Copy> {
    slots: [Mutex<T>; 2],
    front: AtomicUsize,
}

impl<T: Copy + Default> Default for BufferedValue<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Copy> BufferedValue<T> {
    pub fn new(value: T) -> Self {
        Self {
            slots: [Mutex::new(value), Mutex::new(value)],
            front: AtomicUsize::new(0),
        }
    }

    #[inline]
    pub fn get(&self) -> T {
        *self.slots[self.front.load(Ordering::Acquire)].lock()
    }

    #[inline]
    pub fn set(&self, value: T) {
        let back = self.front.load(Ordering::Acquire) ^ 1;
        *self.slots[back].lock() = value;
        self.front.swap(back, Ordering::AcqRel);
    }
}

impl<T: Copy + std::fmt::Debug> std::fmt::Debug for BufferedValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BufferedValue").field(&self.get()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use std::sync::Arc;

    #[test]
    fn set_then_get() {
        let v = BufferedValue::new(IVec2::new(1, 2));
        assert_eq!(v.get(), IVec2::new(1, 2));
        v.set(IVec2::new(3, 4));
        assert_eq!(v.get(), IVec2::new(3, 4));
        v.set(IVec2::new(5, 6));
        assert_eq!(v.get(), IVec2::new(5, 6));
    }

    #[test]
    fn reader_never_sees_torn_values() {
        let v = Arc::new(BufferedValue::new(IVec2::new(0, 0)));
        let writer = {
            let v = v.clone();
            std::thread::spawn(move || {
                for i in 0..5_000 {
                    v.set(IVec2::new(i, -i));
                }
            })
        };

        while !writer.is_finished() {
            let p = v.get();
            assert_eq!(p.x, -p.y);
        }
        writer.join().expect("writer panicked");
        assert_eq!(v.get(), IVec2::new(4_999, -4_999));
    }
}
